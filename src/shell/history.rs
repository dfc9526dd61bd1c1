//! Command history ring.

use heapless::Vec;

use crate::config::MAX_HISTORY;

/// Navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Towards older entries.
    Up,
    /// Towards newer entries and finally the live line.
    Down,
}

/// Outcome of [`History::navigate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation<'h> {
    /// Already on the live line; nothing to redraw.
    Unchanged,
    /// Back on the live line, which starts out empty.
    Live,
    /// Show this entry.
    Entry(&'h [u8]),
}

#[derive(Debug)]
struct Slot<'a> {
    data: &'a mut [u8],
    len: usize,
}

/// Fixed-capacity circular log of submitted lines.
///
/// Slots are carved out of caller storage once and never reallocated.
/// `offset` is the navigation cursor: 0 is the live line, `-n` is the
/// `n`-th most recent entry.
#[derive(Debug)]
pub struct History<'a> {
    slots: Vec<Slot<'a>, MAX_HISTORY>,
    record: usize,
    count: usize,
    offset: i32,
}

impl<'a> History<'a> {
    /// Split `storage` into up to `depth` slots of `slot_size` bytes.
    ///
    /// Fewer slots are created if `storage` is too small.
    pub fn new(storage: &'a mut [u8], slot_size: usize, depth: usize) -> Self {
        let mut slots = Vec::new();
        if slot_size > 0 {
            for data in storage.chunks_exact_mut(slot_size).take(depth.min(MAX_HISTORY)) {
                // bounded by MAX_HISTORY above
                let _ = slots.push(Slot { data, len: 0 });
            }
        }
        Self {
            slots,
            record: 0,
            count: 0,
            offset: 0,
        }
    }

    /// Number of slots.
    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.count
    }

    /// `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Record a submitted line and return to the live line.
    ///
    /// A line equal to the most recent entry is not recorded again.
    pub fn push(&mut self, line: &[u8]) {
        self.offset = 0;
        let depth = self.slots.len();
        if depth == 0 {
            return;
        }

        let previous = if self.record == 0 { depth } else { self.record } - 1;
        if self.count > 0 && self.entry(previous) == line {
            return;
        }

        let slot = &mut self.slots[self.record];
        let len = line.len().min(slot.data.len());
        slot.data[..len].copy_from_slice(&line[..len]);
        slot.len = len;
        if len != 0 {
            self.record += 1;
        }

        self.count = (self.count + 1).min(depth);
        if self.record >= depth {
            self.record = 0;
        }
    }

    /// Step through the entries.
    ///
    /// Going up stops at the oldest entry; going down past the newest
    /// returns [`Navigation::Live`] once and [`Navigation::Unchanged`]
    /// afterwards.
    pub fn navigate(&mut self, step: Step) -> Navigation<'_> {
        let depth = self.slots.len();
        if depth == 0 {
            return Navigation::Unchanged;
        }

        let oldest = -(self.count.max(self.record) as i32);
        match step {
            Step::Up => {
                let before = self.offset;
                self.offset -= 1;
                if before <= oldest {
                    self.offset = oldest;
                }
            }
            Step::Down => {
                self.offset += 1;
                if self.offset > 0 {
                    self.offset = 0;
                    return Navigation::Unchanged;
                }
            }
        }

        if self.offset == 0 {
            return Navigation::Live;
        }
        let index = (self.record as i32 + depth as i32 + self.offset) as usize % depth;
        Navigation::Entry(self.entry(index))
    }

    fn entry(&self, index: usize) -> &[u8] {
        let slot = &self.slots[index];
        &slot.data[..slot.len]
    }
}
