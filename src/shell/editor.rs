//! Line editor.
//!
//! [`LineBuffer`] keeps the bytes typed so far and a cursor into them, and
//! mirrors every edit on the terminal through an [`Echo`] sink so that the
//! screen always shows the buffer with the cursor in the right column.

use crate::error::Error;

const BACKSPACES: [u8; 16] = [0x08; 16];
const SPACES: [u8; 16] = [b' '; 16];

/// Receiver of the terminal output produced by editing.
pub trait Echo {
    /// Printable bytes taken from the line.
    fn text(&mut self, bytes: &[u8]);
    /// Cursor motion and erase sequences.
    fn control(&mut self, bytes: &[u8]);
}

/// Which byte [`LineBuffer::delete`] removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The byte before the cursor (backspace).
    Backward,
    /// The byte under the cursor (delete).
    Forward,
}

/// Cursor-addressable edit buffer over borrowed storage.
///
/// Invariant: `cursor <= length < capacity`. One byte of the storage is
/// always left unused.
#[derive(Debug)]
pub struct LineBuffer<'a> {
    buf: &'a mut [u8],
    length: usize,
    cursor: usize,
}

fn repeat(echo: &mut dyn Echo, pattern: &[u8; 16], mut count: usize) {
    while count > 0 {
        let chunk = count.min(pattern.len());
        echo.control(&pattern[..chunk]);
        count -= chunk;
    }
}

impl<'a> LineBuffer<'a> {
    /// Wrap `buf` as an empty line.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            length: 0,
            cursor: 0,
        }
    }

    /// Size of the storage.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of bytes on the line.
    pub fn len(&self) -> usize {
        self.length
    }

    /// `true` if nothing has been typed.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The line contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.length]
    }

    /// The whole storage, including bytes past the line end.
    pub(crate) fn raw_mut(&mut self) -> &mut [u8] {
        self.buf
    }

    /// Insert `byte` at the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LineTooLong`] and leaves the line untouched if it is
    /// full.
    pub fn insert(&mut self, byte: u8, echo: &mut dyn Echo) -> Result<(), Error> {
        if self.length + 1 >= self.buf.len() {
            return Err(Error::LineTooLong);
        }

        if self.cursor == self.length {
            self.buf[self.length] = byte;
            self.length += 1;
            self.cursor += 1;
            echo.text(&[byte]);
        } else {
            self.buf.copy_within(self.cursor..self.length, self.cursor + 1);
            self.buf[self.cursor] = byte;
            self.cursor += 1;
            self.length += 1;
            echo.text(&self.buf[self.cursor - 1..self.length]);
            repeat(echo, &BACKSPACES, self.length - self.cursor);
        }
        Ok(())
    }

    /// Delete one byte. Backward at column 0 and forward at the line end do
    /// nothing.
    pub fn delete(&mut self, direction: Direction, echo: &mut dyn Echo) {
        match direction {
            Direction::Backward if self.cursor == 0 => return,
            Direction::Forward if self.cursor == self.length => return,
            _ => {}
        }

        if direction == Direction::Backward && self.cursor == self.length {
            self.cursor -= 1;
            self.length -= 1;
            echo.control(b"\x08 \x08");
            return;
        }

        match direction {
            Direction::Backward => {
                self.buf.copy_within(self.cursor..self.length, self.cursor - 1);
                self.cursor -= 1;
                echo.control(&BACKSPACES[..1]);
            }
            Direction::Forward => {
                self.buf.copy_within(self.cursor + 1..self.length, self.cursor);
            }
        }
        self.length -= 1;

        echo.text(&self.buf[self.cursor..self.length]);
        echo.control(b" ");
        repeat(echo, &BACKSPACES, self.length - self.cursor + 1);
    }

    /// Move the cursor one byte left.
    pub fn move_left(&mut self, echo: &mut dyn Echo) {
        if self.cursor > 0 {
            echo.control(&BACKSPACES[..1]);
            self.cursor -= 1;
        }
    }

    /// Move the cursor one byte right.
    pub fn move_right(&mut self, echo: &mut dyn Echo) {
        if self.cursor < self.length {
            echo.text(&self.buf[self.cursor..self.cursor + 1]);
            self.cursor += 1;
        }
    }

    /// Erase the line from the screen. The contents are kept.
    pub fn clear_line(&self, echo: &mut dyn Echo) {
        repeat(echo, &SPACES, self.length - self.cursor);
        Self::delete_line(self.length, echo);
    }

    /// Erase `count` columns left of the terminal cursor.
    pub fn delete_line(count: usize, echo: &mut dyn Echo) {
        for _ in 0..count {
            echo.control(b"\x08 \x08");
        }
    }

    /// Draw the line and put the terminal cursor back in place.
    pub fn redraw(&self, echo: &mut dyn Echo) {
        echo.text(self.as_bytes());
        repeat(echo, &BACKSPACES, self.length - self.cursor);
    }

    /// Empty the line without touching the screen.
    ///
    /// The old bytes stay in the storage until overwritten.
    pub fn reset(&mut self) {
        self.length = 0;
        self.cursor = 0;
    }

    /// Replace the contents, truncating to fit, and put the cursor at the
    /// end. Nothing is echoed.
    pub fn replace(&mut self, content: &[u8]) {
        let len = content.len().min(self.buf.len() - 1);
        self.buf[..len].copy_from_slice(&content[..len]);
        self.length = len;
        self.cursor = len;
    }

    /// Shorten the line to `len` bytes and put the cursor at the end.
    pub fn truncate(&mut self, len: usize) {
        self.length = self.length.min(len);
        self.cursor = self.length;
    }

    /// Insert `prefix` before the contents and put the cursor at the end.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LineTooLong`] if the result does not fit.
    pub fn prepend(&mut self, prefix: &[u8]) -> Result<(), Error> {
        let total = self.length + prefix.len();
        if total >= self.buf.len() {
            return Err(Error::LineTooLong);
        }
        self.buf.copy_within(..self.length, prefix.len());
        self.buf[..prefix.len()].copy_from_slice(prefix);
        self.length = total;
        self.cursor = total;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Screen {
        out: Vec<u8>,
    }

    impl Echo for Screen {
        fn text(&mut self, bytes: &[u8]) {
            self.out.extend_from_slice(bytes);
        }
        fn control(&mut self, bytes: &[u8]) {
            self.out.extend_from_slice(bytes);
        }
    }

    #[test]
    fn append_and_insert_mid_line() {
        let mut storage = [0u8; 16];
        let mut line = LineBuffer::new(&mut storage);
        let mut screen = Screen::default();

        line.insert(b'a', &mut screen).unwrap();
        line.insert(b'c', &mut screen).unwrap();
        line.move_left(&mut screen);
        line.insert(b'b', &mut screen).unwrap();

        assert_eq!(line.as_bytes(), b"abc");
        assert_eq!(line.cursor(), 2);
        assert_eq!(screen.out, b"ac\x08bc\x08");
    }

    #[test]
    fn full_line_rejects_input() {
        let mut storage = [0u8; 4];
        let mut line = LineBuffer::new(&mut storage);
        let mut screen = Screen::default();

        for byte in *b"xyz" {
            line.insert(byte, &mut screen).unwrap();
        }
        assert_eq!(line.insert(b'!', &mut screen), Err(Error::LineTooLong));
        assert_eq!(line.as_bytes(), b"xyz");
    }

    #[test]
    fn backspace_and_forward_delete() {
        let mut storage = [0u8; 16];
        let mut line = LineBuffer::new(&mut storage);
        let mut screen = Screen::default();
        line.replace(b"abcd");

        line.move_left(&mut screen);
        line.move_left(&mut screen);
        screen.out.clear();

        line.delete(Direction::Backward, &mut screen);
        assert_eq!(line.as_bytes(), b"acd");
        assert_eq!(line.cursor(), 1);
        assert_eq!(screen.out, b"\x08cd \x08\x08\x08");

        screen.out.clear();
        line.delete(Direction::Forward, &mut screen);
        assert_eq!(line.as_bytes(), b"ad");
        assert_eq!(line.cursor(), 1);
        assert_eq!(screen.out, b"d \x08\x08");
    }

    #[test]
    fn delete_at_edges_is_a_no_op() {
        let mut storage = [0u8; 8];
        let mut line = LineBuffer::new(&mut storage);
        let mut screen = Screen::default();
        line.replace(b"ab");

        line.delete(Direction::Forward, &mut screen);
        line.move_left(&mut screen);
        line.move_left(&mut screen);
        screen.out.clear();
        line.delete(Direction::Backward, &mut screen);

        assert_eq!(line.as_bytes(), b"ab");
        assert!(screen.out.is_empty());
    }

    #[test]
    fn prepend_moves_contents() {
        let mut storage = [0u8; 12];
        let mut line = LineBuffer::new(&mut storage);
        line.replace(b"stop");
        line.prepend(b"help ").unwrap();
        assert_eq!(line.as_bytes(), b"help stop");
        assert_eq!(line.prepend(b"xyz"), Err(Error::LineTooLong));
    }
}
