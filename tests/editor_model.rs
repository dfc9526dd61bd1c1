//! Randomised editing against a reference model of the line and the screen.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use libshell::io::Write;
use libshell::{Config, Registry, Shell};

#[derive(Debug, Default)]
struct Capture(Vec<u8>);

impl Write for Capture {
    type Error = ();

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// A one-row terminal that understands printable bytes and backspace.
#[derive(Debug, Default)]
struct Screen {
    row: Vec<u8>,
    col: usize,
}

impl Screen {
    fn apply(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if byte == 0x08 {
                self.col = self.col.saturating_sub(1);
                continue;
            }
            if self.col == self.row.len() {
                self.row.push(byte);
            } else {
                self.row[self.col] = byte;
            }
            self.col += 1;
        }
    }

    fn visible(&self) -> &[u8] {
        let end = self
            .row
            .iter()
            .rposition(|&byte| byte != b' ')
            .map_or(0, |i| i + 1);
        &self.row[..end]
    }
}

#[derive(Debug, Clone, Copy)]
enum Edit {
    Type(u8),
    Left,
    Right,
    Backspace,
    Delete,
}

impl Edit {
    fn random(rng: &mut StdRng) -> Self {
        match rng.gen_range(0..8) {
            0 => Edit::Left,
            1 => Edit::Right,
            2 => Edit::Backspace,
            3 => Edit::Delete,
            _ => Edit::Type(rng.gen_range(b'a'..=b'z')),
        }
    }

    fn bytes(self) -> Vec<u8> {
        match self {
            Edit::Type(byte) => vec![byte],
            Edit::Left => b"\x1b[D".to_vec(),
            Edit::Right => b"\x1b[C".to_vec(),
            Edit::Backspace => vec![0x7F],
            Edit::Delete => b"\x1b[3~".to_vec(),
        }
    }
}

/// Reference behaviour of the edit line.
#[derive(Debug, Default)]
struct Model {
    line: Vec<u8>,
    cursor: usize,
}

impl Model {
    fn apply(&mut self, edit: Edit, capacity: usize) {
        match edit {
            Edit::Type(byte) => {
                if self.line.len() + 1 < capacity {
                    self.line.insert(self.cursor, byte);
                    self.cursor += 1;
                }
            }
            Edit::Left => self.cursor = self.cursor.saturating_sub(1),
            Edit::Right => self.cursor = (self.cursor + 1).min(self.line.len()),
            Edit::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.line.remove(self.cursor);
                }
            }
            Edit::Delete => {
                if self.cursor < self.line.len() {
                    self.line.remove(self.cursor);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPACITY: usize = 64;

    #[test]
    fn test_random_edits_match_model() {
        let config = Config::default();
        let registry: &'static Registry<'static> =
            Box::leak(Box::new(Registry::with_builtins(&[], &config).unwrap()));

        for seed in 0..32u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut buffer = vec![0u8; CAPACITY * (config.history_depth + 1)];
            let mut shell =
                Shell::new(Capture::default(), &mut buffer, registry, config.clone()).unwrap();
            shell.transport_mut().0.clear();

            let mut model = Model::default();
            let mut screen = Screen::default();

            // stay below the capacity so the overflow warning never fires
            for _ in 0..200 {
                let edit = Edit::random(&mut rng);
                if matches!(edit, Edit::Type(_)) && model.line.len() + 2 >= CAPACITY {
                    continue;
                }
                model.apply(edit, CAPACITY);
                shell.handle_bytes(&edit.bytes());

                let output = std::mem::take(&mut shell.transport_mut().0);
                screen.apply(&output);

                assert_eq!(shell.line(), &model.line[..], "seed {seed}: line after {edit:?}");
                assert_eq!(shell.cursor(), model.cursor, "seed {seed}: cursor after {edit:?}");
                assert_eq!(screen.visible(), &model.line[..], "seed {seed}: screen after {edit:?}");
                assert_eq!(screen.col, model.cursor, "seed {seed}: column after {edit:?}");
            }
        }
    }
}
