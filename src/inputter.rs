use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::trace;

/// Single line text input backing the search box.
#[derive(Default)]
pub struct Inputter {
    current_input: String,
    cursor_pos: usize, // In chars, not bytes
    finished: bool,
    canceled: bool,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct InputResult {
    pub input: String,
    pub finished: bool,
    pub canceled: bool,
    pub changed: bool, // Text differs from before the key
    pub cursor_pos: usize,
}

impl Inputter {
    pub fn read(&mut self, key: KeyEvent) -> InputResult {
        let before = self.current_input.clone();
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => self.finished = true,
            (KeyCode::Esc, _) => self.escape(),
            (KeyCode::Backspace, _) => self.backspace(),
            (KeyCode::Delete, _) => self.delete(),
            (KeyCode::Left, _) => self.cursor_pos = self.cursor_pos.saturating_sub(1),
            (KeyCode::Right, _) => self.cursor_pos = (self.cursor_pos + 1).min(self.char_len()),
            (KeyCode::Home, _) => self.cursor_pos = 0,
            (KeyCode::End, _) => self.cursor_pos = self.char_len(),
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.current_input.clear();
                self.cursor_pos = 0;
            }
            (KeyCode::Char(chr), m) if !m.contains(KeyModifiers::CONTROL) => self.insert(chr),
            (code, m) => trace!("Ignoring input key {code:?} {m:?}"),
        }
        let mut result = self.get();
        result.changed = result.input != before;
        result
    }

    /// Replaces the text and moves the cursor to its end.
    pub fn set(&mut self, s: &str) {
        self.current_input = s.to_string();
        self.cursor_pos = self.char_len();
    }

    pub fn get(&self) -> InputResult {
        InputResult {
            input: self.current_input.clone(),
            finished: self.finished,
            canceled: self.canceled,
            changed: false,
            cursor_pos: self.cursor_pos,
        }
    }

    pub fn clear(&mut self) {
        self.canceled = false;
        self.finished = false;
        self.current_input.clear();
        self.cursor_pos = 0;
    }

    /// Starts a new editing round keeping the current text.
    pub fn resume(&mut self) {
        self.canceled = false;
        self.finished = false;
        self.cursor_pos = self.char_len();
    }

    fn escape(&mut self) {
        self.clear();
        self.canceled = true;
        self.finished = true;
    }

    fn insert(&mut self, chr: char) {
        let at = self.byte_pos(self.cursor_pos);
        self.current_input.insert(at, chr);
        self.cursor_pos += 1;
    }

    fn backspace(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos -= 1;
            let at = self.byte_pos(self.cursor_pos);
            self.current_input.remove(at);
        }
    }

    fn delete(&mut self) {
        if self.cursor_pos < self.char_len() {
            let at = self.byte_pos(self.cursor_pos);
            self.current_input.remove(at);
        }
    }

    fn char_len(&self) -> usize {
        self.current_input.chars().count()
    }

    fn byte_pos(&self, char_pos: usize) -> usize {
        self.current_input
            .char_indices()
            .nth(char_pos)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.current_input.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(input: &mut Inputter, s: &str) -> InputResult {
        let mut last = input.get();
        for c in s.chars() {
            last = input.read(key(KeyCode::Char(c)));
        }
        last
    }

    #[test]
    fn typing_marks_changes() {
        let mut input = Inputter::default();
        let r = type_str(&mut input, "ava");
        assert_eq!(r.input, "ava");
        assert!(r.changed);
        let r = input.read(key(KeyCode::Left));
        assert!(!r.changed);
        assert_eq!(r.cursor_pos, 2);
    }

    #[test]
    fn editing_in_the_middle_handles_multibyte() {
        let mut input = Inputter::default();
        type_str(&mut input, "₹80");
        input.read(key(KeyCode::Home));
        input.read(key(KeyCode::Delete));
        assert_eq!(input.get().input, "80");
        input.read(key(KeyCode::End));
        input.read(key(KeyCode::Backspace));
        assert_eq!(input.get().input, "8");
    }

    #[test]
    fn enter_finishes_escape_cancels() {
        let mut input = Inputter::default();
        type_str(&mut input, "zzz");
        let r = input.read(key(KeyCode::Enter));
        assert!(r.finished && !r.canceled);
        assert_eq!(r.input, "zzz");

        input.resume();
        let r = input.read(key(KeyCode::Esc));
        assert!(r.finished && r.canceled && r.changed);
        assert_eq!(r.input, "");
    }
}
