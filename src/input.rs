//! Input controller — the draft line and its submit rule.

/// Keys the controller reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    /// Designated submit trigger.
    Enter,
}

#[derive(Clone, Debug, Default)]
pub struct InputController {
    draft: String,
}

impl InputController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Apply one key. Returns the submitted text when the key was `Enter` and
    /// the draft was accepted.
    pub fn handle_key(&mut self, key: Key) -> Option<String> {
        match key {
            Key::Char(c) => {
                self.draft.push(c);
                None
            }
            Key::Backspace => {
                self.draft.pop();
                None
            }
            Key::Enter => self.submit(),
        }
    }

    /// Take the draft if it has any non-whitespace content. The returned text
    /// is the raw, untrimmed draft and the draft is cleared. A blank draft is
    /// left untouched and nothing is returned.
    pub fn submit(&mut self) -> Option<String> {
        if self.draft.trim().is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.draft))
    }
}

#[cfg(test)]
#[path = "input_test.rs"]
mod tests;
