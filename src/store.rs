//! Conversation store — the append-only transcript behind the chat view.

pub use frames::Role;

/// One transcript entry. Immutable once appended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Ordered, append-only sequence of entries. `revision` increases by one on
/// every append; renderers compare it to decide whether to redraw.
#[derive(Clone, Debug, Default)]
pub struct ConversationStore {
    entries: Vec<Message>,
    revision: u64,
}

impl ConversationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: Message) {
        self.entries.push(entry);
        self.revision += 1;
    }

    #[must_use]
    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    /// Entries appended after the first `seen`.
    #[must_use]
    pub fn since(&self, seen: usize) -> &[Message] {
        self.entries.get(seen..).unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
