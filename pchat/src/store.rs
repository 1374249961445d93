//! Conversation storage contract and the in-memory implementation.

use pprovider::Turn;

/// Ordered transcript of one session.
///
/// Turns are only ever appended, and the whole transcript can be cleared with
/// [`reset`](ConversationStore::reset). Nothing hands out mutable access to a
/// stored turn. A store belongs to exactly one session; concurrent
/// conversations each own their own store.
pub trait ConversationStore: Send {
    fn turns(&self) -> &[Turn];

    fn append(&mut self, turn: Turn);

    fn reset(&mut self);

    fn snapshot(&self) -> Vec<Turn> {
        self.turns().to_vec()
    }

    fn is_empty(&self) -> bool {
        self.turns().is_empty()
    }

    fn len(&self) -> usize {
        self.turns().len()
    }

    fn last(&self) -> Option<&Turn> {
        self.turns().last()
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    turns: Vec<Turn>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversationStore for InMemoryConversationStore {
    fn turns(&self) -> &[Turn] {
        &self.turns
    }

    fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    fn reset(&mut self) {
        self.turns.clear();
    }
}
