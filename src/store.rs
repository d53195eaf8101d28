//! Conversation storage.
//!
//! The store is keyed by user id. Loading an unknown user yields a fresh
//! [`Conversation`] with a default context; nothing is ever deleted by the
//! engine. Turn serialization per user is the caller's concern (see
//! [`ChatEngine`](crate::ChatEngine)), the store only has to make each
//! individual `load`/`save` atomic.

use crate::conversation::Conversation;
use crate::error::StoreError;
use std::collections::HashMap;
use std::sync::RwLock;

pub trait ConversationStore<C>: Send + Sync {
    /// Load the conversation for `user_id`, creating fresh state if absent.
    fn load(&self, user_id: &str) -> Result<Conversation<C>, StoreError>;

    /// Persist `conversation` under its `user_id`.
    fn save(&self, conversation: &Conversation<C>) -> Result<(), StoreError>;
}

/// In-memory implementation for development and testing.
pub struct InMemoryConversationStore<C> {
    conversations: RwLock<HashMap<String, Conversation<C>>>,
}

impl<C> InMemoryConversationStore<C> {
    pub fn new() -> Self {
        Self { conversations: RwLock::new(HashMap::new()) }
    }

    /// Number of users with saved state.
    pub fn len(&self) -> Result<usize, StoreError> {
        let conversations = self.conversations.read().map_err(|e| StoreError::Internal(e.to_string()))?;
        Ok(conversations.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.len().map(|n| n == 0)
    }
}

impl<C> Default for InMemoryConversationStore<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ConversationStore<C> for InMemoryConversationStore<C>
where
    C: Default + Clone + Send + Sync,
{
    fn load(&self, user_id: &str) -> Result<Conversation<C>, StoreError> {
        let conversations = self.conversations.read().map_err(|e| StoreError::Internal(e.to_string()))?;
        match conversations.get(user_id) {
            Some(conversation) => Ok(conversation.clone()),
            None => {
                tracing::debug!(user = %user_id, "starting new conversation");
                Ok(Conversation::new(user_id))
            }
        }
    }

    fn save(&self, conversation: &Conversation<C>) -> Result<(), StoreError> {
        let mut conversations = self.conversations.write().map_err(|e| StoreError::Internal(e.to_string()))?;
        conversations.insert(conversation.user_id.clone(), conversation.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_user_gets_fresh_state_without_saving() {
        let store = InMemoryConversationStore::<u32>::new();
        let conversation = store.load("alice").unwrap();

        assert_eq!(conversation.user_id, "alice");
        assert_eq!(conversation.context, 0);
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn saved_state_is_per_user() {
        let store = InMemoryConversationStore::<u32>::new();
        let mut alice = store.load("alice").unwrap();
        alice.context = 7;
        store.save(&alice).unwrap();

        assert_eq!(store.load("alice").unwrap().context, 7);
        assert_eq!(store.load("bob").unwrap().context, 0);
        assert_eq!(store.len().unwrap(), 1);
    }
}
