//! Bounded cache of recently seen messages.
//!
//! The Bot API cannot fetch a message by id, so lookups for replied-to messages are answered from
//! what the bot has already received (including the copy embedded in each reply).

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use vnote_core::IncomingMessage;

pub const DEFAULT_CAPACITY: usize = 1024;

type Key = (i64, i32);

pub struct RecentMessages {
    capacity: usize,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    messages: HashMap<Key, IncomingMessage>,
    order: VecDeque<Key>,
}

impl Default for RecentMessages {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RecentMessages {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Stores or refreshes a message; evicts the oldest entry when full.
    pub fn remember(&self, message: IncomingMessage) {
        let key = (message.chat.id, message.id);
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.messages.insert(key, message).is_none() {
            inner.order.push_back(key);
            while inner.order.len() > self.capacity {
                if let Some(old) = inner.order.pop_front() {
                    inner.messages.remove(&old);
                }
            }
        }
    }

    pub fn get(&self, chat_id: i64, message_id: i32) -> Option<IncomingMessage> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.messages.get(&(chat_id, message_id)).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .messages
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vnote_core::Chat;

    fn msg(chat_id: i64, id: i32, text: &str) -> IncomingMessage {
        IncomingMessage {
            id,
            chat: Chat {
                id: chat_id,
                chat_type: "channel".to_string(),
            },
            sender: None,
            text: Some(text.to_string()),
            entities: Vec::new(),
            document: None,
            reply_to_message_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_remember_and_get() {
        let cache = RecentMessages::default();
        cache.remember(msg(-100, 1, "a"));

        assert_eq!(cache.get(-100, 1).unwrap().text.as_deref(), Some("a"));
        assert!(cache.get(-100, 2).is_none());
        assert!(cache.get(-200, 1).is_none());
    }

    #[test]
    fn test_evicts_oldest() {
        let cache = RecentMessages::new(2);
        cache.remember(msg(-100, 1, "a"));
        cache.remember(msg(-100, 2, "b"));
        cache.remember(msg(-100, 3, "c"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(-100, 1).is_none());
        assert!(cache.get(-100, 3).is_some());
    }

    #[test]
    fn test_refresh_does_not_grow() {
        let cache = RecentMessages::new(2);
        cache.remember(msg(-100, 1, "a"));
        cache.remember(msg(-100, 1, "edited"));
        cache.remember(msg(-100, 2, "b"));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(-100, 1).unwrap().text.as_deref(), Some("edited"));
    }
}
