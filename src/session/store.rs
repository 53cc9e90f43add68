//! Session store over a concurrent map
//!
//! Each map entry is guarded by its shard lock, so mutations against the
//! same session id are atomic with respect to concurrent requests. Nothing
//! here persists across restarts.

use super::models::{ChatMessage, Session, SessionSummary};
use dashmap::DashMap;
use tracing::{debug, info};
use uuid::Uuid;

/// In-memory session store
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session. When no name is given, falls back to "Chat N"
    /// based on the current session count.
    pub fn create(&self, name: Option<String>) -> Session {
        let id = Uuid::new_v4().to_string();
        let name = match name {
            Some(n) if !n.trim().is_empty() => n,
            _ => format!("Chat {}", self.sessions.len() + 1),
        };
        let session = Session {
            id: id.clone(),
            name,
            created_at: chrono::Utc::now(),
            messages: Vec::new(),
        };
        info!("Created session {}", id);
        self.sessions.insert(id, session.clone());
        session
    }

    /// Fetch a full session by id
    pub fn get(&self, id: &str) -> Option<Session> {
        self.sessions.get(id).map(|s| s.clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    /// Session summaries ordered by creation time ascending
    pub fn list(&self) -> Vec<SessionSummary> {
        let mut summaries: Vec<SessionSummary> =
            self.sessions.iter().map(|s| s.summary()).collect();
        summaries.sort_by_key(|s| s.created_at);
        summaries
    }

    /// Delete a session. Returns false when the id is unknown.
    pub fn delete(&self, id: &str) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            info!("Deleted session {}", id);
        }
        removed
    }

    /// Rename a session. Callers validate the name; the store only requires
    /// the session to exist.
    pub fn rename(&self, id: &str, name: impl Into<String>) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut session) => {
                session.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Append a message to a session's history. Returns false when the id
    /// is unknown.
    pub fn append_message(&self, id: &str, message: ChatMessage) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut session) => {
                debug!("Appending {:?} message to session {}", message.role, id);
                session.messages.push(message);
                true
            }
            None => false,
        }
    }

    /// Clear a session's message history, keeping the session itself.
    pub fn clear_messages(&self, id: &str) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut session) => {
                session.messages.clear();
                true
            }
            None => false,
        }
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assigns_default_name() {
        let store = SessionStore::new();
        let s1 = store.create(None);
        assert_eq!(s1.name, "Chat 1");
        let s2 = store.create(Some("  ".to_string()));
        assert_eq!(s2.name, "Chat 2");
        let s3 = store.create(Some("Work".to_string()));
        assert_eq!(s3.name, "Work");
    }

    #[test]
    fn test_list_ordered_by_creation() {
        let store = SessionStore::new();
        let a = store.create(Some("a".to_string()));
        let b = store.create(Some("b".to_string()));
        let c = store.create(Some("c".to_string()));

        let ids: Vec<String> = store.list().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
    }

    #[test]
    fn test_delete() {
        let store = SessionStore::new();
        let s = store.create(None);
        assert!(store.delete(&s.id));
        assert!(!store.delete(&s.id));
        assert!(store.get(&s.id).is_none());
    }

    #[test]
    fn test_rename() {
        let store = SessionStore::new();
        let s = store.create(None);
        assert!(store.rename(&s.id, "renamed"));
        assert_eq!(store.get(&s.id).unwrap().name, "renamed");
        assert!(!store.rename("missing", "x"));
    }

    #[test]
    fn test_append_and_clear_messages() {
        let store = SessionStore::new();
        let s = store.create(None);

        assert!(store.append_message(&s.id, ChatMessage::user("hi")));
        assert!(store.append_message(&s.id, ChatMessage::assistant("hello")));
        assert_eq!(store.get(&s.id).unwrap().messages.len(), 2);

        assert!(store.clear_messages(&s.id));
        assert_eq!(store.get(&s.id).unwrap().messages.len(), 0);
        assert!(store.get(&s.id).is_some());

        assert!(!store.append_message("missing", ChatMessage::user("hi")));
        assert!(!store.clear_messages("missing"));
    }

    #[test]
    fn test_count() {
        let store = SessionStore::new();
        assert_eq!(store.count(), 0);
        store.create(None);
        store.create(None);
        assert_eq!(store.count(), 2);
    }
}
