//! Session store
//!
//! Sessions are created lazily on first reference, mutated on every turn and
//! destroyed only by an explicit clear. Each record sits behind its own mutex
//! so turns on different sessions never contend on more than the brief map
//! lookup.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::sync::Arc;

use support_agent_core::{Turn, TurnRole};

/// Accumulated state of one conversation
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    /// Display name, overwritten by each successful extraction
    pub name: Option<String>,
    /// Number of user turns in `messages`
    pub message_count: usize,
    pub last_intent: Option<String>,
    pub last_order: Option<String>,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<Turn>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            message_count: 0,
            last_intent: None,
            last_order: None,
            created_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    /// Append a turn to the log; user turns advance the message counter
    pub fn record(&mut self, role: TurnRole, message: impl Into<String>) {
        if role == TurnRole::User {
            self.message_count += 1;
        }
        self.messages.push(Turn::new(role, message));
    }

    pub fn user_turns(&self) -> usize {
        self.messages.iter().filter(|t| t.is_user()).count()
    }

    pub fn history(&self) -> SessionHistory {
        SessionHistory {
            history: self.messages.clone(),
            session_data: Some(SessionData {
                name: self.name.clone(),
                message_count: self.message_count,
                created_at: self.created_at,
            }),
        }
    }
}

/// Shared handle to a live session record
pub type SessionHandle = Arc<Mutex<Session>>;

/// Session metadata returned alongside the log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionData {
    pub name: Option<String>,
    pub message_count: usize,
    pub created_at: DateTime<Utc>,
}

/// History read result
///
/// Unknown sessions serialize as `{"history": [], "session_data": {}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionHistory {
    pub history: Vec<Turn>,
    #[serde(serialize_with = "serialize_session_data")]
    pub session_data: Option<SessionData>,
}

impl SessionHistory {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty() && self.session_data.is_none()
    }
}

fn serialize_session_data<S: Serializer>(
    data: &Option<SessionData>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match data {
        Some(data) => data.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

/// Storage for session records
pub trait SessionStore: Send + Sync {
    /// Existing session or a fresh one; repeated calls return the same record
    fn get_or_create(&self, session_id: &str) -> SessionHandle;

    /// Append a turn, creating the session if needed
    ///
    /// Must not be called while holding the lock of the same session.
    fn record_turn(&self, session_id: &str, role: TurnRole, message: &str) {
        self.get_or_create(session_id).lock().record(role, message);
    }

    /// Snapshot of a session, if it exists
    fn get(&self, session_id: &str) -> Option<Session>;

    /// Remove a session; returns whether it existed
    ///
    /// A turn already holding the session's handle finishes on the removed
    /// record, so its writes are lost and the next turn starts fresh.
    fn clear(&self, session_id: &str) -> bool;

    /// Number of live sessions
    fn count(&self) -> usize;
}

/// Process-lifetime session store
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get_or_create(&self, session_id: &str) -> SessionHandle {
        if let Some(handle) = self.sessions.read().get(session_id) {
            return handle.clone();
        }

        // Another writer may have inserted between the read and write locks
        let mut sessions = self.sessions.write();
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::info!(session_id = %session_id, "Created session");
                Arc::new(Mutex::new(Session::new(session_id)))
            })
            .clone()
    }

    fn get(&self, session_id: &str) -> Option<Session> {
        let handle = self.sessions.read().get(session_id).cloned()?;
        let session = handle.lock().clone();
        Some(session)
    }

    fn clear(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().remove(session_id).is_some();
        if removed {
            tracing::info!(session_id = %session_id, "Cleared session");
        }
        removed
    }

    fn count(&self) -> usize {
        self.sessions.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_is_idempotent() {
        let store = InMemorySessionStore::new();
        let first = store.get_or_create("abc");
        let second = store.get_or_create("abc");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.count(), 1);

        let session = first.lock();
        assert_eq!(session.id, "abc");
        assert_eq!(session.message_count, 0);
        assert!(session.name.is_none());
        assert!(session.messages.is_empty());
    }

    #[test]
    fn test_record_turn_counts_user_turns() {
        let store = InMemorySessionStore::new();
        store.record_turn("s1", TurnRole::User, "hello");
        store.record_turn("s1", TurnRole::Bot, "Hi there!");
        store.record_turn("s1", TurnRole::User, "bye");

        let session = store.get("s1").unwrap();
        assert_eq!(session.message_count, 2);
        assert_eq!(session.user_turns(), 2);
        assert_eq!(session.messages.len(), 3);
        assert_eq!(session.messages[1].role, TurnRole::Bot);
        assert_eq!(session.messages[1].message, "Hi there!");
    }

    #[test]
    fn test_clear() {
        let store = InMemorySessionStore::new();
        store.record_turn("s1", TurnRole::User, "hello");

        assert!(store.clear("s1"));
        assert!(store.get("s1").is_none());
        assert_eq!(store.count(), 0);

        // Absent ids are a no-op
        assert!(!store.clear("s1"));
        assert!(!store.clear("never-seen"));
    }

    #[test]
    fn test_clear_detaches_in_flight_handle() {
        let store = InMemorySessionStore::new();
        let handle = store.get_or_create("s1");

        assert!(store.clear("s1"));
        handle.lock().record(TurnRole::User, "late write");

        assert!(store.get("s1").is_none());
        let fresh = store.get_or_create("s1");
        assert!(!Arc::ptr_eq(&handle, &fresh));
        assert_eq!(fresh.lock().message_count, 0);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = InMemorySessionStore::new();
        store.record_turn("a", TurnRole::User, "one");
        store.record_turn("b", TurnRole::User, "two");
        store.record_turn("b", TurnRole::User, "three");

        assert_eq!(store.get("a").unwrap().message_count, 1);
        assert_eq!(store.get("b").unwrap().message_count, 2);
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_concurrent_turns_on_one_session() {
        let store = Arc::new(InMemorySessionStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for j in 0..25 {
                        store.record_turn("shared", TurnRole::User, &format!("{}-{}", i, j));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let session = store.get("shared").unwrap();
        assert_eq!(session.message_count, 200);
        assert_eq!(session.messages.len(), 200);
    }

    #[test]
    fn test_history_serialization() {
        let mut session = Session::new("s1");
        session.name = Some("Sam".to_string());
        session.record(TurnRole::User, "my name is Sam");

        let json = serde_json::to_value(session.history()).unwrap();
        assert_eq!(json["history"][0]["role"], "user");
        assert_eq!(json["history"][0]["message"], "my name is Sam");
        assert!(json["history"][0]["timestamp"].is_string());
        assert_eq!(json["session_data"]["name"], "Sam");
        assert_eq!(json["session_data"]["message_count"], 1);
        assert!(json["session_data"]["created_at"].is_string());
    }

    #[test]
    fn test_empty_history_serialization() {
        let json = serde_json::to_value(SessionHistory::empty()).unwrap();
        assert_eq!(json, serde_json::json!({"history": [], "session_data": {}}));
    }
}
