//! Bounded per-session conversation memory

use crate::config::Message;
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};

/// Session id -> last N turns, oldest evicted first.
///
/// Lives for the whole process; each session is bounded so the map never needs
/// explicit cleanup.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, VecDeque<Message>>>,
    max_history: usize,
}

impl SessionStore {
    pub fn new(max_history: usize) -> Self {
        // keep it even so a user turn is never separated from its reply
        let max_history = max_history.max(2) & !1;
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_history,
        }
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Ordered turns for a session, empty if never seen
    pub fn get(&self, session_id: &str) -> Vec<Message> {
        self.sessions
            .read()
            .get(session_id)
            .map(|turns| turns.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Append turns then truncate to the last `max_history` entries
    pub fn append<I>(&self, session_id: &str, turns: I)
    where
        I: IntoIterator<Item = Message>,
    {
        let mut sessions = self.sessions.write();
        let history = sessions.entry(session_id.to_string()).or_default();
        history.extend(turns);
        while history.len() > self.max_history {
            history.pop_front();
        }
    }

    /// Record one exchange; the assistant turn is skipped when nothing was spoken
    pub fn record_exchange(&self, session_id: &str, user_text: &str, spoken_text: &str) {
        let mut turns = vec![Message::user(user_text)];
        if !spoken_text.is_empty() {
            turns.push(Message::assistant(spoken_text));
        }
        self.append(session_id, turns);
    }

    pub fn len(&self, session_id: &str) -> usize {
        self.sessions.read().get(session_id).map_or(0, VecDeque::len)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(crate::config::LLMConfig::default().max_history)
    }
}
