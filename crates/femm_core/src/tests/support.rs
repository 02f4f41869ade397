use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::TransportError;
use crate::session::Session;
use crate::transport::Transport;

#[derive(Default)]
struct EngineLog {
    sent: Vec<String>,
    replies: VecDeque<String>,
    dropped: bool,
}

/// Records every command and answers with queued replies (empty when none
/// are queued). Clones share the same log.
#[derive(Clone, Default)]
pub struct FakeEngine {
    log: Arc<Mutex<EngineLog>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, reply: &str) -> &Self {
        self.log.lock().unwrap().replies.push_back(reply.to_string());
        self
    }

    pub fn sent(&self) -> Vec<String> {
        self.log.lock().unwrap().sent.clone()
    }

    pub fn last_sent(&self) -> Option<String> {
        self.log.lock().unwrap().sent.last().cloned()
    }

    pub fn was_dropped(&self) -> bool {
        self.log.lock().unwrap().dropped
    }

    /// A session on a clone of this engine, in `magnetics` mode, with no
    /// commands recorded yet
    pub fn magnetics_session(&self) -> Session<FakeEngine> {
        let mut session = Session::new(self.clone());
        session.set_mode(crate::Doctype::Magnetics);
        session
    }
}

impl Transport for FakeEngine {
    fn exchange(&mut self, command: &str) -> Result<String, TransportError> {
        let mut log = self.log.lock().unwrap();
        log.sent.push(command.to_string());
        Ok(log.replies.pop_front().unwrap_or_default())
    }
}

/// Marks the log when the last handle goes away
pub struct TrackedEngine(pub FakeEngine);

impl Transport for TrackedEngine {
    fn exchange(&mut self, command: &str) -> Result<String, TransportError> {
        self.0.exchange(command)
    }
}

impl Drop for TrackedEngine {
    fn drop(&mut self) {
        self.0.log.lock().unwrap().dropped = true;
    }
}
