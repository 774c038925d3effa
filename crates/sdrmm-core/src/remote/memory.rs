use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use super::RemoteQueue;
use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::{Candidate, QueueEntry};

/// Operation names, used to inject failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOp {
    FetchCandidate,
    Enqueue,
    MovePosition,
    Clear,
    PositionsForUser,
    Snapshot,
    SetOpen,
    AddWip,
}

/// A call received by `InMemoryQueue`, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    FetchCandidate(String),
    Enqueue {
        id: String,
        requester: Option<String>,
    },
    MovePosition {
        from: usize,
        to: usize,
    },
    Clear,
    PositionsForUser(String),
    Snapshot,
    SetOpen(bool),
    AddWip {
        id: String,
        requester: String,
    },
}

impl RemoteCall {
    pub fn op(&self) -> RemoteOp {
        match self {
            RemoteCall::FetchCandidate(_) => RemoteOp::FetchCandidate,
            RemoteCall::Enqueue { .. } => RemoteOp::Enqueue,
            RemoteCall::MovePosition { .. } => RemoteOp::MovePosition,
            RemoteCall::Clear => RemoteOp::Clear,
            RemoteCall::PositionsForUser(_) => RemoteOp::PositionsForUser,
            RemoteCall::Snapshot => RemoteOp::Snapshot,
            RemoteCall::SetOpen(_) => RemoteOp::SetOpen,
            RemoteCall::AddWip { .. } => RemoteOp::AddWip,
        }
    }

    /// Whether the call changes the remote queue
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            RemoteCall::FetchCandidate(_) | RemoteCall::PositionsForUser(_) | RemoteCall::Snapshot
        )
    }
}

/// In-process stand-in for the remote queue service
///
/// Holds a catalog of known maps, the queue itself, and a log of every call.
/// Operations listed with `fail_on` return `ExternalService` errors after
/// being logged, which lets tests observe partial progress.
#[derive(Debug, Default)]
pub struct InMemoryQueue {
    catalog: RefCell<HashMap<String, Candidate>>,
    entries: RefCell<Vec<QueueEntry>>,
    open: Cell<bool>,
    calls: RefCell<Vec<RemoteCall>>,
    failing: RefCell<HashSet<RemoteOp>>,
    scripted_positions: RefCell<HashMap<String, Vec<usize>>>,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a map known to `fetch_candidate` and `enqueue`
    pub fn with_map(self, candidate: Candidate) -> Self {
        self.catalog
            .borrow_mut()
            .insert(candidate.id.clone(), candidate);
        self
    }

    /// Seed the queue directly, bypassing the call log
    pub fn with_entries(self, entries: Vec<QueueEntry>) -> Self {
        for entry in &entries {
            self.catalog
                .borrow_mut()
                .entry(entry.map.id.clone())
                .or_insert_with(|| entry.map.clone());
        }
        *self.entries.borrow_mut() = entries;
        self
    }

    /// Answer `positions_for_user(username)` with `positions` verbatim,
    /// whatever the queue holds
    pub fn with_positions(self, username: &str, positions: Vec<usize>) -> Self {
        self.scripted_positions
            .borrow_mut()
            .insert(username.to_string(), positions);
        self
    }

    pub fn fail_on(&self, op: RemoteOp) {
        self.failing.borrow_mut().insert(op);
    }

    pub fn recover(&self, op: RemoteOp) {
        self.failing.borrow_mut().remove(&op);
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.borrow().clone()
    }

    /// Only the calls that changed the queue
    pub fn mutations(&self) -> Vec<RemoteCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.is_mutation())
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn entries(&self) -> Vec<QueueEntry> {
        self.entries.borrow().clone()
    }

    /// Map identifiers in queue order
    pub fn queued_ids(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .map(|e| e.map.id.clone())
            .collect()
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    #[allow(clippy::result_large_err)]
    fn record(&self, call: RemoteCall) -> Result<()> {
        let op = call.op();
        self.calls.borrow_mut().push(call);
        if self.failing.borrow().contains(&op) {
            return Err(ExError::new(ExErrorKind::ExternalService)
                .with_op(format!("{:?}", op))
                .with_message("injected failure"));
        }
        Ok(())
    }

    #[allow(clippy::result_large_err)]
    fn lookup(&self, id: &str) -> Result<Candidate> {
        self.catalog.borrow().get(id).cloned().ok_or_else(|| {
            ExError::new(ExErrorKind::ExternalService)
                .with_entity_id(id)
                .with_message("map not found")
        })
    }
}

impl RemoteQueue for InMemoryQueue {
    fn fetch_candidate(&self, id: &str) -> Result<Candidate> {
        self.record(RemoteCall::FetchCandidate(id.to_string()))?;
        self.lookup(id)
    }

    fn enqueue(&self, id: &str, requester: Option<&str>) -> Result<()> {
        self.record(RemoteCall::Enqueue {
            id: id.to_string(),
            requester: requester.map(str::to_string),
        })?;
        let map = self.lookup(id)?;
        self.entries
            .borrow_mut()
            .push(QueueEntry::new(map, requester.map(str::to_string)));
        Ok(())
    }

    fn move_position(&self, from: usize, to: usize) -> Result<()> {
        self.record(RemoteCall::MovePosition { from, to })?;
        let mut entries = self.entries.borrow_mut();
        if from >= entries.len() {
            return Err(ExError::new(ExErrorKind::ExternalService)
                .with_op("move_position")
                .with_message(format!("no entry at position {}", from)));
        }
        let entry = entries.remove(from);
        let to = to.min(entries.len());
        entries.insert(to, entry);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.record(RemoteCall::Clear)?;
        self.entries.borrow_mut().clear();
        Ok(())
    }

    fn positions_for_user(&self, username: &str) -> Result<Vec<usize>> {
        self.record(RemoteCall::PositionsForUser(username.to_string()))?;
        if let Some(scripted) = self.scripted_positions.borrow().get(username) {
            return Ok(scripted.clone());
        }
        Ok(self
            .entries
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_requested_by(username))
            .map(|(i, _)| i)
            .collect())
    }

    fn snapshot(&self) -> Result<Vec<QueueEntry>> {
        self.record(RemoteCall::Snapshot)?;
        Ok(self.entries.borrow().clone())
    }

    fn set_open(&self, open: bool) -> Result<()> {
        self.record(RemoteCall::SetOpen(open))?;
        self.open.set(open);
        Ok(())
    }

    fn add_wip(&self, id: &str, requester: &str) -> Result<()> {
        self.record(RemoteCall::AddWip {
            id: id.to_string(),
            requester: requester.to_string(),
        })?;
        let wip = Candidate {
            id: id.to_string(),
            hash: String::new(),
            title: format!("WIP {}", id),
            uploader: requester.to_string(),
            duration_secs: 0,
            uploaded_at: DateTime::<Utc>::default(),
            difficulties: Vec::new(),
        };
        self.entries
            .borrow_mut()
            .push(QueueEntry::new(wip, Some(requester.to_string())));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;

    fn map(id: &str) -> Candidate {
        Candidate {
            id: id.to_string(),
            hash: format!("hash-{}", id),
            title: id.to_uppercase(),
            uploader: "mapper".to_string(),
            duration_secs: 120,
            uploaded_at: DateTime::<Utc>::default(),
            difficulties: vec![Difficulty::new("Hard", "Standard", 14.0, 4.0)],
        }
    }

    #[test]
    fn test_enqueue_and_positions() {
        let q = InMemoryQueue::new().with_map(map("a")).with_map(map("b"));
        q.enqueue("a", Some("u1")).unwrap();
        q.enqueue("b", Some("u2")).unwrap();
        q.enqueue("a", Some("u1")).unwrap();

        assert_eq!(q.positions_for_user("u1").unwrap(), vec![0, 2]);
        assert_eq!(q.queued_ids(), vec!["a", "b", "a"]);
    }

    #[test]
    fn test_scripted_positions_are_returned_verbatim() {
        let q = InMemoryQueue::new()
            .with_map(map("a"))
            .with_positions("u1", vec![4, 1]);
        q.enqueue("a", Some("u1")).unwrap();

        assert_eq!(q.positions_for_user("u1").unwrap(), vec![4, 1]);
        assert_eq!(q.positions_for_user("u2").unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn test_enqueue_unknown_map_fails() {
        let q = InMemoryQueue::new();
        let err = q.enqueue("missing", None).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ExternalService);
        assert!(q.entries().is_empty());
    }

    #[test]
    fn test_move_position() {
        let q = InMemoryQueue::new()
            .with_map(map("a"))
            .with_map(map("b"))
            .with_map(map("c"));
        for id in ["a", "b", "c"] {
            q.enqueue(id, None).unwrap();
        }
        q.move_position(2, 0).unwrap();
        assert_eq!(q.queued_ids(), vec!["c", "a", "b"]);
        assert!(q.move_position(5, 0).is_err());
    }

    #[test]
    fn test_injected_failure_is_logged() {
        let q = InMemoryQueue::new();
        q.fail_on(RemoteOp::Clear);
        assert!(q.clear().is_err());
        assert_eq!(q.calls(), vec![RemoteCall::Clear]);

        q.recover(RemoteOp::Clear);
        assert!(q.clear().is_ok());
    }

    #[test]
    fn test_mutations_exclude_reads() {
        let q = InMemoryQueue::new().with_map(map("a"));
        q.snapshot().unwrap();
        q.fetch_candidate("a").unwrap();
        q.set_open(true).unwrap();
        assert_eq!(q.mutations(), vec![RemoteCall::SetOpen(true)]);
        assert!(q.is_open());
    }
}
