//! In-memory user collection mirrored against the remote service.
//!
//! The store is the only writer of the collection. Every operation comes in
//! two shapes:
//! - blocking (`load_all`, `create`, `update`, `delete`): run the request on the
//!   calling thread and apply its result immediately
//! - dispatched (`spawn_*`): run the request on a worker thread and hand back a
//!   [`Ticket`]; the result is applied when the owner calls [`UserStore::poll`]
//!
//! Failures never reach the caller. They land in a single error slot holding a
//! fixed message for the operation that failed last.
//!
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::model::{User, UserDraft, UserPatch};
use crate::remote::{ApiError, UserService};

/// Kind of request issued against the remote service.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Message stored in the error slot when this operation fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Fetch => "Error fetching users",
            Operation::Create => "Error creating user",
            Operation::Update => "Error updating user",
            Operation::Delete => "Error deleting user",
        }
    }
}

/// Handle for one dispatched request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

/// A dispatched request whose result has been applied to the store.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Applied {
    pub ticket: Ticket,
    pub operation: Operation,
    pub succeeded: bool,
}

enum Outcome {
    Loaded(Result<Vec<User>, ApiError>),
    Created(Result<User, ApiError>),
    Updated(u64, Result<UserPatch, ApiError>),
    Deleted(u64, Result<(), ApiError>),
}

impl Outcome {
    fn operation(&self) -> Operation {
        match self {
            Outcome::Loaded(_) => Operation::Fetch,
            Outcome::Created(_) => Operation::Create,
            Outcome::Updated(..) => Operation::Update,
            Outcome::Deleted(..) => Operation::Delete,
        }
    }
}

struct Completion {
    ticket: Ticket,
    outcome: Outcome,
}

pub struct UserStore {
    service: Arc<dyn UserService>,
    users: Vec<User>,
    loading: bool,
    error: Option<&'static str>,
    next_ticket: u64,
    in_flight: HashSet<Ticket>,
    // only the most recent load may land
    current_load: Option<Ticket>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl UserStore {
    /// Create an empty store. It reports `loading` until the first load completes.
    pub fn new(service: Arc<dyn UserService>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            service,
            users: Vec::new(),
            loading: true,
            error: None,
            next_ticket: 1,
            in_flight: HashSet::new(),
            current_load: None,
            tx,
            rx,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Owned copy of the collection.
    pub fn snapshot(&self) -> Vec<User> {
        self.users.clone()
    }

    pub fn get(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error
    }

    /// Number of dispatched requests whose result is still pending.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn load_all(&mut self) -> bool {
        if let Some(old) = self.current_load.take() {
            self.in_flight.remove(&old);
        }
        self.loading = true;
        let outcome = Outcome::Loaded(self.service.list_users());
        self.apply(outcome)
    }

    pub fn create(&mut self, draft: UserDraft) -> bool {
        let outcome = Outcome::Created(self.service.create_user(&draft));
        self.apply(outcome)
    }

    pub fn update(&mut self, id: u64, patch: UserPatch) -> bool {
        let outcome = Outcome::Updated(id, self.service.update_user(id, &patch));
        self.apply(outcome)
    }

    pub fn delete(&mut self, id: u64) -> bool {
        let outcome = Outcome::Deleted(id, self.service.delete_user(id));
        self.apply(outcome)
    }

    /// Dispatch a load. Any load still in flight is superseded and its result dropped.
    pub fn spawn_load_all(&mut self) -> Ticket {
        self.loading = true;
        let ticket = self.dispatch(|svc| Outcome::Loaded(svc.list_users()));
        if let Some(old) = self.current_load.replace(ticket) {
            debug!(?old, "superseding in-flight load");
            self.in_flight.remove(&old);
        }
        ticket
    }

    pub fn spawn_create(&mut self, draft: UserDraft) -> Ticket {
        self.dispatch(move |svc| Outcome::Created(svc.create_user(&draft)))
    }

    pub fn spawn_update(&mut self, id: u64, patch: UserPatch) -> Ticket {
        self.dispatch(move |svc| Outcome::Updated(id, svc.update_user(id, &patch)))
    }

    pub fn spawn_delete(&mut self, id: u64) -> Ticket {
        self.dispatch(move |svc| Outcome::Deleted(id, svc.delete_user(id)))
    }

    /// Drop the result of a dispatched request. Returns `false` if it already landed.
    pub fn cancel(&mut self, ticket: Ticket) -> bool {
        if self.current_load == Some(ticket) {
            self.current_load = None;
            self.loading = false;
        }
        self.in_flight.remove(&ticket)
    }

    /// Apply every completion that has arrived so far without waiting.
    pub fn poll(&mut self) -> Vec<Applied> {
        let mut applied = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            if let Some(a) = self.settle(completion) {
                applied.push(a);
            }
        }
        applied
    }

    /// Wait up to `timeout` for the next completion that is not discarded.
    pub fn poll_timeout(&mut self, timeout: Duration) -> Option<Applied> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(completion) => {
                    if let Some(a) = self.settle(completion) {
                        return Some(a);
                    }
                }
                Err(_) => return None,
            }
        }
    }

    fn dispatch<F>(&mut self, job: F) -> Ticket
    where
        F: FnOnce(&dyn UserService) -> Outcome + Send + 'static,
    {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight.insert(ticket);
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let outcome = job(service.as_ref());
            // the store may be gone by now
            let _ = tx.send(Completion { ticket, outcome });
        });
        debug!(?ticket, "request dispatched");
        ticket
    }

    fn settle(&mut self, completion: Completion) -> Option<Applied> {
        let Completion { ticket, outcome } = completion;
        if !self.in_flight.remove(&ticket) {
            debug!(?ticket, "discarding cancelled result");
            return None;
        }
        if let Outcome::Loaded(_) = outcome {
            if self.current_load != Some(ticket) {
                debug!(?ticket, "discarding superseded load");
                return None;
            }
            self.current_load = None;
        }
        let operation = outcome.operation();
        let succeeded = self.apply(outcome);
        Some(Applied { ticket, operation, succeeded })
    }

    fn apply(&mut self, outcome: Outcome) -> bool {
        let operation = outcome.operation();
        match outcome {
            Outcome::Loaded(Ok(users)) => {
                info!(count = users.len(), "loaded users");
                self.users = users;
                self.error = None;
                self.loading = false;
                true
            }
            Outcome::Loaded(Err(e)) => {
                self.users.clear();
                self.loading = false;
                self.fail(operation, &e)
            }
            Outcome::Created(Ok(user)) => {
                info!(id = user.id, "created user");
                self.users.push(user);
                true
            }
            Outcome::Updated(id, Ok(patch)) => {
                match self.users.iter_mut().find(|u| u.id == id) {
                    Some(user) => {
                        user.merge(&patch);
                        info!(id, "updated user");
                    }
                    None => debug!(id, "updated user is not held locally"),
                }
                true
            }
            Outcome::Deleted(id, Ok(())) => {
                let before = self.users.len();
                self.users.retain(|u| u.id != id);
                info!(id, removed = before - self.users.len(), "deleted user");
                true
            }
            Outcome::Created(Err(e)) | Outcome::Updated(_, Err(e)) | Outcome::Deleted(_, Err(e)) => {
                self.fail(operation, &e)
            }
        }
    }

    fn fail(&mut self, operation: Operation, err: &ApiError) -> bool {
        warn!(?operation, error = %err, "request failed");
        self.error = Some(operation.failure_message());
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    struct Down;

    fn down() -> ApiError {
        ApiError::Status { status: StatusCode::SERVICE_UNAVAILABLE, url: "http://test/users".into() }
    }

    impl UserService for Down {
        fn list_users(&self) -> Result<Vec<User>, ApiError> {
            Err(down())
        }
        fn create_user(&self, _: &UserDraft) -> Result<User, ApiError> {
            Err(down())
        }
        fn update_user(&self, _: u64, _: &UserPatch) -> Result<UserPatch, ApiError> {
            Err(down())
        }
        fn delete_user(&self, _: u64) -> Result<(), ApiError> {
            Err(down())
        }
    }

    #[test]
    fn new_store_is_loading_and_empty() {
        let store = UserStore::new(Arc::new(Down));
        assert!(store.is_loading());
        assert!(store.users().is_empty());
        assert_eq!(store.error(), None);
    }

    #[test]
    fn each_failure_overwrites_the_slot() {
        let mut store = UserStore::new(Arc::new(Down));
        assert!(!store.load_all());
        assert_eq!(store.error(), Some("Error fetching users"));
        assert!(!store.is_loading());
        assert!(!store.delete(1));
        assert_eq!(store.error(), Some("Error deleting user"));
        assert!(!store.create(UserDraft::default()));
        assert_eq!(store.error(), Some("Error creating user"));
        assert!(!store.update(1, UserPatch::default()));
        assert_eq!(store.error(), Some("Error updating user"));
    }

    #[test]
    fn tickets_are_distinct() {
        let mut store = UserStore::new(Arc::new(Down));
        let a = store.spawn_delete(1);
        let b = store.spawn_delete(2);
        assert_ne!(a, b);
        assert!(a < b);
    }
}
