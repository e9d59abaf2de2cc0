// Shared fixtures: an in-process user service and sample records.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use user_manager_tui::model::{Address, Company, User, UserDraft, UserPatch};
use user_manager_tui::remote::{ApiError, UserService};
use user_manager_tui::store::UserStore;

pub fn user(id: u64, name: &str) -> User {
    let first = name.split(' ').next().unwrap_or("").to_lowercase();
    User {
        id,
        name: name.to_string(),
        email: format!("{first}@example.com"),
        phone: format!("555-01{id:02}"),
        username: first.clone(),
        address: Address { street: format!("{id} Main St"), city: "Gotham".to_string() },
        company: Company { name: "Acme".to_string() },
        website: format!("{first}.example.com"),
    }
}

pub fn sample_users() -> Vec<User> {
    vec![
        user(1, "Leanne Graham"),
        user(2, "Ervin Howell"),
        user(3, "Clementine Bauch"),
        user(4, "Patricia Lebsack"),
        user(5, "Chelsey Dietrich"),
    ]
}

fn unavailable() -> ApiError {
    ApiError::Status { status: StatusCode::INTERNAL_SERVER_ERROR, url: "http://fake/users".to_string() }
}

/// Behaves like the placeholder backend: creates get the next id, updates echo the body.
pub struct FakeService {
    pub listing: Mutex<Vec<User>>,
    pub next_id: AtomicU64,
    pub fail_list: AtomicBool,
    pub fail_create: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_delete: AtomicBool,
    pub calls: Mutex<Vec<String>>,
    gate: Mutex<Option<Receiver<()>>>,
}

impl FakeService {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            next_id: AtomicU64::new(users.len() as u64 + 1),
            listing: Mutex::new(users),
            fail_list: AtomicBool::new(false),
            fail_create: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
            gate: Mutex::new(None),
        }
    }

    /// Every request blocks until one `()` is sent on the returned sender.
    pub fn gated(self) -> (Self, Sender<()>) {
        let (tx, rx) = mpsc::channel();
        *self.gate.lock().unwrap() = Some(rx);
        (self, tx)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn enter(&self, call: String, fail: &AtomicBool) -> Result<(), ApiError> {
        if let Some(rx) = self.gate.lock().unwrap().as_ref() {
            let _ = rx.recv();
        }
        self.calls.lock().unwrap().push(call);
        if fail.load(Ordering::SeqCst) { Err(unavailable()) } else { Ok(()) }
    }
}

impl UserService for FakeService {
    fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.enter("GET /users".to_string(), &self.fail_list)?;
        Ok(self.listing.lock().unwrap().clone())
    }

    fn create_user(&self, draft: &UserDraft) -> Result<User, ApiError> {
        self.enter("POST /users".to_string(), &self.fail_create)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(User::from_draft(id, draft.clone()))
    }

    fn update_user(&self, id: u64, patch: &UserPatch) -> Result<UserPatch, ApiError> {
        self.enter(format!("PUT /users/{id}"), &self.fail_update)?;
        Ok(patch.clone())
    }

    fn delete_user(&self, id: u64) -> Result<(), ApiError> {
        self.enter(format!("DELETE /users/{id}"), &self.fail_delete)
    }
}

/// Store backed by `fake`, already loaded with a blocking read-all.
pub fn loaded_store(fake: &Arc<FakeService>) -> UserStore {
    let mut store = UserStore::new(fake.clone());
    assert!(store.load_all());
    store
}
