//! In-memory program store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// A stored program.
#[derive(Clone, Debug)]
pub struct Program {
    pub program_id: Uuid,
    pub name: String,
    pub description: String,
    pub code: String,
    pub version: i64,
}

#[derive(Default)]
pub struct MockStateInner {
    pub programs: HashMap<Uuid, Program>,
}

impl MockStateInner {
    /// True if a program other than `except` already uses `name`.
    pub fn name_taken(&self, name: &str, except: Option<Uuid>) -> bool {
        self.programs
            .values()
            .any(|p| p.name == name && Some(p.program_id) != except)
    }
}

#[derive(Clone, Default)]
pub struct MockState {
    pub inner: Arc<RwLock<MockStateInner>>,
    requests: Arc<AtomicUsize>,
    fail_next: Arc<Mutex<Option<StatusCode>>>,
}

impl MockState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a program directly, bypassing the API (e.g. created elsewhere).
    pub async fn insert_program(&self, name: &str, description: &str, code: &str) -> Program {
        let program = Program {
            program_id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.to_string(),
            code: code.to_string(),
            version: 1,
        };
        self.inner
            .write()
            .await
            .programs
            .insert(program.program_id, program.clone());
        program
    }

    pub async fn program(&self, id: Uuid) -> Option<Program> {
        self.inner.read().await.programs.get(&id).cloned()
    }

    pub async fn program_count(&self) -> usize {
        self.inner.read().await.programs.len()
    }

    /// Number of API requests served so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Make the next API request fail with `status`.
    pub async fn fail_next(&self, status: StatusCode) {
        *self.fail_next.lock().await = Some(status);
    }

    /// Count a request and return the injected failure, if any.
    pub(crate) async fn begin_request(&self) -> Option<StatusCode> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.fail_next.lock().await.take()
    }
}
