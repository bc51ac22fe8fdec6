//! In-memory stand-ins for the external collaborators, shared by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Barrier;
use uuid::Uuid;

use crate::auth::SessionStore;
use crate::errors::AppError;
use crate::models::file::FileEntry;
use crate::models::user::User;
use crate::search::client::JobSearchApi;
use crate::search::test_support::ScriptedApi;
use crate::state::AppState;
use crate::wipe::storage::{
    FileNamespace, KvNamespace, NamespaceProvider, StorageError, UserNamespaces,
};

pub const TEST_TOKEN: &str = "test-session-token";

pub struct InMemoryFiles {
    files: Mutex<Vec<FileEntry>>,
    failing: HashSet<String>,
    list_fails: AtomicBool,
    delete_calls: AtomicUsize,
    rendezvous: Option<Arc<Barrier>>,
}

impl InMemoryFiles {
    pub fn with_paths(paths: &[&str]) -> Self {
        Self {
            files: Mutex::new(paths.iter().map(|p| FileEntry::from_key(p)).collect()),
            failing: HashSet::new(),
            list_fails: AtomicBool::new(false),
            delete_calls: AtomicUsize::new(0),
            rendezvous: None,
        }
    }

    /// Every delete waits at `barrier` before completing, so deletes only
    /// finish once that many are in flight at the same time.
    pub fn meeting_at(mut self, barrier: Arc<Barrier>) -> Self {
        self.rendezvous = Some(barrier);
        self
    }

    /// Deletes of `path` will be rejected.
    pub fn failing_on(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    pub fn fail_listing(&self) {
        self.list_fails.store(true, Ordering::SeqCst);
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileNamespace for InMemoryFiles {
    async fn list(&self) -> Result<Vec<FileEntry>, StorageError> {
        if self.list_fails.load(Ordering::SeqCst) {
            return Err(StorageError::S3("listing unavailable".to_string()));
        }
        Ok(self.files.lock().unwrap().clone())
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = &self.rendezvous {
            barrier.wait().await;
        }
        if self.failing.contains(path) {
            return Err(StorageError::S3(format!("access denied for '{path}'")));
        }
        self.files.lock().unwrap().retain(|f| f.path != path);
        Ok(())
    }
}

pub struct InMemoryKv {
    keys: Mutex<u64>,
    fails: bool,
    clear_calls: AtomicUsize,
}

impl InMemoryKv {
    pub fn with_keys(keys: u64) -> Self {
        Self {
            keys: Mutex::new(keys),
            fails: false,
            clear_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fails: true,
            ..Self::with_keys(1)
        }
    }

    pub fn clear_calls(&self) -> usize {
        self.clear_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KvNamespace for InMemoryKv {
    async fn clear(&self) -> Result<u64, StorageError> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        if self.fails {
            return Err(StorageError::S3("kv store unavailable".to_string()));
        }
        let mut keys = self.keys.lock().unwrap();
        Ok(std::mem::take(&mut *keys))
    }
}

/// Hands every user the same in-memory namespaces.
pub struct FixedNamespaces(pub UserNamespaces);

impl NamespaceProvider for FixedNamespaces {
    fn for_user(&self, _user_id: Uuid) -> UserNamespaces {
        self.0.clone()
    }
}

pub struct StaticSessions {
    users: HashMap<String, User>,
}

impl StaticSessions {
    pub fn with_test_user() -> Self {
        let user = User {
            id: Uuid::new_v4(),
            external_id: "ext-1".to_string(),
            email: "user@example.com".to_string(),
            tier: "free".to_string(),
            created_at: Utc::now(),
        };
        Self {
            users: HashMap::from([(TEST_TOKEN.to_string(), user)]),
        }
    }
}

#[async_trait]
impl SessionStore for StaticSessions {
    async fn user_for_token(&self, token: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.get(token).cloned())
    }
}

pub fn test_state_with(
    job_search: Option<Arc<ScriptedApi>>,
    files: Arc<InMemoryFiles>,
    kv: Arc<InMemoryKv>,
) -> AppState {
    AppState {
        job_search: job_search.map(|api| api as Arc<dyn JobSearchApi>),
        namespaces: Arc::new(FixedNamespaces(UserNamespaces { files, kv })),
        sessions: Arc::new(StaticSessions::with_test_user()),
    }
}

pub fn test_state(job_search: Option<Arc<ScriptedApi>>) -> AppState {
    test_state_with(
        job_search,
        Arc::new(InMemoryFiles::with_paths(&[])),
        Arc::new(InMemoryKv::with_keys(0)),
    )
}
