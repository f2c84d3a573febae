use crate::backend::{ListOptions, RecipeBackend};
use crate::error::AppError;
use crate::mapper::RawRecord;
use crate::model::{NewAccount, User};
use async_trait::async_trait;
use log::debug;
use serde_json::{Map, Value};
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

/// Backend kept entirely in memory. Records are listed newest first, i.e. in
/// reverse insertion order.
#[derive(Default)]
pub struct InMemoryBackend {
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    records: Vec<RawRecord>,
    accounts: Vec<(User, String)>,
    session: Option<User>,
    fetch_failure: Option<String>,
    fetch_count: usize,
    next_id: u64,
}

impl MemoryState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed records, oldest first
    pub fn with_records(records: Vec<RawRecord>) -> Self {
        let backend = Self::new();
        backend.lock().records = records;
        backend
    }

    /// Register an account that can log in
    pub fn with_account(self, name: &str, email: &str, password: &str) -> Self {
        {
            let mut state = self.lock();
            let id = state.next_id("user-");
            let user = User {
                id,
                name: name.to_string(),
                email: email.to_string(),
            };
            state.accounts.push((user, password.to_string()));
        }
        self
    }

    /// Make every collection and record fetch fail with `message`
    pub fn with_fetch_failure(self, message: &str) -> Self {
        self.lock().fetch_failure = Some(message.to_string());
        self
    }

    /// Number of collection or record fetches served so far
    pub fn fetch_count(&self) -> usize {
        self.lock().fetch_count
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A poisoned lock only means another test thread panicked mid-update
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin_fetch(state: &mut MemoryState) -> Result<(), AppError> {
        state.fetch_count += 1;
        match &state.fetch_failure {
            Some(message) => Err(AppError::Service {
                code: 500,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecipeBackend for InMemoryBackend {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn current_session(&self) -> Result<User, AppError> {
        self.lock().session.clone().ok_or(AppError::Unauthorized)
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        let mut state = self.lock();
        let user = state
            .accounts
            .iter()
            .find(|(user, secret)| user.email == email && secret == password)
            .map(|(user, _)| user.clone())
            .ok_or_else(|| AppError::Service {
                code: 401,
                message: "Invalid credentials. Please check the email and password.".to_string(),
            })?;

        state.session = Some(user.clone());
        Ok(user)
    }

    async fn signup(&self, account: &NewAccount) -> Result<User, AppError> {
        let mut state = self.lock();
        if state.accounts.iter().any(|(user, _)| user.email == account.email) {
            return Err(AppError::Service {
                code: 409,
                message: "A user with the same id, email, or phone already exists in this project."
                    .to_string(),
            });
        }

        let id = state.next_id("user-");
        let user = User {
            id,
            name: account.name.clone(),
            email: account.email.clone(),
        };
        state.accounts.push((user.clone(), account.password.clone()));
        Ok(user)
    }

    async fn logout(&self) -> Result<(), AppError> {
        self.lock()
            .session
            .take()
            .map(|_| ())
            .ok_or(AppError::Unauthorized)
    }

    async fn fetch_collection(&self, options: &ListOptions) -> Result<Vec<RawRecord>, AppError> {
        let mut state = self.lock();
        Self::begin_fetch(&mut state)?;

        let records: Vec<RawRecord> = state
            .records
            .iter()
            .rev()
            .take(options.limit as usize)
            .cloned()
            .collect();
        debug!("Serving {} in-memory records", records.len());
        Ok(records)
    }

    async fn fetch_by_id(&self, id: &str) -> Result<RawRecord, AppError> {
        let mut state = self.lock();
        Self::begin_fetch(&mut state)?;

        state
            .records
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    async fn create_record(&self, fields: Map<String, Value>) -> Result<RawRecord, AppError> {
        let mut state = self.lock();
        if state.session.is_none() {
            return Err(AppError::Unauthorized);
        }

        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs().to_string())
            .unwrap_or_default();
        let record = RawRecord {
            id: state.next_id("recipe-"),
            created_at,
            fields,
        };
        state.records.push(record.clone());
        Ok(record)
    }
}
