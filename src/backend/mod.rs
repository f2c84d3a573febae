mod appwrite;
mod memory;

pub use appwrite::AppwriteBackend;
pub use memory::InMemoryBackend;

use crate::error::AppError;
use crate::mapper::RawRecord;
use crate::model::{NewAccount, User};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Query options for listing recipes: newest first, fixed size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: u32,
}

impl ListOptions {
    pub fn newest(limit: u32) -> Self {
        ListOptions { limit }
    }
}

/// Everything the views need from the hosted session and document services
#[async_trait]
pub trait RecipeBackend: Send + Sync {
    /// Get the backend name (e.g., "appwrite", "memory")
    fn backend_name(&self) -> &str;

    /// The signed-in user; fails when there is no session
    async fn current_session(&self) -> Result<User, AppError>;

    async fn login(&self, email: &str, password: &str) -> Result<User, AppError>;

    async fn signup(&self, account: &NewAccount) -> Result<User, AppError>;

    /// End the current session
    async fn logout(&self) -> Result<(), AppError>;

    async fn fetch_collection(&self, options: &ListOptions) -> Result<Vec<RawRecord>, AppError>;

    /// Fails with [`AppError::NotFound`] for unknown ids
    async fn fetch_by_id(&self, id: &str) -> Result<RawRecord, AppError>;

    async fn create_record(&self, fields: Map<String, Value>) -> Result<RawRecord, AppError>;
}
