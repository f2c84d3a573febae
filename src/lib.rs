pub mod backend;
pub mod collection;
pub mod config;
pub mod error;
pub mod filter;
pub mod forms;
pub mod mapper;
pub mod model;
pub mod normalize;
pub mod notice;
pub mod routes;
pub mod session;

pub use backend::{AppwriteBackend, InMemoryBackend, ListOptions, RecipeBackend};
pub use collection::{submit_recipe, DetailState, LoadState, RecipeDetailView, RecipeListView};
pub use config::AppConfig;
pub use error::AppError;
pub use filter::{filter_recipes, FilterState, ALL_CATEGORIES, CATEGORIES};
pub use forms::{RecipeDraft, SignupForm};
pub use mapper::{map_records, RawRecord};
pub use model::{Difficulty, NewAccount, Recipe, User};
pub use normalize::normalize_list;
pub use notice::{Notice, NoticeKind};
pub use routes::Route;
pub use session::{GateOutcome, SessionGate};

use log::debug;

/// Fetch the newest recipes from the configured Appwrite project
pub async fn fetch_recipes(config: &AppConfig) -> Result<Vec<Recipe>, AppError> {
    let backend = AppwriteBackend::new(config)?;
    let records = backend
        .fetch_collection(&ListOptions::newest(config.list_limit))
        .await?;
    debug!("Fetched {} recipes", records.len());
    Ok(map_records(records))
}

/// Fetch a single recipe by id from the configured Appwrite project
pub async fn fetch_recipe(config: &AppConfig, id: &str) -> Result<Recipe, AppError> {
    let backend = AppwriteBackend::new(config)?;
    let record = backend.fetch_by_id(id).await?;
    Ok(Recipe::from(record))
}
