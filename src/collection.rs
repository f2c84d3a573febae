//! View state for the pages that show recipes.
//!
//! Every view owns its own state and fetches once when activated. Nothing is
//! shared between views, and dropping a view drops whatever fetch it had in
//! flight.

use crate::backend::{ListOptions, RecipeBackend};
use crate::error::AppError;
use crate::filter::{filter_recipes, FilterState};
use crate::forms::RecipeDraft;
use crate::mapper::map_records;
use crate::model::Recipe;
use crate::notice::Notice;
use crate::session::{GateOutcome, SessionGate};
use log::{debug, info, warn};

/// Load state of a fetched resource
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Error(String),
    Ready(T),
}

impl<T> LoadState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// Human-readable message for a failed fetch
fn fetch_error_message(error: &AppError) -> String {
    format!("Could not load recipes: {}", error)
}

/// A list of recipes fetched once: the listing page or the home page's featured list
#[derive(Debug)]
pub struct RecipeListView {
    options: ListOptions,
    state: LoadState<Vec<Recipe>>,
    filter: FilterState,
}

impl RecipeListView {
    pub fn new(options: ListOptions, filter: FilterState) -> Self {
        RecipeListView {
            options,
            state: LoadState::Loading,
            filter,
        }
    }

    /// Issue the view's single fetch. Failures leave the collection empty.
    pub async fn activate(&mut self, backend: &dyn RecipeBackend) {
        self.state = LoadState::Loading;
        debug!(
            "Fetching up to {} recipes from {}",
            self.options.limit,
            backend.backend_name()
        );

        self.state = match backend.fetch_collection(&self.options).await {
            Ok(records) => LoadState::Ready(map_records(records)),
            Err(e) => {
                warn!("Recipe list fetch failed: {}", e);
                LoadState::Error(fetch_error_message(&e))
            }
        };
    }

    pub fn state(&self) -> &LoadState<Vec<Recipe>> {
        &self.state
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.query = query.into();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.filter.category = category.into();
    }

    /// Recipes passing the current filter; empty unless the fetch succeeded
    pub fn visible(&self) -> Vec<&Recipe> {
        match &self.state {
            LoadState::Ready(recipes) => filter_recipes(recipes, &self.filter),
            _ => Vec::new(),
        }
    }
}

/// Load state of the detail page
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    NotFound,
    Error(String),
    Ready(Recipe),
}

/// The recipe detail page, with the viewer's own rating and saved flag
#[derive(Debug)]
pub struct RecipeDetailView {
    id: String,
    state: DetailState,
    user_rating: Option<u8>,
    saved: bool,
}

impl RecipeDetailView {
    pub fn new(id: impl Into<String>) -> Self {
        RecipeDetailView {
            id: id.into(),
            state: DetailState::Loading,
            user_rating: None,
            saved: false,
        }
    }

    pub async fn activate(&mut self, backend: &dyn RecipeBackend) {
        self.state = DetailState::Loading;
        self.state = match backend.fetch_by_id(&self.id).await {
            Ok(record) => DetailState::Ready(Recipe::from(record)),
            Err(AppError::NotFound(id)) => {
                debug!("Recipe {} does not exist", id);
                DetailState::NotFound
            }
            Err(e) => {
                warn!("Recipe {} fetch failed: {}", self.id, e);
                DetailState::Error(format!("Could not load this recipe: {}", e))
            }
        };
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn recipe(&self) -> Option<&Recipe> {
        match &self.state {
            DetailState::Ready(recipe) => Some(recipe),
            _ => None,
        }
    }

    /// Stars to display: the viewer's own rating, else the backend aggregate
    pub fn displayed_rating(&self) -> f64 {
        match (self.user_rating, self.recipe()) {
            (Some(stars), _) => f64::from(stars),
            (None, Some(recipe)) => recipe.rating,
            (None, None) => 0.0,
        }
    }

    pub fn user_rating(&self) -> Option<u8> {
        self.user_rating
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    fn require_recipe(&self) -> Result<(), AppError> {
        match self.state {
            DetailState::Ready(_) => Ok(()),
            _ => Err(AppError::Validation(format!(
                "Recipe {} is not loaded",
                self.id
            ))),
        }
    }

    /// Rate the shown recipe 1-5 stars. The backend aggregate is left untouched.
    pub fn rate(
        &mut self,
        gate: &mut SessionGate,
        stars: u8,
    ) -> Result<GateOutcome<Notice>, AppError> {
        if !(1..=5).contains(&stars) {
            return Err(AppError::Validation(format!(
                "A rating is between 1 and 5 stars, got {}",
                stars
            )));
        }
        self.require_recipe()?;

        Ok(gate.guard(|user| {
            info!("{} rated recipe {} with {} stars", user.email, self.id, stars);
            self.user_rating = Some(stars);
            Notice::info(
                "Thanks for rating!",
                format!("You rated this recipe {} stars.", stars),
            )
        }))
    }

    pub fn save(&mut self, gate: &mut SessionGate) -> Result<GateOutcome<Notice>, AppError> {
        self.require_recipe()?;

        Ok(gate.guard(|user| {
            info!("{} saved recipe {}", user.email, self.id);
            self.saved = true;
            Notice::info(
                "Recipe saved!",
                "This recipe has been added to your collection.",
            )
        }))
    }
}

/// Publish a new recipe for the signed-in viewer
pub async fn submit_recipe(
    gate: &mut SessionGate,
    backend: &dyn RecipeBackend,
    draft: &RecipeDraft,
) -> Result<GateOutcome<(Recipe, Notice)>, AppError> {
    let fields = match gate.guard(|user| draft.to_fields(user)) {
        GateOutcome::Performed(fields) => fields?,
        GateOutcome::LoginRequired => return Ok(GateOutcome::LoginRequired),
    };

    let record = backend.create_record(fields).await?;
    let recipe = Recipe::from(record);
    info!("Published recipe {} ({})", recipe.title, recipe.id);
    let notice = Notice::info(
        "Recipe submitted!",
        "Your recipe has been published successfully.",
    );
    Ok(GateOutcome::Performed((recipe, notice)))
}
