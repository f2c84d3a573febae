use crate::model::Recipe;

/// Category value meaning "no category restriction"
pub const ALL_CATEGORIES: &str = "All";

/// Categories offered by the listing view, sentinel first
pub const CATEGORIES: [&str; 6] = [
    ALL_CATEGORIES,
    "Breakfast",
    "Main Course",
    "Dessert",
    "Appetizer",
    "Soup",
];

/// Search box and category selection of the listing view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub query: String,
    pub category: String,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            query: String::new(),
            category: ALL_CATEGORIES.to_string(),
        }
    }
}

impl FilterState {
    /// Initial state for `/recipes?category=...`; a missing or empty parameter means "All"
    pub fn with_category(category: Option<&str>) -> Self {
        match category.map(str::trim) {
            Some(category) if !category.is_empty() => FilterState {
                category: category.to_string(),
                ..Default::default()
            },
            _ => FilterState::default(),
        }
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        let category_matches =
            self.category == ALL_CATEGORIES || recipe.category == self.category;
        if !category_matches {
            return false;
        }

        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        recipe.title.to_lowercase().contains(&needle)
            || recipe.description.to_lowercase().contains(&needle)
    }
}

/// Recipes visible under `filter`, in their original order
pub fn filter_recipes<'a>(recipes: &'a [Recipe], filter: &FilterState) -> Vec<&'a Recipe> {
    recipes.iter().filter(|recipe| filter.matches(recipe)).collect()
}
