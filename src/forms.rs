use crate::error::AppError;
use crate::filter::ALL_CATEGORIES;
use crate::model::{Difficulty, NewAccount, User};
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Contents of the "share a recipe" form
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub prep_time: String,
    pub cook_time: String,
    pub servings: u32,
    pub difficulty_level: Option<Difficulty>,
    pub image_url: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

fn required(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn non_blank_rows(rows: &[String]) -> Vec<String> {
    rows.iter()
        .map(|row| row.trim())
        .filter(|row| !row.is_empty())
        .map(str::to_string)
        .collect()
}

impl RecipeDraft {
    /// Check the draft, dropping blank ingredient and instruction rows
    pub fn validate(&self) -> Result<RecipeDraft, AppError> {
        required(&self.title, "Recipe title")?;
        required(&self.description, "Description")?;
        required(&self.cook_time, "Cook time")?;
        if self.servings == 0 {
            return Err(AppError::Validation(
                "Servings must be at least 1".to_string(),
            ));
        }
        if self.category.trim() == ALL_CATEGORIES {
            return Err(AppError::Validation(format!(
                "\"{}\" is not a category a recipe can belong to",
                ALL_CATEGORIES
            )));
        }

        let ingredients = non_blank_rows(&self.ingredients);
        if ingredients.is_empty() {
            return Err(AppError::Validation(
                "Add at least one ingredient".to_string(),
            ));
        }
        let instructions = non_blank_rows(&self.instructions);
        if instructions.is_empty() {
            return Err(AppError::Validation(
                "Add at least one instruction step".to_string(),
            ));
        }

        Ok(RecipeDraft {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            prep_time: self.prep_time.trim().to_string(),
            cook_time: self.cook_time.trim().to_string(),
            servings: self.servings,
            difficulty_level: self.difficulty_level,
            image_url: self.image_url.trim().to_string(),
            ingredients,
            instructions,
        })
    }

    /// Validate and encode as document fields. List fields are stored as
    /// JSON-encoded strings, which the field normalizer reads back as lists.
    pub fn to_fields(&self, author: &User) -> Result<Map<String, Value>, AppError> {
        let draft = self.validate()?;
        let ingredients = serde_json::to_string(&draft.ingredients)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let instructions = serde_json::to_string(&draft.instructions)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let fields = json!({
            "title": draft.title,
            "description": draft.description,
            "category": draft.category,
            "prepTime": draft.prep_time,
            "cookTime": draft.cook_time,
            "servings": draft.servings,
            "difficultyLevel": draft.difficulty_level.map(|d| d.as_str()),
            "imageUrl": draft.image_url,
            "ingredients": ingredients,
            "instructions": instructions,
            "authorId": author.id,
            "authorName": author.name,
            "authorAvatar": "",
            "rating": 0,
            "totalRatings": 0
        });

        match fields {
            Value::Object(map) => Ok(map),
            _ => Err(AppError::Validation("Recipe could not be encoded".to_string())),
        }
    }
}

/// Contents of the signup page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    pub fn passwords_match(&self) -> bool {
        self.password == self.confirm_password
    }

    pub fn validate(&self) -> Result<NewAccount, AppError> {
        required(&self.name, "Full name")?;
        required(&self.email, "Email")?;
        required(&self.password, "Password")?;
        if !self.passwords_match() {
            return Err(AppError::Validation(
                "Please make sure your passwords match.".to_string(),
            ));
        }

        Ok(NewAccount {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}
