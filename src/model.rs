use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A recipe as shown to the viewer. Built fresh from every fetch and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub prep_time: String,
    pub cook_time: String,
    pub servings: Option<u32>,
    pub difficulty_level: Option<Difficulty>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub author_id: String,
    pub author_name: String,
    pub author_avatar: String,
    /// Aggregate computed by the backend, 0-5
    pub rating: f64,
    pub total_ratings: u32,
    pub category: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("Unknown difficulty level: {}", other)),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account returned by the session service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Details for creating a new account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Recipe {
    /// Plain-text rendering used by the command line front end
    pub fn to_text(&self) -> String {
        let mut out = format!("# {}\n", self.title);
        if !self.description.is_empty() {
            out.push_str(&format!("\n{}\n", self.description));
        }

        let mut facts = Vec::new();
        if !self.category.is_empty() {
            facts.push(format!("category: {}", self.category));
        }
        if !self.prep_time.is_empty() {
            facts.push(format!("prep: {}", self.prep_time));
        }
        if !self.cook_time.is_empty() {
            facts.push(format!("cook: {}", self.cook_time));
        }
        if let Some(servings) = self.servings {
            facts.push(format!("servings: {}", servings));
        }
        if let Some(difficulty) = self.difficulty_level {
            facts.push(format!("difficulty: {}", difficulty));
        }
        facts.push(format!(
            "rating: {:.1} ({} ratings)",
            self.rating, self.total_ratings
        ));
        if !self.author_name.is_empty() {
            facts.push(format!("by {}", self.author_name));
        }
        out.push_str(&format!("\n{}\n", facts.join(" | ")));

        if !self.ingredients.is_empty() {
            out.push_str("\n## Ingredients\n");
            for ingredient in &self.ingredients {
                out.push_str(&format!("- {}\n", ingredient));
            }
        }
        if !self.instructions.is_empty() {
            out.push_str("\n## Instructions\n");
            for (index, step) in self.instructions.iter().enumerate() {
                out.push_str(&format!("{}. {}\n", index + 1, step));
            }
        }
        out
    }
}
