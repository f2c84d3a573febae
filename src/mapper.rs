use crate::model::{Difficulty, Recipe};
use crate::normalize::normalize_list;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::convert::TryFrom;

/// One document as returned by the storage service
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt", default)]
    pub created_at: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl TryFrom<Value> for RawRecord {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value)
    }
}

impl RawRecord {
    pub fn new(id: impl Into<String>, created_at: impl Into<String>, fields: Value) -> Self {
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        RawRecord {
            id: id.into(),
            created_at: created_at.into(),
            fields,
        }
    }

    fn text(&self, key: &str) -> String {
        match self.fields.get(key) {
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        }
    }

    fn number(&self, key: &str) -> Option<f64> {
        match self.fields.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn count(&self, key: &str) -> Option<u32> {
        let n = self.number(key)?;
        if n.is_finite() && n.fract() == 0.0 && n >= 0.0 && n <= u32::MAX as f64 {
            Some(n as u32)
        } else {
            None
        }
    }
}

impl From<&RawRecord> for Recipe {
    fn from(record: &RawRecord) -> Self {
        let image = match record.fields.get("imageUrl") {
            Some(Value::String(url)) => url.clone(),
            _ => record.text("image"),
        };

        Recipe {
            id: record.id.clone(),
            title: record.text("title"),
            description: record.text("description"),
            image,
            prep_time: record.text("prepTime"),
            cook_time: record.text("cookTime"),
            servings: record.count("servings"),
            difficulty_level: record.text("difficultyLevel").parse::<Difficulty>().ok(),
            ingredients: normalize_list(record.fields.get("ingredients")),
            instructions: normalize_list(record.fields.get("instructions")),
            author_id: record.text("authorId"),
            author_name: record.text("authorName"),
            author_avatar: record.text("authorAvatar"),
            rating: record.number("rating").unwrap_or(0.0),
            total_ratings: record.count("totalRatings").unwrap_or(0),
            category: record.text("category"),
            created_at: record.created_at.clone(),
        }
    }
}

impl From<RawRecord> for Recipe {
    fn from(record: RawRecord) -> Self {
        Recipe::from(&record)
    }
}

/// Map a batch of records, keeping their order
pub fn map_records(records: Vec<RawRecord>) -> Vec<Recipe> {
    records.into_iter().map(Recipe::from).collect()
}
