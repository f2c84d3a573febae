use reqwest::Url;
use std::fmt;

/// Pages of the application, addressed by path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    /// `/recipes`, optionally `?category=...`
    Recipes { category: Option<String> },
    /// `/recipe/:id`
    RecipeDetail { id: String },
    /// Submission form. Not guarded here; submitting goes through the session gate.
    Create,
    Signup,
    About,
    NotFound,
}

impl Route {
    /// Resolve a path such as `/recipes?category=Main%20Course`
    pub fn parse(path: &str) -> Route {
        // Any base works, it only lets Url handle the query string and percent-decoding
        let url = match Url::parse("http://localhost/").and_then(|base| base.join(path.trim())) {
            Ok(url) => url,
            Err(_) => return Route::NotFound,
        };

        let segments: Vec<&str> = url
            .path()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["recipes"] => {
                let category = url
                    .query_pairs()
                    .find(|(key, _)| key == "category")
                    .map(|(_, value)| value.into_owned())
                    .filter(|value| !value.is_empty());
                Route::Recipes { category }
            }
            ["recipe", id] => Route::RecipeDetail { id: id.to_string() },
            ["create"] => Route::Create,
            ["signup"] => Route::Signup,
            ["about"] => Route::About,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Recipes { category: None } => "/recipes".to_string(),
            Route::Recipes {
                category: Some(category),
            } => match Url::parse_with_params("http://localhost/recipes", &[("category", category)]) {
                Ok(url) => format!("{}?{}", url.path(), url.query().unwrap_or_default()),
                Err(_) => "/recipes".to_string(),
            },
            Route::RecipeDetail { id } => format!("/recipe/{}", id),
            Route::Create => "/create".to_string(),
            Route::Signup => "/signup".to_string(),
            Route::About => "/about".to_string(),
            Route::NotFound => "/404".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
