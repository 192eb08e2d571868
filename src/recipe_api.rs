//! Client for the third-party recipe search API (Spoonacular `complexSearch`).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RecipeApiConfig;
use crate::nutrition::{NutrientRange, NutritionSnapshot};

#[derive(Debug, thiserror::Error)]
pub enum RecipeApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("recipe API error ({status}): {body}")]
    Api { status: u16, body: String },
}

/// Filter shape shared by the external search and the local recipe query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeQuery {
    pub query: Option<String>,
    pub min_calories: Option<i64>,
    pub max_calories: Option<i64>,
    pub min_protein: Option<i64>,
    pub max_protein: Option<i64>,
    pub min_carbs: Option<i64>,
    pub max_carbs: Option<i64>,
    pub min_fat: Option<i64>,
    pub max_fat: Option<i64>,
    pub diet: Option<String>,
    pub exclude_ingredients: Vec<String>,
    pub number: u32,
    pub offset: u32,
}

impl RecipeQuery {
    pub fn with_range(mut self, r: &NutrientRange) -> Self {
        self.min_calories = Some(r.min_calories);
        self.max_calories = Some(r.max_calories);
        self.min_protein = Some(r.min_protein);
        self.max_protein = Some(r.max_protein);
        self.min_carbs = Some(r.min_carbs);
        self.max_carbs = Some(r.max_carbs);
        self.min_fat = Some(r.min_fat);
        self.max_fat = Some(r.max_fat);
        self
    }

    /// Query-string pairs for `complexSearch`, without the API key.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("number", self.number.to_string()),
            ("offset", self.offset.to_string()),
            ("addRecipeNutrition", "true".to_string()),
        ];
        if let Some(q) = self.query.as_deref().filter(|q| !q.is_empty()) {
            pairs.push(("query", q.to_string()));
        }
        let bounds = [
            ("minCalories", self.min_calories),
            ("maxCalories", self.max_calories),
            ("minProtein", self.min_protein),
            ("maxProtein", self.max_protein),
            ("minCarbs", self.min_carbs),
            ("maxCarbs", self.max_carbs),
            ("minFat", self.min_fat),
            ("maxFat", self.max_fat),
        ];
        pairs.extend(
            bounds
                .into_iter()
                .filter_map(|(k, v)| v.map(|v| (k, v.to_string()))),
        );
        if let Some(d) = self.diet.as_deref().filter(|d| !d.is_empty()) {
            pairs.push(("diet", d.to_string()));
        }
        if !self.exclude_ingredients.is_empty() {
            pairs.push(("excludeIngredients", self.exclude_ingredients.join(",")));
        }
        pairs
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecipeSource {
    External,
    Local,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    /// External numeric id or local UUID, as a string.
    pub id: String,
    pub source: RecipeSource,
    pub title: String,
    pub image: Option<String>,
    pub ready_in_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub nutrition: NutritionSnapshot,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub results: Vec<RecipeSummary>,
    pub total_results: i64,
}

// ---- wire types ----

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComplexSearchResponse {
    #[serde(default)]
    results: Vec<ExternalRecipe>,
    #[serde(default)]
    total_results: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExternalRecipe {
    id: i64,
    title: String,
    image: Option<String>,
    ready_in_minutes: Option<i32>,
    servings: Option<i32>,
    nutrition: Option<ExternalNutrition>,
}

#[derive(Debug, Deserialize)]
struct ExternalNutrition {
    #[serde(default)]
    nutrients: Vec<ExternalNutrient>,
}

#[derive(Debug, Deserialize)]
struct ExternalNutrient {
    name: String,
    amount: f64,
}

impl From<ExternalRecipe> for RecipeSummary {
    fn from(r: ExternalRecipe) -> Self {
        let mut n = NutritionSnapshot::default();
        for nutrient in r.nutrition.map(|n| n.nutrients).unwrap_or_default() {
            match nutrient.name.as_str() {
                "Calories" => n.calories = nutrient.amount,
                "Protein" => n.protein = nutrient.amount,
                "Carbohydrates" => n.carbs = nutrient.amount,
                "Fat" => n.fat = nutrient.amount,
                _ => {}
            }
        }
        Self {
            id: r.id.to_string(),
            source: RecipeSource::External,
            title: r.title,
            image: r.image,
            ready_in_minutes: r.ready_in_minutes,
            servings: r.servings,
            nutrition: n,
        }
    }
}

#[async_trait]
pub trait RecipeSearch: Send + Sync {
    async fn search(&self, query: &RecipeQuery) -> Result<SearchPage, RecipeApiError>;
    /// Full recipe information, relayed as returned.
    async fn information(&self, id: i64) -> Result<serde_json::Value, RecipeApiError>;
}

pub struct HttpRecipeApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpRecipeApi {
    pub fn new(cfg: &RecipeApiConfig, timeout: Duration) -> Result<Self, RecipeApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
        })
    }

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, RecipeApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(RecipeApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl RecipeSearch for HttpRecipeApi {
    async fn search(&self, query: &RecipeQuery) -> Result<SearchPage, RecipeApiError> {
        debug!(?query, "recipe api search");
        let response = self
            .client
            .get(format!("{}/recipes/complexSearch", self.base_url))
            .query(&[("apiKey", self.api_key.as_str())])
            .query(&query.to_pairs())
            .send()
            .await?;
        let body: ComplexSearchResponse = Self::ensure_success(response).await?.json().await?;
        Ok(SearchPage {
            total_results: body.total_results,
            results: body.results.into_iter().map(RecipeSummary::from).collect(),
        })
    }

    async fn information(&self, id: i64) -> Result<serde_json::Value, RecipeApiError> {
        let response = self
            .client
            .get(format!("{}/recipes/{}/information", self.base_url, id))
            .query(&[("apiKey", self.api_key.as_str()), ("includeNutrition", "true")])
            .send()
            .await?;
        Ok(Self::ensure_success(response).await?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_include_only_present_filters() {
        let q = RecipeQuery {
            query: Some("pasta".into()),
            max_calories: Some(700),
            diet: Some(String::new()),
            exclude_ingredients: vec!["nuts".into(), "shrimp".into()],
            number: 10,
            offset: 20,
            ..Default::default()
        };
        let pairs = q.to_pairs();
        let get = |k: &str| pairs.iter().find(|(key, _)| *key == k).map(|(_, v)| v.as_str());
        assert_eq!(get("query"), Some("pasta"));
        assert_eq!(get("maxCalories"), Some("700"));
        assert_eq!(get("minCalories"), None);
        assert_eq!(get("diet"), None);
        assert_eq!(get("excludeIngredients"), Some("nuts,shrimp"));
        assert_eq!(get("offset"), Some("20"));
        assert_eq!(get("addRecipeNutrition"), Some("true"));
    }

    #[test]
    fn with_range_sets_all_bounds() {
        let r = NutrientRange {
            min_calories: 500,
            max_calories: 800,
            min_protein: 20,
            max_protein: 50,
            min_carbs: 40,
            max_carbs: 100,
            min_fat: 10,
            max_fat: 40,
        };
        let q = RecipeQuery::default().with_range(&r);
        assert_eq!(q.min_calories, Some(500));
        assert_eq!(q.max_fat, Some(40));
        assert_eq!(q.to_pairs().len(), 3 + 8);
    }

    #[test]
    fn maps_complex_search_payload() {
        let raw = r#"{
            "results": [{
                "id": 716429,
                "title": "Pasta with Garlic",
                "image": "https://img.example/716429.jpg",
                "readyInMinutes": 45,
                "servings": 2,
                "nutrition": {"nutrients": [
                    {"name": "Calories", "amount": 584.46, "unit": "kcal"},
                    {"name": "Protein", "amount": 19.3, "unit": "g"},
                    {"name": "Carbohydrates", "amount": 83.9, "unit": "g"},
                    {"name": "Fat", "amount": 19.1, "unit": "g"},
                    {"name": "Sugar", "amount": 4.0, "unit": "g"}
                ]}
            }],
            "offset": 0,
            "number": 1,
            "totalResults": 86
        }"#;
        let parsed: ComplexSearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.total_results, 86);
        let summary = RecipeSummary::from(parsed.results.into_iter().next().unwrap());
        assert_eq!(summary.id, "716429");
        assert_eq!(summary.source, RecipeSource::External);
        assert_eq!(summary.nutrition.carbs, 83.9);
        assert_eq!(summary.ready_in_minutes, Some(45));
    }

    #[test]
    fn missing_nutrition_defaults_to_zero() {
        let raw = r#"{"id": 1, "title": "Toast"}"#;
        let r: ExternalRecipe = serde_json::from_str(raw).unwrap();
        let s = RecipeSummary::from(r);
        assert_eq!(s.nutrition, NutritionSnapshot::default());
        assert!(s.image.is_none());
    }
}
