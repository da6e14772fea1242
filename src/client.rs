use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::BrowserConfig;
use crate::error::ApiError;
use crate::model::{ApiResponse, Area, Category, Ingredient, RawMeal, Recipe};

/// Default TheMealDB endpoint (public test key `1`)
pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Typed access to the recipe API.
///
/// Every call distinguishes a failed request (`Err`) from a successful
/// response that carried no data (`Ok` with an empty list, or `Ok(None)`
/// for [`lookup_recipe`](RecipeApi::lookup_recipe)).
#[async_trait]
pub trait RecipeApi: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError>;

    async fn list_areas(&self) -> Result<Vec<Area>, ApiError>;

    async fn list_ingredients(&self) -> Result<Vec<Ingredient>, ApiError>;

    async fn filter_by_category(&self, category: &str) -> Result<Vec<Recipe>, ApiError>;

    async fn filter_by_area(&self, area: &str) -> Result<Vec<Recipe>, ApiError>;

    async fn filter_by_ingredient(&self, ingredient: &str) -> Result<Vec<Recipe>, ApiError>;

    async fn lookup_recipe(&self, id: &str) -> Result<Option<Recipe>, ApiError>;

    async fn search_recipes(&self, query: &str) -> Result<Vec<Recipe>, ApiError>;
}

/// reqwest-backed TheMealDB client
#[derive(Debug, Clone)]
pub struct MealDbClient {
    client: Client,
    base_url: String,
}

impl MealDbClient {
    /// Create a client against the public API with the default timeout
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(DEFAULT_BASE_URL, Some(DEFAULT_TIMEOUT))
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: &BrowserConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mealdb-browser/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, ApiError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::from_request(e, &url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { status, url });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::from_request(e, &url))?;

        // The API occasionally answers with an empty body instead of `{"meals": null}`
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&body)?;
        Ok(envelope.into_items())
    }

    async fn get_meals(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<Recipe>, ApiError> {
        let meals: Vec<RawMeal> = self.get_list(path, query).await?;
        Ok(meals.into_iter().map(Recipe::from).collect())
    }

    /// All categories, or an empty list if the request failed
    pub async fn fetch_categories(&self) -> Vec<Category> {
        self.list_categories().await.unwrap_or_else(|e| {
            error!("Error fetching categories: {}", e);
            Vec::new()
        })
    }

    /// All areas, or an empty list if the request failed
    pub async fn fetch_areas(&self) -> Vec<Area> {
        self.list_areas().await.unwrap_or_else(|e| {
            error!("Error fetching areas: {}", e);
            Vec::new()
        })
    }

    /// All ingredients, or an empty list if the request failed
    pub async fn fetch_ingredients(&self) -> Vec<Ingredient> {
        self.list_ingredients().await.unwrap_or_else(|e| {
            error!("Error fetching ingredients: {}", e);
            Vec::new()
        })
    }

    pub async fn fetch_recipes_by_category(&self, category: &str) -> Vec<Recipe> {
        self.filter_by_category(category).await.unwrap_or_else(|e| {
            error!("Error fetching recipes for category {}: {}", category, e);
            Vec::new()
        })
    }

    pub async fn fetch_recipes_by_area(&self, area: &str) -> Vec<Recipe> {
        self.filter_by_area(area).await.unwrap_or_else(|e| {
            error!("Error fetching recipes for area {}: {}", area, e);
            Vec::new()
        })
    }

    pub async fn fetch_recipes_by_ingredient(&self, ingredient: &str) -> Vec<Recipe> {
        self.filter_by_ingredient(ingredient)
            .await
            .unwrap_or_else(|e| {
                error!("Error fetching recipes with ingredient {}: {}", ingredient, e);
                Vec::new()
            })
    }

    /// Look up a single recipe; `None` both when it does not exist and when the request failed
    pub async fn fetch_recipe_by_id(&self, id: &str) -> Option<Recipe> {
        self.lookup_recipe(id).await.unwrap_or_else(|e| {
            error!("Error fetching recipe {}: {}", id, e);
            None
        })
    }

    pub async fn fetch_search_results(&self, query: &str) -> Vec<Recipe> {
        self.search_recipes(query).await.unwrap_or_else(|e| {
            error!("Error searching recipes: {}", e);
            Vec::new()
        })
    }
}

#[async_trait]
impl RecipeApi for MealDbClient {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get_list("categories.php", &[]).await
    }

    async fn list_areas(&self) -> Result<Vec<Area>, ApiError> {
        self.get_list("list.php", &[("a", "list")]).await
    }

    async fn list_ingredients(&self) -> Result<Vec<Ingredient>, ApiError> {
        self.get_list("list.php", &[("i", "list")]).await
    }

    async fn filter_by_category(&self, category: &str) -> Result<Vec<Recipe>, ApiError> {
        self.get_meals("filter.php", &[("c", category)]).await
    }

    async fn filter_by_area(&self, area: &str) -> Result<Vec<Recipe>, ApiError> {
        self.get_meals("filter.php", &[("a", area)]).await
    }

    async fn filter_by_ingredient(&self, ingredient: &str) -> Result<Vec<Recipe>, ApiError> {
        self.get_meals("filter.php", &[("i", ingredient)]).await
    }

    async fn lookup_recipe(&self, id: &str) -> Result<Option<Recipe>, ApiError> {
        let meals = self.get_meals("lookup.php", &[("i", id)]).await?;
        Ok(meals.into_iter().next())
    }

    async fn search_recipes(&self, query: &str) -> Result<Vec<Recipe>, ApiError> {
        self.get_meals("search.php", &[("s", query)]).await
    }
}
