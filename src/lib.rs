pub mod browser;
pub mod client;
pub mod config;
pub mod detail;
pub mod error;
pub mod filters;
pub mod model;
pub mod uniffi_bindings;

#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

pub use browser::{BrowserSnapshot, QueryMode, RecipeBrowser};
pub use client::{MealDbClient, RecipeApi, DEFAULT_BASE_URL};
pub use config::BrowserConfig;
pub use detail::{extract_video_id, load_recipe_detail};
pub use error::{ApiError, BrowseError};
pub use filters::{DietaryRestriction, Difficulty, RecipeFilters};
pub use model::{Area, Category, Ingredient, Recipe, RecipeIngredient};

use std::sync::Arc;

/// Load configuration and build a client from it
pub fn client_from_env() -> Result<(BrowserConfig, MealDbClient), BrowseError> {
    let config = BrowserConfig::load()?;
    let client = MealDbClient::from_config(&config)?;
    Ok((config, client))
}

/// Build a browser from `mealdb.toml` / `MEALDB__*` settings and load the initial listing
pub async fn mount_browser() -> Result<RecipeBrowser, BrowseError> {
    let (config, client) = client_from_env()?;
    Ok(RecipeBrowser::mount(Arc::new(client), &config).await)
}

/// Fetch a recipe for the detail page using configured settings
pub async fn fetch_recipe_detail(id: &str) -> Result<Recipe, BrowseError> {
    let (_, client) = client_from_env()?;
    load_recipe_detail(&client, id).await
}
