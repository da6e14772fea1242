//! UniFFI bindings for mealdb-browser
//!
//! This module provides FFI-compatible types and functions for use with iOS and Android.
//! It wraps the async Rust API with synchronous functions that manage their own tokio runtime.

use std::fmt;

use crate::client::{MealDbClient, RecipeApi};
use crate::filters::{DietaryRestriction, RecipeFilters};
use crate::{ApiError, BrowseError, Category, Recipe};

/// FFI-compatible ingredient line
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiIngredient {
    pub name: String,
    /// Empty string if the API had no measure
    pub measure: String,
}

/// FFI-compatible recipe structure
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiRecipe {
    pub id: String,
    pub name: String,
    /// Empty string when the listing endpoint did not include it
    pub category: String,
    pub area: String,
    pub instructions: String,
    pub thumbnail: String,
    pub tags: Vec<String>,
    /// YouTube video id, ready for an embedded player
    pub video_id: Option<String>,
    pub source: Option<String>,
    pub ingredients: Vec<FfiIngredient>,
}

impl From<Recipe> for FfiRecipe {
    fn from(recipe: Recipe) -> Self {
        let video_id = recipe.video_id();
        FfiRecipe {
            id: recipe.id,
            name: recipe.name,
            category: recipe.category.unwrap_or_default(),
            area: recipe.area.unwrap_or_default(),
            instructions: recipe.instructions.unwrap_or_default(),
            thumbnail: recipe.thumbnail,
            tags: recipe.tags,
            video_id,
            source: recipe.source,
            ingredients: recipe
                .ingredients
                .into_iter()
                .map(|i| FfiIngredient {
                    name: i.name,
                    measure: i.measure,
                })
                .collect(),
        }
    }
}

impl From<FfiRecipe> for Recipe {
    fn from(ffi: FfiRecipe) -> Self {
        let optional = |s: String| if s.is_empty() { None } else { Some(s) };
        Recipe {
            id: ffi.id,
            name: ffi.name,
            category: optional(ffi.category),
            area: optional(ffi.area),
            instructions: optional(ffi.instructions),
            thumbnail: ffi.thumbnail,
            tags: ffi.tags,
            source: ffi.source,
            ingredients: ffi
                .ingredients
                .into_iter()
                .map(|i| crate::RecipeIngredient {
                    name: i.name,
                    measure: i.measure,
                })
                .collect(),
            ..Default::default()
        }
    }
}

/// FFI-compatible category
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiCategory {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    pub description: String,
}

impl From<Category> for FfiCategory {
    fn from(category: Category) -> Self {
        FfiCategory {
            id: category.id,
            name: category.name,
            thumbnail: category.thumbnail,
            description: category.description,
        }
    }
}

/// FFI-compatible dietary restriction
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum FfiDietaryRestriction {
    Vegetarian,
    Vegan,
    GlutenFree,
    DairyFree,
}

impl From<FfiDietaryRestriction> for DietaryRestriction {
    fn from(restriction: FfiDietaryRestriction) -> Self {
        match restriction {
            FfiDietaryRestriction::Vegetarian => DietaryRestriction::Vegetarian,
            FfiDietaryRestriction::Vegan => DietaryRestriction::Vegan,
            FfiDietaryRestriction::GlutenFree => DietaryRestriction::GlutenFree,
            FfiDietaryRestriction::DairyFree => DietaryRestriction::DairyFree,
        }
    }
}

/// FFI-compatible filter set
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiRecipeFilters {
    pub dietary_restrictions: Vec<FfiDietaryRestriction>,
    pub area: Option<String>,
    pub ingredient: Option<String>,
}

impl From<FfiRecipeFilters> for RecipeFilters {
    fn from(ffi: FfiRecipeFilters) -> Self {
        RecipeFilters {
            dietary_restrictions: ffi.dietary_restrictions.into_iter().map(Into::into).collect(),
            area: ffi.area,
            ingredient: ffi.ingredient,
            ..Default::default()
        }
    }
}

/// FFI-compatible error type
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum FfiBrowseError {
    /// Network, timeout or HTTP status failure
    FetchError { message: String },
    /// Response body was not the expected JSON
    ParseError { message: String },
    /// Detail lookup without an identifier
    MissingId { message: String },
    /// No recipe with the requested identifier
    NotFound { message: String },
    /// Configuration error
    ConfigError { message: String },
    /// Runtime error (tokio)
    RuntimeError { message: String },
}

impl fmt::Display for FfiBrowseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfiBrowseError::FetchError { message } => write!(f, "Fetch error: {}", message),
            FfiBrowseError::ParseError { message } => write!(f, "Parse error: {}", message),
            FfiBrowseError::MissingId { message } => write!(f, "Missing id: {}", message),
            FfiBrowseError::NotFound { message } => write!(f, "Not found: {}", message),
            FfiBrowseError::ConfigError { message } => write!(f, "Config error: {}", message),
            FfiBrowseError::RuntimeError { message } => write!(f, "Runtime error: {}", message),
        }
    }
}

impl std::error::Error for FfiBrowseError {}

impl From<ApiError> for FfiBrowseError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Decode(e) => FfiBrowseError::ParseError {
                message: e.to_string(),
            },
            other => FfiBrowseError::FetchError {
                message: other.to_string(),
            },
        }
    }
}

impl From<BrowseError> for FfiBrowseError {
    fn from(err: BrowseError) -> Self {
        let message = err.to_string();
        match err {
            BrowseError::MissingId => FfiBrowseError::MissingId { message },
            BrowseError::NotFound => FfiBrowseError::NotFound { message },
            BrowseError::Api(e) => e.into(),
            BrowseError::Config(_) => FfiBrowseError::ConfigError { message },
        }
    }
}

/// Create a new tokio runtime for FFI calls
fn create_runtime() -> Result<tokio::runtime::Runtime, FfiBrowseError> {
    tokio::runtime::Runtime::new().map_err(|e| FfiBrowseError::RuntimeError {
        message: format!("Failed to create async runtime: {}", e),
    })
}

fn create_client(timeout_seconds: Option<u64>) -> Result<MealDbClient, FfiBrowseError> {
    let mut config = crate::BrowserConfig::load().map_err(BrowseError::from)?;
    if let Some(timeout) = timeout_seconds {
        config.timeout = timeout;
    }
    Ok(MealDbClient::from_config(&config)?)
}

fn into_ffi(recipes: Vec<Recipe>) -> Vec<FfiRecipe> {
    recipes.into_iter().map(Into::into).collect()
}

/// List all recipe categories
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn list_categories(timeout_seconds: Option<u64>) -> Result<Vec<FfiCategory>, FfiBrowseError> {
    let client = create_client(timeout_seconds)?;
    let rt = create_runtime()?;
    rt.block_on(async {
        let categories = client.list_categories().await?;
        Ok(categories.into_iter().map(Into::into).collect())
    })
}

/// Recipes in a category (summaries: id, name, thumbnail)
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn recipes_by_category(
    category: String,
    timeout_seconds: Option<u64>,
) -> Result<Vec<FfiRecipe>, FfiBrowseError> {
    let client = create_client(timeout_seconds)?;
    let rt = create_runtime()?;
    rt.block_on(async { Ok(into_ffi(client.filter_by_category(&category).await?)) })
}

/// Search recipes by name
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn search_recipes(
    query: String,
    timeout_seconds: Option<u64>,
) -> Result<Vec<FfiRecipe>, FfiBrowseError> {
    let query = query.trim().to_string();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let client = create_client(timeout_seconds)?;
    let rt = create_runtime()?;
    rt.block_on(async { Ok(into_ffi(client.search_recipes(&query).await?)) })
}

/// Load a full recipe for the detail page
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn lookup_recipe(id: String, timeout_seconds: Option<u64>) -> Result<FfiRecipe, FfiBrowseError> {
    let client = create_client(timeout_seconds)?;
    let rt = create_runtime()?;
    rt.block_on(async {
        let recipe = crate::load_recipe_detail(&client, &id).await?;
        Ok(recipe.into())
    })
}

/// Apply the local filter pass to an already fetched list
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn filter_recipes(recipes: Vec<FfiRecipe>, filters: FfiRecipeFilters) -> Vec<FfiRecipe> {
    let filters: RecipeFilters = filters.into();
    recipes
        .into_iter()
        .filter(|ffi| filters.matches(&Recipe::from(ffi.clone())))
        .collect()
}

/// Extract the YouTube video id from a link
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn extract_video_id(url: String) -> Option<String> {
    crate::detail::extract_video_id(&url)
}

/// Default request timeout used when none is given, in seconds
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn default_timeout_seconds() -> u64 {
    crate::client::DEFAULT_TIMEOUT.as_secs()
}

/// Get the library version
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecipeIngredient;

    fn sample_recipe() -> Recipe {
        Recipe {
            id: "52772".to_string(),
            name: "Teriyaki Chicken Casserole".to_string(),
            category: Some("Chicken".to_string()),
            area: Some("Japanese".to_string()),
            instructions: Some("Preheat oven to 350F.".to_string()),
            thumbnail: "https://img/teriyaki.jpg".to_string(),
            tags: vec!["Meat".to_string()],
            youtube: Some("https://www.youtube.com/watch?v=4aZr5hZXP_s".to_string()),
            ingredients: vec![RecipeIngredient {
                name: "soy sauce".to_string(),
                measure: "3/4 cup".to_string(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_ffi_recipe_conversion() {
        let recipe = sample_recipe();

        let ffi_recipe: FfiRecipe = recipe.clone().into();
        assert_eq!(ffi_recipe.name, "Teriyaki Chicken Casserole");
        assert_eq!(ffi_recipe.area, "Japanese");
        assert_eq!(ffi_recipe.video_id.as_deref(), Some("4aZr5hZXP_s"));
        assert_eq!(ffi_recipe.ingredients.len(), 1);

        let back: Recipe = ffi_recipe.into();
        assert_eq!(back.name, recipe.name);
        assert_eq!(back.area, recipe.area);
        assert_eq!(back.ingredients, recipe.ingredients);
    }

    #[test]
    fn test_summary_conversion_uses_empty_strings() {
        let summary = Recipe {
            id: "1".to_string(),
            name: "Beef Wellington".to_string(),
            ..Default::default()
        };

        let ffi: FfiRecipe = summary.into();
        assert_eq!(ffi.category, "");
        assert!(ffi.video_id.is_none());

        let back: Recipe = ffi.into();
        assert!(back.category.is_none());
    }

    #[test]
    fn test_filter_recipes_ffi() {
        let recipes = vec![
            FfiRecipe::from(sample_recipe()),
            FfiRecipe::from(Recipe {
                id: "2".to_string(),
                name: "Beef Stroganoff".to_string(),
                ..Default::default()
            }),
        ];
        let filters = FfiRecipeFilters {
            dietary_restrictions: vec![FfiDietaryRestriction::Vegetarian],
            ..Default::default()
        };

        let kept = filter_recipes(recipes, filters);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "Beef Stroganoff");
    }

    #[test]
    fn test_error_mapping() {
        let not_found: FfiBrowseError = BrowseError::NotFound.into();
        assert!(matches!(not_found, FfiBrowseError::NotFound { .. }));

        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let parse: FfiBrowseError = BrowseError::Api(ApiError::Decode(decode)).into();
        assert!(matches!(parse, FfiBrowseError::ParseError { .. }));
    }

    #[test]
    fn test_search_blank_query_skips_network() {
        assert!(search_recipes("   ".to_string(), None).unwrap().is_empty());
    }

    #[test]
    fn test_get_version() {
        let version = get_version();
        assert!(!version.is_empty());
        assert_eq!(default_timeout_seconds(), 10);
    }
}
