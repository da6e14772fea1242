use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of numbered ingredient/measure slots in a meal payload
pub const MAX_INGREDIENT_SLOTS: usize = 20;

/// Every endpoint answers with a single field holding an array or `null`.
///
/// `categories.php` names that field `categories`, everything else uses `meals`.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(alias = "categories")]
    pub meals: Option<Vec<T>>,
}

impl<T> ApiResponse<T> {
    pub fn into_items(self) -> Vec<T> {
        self.meals.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    pub measure: String,
}

/// A meal as exposed to callers, with ingredient slots collapsed into pairs.
///
/// Listing endpoints (`filter.php`) only fill `id`, `name` and `thumbnail`;
/// the remaining fields are populated by `lookup.php` and `search.php`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: Option<String>,
    pub thumbnail: String,
    pub tags: Vec<String>,
    pub youtube: Option<String>,
    pub source: Option<String>,
    pub image_source: Option<String>,
    pub creative_commons_confirmed: Option<String>,
    pub drink_alternate: Option<String>,
    pub date_modified: Option<String>,
    pub ingredients: Vec<RecipeIngredient>,
    /// Never set by the API; reserved for the presentation layer
    #[serde(default)]
    pub is_favorite: bool,
}

impl Recipe {
    /// YouTube video id of the attached video, if any
    pub fn video_id(&self) -> Option<String> {
        self.youtube
            .as_deref()
            .and_then(crate::detail::extract_video_id)
    }

    /// Text used when sharing a recipe
    pub fn share_message(&self) -> String {
        format!(
            "Check out this delicious recipe: {}\n\n{}",
            self.name,
            self.source.as_deref().unwrap_or_default()
        )
    }
}

/// Raw meal object as returned by TheMealDB
#[derive(Debug, Deserialize)]
pub(crate) struct RawMeal {
    #[serde(rename = "idMeal")]
    id: String,
    #[serde(rename = "strMeal")]
    name: String,
    #[serde(rename = "strCategory", default)]
    category: Option<String>,
    #[serde(rename = "strArea", default)]
    area: Option<String>,
    #[serde(rename = "strInstructions", default)]
    instructions: Option<String>,
    #[serde(rename = "strMealThumb", default)]
    thumbnail: Option<String>,
    #[serde(rename = "strTags", default)]
    tags: Option<String>,
    #[serde(rename = "strYoutube", default)]
    youtube: Option<String>,
    #[serde(rename = "strSource", default)]
    source: Option<String>,
    #[serde(rename = "strImageSource", default)]
    image_source: Option<String>,
    #[serde(rename = "strCreativeCommonsConfirmed", default)]
    creative_commons_confirmed: Option<String>,
    #[serde(rename = "strDrinkAlternate", default)]
    drink_alternate: Option<String>,
    #[serde(rename = "dateModified", default)]
    date_modified: Option<String>,
    /// `strIngredient1..20` and `strMeasure1..20`
    #[serde(flatten)]
    slots: HashMap<String, Value>,
}

impl RawMeal {
    fn slot(&self, prefix: &str, index: usize) -> Option<&str> {
        self.slots
            .get(&format!("{prefix}{index}"))
            .and_then(Value::as_str)
    }

    fn collect_ingredients(&self) -> Vec<RecipeIngredient> {
        (1..=MAX_INGREDIENT_SLOTS)
            .filter_map(|i| {
                let name = self.slot("strIngredient", i)?;
                if name.trim().is_empty() {
                    return None;
                }
                Some(RecipeIngredient {
                    name: name.to_string(),
                    measure: self.slot("strMeasure", i).unwrap_or_default().to_string(),
                })
            })
            .collect()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<RawMeal> for Recipe {
    fn from(raw: RawMeal) -> Self {
        let ingredients = raw.collect_ingredients();
        let tags = raw
            .tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Recipe {
            id: raw.id,
            name: raw.name,
            category: non_empty(raw.category),
            area: non_empty(raw.area),
            instructions: non_empty(raw.instructions),
            thumbnail: raw.thumbnail.unwrap_or_default(),
            tags,
            youtube: non_empty(raw.youtube),
            source: non_empty(raw.source),
            image_source: non_empty(raw.image_source),
            creative_commons_confirmed: non_empty(raw.creative_commons_confirmed),
            drink_alternate: non_empty(raw.drink_alternate),
            date_modified: non_empty(raw.date_modified),
            ingredients,
            is_favorite: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "idCategory")]
    pub id: String,
    #[serde(rename = "strCategory")]
    pub name: String,
    #[serde(rename = "strCategoryThumb", default)]
    pub thumbnail: String,
    #[serde(rename = "strCategoryDescription", default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    #[serde(rename = "strArea")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(rename = "idIngredient", default)]
    pub id: String,
    #[serde(rename = "strIngredient")]
    pub name: String,
    #[serde(rename = "strDescription", default)]
    pub description: Option<String>,
    #[serde(rename = "strType", default)]
    pub kind: Option<String>,
}
