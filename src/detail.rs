use std::sync::OnceLock;

use log::{debug, warn};
use regex::Regex;

use crate::client::RecipeApi;
use crate::error::BrowseError;
use crate::model::Recipe;

/// Length of a YouTube video id
const VIDEO_ID_LEN: usize = 11;

fn video_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^.*(youtu.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*")
            .expect("video url pattern is valid")
    })
}

/// Pull the video id out of a YouTube link.
///
/// Accepts the `watch?v=`, `youtu.be/`, `embed/`, `v/` and `u/x/` forms.
/// Returns `None` unless the id is exactly eleven characters long.
pub fn extract_video_id(url: &str) -> Option<String> {
    let captures = video_url_pattern().captures(url)?;
    let id = captures.get(2)?.as_str();
    (id.len() == VIDEO_ID_LEN).then(|| id.to_string())
}

/// Load a single recipe for the detail page.
///
/// Unlike the lenient `fetch_recipe_by_id`, a missing recipe and a failed
/// request come back as different errors.
pub async fn load_recipe_detail(api: &dyn RecipeApi, id: &str) -> Result<Recipe, BrowseError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(BrowseError::MissingId);
    }

    match api.lookup_recipe(id).await {
        Ok(Some(recipe)) => {
            debug!("Loaded recipe {} ({})", recipe.id, recipe.name);
            Ok(recipe)
        }
        Ok(None) => {
            debug!("Recipe {} not found", id);
            Err(BrowseError::NotFound)
        }
        Err(e) => {
            warn!("Failed to load recipe {}: {}", id, e);
            Err(e.into())
        }
    }
}
