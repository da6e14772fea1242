//! Browse TheMealDB from the terminal
//!
//! Loads the default listing, then simulates typing a search query and
//! prints each settled state. Set RUST_LOG=debug to watch fetch selection.

use std::time::Duration;

use mealdb_browser::{load_recipe_detail, mount_browser, DietaryRestriction, MealDbClient, RecipeFilters};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let browser = mount_browser().await?;
    let snapshot = browser.snapshot();
    println!("=== {} ({} recipes) ===", snapshot.selected_category, snapshot.recipes.len());
    for recipe in snapshot.recipes.iter().take(5) {
        println!("  {} [{}]", recipe.name, recipe.id);
    }

    println!("\n=== Vegetarian only ===");
    browser
        .update_filters(RecipeFilters::default().with_restriction(DietaryRestriction::Vegetarian))
        .await;
    println!("{} recipes left", browser.snapshot().recipes.len());

    println!("\n=== Typing \"arrab\" ===");
    let mut updates = browser.subscribe();
    for prefix in ["a", "ar", "arr", "arra", "arrab"] {
        browser.update_search(prefix);
        tokio::time::sleep(Duration::from_millis(80)).await;
    }
    let settled = updates
        .wait_for(|s| s.search_term == "arrab" && !s.is_loading)
        .await?
        .clone();
    for recipe in &settled.recipes {
        println!("  {} [{}]", recipe.name, recipe.id);
    }

    if let Some(first) = settled.recipes.first() {
        let client = MealDbClient::new()?;
        let detail = load_recipe_detail(&client, &first.id).await?;
        println!("\n=== {} ===", detail.name);
        for ingredient in &detail.ingredients {
            println!("  {} {}", ingredient.measure, ingredient.name);
        }
        if let Some(video) = detail.video_id() {
            println!("Video: https://www.youtube.com/embed/{video}");
        }
    }

    Ok(())
}
