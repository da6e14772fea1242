use std::sync::Arc;
use std::time::Duration;

use mealdb_browser::{
    BrowserConfig, BrowserSnapshot, DietaryRestriction, MealDbClient, QueryMode, RecipeBrowser,
    RecipeFilters,
};
use mockito::{Matcher, Server, ServerGuard};
use tokio::sync::watch;
use tokio::time::timeout;

const BEEF_LISTING: &str = r#"{"meals": [
    {"strMeal": "Beef Wellington", "strMealThumb": "https://img/wellington.jpg", "idMeal": "52803"},
    {"strMeal": "Chicken Fried Steak", "strMealThumb": "https://img/cfs.jpg", "idMeal": "52900"},
    {"strMeal": "Beef and Mustard Pie", "strMealThumb": "https://img/pie.jpg", "idMeal": "52874"}
]}"#;

const CATEGORIES: &str = r#"{"categories": [
    {"idCategory": "1", "strCategory": "Beef", "strCategoryThumb": "https://img/beef.png", "strCategoryDescription": "Beef"},
    {"idCategory": "3", "strCategory": "Dessert", "strCategoryThumb": "https://img/dessert.png", "strCategoryDescription": "Dessert"}
]}"#;

fn config() -> BrowserConfig {
    BrowserConfig {
        debounce_ms: 50,
        ..Default::default()
    }
}

fn browser_for(server: &ServerGuard) -> RecipeBrowser {
    let _ = env_logger::builder().is_test(true).try_init();
    let client = MealDbClient::with_base_url(server.url(), Some(Duration::from_secs(5))).unwrap();
    RecipeBrowser::new(Arc::new(client), &config())
}

async fn settle(
    updates: &mut watch::Receiver<BrowserSnapshot>,
    done: impl FnMut(&BrowserSnapshot) -> bool,
) -> BrowserSnapshot {
    timeout(Duration::from_secs(5), updates.wait_for(done))
        .await
        .expect("browser did not settle in time")
        .expect("browser was dropped")
        .clone()
}

async fn mock_reference_lists(server: &mut ServerGuard) {
    server
        .mock("GET", "/categories.php")
        .with_status(200)
        .with_body(CATEGORIES)
        .create_async()
        .await;
    server
        .mock("GET", "/list.php")
        .match_query(Matcher::UrlEncoded("a".into(), "list".into()))
        .with_status(200)
        .with_body(r#"{"meals": [{"strArea": "British"}, {"strArea": "Italian"}]}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/list.php")
        .match_query(Matcher::UrlEncoded("i".into(), "list".into()))
        .with_status(200)
        .with_body(r#"{"meals": [{"idIngredient": "1", "strIngredient": "Chicken", "strDescription": null, "strType": null}]}"#)
        .create_async()
        .await;
}

#[tokio::test]
async fn test_mount_then_vegetarian_filter() {
    let mut server = Server::new_async().await;
    mock_reference_lists(&mut server).await;
    let beef = server
        .mock("GET", "/filter.php")
        .match_query(Matcher::UrlEncoded("c".into(), "Beef".into()))
        .with_status(200)
        .with_body(BEEF_LISTING)
        .expect(1)
        .create_async()
        .await;

    let client = MealDbClient::with_base_url(server.url(), None).unwrap();
    let browser = RecipeBrowser::mount(Arc::new(client), &config()).await;

    let mounted = browser.snapshot();
    assert_eq!(mounted.categories.len(), 2);
    assert_eq!(mounted.areas.len(), 2);
    assert_eq!(mounted.ingredients[0].name, "Chicken");
    assert_eq!(mounted.recipes.len(), 3);
    assert_eq!(mounted.mode, QueryMode::Default);

    browser
        .update_filters(RecipeFilters::default().with_restriction(DietaryRestriction::Vegetarian))
        .await;

    let names: Vec<_> = browser
        .snapshot()
        .recipes
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["Beef Wellington", "Beef and Mustard Pie"]);
    beef.assert_async().await;
}

#[tokio::test]
async fn test_rapid_typing_issues_one_search() {
    let mut server = Server::new_async().await;
    let search = server
        .mock("GET", "/search.php")
        .match_query(Matcher::UrlEncoded("s".into(), "pas".into()))
        .with_status(200)
        .with_body(
            r#"{"meals": [{"idMeal": "52835", "strMeal": "Fettucine alfredo", "strCategory": "Pasta", "strArea": "Italian", "strMealThumb": "https://img/f.jpg", "strIngredient1": "Clotted Cream", "strMeasure1": "227g"}]}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let other_searches = server
        .mock("GET", "/search.php")
        .match_query(Matcher::Regex("s=pa?$".into()))
        .expect(0)
        .create_async()
        .await;

    let browser = browser_for(&server);
    let mut updates = browser.subscribe();

    browser.update_search("p");
    browser.update_search("pa");
    browser.update_search("pas");

    let settled = settle(&mut updates, |s| s.search_term == "pas" && !s.is_loading).await;
    assert_eq!(settled.mode, QueryMode::Search);
    assert_eq!(settled.recipes.len(), 1);
    assert_eq!(settled.recipes[0].ingredients[0].measure, "227g");

    search.assert_async().await;
    other_searches.assert_async().await;
}

#[tokio::test]
async fn test_network_failure_keeps_previous_listing() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/filter.php")
        .match_query(Matcher::UrlEncoded("c".into(), "Beef".into()))
        .with_status(200)
        .with_body(BEEF_LISTING)
        .create_async()
        .await;
    server
        .mock("GET", "/filter.php")
        .match_query(Matcher::UrlEncoded("c".into(), "Dessert".into()))
        .with_status(502)
        .create_async()
        .await;

    let browser = browser_for(&server);
    browser.refresh().await;
    browser.select_category("Dessert").await;

    let snapshot = browser.snapshot();
    assert_eq!(snapshot.selected_category, "Dessert");
    assert_eq!(snapshot.recipes.len(), 3);
    assert!(snapshot.error.is_some());
    assert!(!snapshot.is_loading);
}

#[tokio::test]
async fn test_empty_result_is_not_an_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/filter.php")
        .match_query(Matcher::UrlEncoded("a".into(), "Atlantis".into()))
        .with_status(200)
        .with_body(r#"{"meals": null}"#)
        .create_async()
        .await;

    let browser = browser_for(&server);
    browser
        .update_filters(RecipeFilters::default().with_area("Atlantis"))
        .await;

    let snapshot = browser.snapshot();
    assert_eq!(snapshot.mode, QueryMode::Area);
    assert!(snapshot.recipes.is_empty());
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn test_clearing_search_returns_to_default_category() {
    let mut server = Server::new_async().await;
    let beef = server
        .mock("GET", "/filter.php")
        .match_query(Matcher::UrlEncoded("c".into(), "Beef".into()))
        .with_status(200)
        .with_body(BEEF_LISTING)
        .create_async()
        .await;
    server
        .mock("GET", "/search.php")
        .match_query(Matcher::UrlEncoded("s".into(), "tart".into()))
        .with_status(200)
        .with_body(r#"{"meals": null}"#)
        .create_async()
        .await;

    let browser = browser_for(&server);
    let mut updates = browser.subscribe();

    browser.update_search("tart");
    settle(&mut updates, |s| s.search_term == "tart" && !s.is_loading).await;

    browser.clear_search().await;

    let snapshot = browser.snapshot();
    assert_eq!(snapshot.mode, QueryMode::Default);
    assert_eq!(snapshot.search_query, "");
    assert_eq!(snapshot.recipes.len(), 3);
    beef.assert_async().await;
}
