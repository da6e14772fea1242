//! Search and filter coordination for the recipe listing.
//!
//! [`RecipeBrowser`] owns everything the listing screen shows: reference
//! lists, the selected category, the raw and committed search strings, the
//! active filters and the loading/error overlay. User actions update that
//! state; exactly one server-side query drives each fetch and the local
//! filter predicate is re-applied to whatever came back.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::client::RecipeApi;
use crate::config::BrowserConfig;
use crate::filters::RecipeFilters;
use crate::model::{Area, Category, Ingredient, Recipe};

/// Which input currently decides the server-side query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    /// Default category, nothing else selected
    #[default]
    Default,
    Category,
    Search,
    Area,
    Ingredient,
}

/// Everything the presentation layer renders, as of the last state change
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowserSnapshot {
    pub categories: Vec<Category>,
    pub areas: Vec<Area>,
    pub ingredients: Vec<Ingredient>,
    pub selected_category: String,
    /// Fetched collection after the local filter pass
    pub recipes: Vec<Recipe>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Text as typed
    pub search_query: String,
    /// Debounced, trimmed text that drives search fetches
    pub search_term: String,
    pub filters: RecipeFilters,
    pub mode: QueryMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FetchRequest {
    Search(String),
    Area(String),
    Ingredient(String),
    Category(String),
}

/// A fetch that has been issued but not yet applied
#[derive(Debug)]
struct PendingFetch {
    generation: u64,
    request: FetchRequest,
}

#[derive(Debug, Clone)]
struct Settings {
    debounce: Duration,
    min_query_len: usize,
    default_category: String,
}

#[derive(Debug, Default)]
struct BrowserState {
    categories: Vec<Category>,
    areas: Vec<Area>,
    ingredients: Vec<Ingredient>,
    selected_category: String,
    search_query: String,
    search_term: String,
    filters: RecipeFilters,
    /// Last successfully fetched collection, before local filtering
    fetched: Vec<Recipe>,
    visible: Vec<Recipe>,
    /// Cleared by the next successful recipe fetch
    fetch_error: Option<String>,
    /// Cleared by the next successful reference load
    reference_error: Option<String>,
    /// Bumped on every keystroke that schedules or cancels a search commit
    search_seq: u64,
    pending_search: bool,
    /// Bumped for every fetch; only the latest one may touch shared state
    generation: u64,
    in_flight: Option<u64>,
    /// The in-flight fetch came from the empty-query reset and shows no spinner
    quiet_fetch: bool,
    loading_reference: bool,
}

impl BrowserState {
    fn fetch_request(&self) -> FetchRequest {
        if !self.search_term.is_empty() {
            FetchRequest::Search(self.search_term.clone())
        } else if let Some(area) = self.filters.active_area() {
            FetchRequest::Area(area.to_string())
        } else if let Some(ingredient) = self.filters.active_ingredient() {
            FetchRequest::Ingredient(ingredient.to_string())
        } else {
            FetchRequest::Category(self.selected_category.clone())
        }
    }

    fn mode(&self, default_category: &str) -> QueryMode {
        match self.fetch_request() {
            FetchRequest::Search(_) => QueryMode::Search,
            FetchRequest::Area(_) => QueryMode::Area,
            FetchRequest::Ingredient(_) => QueryMode::Ingredient,
            FetchRequest::Category(c) if c == default_category && self.filters.is_empty() => {
                QueryMode::Default
            }
            FetchRequest::Category(_) => QueryMode::Category,
        }
    }

    fn refilter(&mut self) {
        self.visible = self.filters.apply(&self.fetched);
    }

    fn cancel_pending_search(&mut self) {
        self.search_seq += 1;
        self.pending_search = false;
    }

    fn begin_fetch(&mut self) -> PendingFetch {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        self.quiet_fetch = false;
        PendingFetch {
            generation: self.generation,
            request: self.fetch_request(),
        }
    }

    /// Back to the default listing. Returns whether the query driver changed.
    fn reset_to_default(&mut self, default_category: &str) -> bool {
        let before = self.fetch_request();
        self.search_term.clear();
        self.selected_category = default_category.to_string();
        self.filters = RecipeFilters::default();
        self.refilter();
        before != self.fetch_request()
    }

    fn snapshot(&self, default_category: &str) -> BrowserSnapshot {
        BrowserSnapshot {
            categories: self.categories.clone(),
            areas: self.areas.clone(),
            ingredients: self.ingredients.clone(),
            selected_category: self.selected_category.clone(),
            recipes: self.visible.clone(),
            is_loading: self.pending_search
                || (self.in_flight.is_some() && !self.quiet_fetch)
                || self.loading_reference,
            error: self
                .fetch_error
                .clone()
                .or_else(|| self.reference_error.clone()),
            search_query: self.search_query.clone(),
            search_term: self.search_term.clone(),
            filters: self.filters.clone(),
            mode: self.mode(default_category),
        }
    }
}

struct Inner {
    api: Arc<dyn RecipeApi>,
    settings: Settings,
    state: Mutex<BrowserState>,
    debounce: Mutex<Option<JoinHandle<()>>>,
    updates: watch::Sender<BrowserSnapshot>,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, BrowserState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &BrowserState) {
        self.updates
            .send_replace(state.snapshot(&self.settings.default_category));
    }

    fn replace_timer(&self, timer: Option<JoinHandle<()>>) {
        let mut slot = self.debounce.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = std::mem::replace(&mut *slot, timer) {
            previous.abort();
        }
    }

    /// Run `fetch` on its own task so that dropping the caller's future
    /// cannot leave `in_flight` set
    fn spawn_fetch(self: &Arc<Self>, fetch: PendingFetch) -> JoinHandle<()> {
        let inner = Arc::clone(self);
        tokio::spawn(async move { inner.execute(fetch).await })
    }

    async fn run_fetch(self: &Arc<Self>, fetch: PendingFetch) {
        if let Err(e) = self.spawn_fetch(fetch).await {
            warn!("Recipe fetch task did not complete: {}", e);
        }
    }

    async fn execute(&self, fetch: PendingFetch) {
        debug!(
            "Fetching recipes (generation {}): {:?}",
            fetch.generation, fetch.request
        );

        let result = match &fetch.request {
            FetchRequest::Search(term) => self.api.search_recipes(term).await,
            FetchRequest::Area(area) => self.api.filter_by_area(area).await,
            FetchRequest::Ingredient(ingredient) => self.api.filter_by_ingredient(ingredient).await,
            FetchRequest::Category(category) => self.api.filter_by_category(category).await,
        };

        let mut state = self.state();
        if state.generation != fetch.generation {
            debug!(
                "Discarding stale result for generation {} (latest is {})",
                fetch.generation, state.generation
            );
            return;
        }

        state.in_flight = None;
        match result {
            Ok(recipes) => {
                info!("Loaded {} recipes for {:?}", recipes.len(), fetch.request);
                state.fetched = recipes;
                state.fetch_error = None;
                state.refilter();
            }
            Err(e) => {
                error!("Error loading recipes for {:?}: {}", fetch.request, e);
                state.fetch_error = Some(format!("Failed to load recipes: {}", e));
            }
        }
        self.publish(&state);
    }

    /// Debounce timer body: commit `term` once the quiet period has passed
    async fn commit_search(self: Arc<Self>, seq: u64, term: String) {
        tokio::time::sleep(self.settings.debounce).await;

        let fetch = {
            let mut state = self.state();
            if state.search_seq != seq {
                return;
            }
            state.pending_search = false;
            state.search_term = term;
            info!("Committed search term {:?}", state.search_term);
            let fetch = state.begin_fetch();
            self.publish(&state);
            fetch
        };

        // The fetch outlives the timer so that aborting a timer never strands `in_flight`
        self.spawn_fetch(fetch);
    }
}

/// Coordinator behind the recipe listing screen.
///
/// Dropping the browser cancels any pending search commit and discards the
/// results of fetches that are still in flight.
pub struct RecipeBrowser {
    inner: Arc<Inner>,
}

impl RecipeBrowser {
    /// Create a browser in the default state without issuing any request
    pub fn new(api: Arc<dyn RecipeApi>, config: &BrowserConfig) -> Self {
        let settings = Settings {
            debounce: config.debounce(),
            min_query_len: config.min_query_len.max(1),
            default_category: config.default_category.clone(),
        };

        let state = BrowserState {
            selected_category: settings.default_category.clone(),
            ..Default::default()
        };
        let (updates, _) = watch::channel(state.snapshot(&settings.default_category));

        Self {
            inner: Arc::new(Inner {
                api,
                settings,
                state: Mutex::new(state),
                debounce: Mutex::new(None),
                updates,
            }),
        }
    }

    /// Create a browser and load reference lists and the default listing
    pub async fn mount(api: Arc<dyn RecipeApi>, config: &BrowserConfig) -> Self {
        let browser = Self::new(api, config);
        tokio::join!(browser.load_reference_data(), browser.refresh());
        browser
    }

    pub fn snapshot(&self) -> BrowserSnapshot {
        self.inner.updates.borrow().clone()
    }

    /// Receiver notified after every state change
    pub fn subscribe(&self) -> watch::Receiver<BrowserSnapshot> {
        self.inner.updates.subscribe()
    }

    /// Load categories, areas and ingredients concurrently.
    ///
    /// Lists that load are stored even if another one fails.
    pub async fn load_reference_data(&self) {
        {
            let mut state = self.inner.state();
            state.loading_reference = true;
            self.inner.publish(&state);
        }

        let api = &self.inner.api;
        let (categories, areas, ingredients) = tokio::join!(
            api.list_categories(),
            api.list_areas(),
            api.list_ingredients()
        );

        let mut state = self.inner.state();
        let mut failures = Vec::new();
        match categories {
            Ok(categories) => state.categories = categories,
            Err(e) => {
                error!("Error loading categories: {}", e);
                failures.push("categories");
            }
        }
        match areas {
            Ok(areas) => state.areas = areas,
            Err(e) => {
                error!("Error loading areas: {}", e);
                failures.push("areas");
            }
        }
        match ingredients {
            Ok(ingredients) => state.ingredients = ingredients,
            Err(e) => {
                error!("Error loading ingredients: {}", e);
                failures.push("ingredients");
            }
        }
        state.reference_error = if failures.is_empty() {
            None
        } else {
            Some(format!("Failed to load {}", failures.join(", ")))
        };

        state.loading_reference = false;
        self.inner.publish(&state);
    }

    /// Switch to browsing `category`, clearing search and all filters
    pub async fn select_category(&self, category: &str) {
        let fetch = {
            let mut state = self.inner.state();
            state.cancel_pending_search();
            state.search_query.clear();
            state.search_term.clear();
            state.filters = RecipeFilters::default();
            state.selected_category = category.to_string();
            state.refilter();
            let fetch = state.begin_fetch();
            self.inner.publish(&state);
            fetch
        };
        self.inner.replace_timer(None);

        debug!("Selected category {}", category);
        self.inner.run_fetch(fetch).await;
    }

    /// Record typed search text.
    ///
    /// Blank text resets to the default listing immediately. Text shorter
    /// than the minimum length is recorded and cancels any pending commit,
    /// leaving the committed term alone. Anything longer (re)starts the
    /// debounce timer; only the last keystroke's timer can commit.
    ///
    /// # Panics
    /// Must be called from within a Tokio runtime.
    pub fn update_search(&self, text: &str) {
        let trimmed = text.trim();

        if trimmed.is_empty() {
            if let Some(fetch) = self.reset_search(text) {
                self.inner.spawn_fetch(fetch);
            }
            return;
        }

        let seq = {
            let mut state = self.inner.state();
            state.search_query = text.to_string();
            if trimmed.chars().count() < self.inner.settings.min_query_len {
                state.cancel_pending_search();
                self.inner.publish(&state);
                None
            } else {
                state.search_seq += 1;
                state.pending_search = true;
                self.inner.publish(&state);
                Some(state.search_seq)
            }
        };

        let Some(seq) = seq else {
            self.inner.replace_timer(None);
            return;
        };

        let inner = Arc::clone(&self.inner);
        let timer = tokio::spawn(inner.commit_search(seq, trimmed.to_string()));
        self.inner.replace_timer(Some(timer));
    }

    /// Clear the search box and return to the default listing
    pub async fn clear_search(&self) {
        if let Some(fetch) = self.reset_search("") {
            self.inner.run_fetch(fetch).await;
        }
    }

    fn reset_search(&self, text: &str) -> Option<PendingFetch> {
        self.inner.replace_timer(None);

        let mut state = self.inner.state();
        state.cancel_pending_search();
        state.search_query = text.to_string();
        let changed = state.reset_to_default(&self.inner.settings.default_category);
        let fetch = changed.then(|| {
            let fetch = state.begin_fetch();
            state.quiet_fetch = true;
            fetch
        });
        self.inner.publish(&state);
        fetch
    }

    /// Replace the active filter set.
    ///
    /// Setting an area or ingredient takes over from search, so the search
    /// text is cleared. A fetch is only issued when the server-side query
    /// changes; otherwise the current collection is filtered again in place.
    pub async fn update_filters(&self, filters: RecipeFilters) {
        let fetch = {
            let mut state = self.inner.state();
            let before = state.fetch_request();

            if filters.active_area().is_some() || filters.active_ingredient().is_some() {
                state.cancel_pending_search();
                state.search_query.clear();
                state.search_term.clear();
            }
            state.filters = filters;
            state.refilter();

            let fetch = (state.fetch_request() != before).then(|| state.begin_fetch());
            self.inner.publish(&state);
            fetch
        };

        if let Some(fetch) = fetch {
            self.inner.replace_timer(None);
            self.inner.run_fetch(fetch).await;
        }
    }

    /// Re-issue the fetch for the current query mode
    pub async fn refresh(&self) {
        let fetch = {
            let mut state = self.inner.state();
            let fetch = state.begin_fetch();
            self.inner.publish(&state);
            fetch
        };
        self.inner.run_fetch(fetch).await;
    }
}

impl Drop for RecipeBrowser {
    fn drop(&mut self) {
        self.inner.replace_timer(None);

        let mut state = self.inner.state();
        state.cancel_pending_search();
        // Invalidate anything still in flight
        state.generation += 1;
        state.in_flight = None;
        if state.loading_reference {
            warn!("Browser dropped while reference data was loading");
        }
    }
}
