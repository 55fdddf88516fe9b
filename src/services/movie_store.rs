//! Authoritative watchlist, reviews and provider-backed lookups.
//!
//! [`MovieStore`] owns the in-memory collections and publishes every change
//! through observables. Watchlist and review mutations are mirrored to local
//! storage right away. Provider lookups go through the TTL caches first; a
//! failed lookup never surfaces as an error to the caller, it returns an empty
//! result and publishes a message on the `error` observable instead.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::{
    cache::{search_key, TtlCache},
    error::{AppError, AppResult},
    models::{Movie, MovieReview},
    observable::{Observable, Subscription},
    services::providers::MetadataProvider,
    storage::LocalStorage,
};

pub const WATCHLIST_STORAGE_KEY: &str = "movieWatchlist";
pub const REVIEWS_STORAGE_KEY: &str = "movieReviews";

const LATEST_RELEASES_KEY: &str = "latest";

/// TTL and capacity shared by the search, details and latest-release caches
#[derive(Debug, Clone, Copy)]
pub struct CacheSettings {
    pub ttl: Duration,
    pub max_entries: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            max_entries: 100,
        }
    }
}

struct MovieCaches {
    search: TtlCache<String, Vec<Movie>>,
    details: TtlCache<u64, Movie>,
    latest: TtlCache<&'static str, Vec<Movie>>,
}

impl MovieCaches {
    fn new(settings: CacheSettings) -> Self {
        Self {
            search: TtlCache::new(settings.ttl, settings.max_entries),
            details: TtlCache::new(settings.ttl, settings.max_entries),
            latest: TtlCache::new(settings.ttl, 1),
        }
    }
}

pub struct MovieStore {
    provider: Arc<dyn MetadataProvider>,
    storage: Arc<dyn LocalStorage>,
    caches: Mutex<MovieCaches>,
    persist_lock: Mutex<()>,
    watchlist: Observable<Vec<Movie>>,
    reviews: Observable<Vec<MovieReview>>,
    movies: Observable<Vec<Movie>>,
    loading: Observable<bool>,
    error: Observable<Option<String>>,
}

impl MovieStore {
    /// Creates the store and loads the persisted watchlist and reviews
    ///
    /// Missing or malformed stored data starts the corresponding collection empty.
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        storage: Arc<dyn LocalStorage>,
        cache_settings: CacheSettings,
    ) -> Self {
        let watchlist: Vec<Movie> = load_collection(storage.as_ref(), WATCHLIST_STORAGE_KEY);
        let reviews: Vec<MovieReview> = load_collection(storage.as_ref(), REVIEWS_STORAGE_KEY);

        tracing::info!(
            provider = provider.name(),
            watchlist = watchlist.len(),
            reviews = reviews.len(),
            "Movie store initialized"
        );

        Self {
            provider,
            storage,
            caches: Mutex::new(MovieCaches::new(cache_settings)),
            persist_lock: Mutex::new(()),
            watchlist: Observable::new(watchlist),
            reviews: Observable::new(reviews),
            movies: Observable::new(Vec::new()),
            loading: Observable::new(false),
            error: Observable::new(None),
        }
    }

    // ------------------------------------------------------------------
    // Provider lookups
    // ------------------------------------------------------------------

    /// Searches titles, serving repeated queries from the search cache
    pub async fn search_movies(&self, query: &str) -> Vec<Movie> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let key = search_key(query);
        let cached = self.caches().search.get(&key);
        if let Some(movies) = cached {
            tracing::debug!(query = %key, results = movies.len(), "Search cache hit");
            return movies;
        }

        self.begin_request();
        match self.provider.search(query).await {
            Ok(movies) => {
                self.caches().search.insert(key, movies.clone());
                self.finish_request();
                movies
            }
            Err(e) => {
                self.fail_request("Failed to search movies", &e);
                Vec::new()
            }
        }
    }

    /// Recent releases; the list is also published on the `movies` observable
    pub async fn latest_movies(&self) -> Vec<Movie> {
        let cached = self.caches().latest.get(&LATEST_RELEASES_KEY);
        if let Some(movies) = cached {
            tracing::debug!(results = movies.len(), "Latest releases cache hit");
            self.movies.set(movies.clone());
            return movies;
        }

        self.begin_request();
        match self.provider.fetch_latest().await {
            Ok(movies) => {
                self.caches()
                    .latest
                    .insert(LATEST_RELEASES_KEY, movies.clone());
                self.movies.set(movies.clone());
                self.finish_request();
                movies
            }
            Err(e) => {
                self.fail_request("Failed to fetch latest movies", &e);
                Vec::new()
            }
        }
    }

    pub async fn movie_details(&self, movie_id: u64) -> Option<Movie> {
        let cached = self.caches().details.get(&movie_id);
        if cached.is_some() {
            tracing::debug!(movie_id, "Details cache hit");
            return cached;
        }

        self.begin_request();
        match self.provider.fetch_details(movie_id).await {
            Ok(Some(movie)) => {
                self.caches().details.insert(movie_id, movie.clone());
                self.finish_request();
                Some(movie)
            }
            Ok(None) => {
                self.finish_request();
                None
            }
            Err(e) => {
                self.fail_request("Failed to fetch movie details", &e);
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Watchlist
    // ------------------------------------------------------------------

    /// Adds a copy of `movie` to the watchlist unless its ID is already there
    pub fn add_to_watchlist(&self, movie: &Movie) {
        let entry = movie.as_watchlist_entry(Utc::now());
        let added = self.watchlist.update_if(|watchlist| {
            if watchlist.iter().any(|item| item.id == entry.id) {
                return false;
            }
            watchlist.push(entry);
            true
        });

        if added {
            tracing::info!(movie_id = movie.id, title = %movie.title, "Added to watchlist");
            self.persist();
        }
    }

    pub fn remove_from_watchlist(&self, movie_id: u64) {
        self.watchlist
            .update(|watchlist| watchlist.retain(|item| item.id != movie_id));
        tracing::info!(movie_id, "Removed from watchlist");
        self.persist();
    }

    pub fn is_in_watchlist(&self, movie_id: u64) -> bool {
        self.watchlist
            .with(|watchlist| watchlist.iter().any(|item| item.id == movie_id))
    }

    pub fn watchlist(&self) -> Vec<Movie> {
        self.watchlist.get()
    }

    // ------------------------------------------------------------------
    // Reviews
    // ------------------------------------------------------------------

    /// Stores `review`, replacing any earlier review of the same movie in place
    ///
    /// The creation timestamp is reset to now. The rating is stored as given.
    pub fn add_review(&self, review: MovieReview) -> MovieReview {
        let review = MovieReview {
            date_created: Utc::now(),
            ..review
        };

        let stored = review.clone();
        self.reviews.update(move |reviews| {
            match reviews.iter_mut().find(|r| r.movie_id == review.movie_id) {
                Some(existing) => *existing = review,
                None => reviews.push(review),
            }
        });

        tracing::info!(
            movie_id = stored.movie_id,
            rating = stored.rating,
            "Review saved"
        );
        self.persist();
        stored
    }

    pub fn review_for_movie(&self, movie_id: u64) -> Option<MovieReview> {
        self.reviews
            .with(|reviews| reviews.iter().find(|r| r.movie_id == movie_id).cloned())
    }

    pub fn reviews(&self) -> Vec<MovieReview> {
        self.reviews.get()
    }

    // ------------------------------------------------------------------
    // Loading / error signal
    // ------------------------------------------------------------------

    pub fn movies(&self) -> Vec<Movie> {
        self.movies.get()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn last_error(&self) -> Option<String> {
        self.error.get()
    }

    pub fn clear_error(&self) {
        self.error.set(None);
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    pub fn subscribe_watchlist<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Vec<Movie>) + Send + Sync + 'static,
    {
        self.watchlist.subscribe(listener)
    }

    pub fn subscribe_reviews<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Vec<MovieReview>) + Send + Sync + 'static,
    {
        self.reviews.subscribe(listener)
    }

    pub fn subscribe_movies<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Vec<Movie>) + Send + Sync + 'static,
    {
        self.movies.subscribe(listener)
    }

    pub fn subscribe_loading<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.loading.subscribe(listener)
    }

    pub fn subscribe_error<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Option<String>) + Send + Sync + 'static,
    {
        self.error.subscribe(listener)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn caches(&self) -> MutexGuard<'_, MovieCaches> {
        self.caches
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin_request(&self) {
        self.error.set(None);
        self.loading.set(true);
    }

    fn finish_request(&self) {
        self.loading.set(false);
    }

    fn fail_request(&self, context: &str, error: &AppError) {
        tracing::error!(
            error = %error,
            kind = ?error.failure_kind(),
            provider = self.provider.name(),
            "{}",
            context
        );
        self.error
            .set(Some(format!("{}: {}", context, error.user_message())));
        self.loading.set(false);
    }

    /// Writes both collections to local storage; failures are logged only
    fn persist(&self) {
        if let Err(e) = self.try_persist() {
            tracing::error!(error = %e, "Failed to persist watchlist and reviews");
        }
    }

    fn try_persist(&self) -> AppResult<()> {
        // Snapshot and write under one lock so the last write carries the newest state
        let _guard = self
            .persist_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let watchlist = self.watchlist.with(serde_json::to_string)?;
        let reviews = self.reviews.with(serde_json::to_string)?;
        self.storage.set_item(WATCHLIST_STORAGE_KEY, &watchlist)?;
        self.storage.set_item(REVIEWS_STORAGE_KEY, &reviews)?;
        Ok(())
    }
}

fn load_collection<T: DeserializeOwned>(storage: &dyn LocalStorage, key: &str) -> Vec<T> {
    let Some(raw) = storage.get_item(key) else {
        return Vec::new();
    };

    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, key, "Ignoring malformed stored data");
            Vec::new()
        }
    }
}
