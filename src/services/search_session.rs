use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::{
    debounce::Debouncer,
    models::Movie,
    observable::{Observable, Subscription},
    services::MovieStore,
};

/// Idle time before typed search input is dispatched
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Search box state: debounced input feeding store searches
///
/// Typed text is coalesced by a [`Debouncer`]; each dispatched query runs
/// [`MovieStore::search_movies`] and the results land on this session's
/// `results` observable. Only the newest dispatched query may publish. Once the
/// session is dropped, searches still in flight finish but their results are
/// discarded.
pub struct SearchSession {
    results: Arc<Observable<Vec<Movie>>>,
    debouncer: Debouncer<String>,
}

impl SearchSession {
    /// Must be called from within a tokio runtime
    pub fn new(store: Arc<MovieStore>, debounce: Duration) -> Self {
        let results = Arc::new(Observable::new(Vec::new()));
        let target = Arc::downgrade(&results);
        let generation = Arc::new(AtomicU64::new(0));

        let debouncer = Debouncer::new(debounce, move |query: String| {
            let store = store.clone();
            let target = target.clone();
            let generation = generation.clone();
            let ticket = generation.fetch_add(1, Ordering::SeqCst) + 1;

            tokio::spawn(async move {
                let movies = store.search_movies(&query).await;

                if generation.load(Ordering::SeqCst) != ticket {
                    tracing::debug!(query = %query, "Superseded search result dropped");
                    return;
                }
                match target.upgrade() {
                    Some(results) => results.set(movies),
                    None => tracing::debug!(query = %query, "Search session closed, result dropped"),
                }
            });
        });

        Self { results, debouncer }
    }

    /// Feeds the current contents of the search box
    pub fn input(&self, text: impl Into<String>) {
        self.debouncer.push(text.into());
    }

    pub fn results(&self) -> Vec<Movie> {
        self.results.get()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Vec<Movie>) + Send + Sync + 'static,
    {
        self.results.subscribe(listener)
    }
}
