/// Movie metadata provider abstraction
///
/// The store talks to the metadata source only through [`MetadataProvider`], so
/// the Watchmode client can be swapped for a stub in tests.
use crate::{error::AppResult, models::Movie};

pub mod watchmode;

pub use watchmode::WatchmodeProvider;

/// Read-only access to a third-party movie/TV metadata API
///
/// Implementations normalize every response shape into [`Movie`] and report
/// transport or non-2xx failures as [`crate::error::AppError`]. They do not
/// cache and do not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Free-text title search
    ///
    /// A blank query returns an empty list without touching the network.
    async fn search(&self, query: &str) -> AppResult<Vec<Movie>>;

    /// Titles recently released on streaming sources
    async fn fetch_latest(&self) -> AppResult<Vec<Movie>>;

    /// Full record for one title, `None` if the provider does not know the ID
    async fn fetch_details(&self, movie_id: u64) -> AppResult<Option<Movie>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
