pub mod movie_store;
pub mod providers;
pub mod search_session;

pub use movie_store::{CacheSettings, MovieStore};
pub use providers::{MetadataProvider, WatchmodeProvider};
pub use search_session::{SearchSession, DEFAULT_SEARCH_DEBOUNCE};
