/// Watchmode API provider
///
/// API Flow:
/// 1. Title Search: /autocomplete-search/ → id, name, type, year, image_url
/// 2. Latest: /releases/ → recent streaming releases with source release dates
/// 3. Details: /title/{watchmode_id}/details/ → full title record
use crate::{
    error::{AppError, AppResult},
    models::{
        Movie, WatchmodeReleasesResponse, WatchmodeSearchResponse, WatchmodeTitleDetails,
    },
    services::providers::MetadataProvider,
};
use reqwest::{Client as HttpClient, Response, StatusCode};
use serde::de::DeserializeOwned;

/// `search_type` value restricting autocomplete results to titles (no people)
const SEARCH_TYPE_TITLES: &str = "2";

#[derive(Clone)]
pub struct WatchmodeProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl WatchmodeProvider {
    /// Creates a provider against `api_url`, e.g. `https://api.watchmode.com/v1`
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }

    /// Rejects non-2xx responses, keeping the status for error classification
    async fn check_status(response: Response) -> AppResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::ExternalApi {
            status: status.as_u16(),
            body,
        })
    }

    async fn parse_body<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        let response_text = response.text().await?;
        tracing::debug!(response = %response_text, "Raw Watchmode API response");

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                response = %response_text,
                "Failed to deserialize Watchmode response"
            );
            AppError::Decode(e.to_string())
        })
    }
}

#[async_trait::async_trait]
impl MetadataProvider for WatchmodeProvider {
    async fn search(&self, query: &str) -> AppResult<Vec<Movie>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .http_client
            .get(self.endpoint("autocomplete-search/"))
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("search_value", query),
                ("search_type", SEARCH_TYPE_TITLES),
            ])
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let body: WatchmodeSearchResponse = Self::parse_body(response).await?;
        let movies: Vec<Movie> = body.results.into_iter().map(Movie::from).collect();

        tracing::info!(
            query = %query,
            results = movies.len(),
            provider = "watchmode",
            "Title search completed"
        );

        Ok(movies)
    }

    async fn fetch_latest(&self) -> AppResult<Vec<Movie>> {
        let response = self
            .http_client
            .get(self.endpoint("releases/"))
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let body: WatchmodeReleasesResponse = Self::parse_body(response).await?;
        let movies: Vec<Movie> = body.releases.into_iter().map(Movie::from).collect();

        tracing::info!(
            results = movies.len(),
            provider = "watchmode",
            "Latest releases fetched"
        );

        Ok(movies)
    }

    async fn fetch_details(&self, movie_id: u64) -> AppResult<Option<Movie>> {
        let response = self
            .http_client
            .get(self.endpoint(&format!("title/{}/details/", movie_id)))
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::info!(movie_id, provider = "watchmode", "Title not found");
            return Ok(None);
        }

        let response = Self::check_status(response).await?;
        let details: WatchmodeTitleDetails = Self::parse_body(response).await?;

        tracing::info!(
            movie_id,
            title = %details.title,
            provider = "watchmode",
            "Title details fetched"
        );

        Ok(Some(Movie::from(details)))
    }

    fn name(&self) -> &'static str {
        "watchmode"
    }
}
