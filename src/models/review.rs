use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's star rating and review text for one title
///
/// At most one review exists per `movie_id`; a newer submission replaces the
/// older one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieReview {
    pub movie_id: u64,
    /// Star rating, 1 through 5 when entered through the review form
    pub rating: u8,
    pub review_text: String,
    pub date_created: DateTime<Utc>,
}

impl MovieReview {
    pub fn new(movie_id: u64, rating: u8, review_text: impl Into<String>) -> Self {
        Self {
            movie_id,
            rating,
            review_text: review_text.into(),
            date_created: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_json_shape() {
        let review = MovieReview::new(42, 5, "Loved it");
        let json = serde_json::to_value(&review).unwrap();

        assert_eq!(json["movieId"], 42);
        assert_eq!(json["rating"], 5);
        assert_eq!(json["reviewText"], "Loved it");
        assert!(json["dateCreated"].is_string());
    }
}
