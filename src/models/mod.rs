use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the movie catalog
///
/// `row_index` is the movie's position in the similarity matrix and is
/// assigned at catalog load time. Records are immutable after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub movie_id: i64,
    pub title: String,
    #[serde(default)]
    pub row_index: usize,
}

/// A persisted user review
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReviewRecord {
    pub id: i64,
    pub user_id: i64,
    pub movie_id: i64,
    pub review_text: String,
    pub created_at: DateTime<Utc>,
}

/// A user account row
///
/// `password_hash` is a SHA-256 hex digest. The account store is an auth
/// collaborator only; no session state lives in this service.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Account fields safe to return to clients
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub id: i64,
    pub username: String,
    pub is_admin: bool,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            is_admin: account.is_admin,
        }
    }
}

/// Which branch the recommendation policy took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Positive critic sentiment: nearest neighbors from the similarity matrix
    Similar,
    /// Mixed or negative sentiment: random alternative suggestions
    Alternative,
}

/// Result of one recommendation request
///
/// `titles` and `posters` are parallel sequences of length exactly 5.
/// Ephemeral: callers own any per-session caching of this value.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResult {
    pub titles: Vec<String>,
    pub posters: Vec<String>,
    pub sentiment: f32,
    pub strategy: Strategy,
}

/// A movie rating on the 5-star scale
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieRating {
    /// TMDb's 10-point average halved
    pub average_out_of_5: f32,
    /// Star rendering, e.g. "⭐⭐⭐½", or "No Ratings"
    pub stars: String,
}

impl MovieRating {
    /// Converts a 10-point average into the 5-star rendering
    pub fn from_vote_average(vote_average: f64) -> Self {
        let out_of_5 = ((vote_average / 2.0) * 10.0).round() / 10.0;
        let full_stars = out_of_5.trunc() as usize;
        let half_star = if out_of_5 - out_of_5.trunc() >= 0.5 {
            "½"
        } else {
            ""
        };

        let stars = if out_of_5 > 0.0 {
            format!("{}{}", "⭐".repeat(full_stars), half_star)
        } else {
            "No Ratings".to_string()
        };

        Self {
            average_out_of_5: out_of_5 as f32,
            stars,
        }
    }
}

/// Enriched detail view for a single catalog movie
#[derive(Debug, Clone, Serialize)]
pub struct MovieDetail {
    pub movie_id: i64,
    pub title: String,
    pub rating: MovieRating,
    pub synopsis: String,
    pub poster: String,
}

// ============================================================================
// TMDb API Types
// ============================================================================

/// Raw movie details from GET /movie/{id}
///
/// Also the shape cached in Redis, hence the Serialize derive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbMovieDetails {
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_full_stars_only() {
        let rating = MovieRating::from_vote_average(8.4);
        assert_eq!(rating.average_out_of_5, 4.2);
        assert_eq!(rating.stars, "⭐⭐⭐⭐");
    }

    #[test]
    fn test_rating_half_star() {
        let rating = MovieRating::from_vote_average(7.0);
        assert_eq!(rating.average_out_of_5, 3.5);
        assert_eq!(rating.stars, "⭐⭐⭐½");
    }

    #[test]
    fn test_rating_zero_is_no_ratings() {
        let rating = MovieRating::from_vote_average(0.0);
        assert_eq!(rating.stars, "No Ratings");
    }

    #[test]
    fn test_rating_rounds_before_star_split() {
        // 6.9 / 2 = 3.45, rounds to 3.5: three full stars plus a half
        let rating = MovieRating::from_vote_average(6.9);
        assert_eq!(rating.average_out_of_5, 3.5);
        assert_eq!(rating.stars, "⭐⭐⭐½");
    }

    #[test]
    fn test_strategy_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Strategy::Similar).unwrap(),
            r#""similar""#
        );
        assert_eq!(
            serde_json::to_string(&Strategy::Alternative).unwrap(),
            r#""alternative""#
        );
    }

    #[test]
    fn test_tmdb_details_deserialize_with_missing_fields() {
        let details: TmdbMovieDetails = serde_json::from_str("{}").unwrap();
        assert_eq!(details.vote_average, 0.0);
        assert_eq!(details.poster_path, None);
        assert_eq!(details.overview, None);
    }

    #[test]
    fn test_account_summary_from_account() {
        let account = Account {
            id: 7,
            username: "casey".to_string(),
            password_hash: "abc".to_string(),
            is_admin: true,
        };
        let summary = AccountSummary::from(&account);
        assert_eq!(summary.id, 7);
        assert_eq!(summary.username, "casey");
        assert!(summary.is_admin);
    }
}
