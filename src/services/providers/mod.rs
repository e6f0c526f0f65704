/// External data provider abstractions
///
/// The recommendation engine and the movie-detail endpoint talk to the
/// outside world only through these traits. Implementations absorb all
/// network variability: critic fetches degrade to a sentinel list, poster
/// and metadata lookups degrade to placeholders, and nothing here ever
/// surfaces a hard failure to a caller.
use crate::models::MovieRating;

pub mod rotten_tomatoes;
pub mod tmdb;

pub use rotten_tomatoes::RottenTomatoesProvider;
pub use tmdb::TmdbProvider;

/// Poster reference returned when no real poster can be resolved
pub const PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/500x750?text=No+Image";

/// Synopsis text returned when no overview can be resolved
pub const PLACEHOLDER_SYNOPSIS: &str = "Synopsis not available.";

/// Source of critic-review text snippets
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CriticReviewProvider: Send + Sync {
    /// Up to 5 critic-review snippets for a title
    ///
    /// Infallible by contract. A fetch failure yields a single-element list
    /// whose entry carries the `Error` sentinel marker; a reachable page
    /// with no reviews yields `["No reviews available."]`.
    async fn fetch_reviews(&self, title: &str) -> Vec<String>;
}

/// Source of poster references
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterProvider: Send + Sync {
    /// A poster URL for a movie id; the placeholder on any failure
    async fn fetch_poster_ref(&self, movie_id: i64) -> String;
}

/// Source of per-movie metadata (rating, synopsis)
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// The movie's 5-star rating; `No Ratings` on any failure
    async fn fetch_rating(&self, movie_id: i64) -> MovieRating;

    /// The movie's synopsis; placeholder text on any failure
    async fn fetch_synopsis(&self, movie_id: i64) -> String;
}
