use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::error::{AppError, AppResult};
use crate::models::MovieRecord;

/// Errors raised while loading or validating the catalog artifacts
///
/// These abort process startup; the catalog is never served in a
/// partially-loaded state.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog artifact {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse catalog artifact {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("catalog artifact contains no movies")]
    Empty,

    #[error("similarity matrix has {rows} rows for {movies} movies")]
    RowCountMismatch { rows: usize, movies: usize },

    #[error("similarity matrix row {row} has {len} columns, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },
}

/// On-disk shape of the movie table artifact
#[derive(Debug, Deserialize)]
struct MovieTableArtifact {
    version: u32,
    movies: Vec<MovieEntry>,
}

#[derive(Debug, Deserialize)]
struct MovieEntry {
    movie_id: i64,
    title: String,
}

/// On-disk shape of the similarity matrix artifact
#[derive(Debug, Deserialize)]
struct SimilarityArtifact {
    version: u32,
    matrix: Vec<Vec<f32>>,
}

/// Read-only movie catalog plus its precomputed similarity matrix
///
/// Loaded once at startup and shared immutably across requests, so
/// concurrent readers need no locking. Title is the lookup key; if two
/// entries share a title the first occurrence in catalog order wins and a
/// warning is logged for the rest.
#[derive(Debug)]
pub struct CatalogStore {
    movies: Vec<MovieRecord>,
    by_title: HashMap<String, usize>,
    similarity: Vec<Vec<f32>>,
}

impl CatalogStore {
    /// Builds a catalog from in-memory parts, validating the matrix shape
    pub fn new(
        movies: Vec<(i64, String)>,
        similarity: Vec<Vec<f32>>,
    ) -> Result<Self, CatalogError> {
        if movies.is_empty() {
            return Err(CatalogError::Empty);
        }
        if similarity.len() != movies.len() {
            return Err(CatalogError::RowCountMismatch {
                rows: similarity.len(),
                movies: movies.len(),
            });
        }
        for (row, values) in similarity.iter().enumerate() {
            if values.len() != movies.len() {
                return Err(CatalogError::NotSquare {
                    row,
                    len: values.len(),
                    expected: movies.len(),
                });
            }
        }

        let movies: Vec<MovieRecord> = movies
            .into_iter()
            .enumerate()
            .map(|(row_index, (movie_id, title))| MovieRecord {
                movie_id,
                title,
                row_index,
            })
            .collect();

        let mut by_title: HashMap<String, usize> = HashMap::with_capacity(movies.len());
        for movie in &movies {
            match by_title.entry(movie.title.clone()) {
                std::collections::hash_map::Entry::Vacant(entry) => {
                    entry.insert(movie.row_index);
                }
                std::collections::hash_map::Entry::Occupied(_) => {
                    tracing::warn!(
                        title = %movie.title,
                        "Duplicate title in catalog; keeping first occurrence"
                    );
                }
            }
        }

        Ok(Self {
            movies,
            by_title,
            similarity,
        })
    }

    /// Loads the versioned (movie table, similarity matrix) artifact pair
    pub fn load(
        movies_path: impl AsRef<Path>,
        similarity_path: impl AsRef<Path>,
    ) -> Result<Self, CatalogError> {
        let table: MovieTableArtifact = read_artifact(movies_path.as_ref())?;
        let sim: SimilarityArtifact = read_artifact(similarity_path.as_ref())?;

        tracing::info!(
            movies = table.movies.len(),
            table_version = table.version,
            matrix_version = sim.version,
            "Loaded catalog artifacts"
        );

        Self::new(
            table
                .movies
                .into_iter()
                .map(|m| (m.movie_id, m.title))
                .collect(),
            sim.matrix,
        )
    }

    /// Number of movies in the catalog
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// All catalog titles, in catalog order
    pub fn titles(&self) -> Vec<String> {
        self.movies.iter().map(|m| m.title.clone()).collect()
    }

    /// The record at a given matrix row
    pub fn get(&self, row: usize) -> &MovieRecord {
        &self.movies[row]
    }

    /// Looks a movie up by its exact title
    pub fn lookup_by_title(&self, title: &str) -> AppResult<&MovieRecord> {
        self.by_title
            .get(title)
            .map(|&row| &self.movies[row])
            .ok_or_else(|| AppError::NotFound(format!("Movie not found: {}", title)))
    }

    /// The similarity-matrix row index for a title
    pub fn row_index_of(&self, title: &str) -> AppResult<usize> {
        self.lookup_by_title(title).map(|m| m.row_index)
    }

    /// Draws `n` distinct records uniformly at random, without replacement
    pub fn sample_random(&self, n: usize) -> Vec<MovieRecord> {
        let mut rng = rand::thread_rng();
        rand::seq::index::sample(&mut rng, self.movies.len(), n.min(self.movies.len()))
            .into_iter()
            .map(|i| self.movies[i].clone())
            .collect()
    }

    /// Nearest neighbors of a matrix row, best first
    ///
    /// Pairs each column with its similarity value and sorts descending by
    /// value; the sort is stable, so equal values keep ascending index
    /// order. The query row itself is excluded.
    pub fn neighbors(&self, row: usize, k: usize) -> Vec<usize> {
        let mut scored: Vec<(usize, f32)> = self.similarity[row]
            .iter()
            .copied()
            .enumerate()
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .filter(|&(i, _)| i != row)
            .map(|(i, _)| i)
            .take(k)
            .collect()
    }
}

fn read_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn six_movie_catalog() -> CatalogStore {
        let movies = vec![
            (101, "A".to_string()),
            (102, "B".to_string()),
            (103, "C".to_string()),
            (104, "D".to_string()),
            (105, "E".to_string()),
            (106, "F".to_string()),
        ];
        let similarity = vec![
            vec![1.0, 0.9, 0.9, 0.5, 0.1, 0.0],
            vec![0.9, 1.0, 0.3, 0.2, 0.1, 0.0],
            vec![0.9, 0.3, 1.0, 0.2, 0.1, 0.0],
            vec![0.5, 0.2, 0.2, 1.0, 0.1, 0.0],
            vec![0.1, 0.1, 0.1, 0.1, 1.0, 0.0],
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
        ];
        CatalogStore::new(movies, similarity).unwrap()
    }

    #[test]
    fn test_lookup_by_title_found() {
        let catalog = six_movie_catalog();
        let movie = catalog.lookup_by_title("C").unwrap();
        assert_eq!(movie.movie_id, 103);
        assert_eq!(movie.row_index, 2);
    }

    #[test]
    fn test_lookup_by_title_unknown_is_not_found() {
        let catalog = six_movie_catalog();
        let err = catalog.lookup_by_title("Unknown Title").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_row_index_of_delegates_to_lookup() {
        let catalog = six_movie_catalog();
        assert_eq!(catalog.row_index_of("F").unwrap(), 5);
    }

    #[test]
    fn test_neighbors_excludes_self_and_breaks_ties_by_index() {
        let catalog = six_movie_catalog();
        // Row A = [1.0, 0.9, 0.9, 0.5, 0.1, 0.0]; B and C tie at 0.9 and
        // B (lower index) must come first; A itself is excluded.
        assert_eq!(catalog.neighbors(0, 5), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_neighbors_deterministic_across_calls() {
        let catalog = six_movie_catalog();
        assert_eq!(catalog.neighbors(0, 5), catalog.neighbors(0, 5));
    }

    #[test]
    fn test_neighbors_truncates_to_k() {
        let catalog = six_movie_catalog();
        assert_eq!(catalog.neighbors(0, 2), vec![1, 2]);
    }

    #[test]
    fn test_sample_random_distinct() {
        let catalog = six_movie_catalog();
        let sample = catalog.sample_random(5);
        assert_eq!(sample.len(), 5);
        let ids: HashSet<i64> = sample.iter().map(|m| m.movie_id).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_sample_random_clamps_to_catalog_size() {
        let catalog = six_movie_catalog();
        assert_eq!(catalog.sample_random(10).len(), 6);
    }

    #[test]
    fn test_new_rejects_row_count_mismatch() {
        let movies = vec![(1, "A".to_string()), (2, "B".to_string())];
        let similarity = vec![vec![1.0, 0.0]];
        let err = CatalogStore::new(movies, similarity).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::RowCountMismatch { rows: 1, movies: 2 }
        ));
    }

    #[test]
    fn test_new_rejects_ragged_matrix() {
        let movies = vec![(1, "A".to_string()), (2, "B".to_string())];
        let similarity = vec![vec![1.0, 0.0], vec![0.0]];
        let err = CatalogStore::new(movies, similarity).unwrap_err();
        assert!(matches!(err, CatalogError::NotSquare { row: 1, .. }));
    }

    #[test]
    fn test_new_rejects_empty_catalog() {
        let err = CatalogStore::new(vec![], vec![]).unwrap_err();
        assert!(matches!(err, CatalogError::Empty));
    }

    #[test]
    fn test_duplicate_titles_first_occurrence_wins() {
        let movies = vec![
            (1, "Twin".to_string()),
            (2, "Twin".to_string()),
            (3, "Other".to_string()),
        ];
        let similarity = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ];
        let catalog = CatalogStore::new(movies, similarity).unwrap();
        assert_eq!(catalog.lookup_by_title("Twin").unwrap().movie_id, 1);
    }
}
