//! Joke dataset loading.
//!
//! The dataset is a UTF-8 text file with a header line followed by
//! `id|setup|punchline` rows:
//!
//! ```text
//! id|setup|punchline
//! 1|¿Qué le dice un jaguar a otro?|Jaguar you.
//! ```
//!
//! Blank lines are ignored, the header is skipped without inspection and any
//! row missing a setup or punchline is dropped. A dataset that ends up with
//! no usable rows is an error, never an empty collection.

use crate::models::Joke;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, instrument};

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("could not read dataset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("data unavailable: no valid jokes in {path}")]
    DataUnavailable { path: PathBuf },
}

/// A non-empty, immutable collection of jokes.
#[derive(Debug, Clone)]
pub struct JokeBook {
    jokes: Vec<Joke>,
}

impl JokeBook {
    /// Wrap parsed jokes; `None` when there are none.
    pub fn new(jokes: Vec<Joke>) -> Option<Self> {
        if jokes.is_empty() {
            None
        } else {
            Some(Self { jokes })
        }
    }

    pub fn len(&self) -> usize {
        self.jokes.len()
    }

    /// Uniformly pick one joke.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &Joke {
        // non-empty by construction
        self.jokes.choose(rng).unwrap_or(&self.jokes[0])
    }
}

/// Parse dataset text into jokes, dropping malformed rows.
pub fn parse_jokes(text: &str) -> Vec<Joke> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .skip(1)
        .filter_map(parse_row)
        .collect()
}

fn parse_row(line: &str) -> Option<Joke> {
    let mut fields = line.split('|');
    let id = fields.next().and_then(parse_id);
    let setup = fields.next().map(str::trim).unwrap_or_default();
    let punchline = fields.next().map(str::trim).unwrap_or_default();

    if setup.is_empty() || punchline.is_empty() {
        debug!(%line, "Dropping malformed joke row");
        return None;
    }

    Some(Joke {
        id,
        setup: setup.to_string(),
        punchline: punchline.to_string(),
    })
}

/// Leading decimal digits of the id column: `"12abc"` is 12, `"abc"` is none.
fn parse_id(field: &str) -> Option<u64> {
    let field = field.trim_start();
    let field = field.strip_prefix('+').unwrap_or(field);
    let end = field
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(field.len());
    field[..end].parse().ok()
}

/// Read and parse the dataset at `path`.
///
/// # Errors
///
/// - [`DatasetError::Read`] if the file cannot be read
/// - [`DatasetError::DataUnavailable`] if no valid rows remain
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub async fn load_jokes(path: impl AsRef<Path>) -> Result<JokeBook, DatasetError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .await
        .map_err(|source| DatasetError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let book = JokeBook::new(parse_jokes(&text)).ok_or_else(|| DatasetError::DataUnavailable {
        path: path.to_path_buf(),
    })?;

    info!(count = book.len(), "Loaded jokes");
    Ok(book)
}
