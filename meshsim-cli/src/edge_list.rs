//! Edge list file loading.
//!
//! The on-disk format is one link per line: two whitespace-separated node
//! ids. Parsing is fail-fast with one-based line numbers, so malformed input
//! aborts the run before any cycle starts. Blank lines are rejected rather
//! than skipped; an edge list with holes usually means a truncated copy.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{Span, field, instrument};

/// Errors raised while loading an edge list file.
#[derive(Debug, Error)]
pub enum EdgeListError {
    /// Reading the file failed.
    #[error("failed to read edge list `{path}`: {source}")]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// A line did not hold exactly two tokens.
    #[error("{path}:{line}: expected two node ids, found {found}")]
    TokenCount {
        /// Path of the offending file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Number of whitespace-separated tokens found.
        found: usize,
    },
    /// A token could not be parsed as a node id.
    #[error("{path}:{line}: invalid node id `{token}`")]
    InvalidNodeId {
        /// Path of the offending file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Token that failed to parse.
        token: String,
    },
}

/// Loads an edge list, returning endpoint id pairs in file order.
///
/// Node ids are kept as raw integers here; range and self-loop validation
/// happens when the simulation is built, where the node count is known.
///
/// # Errors
/// Returns [`EdgeListError`] when the file cannot be read or a line is
/// malformed.
#[instrument(
    name = "cli.load_edge_list",
    err,
    fields(path = field::Empty, edges = field::Empty)
)]
pub fn load(path: &Path) -> Result<Vec<(u32, u32)>, EdgeListError> {
    let span = Span::current();
    span.record("path", field::display(path.display()));

    let file = File::open(path).map_err(|source| EdgeListError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut edges = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| EdgeListError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        edges.push(parse_line(path, index + 1, &line)?);
    }

    span.record("edges", edges.len());
    Ok(edges)
}

fn parse_line(path: &Path, line: usize, raw: &str) -> Result<(u32, u32), EdgeListError> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let [a, b] = tokens.as_slice() else {
        return Err(EdgeListError::TokenCount {
            path: path.to_path_buf(),
            line,
            found: tokens.len(),
        });
    };
    Ok((parse_token(path, line, a)?, parse_token(path, line, b)?))
}

fn parse_token(path: &Path, line: usize, token: &str) -> Result<u32, EdgeListError> {
    token.parse().map_err(|_| EdgeListError::InvalidNodeId {
        path: path.to_path_buf(),
        line,
        token: token.to_owned(),
    })
}
