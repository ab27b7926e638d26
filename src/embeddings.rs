//! fastText word vectors
//!
//! Reads the textual `.vec` format: a header line `<vocab> <dim>` followed by
//! one line per word, `word v1 v2 ... vdim`. Lines that do not carry exactly
//! `dim` numbers are skipped, and invalid UTF-8 is replaced rather than
//! rejected, so a partly damaged file still loads.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

/// Upper bound on the map preallocation taken from the header's vocabulary size
const MAX_CAPACITY_HINT: usize = 1 << 20;

/// Error loading an embedding file
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// First line is not `<vocab> <dim>`
    #[error("invalid header '{0}', expected '<vocab size> <dimension>'")]
    InvalidHeader(String),
    #[error("embedding file is empty")]
    Empty,
}

/// Word → vector lookup table.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingTable {
    dim: usize,
    declared_vocab: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl EmbeddingTable {
    /// Build a table from in-memory vectors; every vector must have `dim` entries.
    pub fn from_vectors(dim: usize, vectors: impl IntoIterator<Item = (String, Vec<f32>)>) -> Self {
        let vectors: HashMap<_, _> = vectors.into_iter().filter(|(_, v)| v.len() == dim).collect();
        Self { dim, declared_vocab: vectors.len(), vectors }
    }

    /// Load a `.vec` file.
    pub fn load(path: &Path) -> Result<Self, EmbeddingError> {
        let file = File::open(path).map_err(|e| EmbeddingError::Io { path: path.to_path_buf(), source: e })?;
        let table = Self::from_reader(BufReader::new(file)).map_err(|e| match e {
            EmbeddingError::Io { source, .. } => EmbeddingError::Io { path: path.to_path_buf(), source },
            other => other,
        })?;
        info!(
            path = %path.display(),
            words = table.len(),
            dim = table.dim(),
            "loaded embeddings"
        );
        Ok(table)
    }

    /// Parse the `.vec` format from any buffered reader.
    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, EmbeddingError> {
        let io_err = |source: std::io::Error| EmbeddingError::Io { path: PathBuf::new(), source };

        let mut buf = Vec::new();
        if reader.read_until(b'\n', &mut buf).map_err(io_err)? == 0 {
            return Err(EmbeddingError::Empty);
        }
        let header = String::from_utf8_lossy(&buf).trim().to_string();
        let (declared_vocab, dim) = parse_header(&header)?;

        let mut vectors = HashMap::with_capacity(declared_vocab.min(MAX_CAPACITY_HINT));
        let mut skipped = 0usize;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).map_err(io_err)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            match parse_line(line.trim_end(), dim) {
                Some((word, vector)) => {
                    vectors.insert(word, vector);
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!(skipped, "skipped malformed embedding lines");
        }

        Ok(Self { dim, declared_vocab, vectors })
    }

    /// Vector for a word, if known.
    pub fn get(&self, word: &str) -> Option<&[f32]> {
        self.vectors.get(word).map(Vec::as_slice)
    }

    /// Vector dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of words actually loaded.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Vocabulary size announced by the header.
    pub fn declared_vocab(&self) -> usize {
        self.declared_vocab
    }
}

fn parse_header(header: &str) -> Result<(usize, usize), EmbeddingError> {
    let mut parts = header.split_whitespace();
    let parsed = match (parts.next(), parts.next(), parts.next()) {
        (Some(n), Some(d), None) => n.parse::<usize>().ok().zip(d.parse::<usize>().ok()),
        _ => None,
    };
    match parsed {
        Some((n, d)) if d > 0 => Ok((n, d)),
        _ => Err(EmbeddingError::InvalidHeader(header.to_string())),
    }
}

fn parse_line(line: &str, dim: usize) -> Option<(String, Vec<f32>)> {
    let mut parts = line.split(' ');
    let word = parts.next().filter(|w| !w.is_empty())?;
    let vector = parts
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<f32>().ok())
        .collect::<Option<Vec<f32>>>()?;
    (vector.len() == dim).then(|| (word.to_string(), vector))
}
