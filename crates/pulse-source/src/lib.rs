//! Source loader: extracts the hand-authored metrics map from a JS/TS data file.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

pub mod literal;

pub use literal::Literal;

pub const CRATE_NAME: &str = "pulse-source";

/// Binding name used by the hand-authored data file.
pub const DEFAULT_BINDING: &str = "politicalDataMap";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("reading {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{origin}:{line}:{column}: {message}")]
    Syntax {
        origin: String,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("{origin}: no `{binding}` binding found")]
    MissingBinding { origin: String, binding: String },
    #[error("{origin}: {message}")]
    Shape { origin: String, message: String },
}

/// One raw entry exactly as authored; coercion happens during sync.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceEntry {
    pub date: Option<Literal>,
    pub left: Option<Literal>,
    pub right: Option<Literal>,
    pub posts: Option<Literal>,
    pub vibe: Option<Literal>,
    pub trending_politicians: Option<Literal>,
}

impl SourceEntry {
    fn from_members(members: &[(String, Literal)]) -> Self {
        let field = |name: &str| {
            members
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        };
        Self {
            date: field("date"),
            left: field("left"),
            right: field("right"),
            posts: field("posts"),
            vibe: field("vibe"),
            trending_politicians: field("trending_politicians"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubredditSeries {
    pub subreddit: String,
    pub entries: Vec<SourceEntry>,
}

/// Subreddit series in the order they were authored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceDataset {
    pub series: Vec<SubredditSeries>,
}

impl SourceDataset {
    pub fn subreddit_count(&self) -> usize {
        self.series.len()
    }

    pub fn entry_count(&self) -> usize {
        self.series.iter().map(|s| s.entries.len()).sum()
    }

    /// Every (subreddit, position, entry) triple, mapping order then list order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, usize, &SourceEntry)> {
        self.series.iter().flat_map(|series| {
            series
                .entries
                .iter()
                .enumerate()
                .map(move |(idx, entry)| (series.subreddit.as_str(), idx, entry))
        })
    }
}

pub fn load_dataset(path: impl AsRef<Path>, binding: &str) -> Result<SourceDataset, SourceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = parse_dataset(&text, binding, &path.display().to_string())?;
    debug!(
        path = %path.display(),
        subreddits = dataset.subreddit_count(),
        entries = dataset.entry_count(),
        "loaded source dataset"
    );
    Ok(dataset)
}

pub fn parse_dataset(text: &str, binding: &str, origin: &str) -> Result<SourceDataset, SourceError> {
    let value = literal::find_binding(text, binding)
        .map_err(|err| {
            let (line, column) = literal::line_column(text, err.offset);
            SourceError::Syntax {
                origin: origin.to_string(),
                line,
                column,
                message: err.message,
            }
        })?
        .ok_or_else(|| SourceError::MissingBinding {
            origin: origin.to_string(),
            binding: binding.to_string(),
        })?;
    dataset_from_literal(value, origin)
}

fn dataset_from_literal(value: Literal, origin: &str) -> Result<SourceDataset, SourceError> {
    let shape = |message: String| SourceError::Shape {
        origin: origin.to_string(),
        message,
    };

    let members = match value {
        Literal::Object(members) => members,
        other => {
            return Err(shape(format!(
                "expected an object keyed by subreddit, found {}",
                other.kind()
            )))
        }
    };

    let mut series = Vec::with_capacity(members.len());
    for (subreddit, list) in members {
        let items = match list {
            Literal::Array(items) => items,
            other => {
                return Err(shape(format!(
                    "`{subreddit}`: expected an array of entries, found {}",
                    other.kind()
                )))
            }
        };
        let mut entries = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            let Literal::Object(fields) = item else {
                return Err(shape(format!(
                    "`{subreddit}`[{idx}]: expected an entry object, found {}",
                    item.kind()
                )));
            };
            entries.push(SourceEntry::from_members(fields));
        }
        series.push(SubredditSeries { subreddit, entries });
    }
    Ok(SourceDataset { series })
}
