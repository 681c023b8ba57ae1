use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use super::filter::retain_judged;
use super::model::{Corpus, Document, Qrels, Queries, Query};
use crate::error::{LoaderError, Result};

pub const DEFAULT_CORPUS_FILE: &str = "corpus.jsonl";
pub const DEFAULT_QUERY_FILE: &str = "queries.jsonl";
pub const DEFAULT_QRELS_FOLDER: &str = "qrels";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// File layout of a dataset on disk.
///
/// ```text
/// <data_folder>/
/// ├── corpus.jsonl
/// ├── [<prefix>-]queries.jsonl
/// └── [<prefix>-]qrels/
///     └── <split>.tsv
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Base directory. When `None`, file names are used as given.
    pub data_folder: Option<PathBuf>,
    /// Prepended, with a hyphen, to the query file name and qrels folder.
    pub prefix: Option<String>,
    pub corpus_file: String,
    pub query_file: String,
    pub qrels_folder: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_folder: None,
            prefix: None,
            corpus_file: DEFAULT_CORPUS_FILE.to_string(),
            query_file: DEFAULT_QUERY_FILE.to_string(),
            qrels_folder: DEFAULT_QRELS_FOLDER.to_string(),
        }
    }
}

impl LoaderConfig {
    pub fn with_data_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.data_folder = Some(folder.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_corpus_file(mut self, name: impl Into<String>) -> Self {
        self.corpus_file = name.into();
        self
    }

    pub fn with_query_file(mut self, name: impl Into<String>) -> Self {
        self.query_file = name.into();
        self
    }

    pub fn with_qrels_folder(mut self, name: impl Into<String>) -> Self {
        self.qrels_folder = name.into();
        self
    }

    fn resolve(&self, name: &str) -> PathBuf {
        match &self.data_folder {
            Some(folder) => folder.join(name),
            None => PathBuf::from(name),
        }
    }
}

// ---------------------------------------------------------------------------
// File validation
// ---------------------------------------------------------------------------

/// Fail unless `path` exists and ends with the extension `ext`
/// (given with or without the leading dot).
pub fn check(path: &Path, ext: &str) -> Result<()> {
    if !path.exists() {
        return Err(LoaderError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let expected = ext.trim_start_matches('.');
    let actual = path.extension().and_then(|e| e.to_str());
    if actual != Some(expected) {
        return Err(LoaderError::InvalidExtension {
            path: path.to_path_buf(),
            expected: expected.to_string(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// GenericDataLoader
// ---------------------------------------------------------------------------

/// Loads a corpus, its queries and the qrels of one split.
///
/// Each collection is read at most once per loader. Calling [`load`] again
/// with the same split hands back the collections already in memory.
///
/// [`load`]: GenericDataLoader::load
#[derive(Debug)]
pub struct GenericDataLoader {
    corpus_file: PathBuf,
    query_file: PathBuf,
    qrels_folder: PathBuf,
    qrels_file: Option<PathBuf>,

    corpus: Corpus,
    queries: Queries,
    qrels: Qrels,

    corpus_loaded: bool,
    queries_loaded: bool,
    /// Split whose qrels were last applied to `queries`.
    loaded_split: Option<String>,
}

impl GenericDataLoader {
    /// Loader for the default file layout under `data_folder`.
    pub fn new(data_folder: impl Into<PathBuf>) -> Self {
        Self::from_config(LoaderConfig::default().with_data_folder(data_folder))
    }

    pub fn from_config(config: LoaderConfig) -> Self {
        let (query_file, qrels_folder) = match config.prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => (
                format!("{prefix}-{}", config.query_file),
                format!("{prefix}-{}", config.qrels_folder),
            ),
            _ => (config.query_file.clone(), config.qrels_folder.clone()),
        };

        Self {
            corpus_file: config.resolve(&config.corpus_file),
            query_file: config.resolve(&query_file),
            qrels_folder: config.resolve(&qrels_folder),
            qrels_file: None,
            corpus: Corpus::new(),
            queries: Queries::new(),
            qrels: Qrels::new(),
            corpus_loaded: false,
            queries_loaded: false,
            loaded_split: None,
        }
    }

    pub fn corpus_file(&self) -> &Path {
        &self.corpus_file
    }

    pub fn query_file(&self) -> &Path {
        &self.query_file
    }

    pub fn qrels_folder(&self) -> &Path {
        &self.qrels_folder
    }

    /// Qrels path of the last successful [`load`](Self::load).
    pub fn qrels_file(&self) -> Option<&Path> {
        self.qrels_file.as_deref()
    }

    /// Load corpus, queries and the qrels of `split`.
    ///
    /// When `<qrels_folder>/<split>.tsv` does not exist the queries are
    /// returned unfiltered together with empty qrels.
    pub fn load(&mut self, split: &str) -> Result<(&Corpus, &Queries, &Qrels)> {
        let qrels_file = self.qrels_folder.join(format!("{split}.tsv"));
        check(&self.corpus_file, "jsonl")?;
        check(&self.query_file, "jsonl")?;

        match self.loaded_split.take() {
            Some(loaded) if loaded == split => {
                debug!("Split {split} already loaded, reusing collections");
                self.loaded_split = Some(loaded);
                return Ok((&self.corpus, &self.queries, &self.qrels));
            }
            Some(loaded) => {
                // The query filter belongs to the previous split.
                debug!("Switching split {loaded} -> {split}, reloading queries");
                self.queries = Queries::new();
                self.queries_loaded = false;
                self.qrels = Qrels::new();
            }
            None => {}
        }
        // `loaded_split` stays `None` until every step below has succeeded.

        if !self.corpus_loaded {
            self.read_corpus()?;
            info!(
                "Loaded {} {} Documents.",
                self.corpus.len(),
                split.to_uppercase()
            );
            if let Some(doc) = self.corpus.values().next() {
                info!("Doc Example: {doc}");
            }
        }

        if !self.queries_loaded {
            info!("Loading Queries...");
            self.queries = load_queries_file(&self.query_file)?;
            self.queries_loaded = true;
        }

        if qrels_file.exists() {
            check(&qrels_file, "tsv")?;
            self.qrels = load_qrels_file(&qrels_file)?;
            let removed = retain_judged(&mut self.queries, &self.qrels);
            debug!("Dropped {removed} queries without judgments");
            info!(
                "Loaded {} {} Queries.",
                self.queries.len(),
                split.to_uppercase()
            );
            if let Some(query) = self.queries.values().next() {
                info!("Query Example: {query}");
            }
        } else {
            warn!(
                "No qrels at {}, keeping all {} queries",
                qrels_file.display(),
                self.queries.len()
            );
        }

        self.qrels_file = Some(qrels_file);
        self.loaded_split = Some(split.to_string());
        Ok((&self.corpus, &self.queries, &self.qrels))
    }

    /// Load only the corpus.
    pub fn load_corpus(&mut self) -> Result<&Corpus> {
        check(&self.corpus_file, "jsonl")?;

        if !self.corpus_loaded {
            self.read_corpus()?;
            info!("Loaded {} Documents.", self.corpus.len());
            if let Some(doc) = self.corpus.values().next() {
                info!("Doc Example: {doc}");
            }
        }
        Ok(&self.corpus)
    }

    /// Hand the loaded collections over to the caller.
    pub fn into_parts(self) -> (Corpus, Queries, Qrels) {
        (self.corpus, self.queries, self.qrels)
    }

    fn read_corpus(&mut self) -> Result<()> {
        info!("Loading Corpus...");
        self.corpus = load_corpus_file(&self.corpus_file)?;
        self.corpus_loaded = true;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSONL parsing
// ---------------------------------------------------------------------------

/// Parse a corpus file: one `{"_id", "title", "text"}` object per line.
pub fn load_corpus_file(path: &Path) -> Result<Corpus> {
    let mut corpus = Corpus::new();
    read_jsonl(path, |doc: Document| {
        corpus.insert(doc.id.clone(), doc);
    })?;
    Ok(corpus)
}

/// Parse a query file: one `{"_id", "text"}` object per line.
pub fn load_queries_file(path: &Path) -> Result<Queries> {
    let mut queries = Queries::new();
    read_jsonl(path, |query: Query| {
        queries.insert(query.id.clone(), query);
    })?;
    Ok(queries)
}

fn read_jsonl<T, F>(path: &Path, mut sink: F) -> Result<()>
where
    T: DeserializeOwned,
    F: FnMut(T),
{
    let io_err = |source: std::io::Error| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(io_err)?);

    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(io_err)?;
        let line = if i == 0 {
            line.trim_start_matches('\u{feff}')
        } else {
            line.as_str()
        };
        if line.trim().is_empty() {
            continue;
        }
        let record: T = serde_json::from_str(line).map_err(|source| LoaderError::Json {
            path: path.to_path_buf(),
            line: i + 1,
            source,
        })?;
        sink(record);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Qrels parsing
// ---------------------------------------------------------------------------

/// Column positions of query id, doc id and score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QrelsColumns {
    query: usize,
    doc: usize,
    score: usize,
}

impl QrelsColumns {
    const POSITIONAL: Self = Self {
        query: 0,
        doc: 1,
        score: 2,
    };

    /// Locate the columns by header name, ignoring case, order, and
    /// `_` vs `-`. Falls back to positional order if any name is unknown.
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| h.trim().to_ascii_lowercase().replace('_', "-"))
            .collect();
        let find = |names: &[&str]| normalized.iter().position(|h| names.contains(&h.as_str()));

        match (
            find(&["query-id", "qid"]),
            find(&["corpus-id", "doc-id", "docid"]),
            find(&["score", "relevance"]),
        ) {
            (Some(query), Some(doc), Some(score)) => Self { query, doc, score },
            _ => {
                warn!("Unrecognised qrels header {headers:?}, reading columns by position");
                Self::POSITIONAL
            }
        }
    }

    fn width(&self) -> usize {
        self.query.max(self.doc).max(self.score) + 1
    }
}

/// Parse a qrels file: header row, then `query-id<TAB>corpus-id<TAB>score`.
pub fn load_qrels_file(path: &Path) -> Result<Qrels> {
    let csv_err = |source: csv::Error| LoaderError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let columns = QrelsColumns::from_headers(reader.headers().map_err(csv_err)?);
    let width = columns.width();
    let mut qrels = Qrels::new();

    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let line = record.position().map_or(0, |p| p.line());
        if record.len() < width {
            return Err(LoaderError::ShortRow {
                path: path.to_path_buf(),
                line,
                expected: width,
                found: record.len(),
            });
        }

        let raw_score = &record[columns.score];
        let score = raw_score
            .trim()
            .parse::<i32>()
            .map_err(|_| LoaderError::InvalidScore {
                path: path.to_path_buf(),
                line,
                value: raw_score.to_string(),
            })?;
        qrels.insert(&record[columns.query], &record[columns.doc], score);
    }

    debug!(
        "Parsed {} judgments for {} queries from {}",
        qrels.num_judgments(),
        qrels.len(),
        path.display()
    );
    Ok(qrels)
}
