//! Loader for BEIR-style retrieval datasets: a JSONL corpus, JSONL queries
//! and per-split TSV relevance judgments.
//!
//! ```no_run
//! use beir_loader::GenericDataLoader;
//!
//! let mut loader = GenericDataLoader::new("datasets/scifact");
//! let (corpus, queries, qrels) = loader.load("test")?;
//! println!("{} docs, {} queries, {} judged", corpus.len(), queries.len(), qrels.len());
//! # Ok::<(), beir_loader::LoaderError>(())
//! ```

pub mod data;
pub mod error;

pub use data::filter::retain_judged;
pub use data::loader::{check, GenericDataLoader, LoaderConfig};
pub use data::model::{Corpus, Document, Qrels, Queries, Query};
pub use error::LoaderError;
