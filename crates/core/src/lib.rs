//! Core library: scanning bible files, extracting metadata, classifying,
//! deduplicating and writing the `index.json` manifest.

pub mod classifier;
pub mod config;
pub mod error;
pub mod extractor;
pub mod indexer;
pub mod models;
pub mod pipeline;
pub mod scanner;
pub mod writer;

pub use error::{IndexError, Result};
pub use models::{BibleRecord, IndexSchema};
