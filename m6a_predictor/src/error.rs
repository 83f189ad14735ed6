//! Error kinds raised by the prediction pipeline.
//!
//! Every kind aborts the whole call. Nothing is retried and no partial table
//! is returned.

use polars::prelude::PolarsError;
use thiserror::Error;

/// The input table does not carry the columns or values the model needs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("missing required feature column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("null or non-numeric value in column `{column}` at row {row}")]
    NullValue { column: String, row: usize },
}

/// The `DNA_5mer` batch cannot be split into positional columns.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodingError {
    #[error("cannot encode an empty batch of sequences")]
    EmptyBatch,

    #[error("empty sequence at row {row}")]
    EmptySequence { row: usize },

    #[error("sequence at row {row} has length {found}, expected {expected}")]
    LengthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid nucleotide '{symbol}' at row {row}, position {position}")]
    InvalidNucleotide {
        row: usize,
        position: usize,
        symbol: char,
    },
}

/// A categorical value outside the declared level set.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("value `{value}` in column `{column}` at row {row} is not a declared level")]
pub struct CategoricalDomainError {
    pub column: String,
    pub row: usize,
    pub value: String,
}

/// The external classifier refused the table or returned something unusable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    #[error("feature schema mismatch: classifier expects {expected}, table has {found}")]
    SchemaMismatch { expected: String, found: String },

    #[error("classifier returned {found} probabilities for {expected} rows")]
    RowCountMismatch { expected: usize, found: usize },

    #[error("classifier returned invalid probability {value} at row {row}")]
    InvalidProbability { row: usize, value: f64 },

    #[error("classifier invocation failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("positive threshold {0} is outside [0, 1]")]
    ThresholdOutOfRange(f64),
}

/// Top-level error returned by every pipeline entry point.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    CategoricalDomain(#[from] CategoricalDomainError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

pub type PipelineResult<T> = Result<T, PredictionError>;
