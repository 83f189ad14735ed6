//! Feature encoding and batch prediction for an m6A RNA-modification classifier.
//!
//! Input rows carry GC content, RNA type and region, exon length, distance to
//! the nearest junction, conservation and a DNA 5-mer. They are validated,
//! encoded into the fixed feature schema the model was trained on, scored by
//! a [`Classifier`], and labelled Positive/Negative against a threshold.
//!
//! ```no_run
//! use m6a_predictor::{predict_one, FeatureSchema, LogisticClassifier, PredictionConfig};
//!
//! let schema = FeatureSchema::m6a();
//! let model = LogisticClassifier::new(schema, 0.0, vec![0.0; schema.design_width()])?;
//! let result = predict_one(&model, 0.6, "mRNA", "CDS", 12, 5.0, 0.8, "ATCGA", &PredictionConfig::default())?;
//! println!("{} ({:.3})", result.status, result.probability);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod classifier;
pub mod config;
pub mod encoder;
pub mod error;
pub mod helper_functions;
pub mod models;
pub mod pipeline;
pub mod schema;
pub mod table;

pub use classifier::{Classifier, LogisticClassifier};
pub use config::{CategoricalPolicy, PredictionConfig};
pub use encoder::{encode, EncodedPositionSet};
pub use error::{
    CategoricalDomainError, ClassifierError, ConfigError, EncodingError, PipelineResult, PredictionError, SchemaError,
};
pub use models::{FeatureRecord, PredictionResult, PredictionStatus};
pub use pipeline::{predict_batch, predict_one, predict_records, summarize_predictions, PredictionSummary};
pub use schema::{FeatureSchema, Level, Nucleotide, RnaRegion, RnaType};
pub use table::{FeatureRow, FeatureTable};
