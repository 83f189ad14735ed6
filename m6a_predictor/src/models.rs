use std::fmt;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{
    DISTANCE_TO_JUNCTION, DNA_5MER, EVOLUTIONARY_CONSERVATION, EXON_LENGTH, GC_CONTENT, RNA_REGION, RNA_TYPE,
};

/// One observation to be scored.
///
/// Categorical fields are kept as raw strings; they are validated against the
/// closed level sets when the feature table is assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub gc_content: f64,
    #[serde(rename = "RNA_type")]
    pub rna_type: String,
    #[serde(rename = "RNA_region")]
    pub rna_region: String,
    pub exon_length: u32,
    pub distance_to_junction: f64,
    pub evolutionary_conservation: f64,
    #[serde(rename = "DNA_5mer")]
    pub dna_5mer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredictionStatus {
    Positive,
    Negative,
}

impl PredictionStatus {
    /// Inclusive threshold: `probability >= threshold` is Positive.
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        if probability >= threshold {
            PredictionStatus::Positive
        } else {
            PredictionStatus::Negative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionStatus::Positive => "Positive",
            PredictionStatus::Negative => "Negative",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Positive" => Some(PredictionStatus::Positive),
            "Negative" => Some(PredictionStatus::Negative),
            _ => None,
        }
    }
}

impl fmt::Display for PredictionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model output for one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(rename = "predicted_m6A_prob")]
    pub probability: f64,
    #[serde(rename = "predicted_m6A_status")]
    pub status: PredictionStatus,
}

impl PredictionResult {
    pub fn new(probability: f64, threshold: f64) -> Self {
        Self {
            probability,
            status: PredictionStatus::from_probability(probability, threshold),
        }
    }
}

/// Build an input table with the seven required columns, one row per record.
pub fn records_to_frame(records: &[FeatureRecord]) -> PolarsResult<DataFrame> {
    let f64_col = |name: &str, get: fn(&FeatureRecord) -> f64| {
        Column::new(PlSmallStr::from(name), records.iter().map(get).collect::<Vec<f64>>())
    };
    let str_col = |name: &str, get: fn(&FeatureRecord) -> &str| {
        Column::new(PlSmallStr::from(name), records.iter().map(get).collect::<Vec<&str>>())
    };

    DataFrame::new(vec![
        f64_col(GC_CONTENT, |r| r.gc_content),
        str_col(RNA_TYPE, |r| r.rna_type.as_str()),
        str_col(RNA_REGION, |r| r.rna_region.as_str()),
        Column::new(
            PlSmallStr::from(EXON_LENGTH),
            records.iter().map(|r| r.exon_length).collect::<Vec<u32>>(),
        ),
        f64_col(DISTANCE_TO_JUNCTION, |r| r.distance_to_junction),
        f64_col(EVOLUTIONARY_CONSERVATION, |r| r.evolutionary_conservation),
        str_col(DNA_5MER, |r| r.dna_5mer.as_str()),
    ])
}
