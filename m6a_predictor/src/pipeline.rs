//! pipeline.rs – batch and single-observation m6A prediction.
//!
//! `predict_batch` is the only place that validates, assembles, invokes the
//! classifier and labels; the record and single-observation entry points
//! route through it.

use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::classifier::{ensure_conforms, validate_probabilities, Classifier};
use crate::config::PredictionConfig;
use crate::error::{ClassifierError, PipelineResult};
use crate::models::{records_to_frame, FeatureRecord, PredictionResult, PredictionStatus};
use crate::schema::{PROB_COLUMN, STATUS_COLUMN};
use crate::table::assemble_feature_table;

/// Positive/Negative counts of a scored table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PredictionSummary {
    pub positive: usize,
    pub negative: usize,
}

/// Score every row of `df` and return it with `predicted_m6A_prob` and
/// `predicted_m6A_status` appended.
///
/// # Arguments
///
/// * `model` - trained classifier; its schema must match the assembled table
/// * `df` - input table with the seven required feature columns (extra columns are carried through)
/// * `config` - positive threshold and categorical policy
///
/// # Errors
///
/// Schema, encoding, categorical-domain and classifier errors abort the whole
/// call; no partial table is returned.
pub fn predict_batch<M: Classifier + ?Sized>(
    model: &M,
    df: &DataFrame,
    config: &PredictionConfig,
) -> PipelineResult<DataFrame> {
    info!("Running m6A prediction on {} rows", df.height());

    let results = score_frame(model, df, config)?;
    let scored = merge_predictions(df, &results)?;

    let summary = summarize_predictions(&scored)?;
    info!(
        "Predicted {} Positive / {} Negative at threshold {}",
        summary.positive, summary.negative, config.positive_threshold
    );
    Ok(scored)
}

/// Score typed records, pairing each with its result in input order.
pub fn predict_records<M: Classifier + ?Sized>(
    model: &M,
    records: &[FeatureRecord],
    config: &PredictionConfig,
) -> PipelineResult<Vec<(FeatureRecord, PredictionResult)>> {
    let frame = records_to_frame(records)?;
    let scored = predict_batch(model, &frame, config)?;
    let results = extract_results(&scored)?;

    Ok(records.iter().cloned().zip(results).collect())
}

/// Score a single observation given as individual feature values.
#[allow(clippy::too_many_arguments)]
pub fn predict_one<M: Classifier + ?Sized>(
    model: &M,
    gc_content: f64,
    rna_type: &str,
    rna_region: &str,
    exon_length: u32,
    distance_to_junction: f64,
    evolutionary_conservation: f64,
    dna_5mer: &str,
    config: &PredictionConfig,
) -> PipelineResult<PredictionResult> {
    let record = FeatureRecord {
        gc_content,
        rna_type: rna_type.to_string(),
        rna_region: rna_region.to_string(),
        exon_length,
        distance_to_junction,
        evolutionary_conservation,
        dna_5mer: dna_5mer.to_string(),
    };

    let (_, result) = predict_records(model, &[record], config)?
        .into_iter()
        .next()
        .ok_or(ClassifierError::RowCountMismatch { expected: 1, found: 0 })?;
    Ok(result)
}

/// Count Positive and Negative rows of a table produced by [`predict_batch`].
pub fn summarize_predictions(scored: &DataFrame) -> PolarsResult<PredictionSummary> {
    let count = |status: PredictionStatus| -> PolarsResult<usize> {
        Ok(scored
            .clone()
            .lazy()
            .filter(col(STATUS_COLUMN).eq(lit(status.as_str())))
            .collect()?
            .height())
    };

    Ok(PredictionSummary {
        positive: count(PredictionStatus::Positive)?,
        negative: count(PredictionStatus::Negative)?,
    })
}

// ───────── internals ─────────

fn score_frame<M: Classifier + ?Sized>(
    model: &M,
    df: &DataFrame,
    config: &PredictionConfig,
) -> PipelineResult<Vec<PredictionResult>> {
    config.validate()?;

    let table = assemble_feature_table(df, config.categorical_policy)?;
    ensure_conforms(model.schema(), &table)?;

    let probabilities = model.predict_probability(&table)?;
    validate_probabilities(&probabilities, table.height())?;
    debug!("Classifier returned {} probabilities", probabilities.len());

    Ok(probabilities
        .into_iter()
        .map(|p| PredictionResult::new(p, config.positive_threshold))
        .collect())
}

/// Append the two output columns to a clone of `df`; stale copies of them are
/// dropped first so they always end up last.
fn merge_predictions(df: &DataFrame, results: &[PredictionResult]) -> PolarsResult<DataFrame> {
    let mut out = df.clone();
    for name in [PROB_COLUMN, STATUS_COLUMN] {
        if out.get_column_names().iter().any(|c| c.as_str() == name) {
            warn!("Input already has `{}`, replacing it", name);
            out.drop_in_place(name)?;
        }
    }

    let probs: Vec<f64> = results.iter().map(|r| r.probability).collect();
    let statuses: Vec<&str> = results.iter().map(|r| r.status.as_str()).collect();

    out.with_column(Column::new(PlSmallStr::from(PROB_COLUMN), probs))?;
    out.with_column(Column::new(PlSmallStr::from(STATUS_COLUMN), statuses))?;
    Ok(out)
}

fn extract_results(scored: &DataFrame) -> PolarsResult<Vec<PredictionResult>> {
    let probs = scored.column(PROB_COLUMN)?.f64()?;
    let statuses = scored.column(STATUS_COLUMN)?.str()?;

    probs
        .into_iter()
        .zip(statuses.into_iter())
        .enumerate()
        .map(|(row, pair)| match pair {
            (Some(probability), Some(label)) => PredictionStatus::parse(label)
                .map(|status| PredictionResult { probability, status })
                .ok_or_else(|| PolarsError::ComputeError(format!("unknown status `{}` at row {}", label, row).into())),
            _ => Err(PolarsError::ComputeError(format!("missing prediction at row {}", row).into())),
        })
        .collect()
}
