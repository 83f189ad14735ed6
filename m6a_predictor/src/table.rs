//! table.rs – assembly of the feature table handed to the classifier.
//!
//! Takes a raw input DataFrame through schema validation, sequence encoding and
//! categorical normalization, producing one [`FeatureRow`] per input row in
//! the same order.

use ndarray::Array2;
use polars::prelude::*;
use tracing::{debug, warn};

use crate::config::CategoricalPolicy;
use crate::encoder::{encode_column, EncodedPositionSet};
use crate::error::{CategoricalDomainError, PipelineResult, PredictionError, SchemaError};
use crate::schema::{
    position_column_name, FeatureSchema, Level, Nucleotide, RnaRegion, RnaType, DISTANCE_TO_JUNCTION, DNA_5MER,
    EVOLUTIONARY_CONSERVATION, EXON_LENGTH, GC_CONTENT, REQUIRED_COLUMNS, RNA_REGION, RNA_TYPE,
};

/// Normalized features of one observation.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub gc_content: f64,
    /// `None` only under [`CategoricalPolicy::Unrepresented`].
    pub rna_type: Option<RnaType>,
    pub rna_region: Option<RnaRegion>,
    pub exon_length: f64,
    pub distance_to_junction: f64,
    pub evolutionary_conservation: f64,
    pub positions: Vec<Nucleotide>,
}

/// The assembled feature matrix, with the schema it was built against.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    schema: FeatureSchema,
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// DataFrame view in [`FeatureSchema::feature_columns`] order.
    ///
    /// Categoricals are string columns holding the level labels; an
    /// unrepresented level is null.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let num = |name: &str, get: fn(&FeatureRow) -> f64| {
            Column::new(PlSmallStr::from(name), self.rows.iter().map(get).collect::<Vec<f64>>())
        };

        let mut columns = vec![
            num(GC_CONTENT, |r| r.gc_content),
            Column::new(
                PlSmallStr::from(RNA_TYPE),
                self.rows
                    .iter()
                    .map(|r| r.rna_type.map(|l| l.label()))
                    .collect::<Vec<Option<&str>>>(),
            ),
            Column::new(
                PlSmallStr::from(RNA_REGION),
                self.rows
                    .iter()
                    .map(|r| r.rna_region.map(|l| l.label()))
                    .collect::<Vec<Option<&str>>>(),
            ),
            num(EXON_LENGTH, |r| r.exon_length),
            num(DISTANCE_TO_JUNCTION, |r| r.distance_to_junction),
            num(EVOLUTIONARY_CONSERVATION, |r| r.evolutionary_conservation),
        ];
        for pos in 0..self.schema.sequence_length {
            let values: Vec<&str> = self.rows.iter().map(|r| r.positions[pos].label()).collect();
            columns.push(Column::new(PlSmallStr::from(position_column_name(pos + 1)), values));
        }

        DataFrame::new(columns)
    }

    /// Numeric design matrix with full one-hot expansion of every categorical,
    /// columns in [`FeatureSchema::design_columns`] order.
    pub fn design_matrix(&self) -> Array2<f64> {
        let mut x = Array2::<f64>::zeros((self.rows.len(), self.schema.design_width()));
        for (i, row) in self.rows.iter().enumerate() {
            let mut j = 0;
            x[[i, j]] = row.gc_content;
            j += 1;
            j = one_hot(&mut x, i, j, row.rna_type);
            j = one_hot(&mut x, i, j, row.rna_region);
            for v in [row.exon_length, row.distance_to_junction, row.evolutionary_conservation] {
                x[[i, j]] = v;
                j += 1;
            }
            for &nt in &row.positions {
                j = one_hot(&mut x, i, j, Some(nt));
            }
        }
        x
    }
}

fn one_hot<L: Level>(x: &mut Array2<f64>, row: usize, offset: usize, level: Option<L>) -> usize {
    if let Some(level) = level {
        x[[row, offset + level.index()]] = 1.0;
    }
    offset + L::LEVELS.len()
}

// ───────── assembly ─────────

/// Fail fast if any required column is absent. Reports all missing names.
pub fn validate_columns(df: &DataFrame) -> Result<(), SchemaError> {
    let present = df.get_column_names();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|&&req| !present.iter().any(|c| c.as_str() == req))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingColumns(missing))
    }
}

fn numeric_values(df: &DataFrame, name: &str) -> PipelineResult<Vec<f64>> {
    let casted = df.column(name)?.cast(&DataType::Float64)?;
    casted
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, opt)| {
            opt.ok_or_else(|| {
                PredictionError::from(SchemaError::NullValue {
                    column: name.to_string(),
                    row,
                })
            })
        })
        .collect()
}

/// Coerce a string column onto the closed level set of `L`.
///
/// # Arguments
///
/// * `df` - input table holding the column
/// * `name` - column to read (`RNA_type` or `RNA_region`)
/// * `policy` - what to do with a value outside `L::LEVELS`
///
/// # Returns
///
/// One entry per row; `None` only for out-of-domain values under
/// [`CategoricalPolicy::Unrepresented`].
///
/// # Errors
///
/// `SchemaError::NullValue` on a null cell, `CategoricalDomainError` on an
/// unknown value under [`CategoricalPolicy::Strict`].
fn categorical_values<L: Level>(
    df: &DataFrame,
    name: &str,
    policy: CategoricalPolicy,
) -> PipelineResult<Vec<Option<L>>> {
    let casted = df.column(name)?.cast(&DataType::String)?;
    let values = casted.str()?;

    let mut out = Vec::with_capacity(values.len());
    let mut unrepresented = 0usize;
    for (row, opt) in values.into_iter().enumerate() {
        // Nulls are a schema problem, not a domain one
        let value = opt.ok_or_else(|| SchemaError::NullValue {
            column: name.to_string(),
            row,
        })?;
        match (L::parse_level(value), policy) {
            (Some(level), _) => out.push(Some(level)),
            (None, CategoricalPolicy::Strict) => {
                return Err(CategoricalDomainError {
                    column: name.to_string(),
                    row,
                    value: value.to_string(),
                }
                .into())
            }
            (None, CategoricalPolicy::Unrepresented) => {
                unrepresented += 1;
                out.push(None);
            }
        }
    }

    if unrepresented > 0 {
        warn!(
            "{} value(s) in `{}` outside the declared levels were left unrepresented",
            unrepresented, name
        );
    }
    Ok(out)
}

/// Build the feature table for `df`, preserving row count and order.
///
/// # Arguments
///
/// * `df` - input table; columns beyond the seven required ones are ignored
/// * `policy` - handling of `RNA_type`/`RNA_region` values outside their levels
///
/// # Returns
///
/// A [`FeatureTable`] whose schema carries the k-mer length found in `DNA_5mer`.
///
/// # Errors
///
/// Missing columns or null cells (`SchemaError`), bad sequences
/// (`EncodingError`), and out-of-domain categoricals under the strict policy.
pub fn assemble_feature_table(df: &DataFrame, policy: CategoricalPolicy) -> PipelineResult<FeatureTable> {
    // 1. All required columns present
    validate_columns(df)?;

    // 2. Per-position nucleotides, uniform length across the batch
    let encoded: EncodedPositionSet = encode_column(df.column(DNA_5MER)?)?;

    // 3. Categoricals onto their closed level sets
    let rna_type = categorical_values::<RnaType>(df, RNA_TYPE, policy)?;
    let rna_region = categorical_values::<RnaRegion>(df, RNA_REGION, policy)?;

    // 4. Numerics as f64
    let gc = numeric_values(df, GC_CONTENT)?;
    let exon = numeric_values(df, EXON_LENGTH)?;
    let dist = numeric_values(df, DISTANCE_TO_JUNCTION)?;
    let cons = numeric_values(df, EVOLUTIONARY_CONSERVATION)?;

    let rows: Vec<FeatureRow> = encoded
        .rows()
        .iter()
        .enumerate()
        .map(|(i, positions)| FeatureRow {
            gc_content: gc[i],
            rna_type: rna_type[i],
            rna_region: rna_region[i],
            exon_length: exon[i],
            distance_to_junction: dist[i],
            evolutionary_conservation: cons[i],
            positions: positions.clone(),
        })
        .collect();

    debug!("Assembled feature table: {} rows, {}-mer positions", rows.len(), encoded.width());
    Ok(FeatureTable {
        schema: FeatureSchema::new(encoded.width()),
        rows,
    })
}
