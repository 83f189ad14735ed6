//! Positional categorical encoding of fixed-length nucleotide sequences.
//!
//! A batch of N-length sequences becomes N categorical columns
//! (`nt_pos1 … nt_posN`), each restricted to the A, T, C, G levels.

use polars::prelude::*;
use tracing::debug;

use crate::error::{EncodingError, PipelineResult, SchemaError};
use crate::schema::{position_column_name, Level, Nucleotide};

/// Per-position nucleotide columns for one batch.
///
/// Stored row-major; every row has exactly `width()` positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPositionSet {
    width: usize,
    rows: Vec<Vec<Nucleotide>>,
}

impl EncodedPositionSet {
    /// Number of sequences (rows) in the batch.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sequence length shared by every row.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn row(&self, index: usize) -> Option<&[Nucleotide]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn rows(&self) -> &[Vec<Nucleotide>] {
        &self.rows
    }

    /// Values of the 0-based position `index` across all rows.
    pub fn column(&self, index: usize) -> Option<Vec<Nucleotide>> {
        if index >= self.width {
            return None;
        }
        Some(self.rows.iter().map(|r| r[index]).collect())
    }

    pub fn column_names(&self) -> Vec<String> {
        (1..=self.width).map(position_column_name).collect()
    }

    /// DataFrame view: one string column per position.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        DataFrame::new(self.to_columns())
    }

    pub(crate) fn to_columns(&self) -> Vec<Column> {
        (0..self.width)
            .map(|pos| {
                let values: Vec<&str> = self.rows.iter().map(|r| r[pos].label()).collect();
                Column::new(PlSmallStr::from(position_column_name(pos + 1)), values)
            })
            .collect()
    }
}

/// Encode a batch of sequences.
///
/// The first sequence fixes the width N; every other sequence must have
/// exactly N symbols from the A, T, C, G alphabet.
///
/// # Errors
///
/// * `EmptyBatch` if `sequences` is empty
/// * `EmptySequence` for a zero-length entry
/// * `LengthMismatch` if any sequence differs in length from the first
/// * `InvalidNucleotide` for any symbol outside the alphabet
pub fn encode<S: AsRef<str>>(sequences: &[S]) -> Result<EncodedPositionSet, EncodingError> {
    let first = sequences.first().ok_or(EncodingError::EmptyBatch)?;
    let width = first.as_ref().chars().count();

    let mut rows = Vec::with_capacity(sequences.len());
    for (row, seq) in sequences.iter().enumerate() {
        let seq = seq.as_ref();
        let found = seq.chars().count();
        if found == 0 {
            return Err(EncodingError::EmptySequence { row });
        }
        if found != width {
            return Err(EncodingError::LengthMismatch {
                row,
                expected: width,
                found,
            });
        }

        let encoded = seq
            .chars()
            .enumerate()
            .map(|(pos, symbol)| {
                Nucleotide::from_symbol(symbol).ok_or(EncodingError::InvalidNucleotide {
                    row,
                    position: pos + 1,
                    symbol,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(encoded);
    }

    debug!("Encoded {} sequences of length {}", rows.len(), width);
    Ok(EncodedPositionSet { width, rows })
}

/// Encode a string column of a DataFrame. Null cells are a schema violation.
pub fn encode_column(column: &Column) -> PipelineResult<EncodedPositionSet> {
    let casted = column.cast(&DataType::String)?;
    let values = casted.str()?;

    let mut sequences = Vec::with_capacity(values.len());
    for (row, opt) in values.into_iter().enumerate() {
        match opt {
            Some(seq) => sequences.push(seq),
            None => {
                return Err(SchemaError::NullValue {
                    column: column.name().to_string(),
                    row,
                }
                .into())
            }
        }
    }

    Ok(encode(&sequences)?)
}
