//! classifier.rs – the prediction contract of the pre-trained model.
//!
//! The pipeline never trains or loads a model; it hands an assembled
//! [`FeatureTable`] to anything implementing [`Classifier`].

use std::collections::HashMap;

use ndarray::Array1;
use tracing::debug;

use crate::error::ClassifierError;
use crate::schema::FeatureSchema;
use crate::table::FeatureTable;

/// A trained binary classifier over the m6A feature schema.
pub trait Classifier {
    /// Schema the model was trained against.
    fn schema(&self) -> &FeatureSchema;

    /// P(Positive) for every row of `table`, in row order.
    fn predict_probability(&self, table: &FeatureTable) -> Result<Vec<f64>, ClassifierError>;
}

/// Refuse to score a table whose schema differs from the model's.
pub fn ensure_conforms(expected: &FeatureSchema, table: &FeatureTable) -> Result<(), ClassifierError> {
    if expected != table.schema() {
        return Err(ClassifierError::SchemaMismatch {
            expected: expected.to_string(),
            found: table.schema().to_string(),
        });
    }
    Ok(())
}

/// Check the classifier returned one probability in [0, 1] per row.
pub fn validate_probabilities(probabilities: &[f64], rows: usize) -> Result<(), ClassifierError> {
    if probabilities.len() != rows {
        return Err(ClassifierError::RowCountMismatch {
            expected: rows,
            found: probabilities.len(),
        });
    }
    match probabilities
        .iter()
        .enumerate()
        .find(|(_, p)| !(0.0..=1.0).contains(*p))
    {
        Some((row, &value)) => Err(ClassifierError::InvalidProbability { row, value }),
        None => Ok(()),
    }
}

// ───────── logistic model ─────────

/// Linear-logit model over the one-hot design matrix:
/// `p = 1 / (1 + exp(-(intercept + x·β)))`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticClassifier {
    schema: FeatureSchema,
    intercept: f64,
    weights: Array1<f64>,
}

impl LogisticClassifier {
    /// `weights` must follow [`FeatureSchema::design_columns`] order.
    pub fn new(schema: FeatureSchema, intercept: f64, weights: Vec<f64>) -> Result<Self, ClassifierError> {
        if weights.len() != schema.design_width() {
            return Err(ClassifierError::Failed(format!(
                "expected {} weights for {}, got {}",
                schema.design_width(),
                schema,
                weights.len()
            )));
        }
        Ok(Self {
            schema,
            intercept,
            weights: Array1::from(weights),
        })
    }

    /// Build from a β-map keyed by design column name. Every design column
    /// needs a weight and every key must name a design column.
    pub fn from_weight_map(
        schema: FeatureSchema,
        intercept: f64,
        betas: &HashMap<String, f64>,
    ) -> Result<Self, ClassifierError> {
        let columns = schema.design_columns();

        if let Some(unknown) = betas.keys().find(|k| !columns.contains(*k)) {
            return Err(ClassifierError::Failed(format!("unknown feature `{}` in weight map", unknown)));
        }

        let weights = columns
            .iter()
            .map(|c| {
                betas
                    .get(c)
                    .copied()
                    .ok_or_else(|| ClassifierError::Failed(format!("no weight for feature `{}`", c)))
            })
            .collect::<Result<Vec<f64>, _>>()?;

        Self::new(schema, intercept, weights)
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }
}

impl Classifier for LogisticClassifier {
    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Probability of m6A at each row: `sigmoid(intercept + x · β)`.
    ///
    /// # Arguments
    ///
    /// * `table` - assembled features; must match this model's schema
    ///
    /// # Returns
    ///
    /// One probability in `[0, 1]` per row, in table order.
    ///
    /// # Errors
    ///
    /// `ClassifierError::SchemaMismatch` when the table was built for another
    /// schema version or k-mer length.
    fn predict_probability(&self, table: &FeatureTable) -> Result<Vec<f64>, ClassifierError> {
        // Width of β is tied to the schema, so check before the dot product
        ensure_conforms(&self.schema, table)?;

        // One-hot design matrix, columns in design_columns() order
        let x = table.design_matrix();
        let logits = x.dot(&self.weights) + self.intercept;
        debug!("Scored {} rows with logistic model", logits.len());

        // Logistic link
        Ok(logits.iter().map(|&z| 1.0 / (1.0 + (-z).exp())).collect())
    }
}
