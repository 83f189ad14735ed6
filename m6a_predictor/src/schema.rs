//! schema.rs – the fixed feature schema the m6A classifier was trained on.
//!
//! Column names, column order and categorical level order are part of the
//! model's input contract. Assembly and the conformance check both read them
//! from here.

use std::fmt;

// ───────── column names ─────────
pub const GC_CONTENT: &str = "gc_content";
pub const RNA_TYPE: &str = "RNA_type";
pub const RNA_REGION: &str = "RNA_region";
pub const EXON_LENGTH: &str = "exon_length";
pub const DISTANCE_TO_JUNCTION: &str = "distance_to_junction";
pub const EVOLUTIONARY_CONSERVATION: &str = "evolutionary_conservation";
pub const DNA_5MER: &str = "DNA_5mer";

pub const PROB_COLUMN: &str = "predicted_m6A_prob";
pub const STATUS_COLUMN: &str = "predicted_m6A_status";

/// Columns every input table must carry.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    GC_CONTENT,
    RNA_TYPE,
    RNA_REGION,
    EXON_LENGTH,
    DISTANCE_TO_JUNCTION,
    EVOLUTIONARY_CONSERVATION,
    DNA_5MER,
];

/// Numeric columns that follow the two categoricals in the feature table.
pub const TRAILING_NUMERIC: [&str; 3] = [EXON_LENGTH, DISTANCE_TO_JUNCTION, EVOLUTIONARY_CONSERVATION];

/// Name of the encoded column for a 1-based sequence position.
pub fn position_column_name(position: usize) -> String {
    format!("nt_pos{}", position)
}

// ───────── closed level sets ─────────

/// A closed categorical domain with a significant level order.
pub trait Level: Copy + Eq + Sized + 'static {
    /// Every level, in training-time order.
    const LEVELS: &'static [Self];

    fn label(&self) -> &'static str;

    /// Index of this level in [`Level::LEVELS`].
    fn index(&self) -> usize {
        Self::LEVELS
            .iter()
            .position(|l| l == self)
            .unwrap_or_default()
    }

    /// Exact, case-sensitive match against the level labels.
    fn parse_level(value: &str) -> Option<Self> {
        Self::LEVELS.iter().copied().find(|l| l.label() == value)
    }
}

/// Nucleotide alphabet. Order is A, T, C, G.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nucleotide {
    A,
    T,
    C,
    G,
}

impl Nucleotide {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'A' => Some(Nucleotide::A),
            'T' => Some(Nucleotide::T),
            'C' => Some(Nucleotide::C),
            'G' => Some(Nucleotide::G),
            _ => None,
        }
    }
}

impl Level for Nucleotide {
    const LEVELS: &'static [Self] = &[Nucleotide::A, Nucleotide::T, Nucleotide::C, Nucleotide::G];

    fn label(&self) -> &'static str {
        match self {
            Nucleotide::A => "A",
            Nucleotide::T => "T",
            Nucleotide::C => "C",
            Nucleotide::G => "G",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RnaType {
    MRna,
    LincRna,
    LncRna,
    Pseudogene,
}

impl Level for RnaType {
    const LEVELS: &'static [Self] = &[RnaType::MRna, RnaType::LincRna, RnaType::LncRna, RnaType::Pseudogene];

    fn label(&self) -> &'static str {
        match self {
            RnaType::MRna => "mRNA",
            RnaType::LincRna => "lincRNA",
            RnaType::LncRna => "lncRNA",
            RnaType::Pseudogene => "pseudogene",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RnaRegion {
    Cds,
    Intron,
    Utr3,
    Utr5,
}

impl Level for RnaRegion {
    const LEVELS: &'static [Self] = &[RnaRegion::Cds, RnaRegion::Intron, RnaRegion::Utr3, RnaRegion::Utr5];

    fn label(&self) -> &'static str {
        match self {
            RnaRegion::Cds => "CDS",
            RnaRegion::Intron => "intron",
            RnaRegion::Utr3 => "3'UTR",
            RnaRegion::Utr5 => "5'UTR",
        }
    }
}

macro_rules! display_as_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_as_label!(Nucleotide, RnaType, RnaRegion);

// ───────── schema ─────────

/// Versioned description of the feature table handed to the classifier.
///
/// Level sets are fixed by the [`Level`] enums; what varies between models is
/// the schema version and the k-mer length they were trained with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureSchema {
    pub version: u32,
    pub sequence_length: usize,
}

impl FeatureSchema {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new(sequence_length: usize) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            sequence_length,
        }
    }

    /// Schema of the published m6A model: 5-mers, current version.
    pub fn m6a() -> Self {
        Self::new(5)
    }

    /// Feature table column names, in the order the classifier consumes them.
    pub fn feature_columns(&self) -> Vec<String> {
        let mut cols: Vec<String> = [GC_CONTENT, RNA_TYPE, RNA_REGION]
            .iter()
            .chain(TRAILING_NUMERIC.iter())
            .map(|c| c.to_string())
            .collect();
        cols.extend((1..=self.sequence_length).map(position_column_name));
        cols
    }

    /// One-hot expanded column names of the design matrix.
    pub fn design_columns(&self) -> Vec<String> {
        let mut cols = vec![GC_CONTENT.to_string()];
        cols.extend(level_columns::<RnaType>(RNA_TYPE));
        cols.extend(level_columns::<RnaRegion>(RNA_REGION));
        cols.extend(TRAILING_NUMERIC.iter().map(|c| c.to_string()));
        for pos in 1..=self.sequence_length {
            cols.extend(level_columns::<Nucleotide>(&position_column_name(pos)));
        }
        cols
    }

    pub fn design_width(&self) -> usize {
        1 + RnaType::LEVELS.len()
            + RnaRegion::LEVELS.len()
            + TRAILING_NUMERIC.len()
            + self.sequence_length * Nucleotide::LEVELS.len()
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::m6a()
    }
}

impl fmt::Display for FeatureSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "schema v{} ({}-mer)", self.version, self.sequence_length)
    }
}

fn level_columns<L: Level>(column: &str) -> impl Iterator<Item = String> + '_ {
    L::LEVELS.iter().map(move |l| format!("{}:{}", column, l.label()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nucleotide_order_is_atcg() {
        let labels: Vec<&str> = Nucleotide::LEVELS.iter().map(|n| n.label()).collect();
        assert_eq!(labels, ["A", "T", "C", "G"]);
        assert_eq!(Nucleotide::C.index(), 2);
    }

    #[test]
    fn levels_parse_exactly() {
        assert_eq!(RnaType::parse_level("lincRNA"), Some(RnaType::LincRna));
        assert_eq!(RnaType::parse_level("circRNA"), None);
        assert_eq!(RnaType::parse_level("mrna"), None);
        assert_eq!(RnaRegion::parse_level("3'UTR"), Some(RnaRegion::Utr3));
        assert_eq!(RnaRegion::parse_level("5'UTR").map(|r| r.index()), Some(3));
    }

    #[test]
    fn feature_columns_follow_model_order() {
        let cols = FeatureSchema::m6a().feature_columns();
        assert_eq!(
            cols,
            [
                "gc_content",
                "RNA_type",
                "RNA_region",
                "exon_length",
                "distance_to_junction",
                "evolutionary_conservation",
                "nt_pos1",
                "nt_pos2",
                "nt_pos3",
                "nt_pos4",
                "nt_pos5",
            ]
        );
    }

    #[test]
    fn design_columns_match_width() {
        let schema = FeatureSchema::m6a();
        let cols = schema.design_columns();
        assert_eq!(cols.len(), schema.design_width());
        assert_eq!(cols.len(), 32);
        assert_eq!(cols[1], "RNA_type:mRNA");
        assert_eq!(cols[8], "RNA_region:5'UTR");
        assert_eq!(cols[9], "exon_length");
        assert_eq!(cols[12], "nt_pos1:A");
        assert_eq!(cols[15], "nt_pos1:G");
        assert_eq!(cols[31], "nt_pos5:G");
    }
}
