use m6a_predictor::helper_functions::{read_feature_csv, write_predictions_csv};
use m6a_predictor::schema::{PROB_COLUMN, STATUS_COLUMN};
use m6a_predictor::*;
use polars::prelude::DataFrame;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_test_writer()
        .try_init();
}

/// Answers every row with the same probability.
struct Constant(f64);

impl Classifier for Constant {
    fn schema(&self) -> &FeatureSchema {
        static SCHEMA: FeatureSchema = FeatureSchema {
            version: FeatureSchema::CURRENT_VERSION,
            sequence_length: 5,
        };
        &SCHEMA
    }

    fn predict_probability(&self, table: &FeatureTable) -> Result<Vec<f64>, ClassifierError> {
        Ok(vec![self.0; table.height()])
    }
}

fn record(rna_type: &str, dna_5mer: &str) -> FeatureRecord {
    FeatureRecord {
        gc_content: 0.55,
        rna_type: rna_type.to_string(),
        rna_region: "CDS".to_string(),
        exon_length: 150,
        distance_to_junction: 20.0,
        evolutionary_conservation: 0.7,
        dna_5mer: dna_5mer.to_string(),
    }
}

#[test]
fn encodes_example_batch() {
    let enc = encode(&["ATCGA", "TGGCA"]).unwrap();
    let frame = enc.to_frame().unwrap();
    let names: Vec<&str> = frame.get_column_names().iter().map(|c| c.as_str()).collect();
    assert_eq!(names, ["nt_pos1", "nt_pos2", "nt_pos3", "nt_pos4", "nt_pos5"]);
    let row1: Vec<&str> = enc.row(1).unwrap().iter().map(|n| n.label()).collect();
    assert_eq!(row1, ["T", "G", "G", "C", "A"]);
}

#[test]
fn probability_above_threshold_is_positive() {
    init_logging();
    let result = predict_one(
        &Constant(0.72),
        0.55,
        "mRNA",
        "CDS",
        150,
        20.0,
        0.7,
        "ATCGA",
        &PredictionConfig::with_threshold(0.6),
    )
    .unwrap();
    assert_eq!(result.status, PredictionStatus::Positive);
    assert_eq!(result.probability, 0.72);
}

#[test]
fn probability_below_threshold_is_negative() {
    let results = predict_records(
        &Constant(0.72),
        &[record("mRNA", "ATCGA")],
        &PredictionConfig::with_threshold(0.8),
    )
    .unwrap();
    assert_eq!(results[0].1.status, PredictionStatus::Negative);
}

#[test]
fn missing_exon_length_raises_schema_error() {
    let df = records_to_frame_without_exon_length();
    let err = predict_batch(&Constant(0.5), &df, &PredictionConfig::default()).unwrap_err();
    match err {
        PredictionError::Schema(SchemaError::MissingColumns(cols)) => assert_eq!(cols, ["exon_length"]),
        other => panic!("expected schema error, got {other:?}"),
    }
}

fn records_to_frame_without_exon_length() -> DataFrame {
    m6a_predictor::models::records_to_frame(&[record("mRNA", "ATCGA"), record("lncRNA", "GGACT")])
        .unwrap()
        .drop("exon_length")
        .unwrap()
}

#[test]
fn mixed_kmer_lengths_raise_encoding_error() {
    let err = predict_records(
        &Constant(0.5),
        &[record("mRNA", "ATCG"), record("mRNA", "ATCGA")],
        &PredictionConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        PredictionError::Encoding(EncodingError::LengthMismatch {
            row: 1,
            expected: 4,
            found: 5
        })
    ));
}

#[test]
fn unknown_rna_type_raises_domain_error() {
    let err = predict_records(
        &Constant(0.5),
        &[record("circRNA", "ATCGA")],
        &PredictionConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, PredictionError::CategoricalDomain(ref e) if e.value == "circRNA"));
}

#[test]
fn uniform_short_kmers_fail_conformance() {
    let err = predict_records(
        &Constant(0.5),
        &[record("mRNA", "ATCG"), record("mRNA", "GGCA")],
        &PredictionConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        PredictionError::Classifier(ClassifierError::SchemaMismatch { .. })
    ));
}

#[test]
fn csv_round_trip_preserves_rows() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("sites.csv");
    std::fs::write(
        &input,
        "site,gc_content,RNA_type,RNA_region,exon_length,distance_to_junction,evolutionary_conservation,DNA_5mer\n\
         a,0.6,mRNA,3'UTR,12,5,0.8,ATCGA\n\
         b,0.4,lincRNA,5'UTR,7,40,0.1,TGGCA\n\
         c,0.5,pseudogene,intron,30,2,0.4,GGACT\n",
    )
    .unwrap();

    let schema = FeatureSchema::m6a();
    let mut weights = vec![0.0; schema.design_width()];
    weights[0] = 4.0; // gc_content
    let model = LogisticClassifier::new(schema, -2.0, weights).unwrap();

    let df = read_feature_csv(&input).unwrap();
    let mut scored = predict_batch(&model, &df, &PredictionConfig::default()).unwrap();
    assert_eq!(scored.height(), 3);

    let sites: Vec<&str> = scored.column("site").unwrap().str().unwrap().into_no_null_iter().collect();
    assert_eq!(sites, ["a", "b", "c"]);

    // sigmoid(4 * gc - 2): 0.6 -> > 0.5, 0.4 -> < 0.5, 0.5 -> exactly 0.5
    let statuses: Vec<&str> = scored
        .column(STATUS_COLUMN)
        .unwrap()
        .str()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(statuses, ["Positive", "Negative", "Positive"]);

    let output = dir.path().join("results/scored.csv");
    write_predictions_csv(&mut scored, &output).unwrap();
    let back = read_feature_csv(&output).unwrap();
    assert_eq!(back.height(), 3);
    assert!(back.column(PROB_COLUMN).is_ok());
    assert_eq!(
        summarize_predictions(&back).unwrap(),
        PredictionSummary {
            positive: 2,
            negative: 1
        }
    );
}
