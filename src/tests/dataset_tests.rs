//! Dataset assembly: labeling rules, fallback addresses, CSV loading and
//! imputation.

use crate::dataset::{build, load_rows, DatasetError, DatasetRow, MedianImputer, FALLBACK_LEGIT_ADDRESSES};
use crate::tests::support::full_row;

#[test]
fn fraud_label_wins_on_address_conflict() {
    let rows = vec![
        full_row("0xaaaa", 1, 10.0),
        // Same address declared legitimate; the scam claim stands.
        full_row("0xAAAA", 0, 10.0),
        full_row("0xbbbb", 0, 2.0),
    ];

    let built = build(&rows).expect("build");
    assert_eq!(built.labels, vec![1, 0]);
    assert_eq!(built.matrix.len(), 2);
}

#[test]
fn fallback_addresses_substitute_for_an_empty_legit_list() {
    let rows = vec![full_row("0xaaaa", 1, 10.0), full_row("0xbbbb", 1, 20.0)];

    let built = build(&rows).expect("build");
    assert_eq!(
        built.labels,
        vec![1, 1, 0, 0, 0],
        "two scam rows plus {} fallback legitimate addresses",
        FALLBACK_LEGIT_ADDRESSES.len()
    );

    // Fallback addresses have no dataset row and no fetched history, so
    // their vectors are fully derived zeros.
    for row in &built.matrix[2..] {
        assert!(row.iter().all(|&v| v == 0.0));
    }
}

#[test]
fn single_class_rows_still_build() {
    // The class guard lives in the trainer, not here; an all-scam build
    // with a populated legit column list is legal input for it to reject.
    let rows = vec![full_row("0xaaaa", 1, 1.0)];
    let built = build(&rows).expect("build");
    assert!(built.labels.contains(&1));
}

#[test]
fn imputer_medians_ignore_missing_cells() {
    let matrix = vec![
        vec![1.0, f64::NAN],
        vec![3.0, 4.0],
        vec![5.0, f64::NAN],
    ];
    let imputer = MedianImputer::fit(&matrix);
    assert_eq!(imputer.medians(), &[3.0, 4.0]);

    let transformed = imputer.transform_row(&[f64::NAN, f64::NAN]);
    assert_eq!(transformed, vec![3.0, 4.0]);

    // Finite values pass through untouched.
    let untouched = imputer.transform_row(&[9.0, 4.5]);
    assert_eq!(untouched, vec![9.0, 4.5]);
}

#[test]
fn all_missing_column_imputes_to_zero() {
    let matrix = vec![vec![f64::NAN], vec![f64::NAN]];
    let imputer = MedianImputer::fit(&matrix);
    assert_eq!(imputer.medians(), &[0.0]);
}

#[test]
fn even_count_median_averages_the_middle_pair() {
    let matrix = vec![vec![1.0], vec![2.0], vec![10.0], vec![20.0]];
    let imputer = MedianImputer::fit(&matrix);
    assert_eq!(imputer.medians(), &[6.0]);
}

#[test]
fn builder_imputes_missing_cells_with_column_medians() {
    let mut incomplete = full_row("0xdddd", 0, 1.0);
    incomplete.total_ether_received = None;

    let rows = vec![
        full_row("0xaaaa", 1, 5.0),  // total_value 10.0
        full_row("0xbbbb", 1, 10.0), // total_value 20.0
        full_row("0xcccc", 0, 15.0), // total_value 30.0
        incomplete,
    ];

    let built = build(&rows).expect("build");

    // total_value is column 1; the missing cell takes the median of the
    // three present values.
    assert_eq!(built.matrix[3][1], 20.0);
    // No NaN survives imputation.
    assert!(built
        .matrix
        .iter()
        .all(|row| row.iter().all(|v| !v.is_nan())));
}

#[test]
fn loader_reads_renamed_columns_and_skips_bad_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dataset.csv");
    let csv = "\
Address,FLAG,total ether received, ERC20 total Ether received
0xaaaa,1,12.5,3.25
0xbbbb,not-a-flag,1.0,1.0
0xcccc,0,,0.5
";
    std::fs::write(&path, csv).expect("write csv");

    let rows = load_rows(&path).expect("load");
    assert_eq!(rows.len(), 2, "the malformed FLAG row is skipped");

    assert_eq!(rows[0].address, "0xaaaa");
    assert_eq!(rows[0].flag, 1);
    assert_eq!(rows[0].total_ether_received, Some(12.5));
    assert_eq!(rows[0].erc20_total_ether_received, Some(3.25));
    // Columns absent from this file deserialize as missing.
    assert_eq!(rows[0].total_ether_balance, None);

    // An empty cell is missing, not zero.
    assert_eq!(rows[1].total_ether_received, None);
}

#[test]
fn loader_rejects_a_dataset_with_no_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("empty.csv");
    std::fs::write(&path, "Address,FLAG\n").expect("write csv");

    let result = load_rows(&path);
    assert!(matches!(result, Err(DatasetError::Empty)));
}

#[test]
fn empty_row_set_falls_back_to_the_default_legit_list() {
    let rows: Vec<DatasetRow> = Vec::new();
    let built = build(&rows).expect("fallback rows");
    assert_eq!(built.labels, vec![0, 0, 0]);
}
