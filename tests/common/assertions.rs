use approx::assert_relative_eq;
use windtunnel::{components::CoefficientRow, resources::MemorySink};

/// Assert that a coefficient matches its expected value
#[track_caller]
pub fn assert_coefficient_eq(actual: f64, expected: f64, epsilon: f64) {
    assert!(actual.is_finite(), "Coefficient is not finite");
    assert_relative_eq!(actual, expected, epsilon = epsilon);
}

/// Assert that a sequence rises strictly
#[track_caller]
pub fn assert_increasing(values: &[f64]) {
    for pair in values.windows(2) {
        assert!(
            pair[1] > pair[0],
            "Expected increasing values, got {:?}",
            values
        );
    }
}

/// Assert that a sink holds `count` complete rows matching its header, and return them
#[track_caller]
pub fn assert_rows_complete(sink: &MemorySink, count: usize) -> Vec<CoefficientRow> {
    let header = sink.header().expect("Sink was never started");
    let rows = sink.rows();
    assert_eq!(rows.len(), count, "Unexpected row count");
    for row in &rows {
        assert_eq!(row.width(), header.width(), "Row width differs from header");
        assert!(
            row.values.iter().all(|v| v.is_finite()),
            "Row contains non-finite values"
        );
    }
    rows
}
