use crate::components::{Column, Header, SweepSpecification};

/// Columns in measurement order: each active secondary sweep in turn, each of its
/// values, each requested coefficient.
pub fn build_header(specification: &SweepSpecification) -> Header {
    let columns = specification
        .active_secondaries()
        .flat_map(|sweep| {
            sweep.values.iter().flat_map(move |&value| {
                sweep.outputs.iter().map(move |&kind| Column {
                    kind,
                    variable: sweep.variable,
                    value,
                })
            })
        })
        .collect();

    Header {
        primary: specification.primary.variable.label().to_string(),
        columns,
    }
}
