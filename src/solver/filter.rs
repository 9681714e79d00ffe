use indexmap::IndexSet;

use crate::threats::ThreatMatrix;

/// Every row without a queen still has at least one unthreatened column.
pub fn forward_check(threats: &ThreatMatrix, used_rows: &IndexSet<usize>) -> bool {
    (0..threats.n())
        .filter(|row| !used_rows.contains(row))
        .all(|row| threats.has_free(row))
}

/// Columns of `row` to skip: those that are free now, but whose placement would leave another
/// empty row with no free column. Only the rows one placement ahead are examined.
pub fn arc_consistency(
    threats: &ThreatMatrix,
    used_rows: &IndexSet<usize>,
    row: usize,
) -> IndexSet<usize> {
    threats
        .free_columns(row)
        .filter(|&col| {
            let mut hypothetical = threats.clone();
            hypothetical.place((row, col));
            (0..threats.n())
                .filter(|&other| other != row && !used_rows.contains(&other))
                .any(|other| !hypothetical.has_free(other))
        })
        .collect()
}
