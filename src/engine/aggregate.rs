//! Column totals for numeric-family fields.

use std::collections::BTreeMap;

use super::projector::DisplayRow;
use crate::model::SelectedField;
use crate::storage::CellValue;

/// Field key -> column total.
pub type AggregateMap = BTreeMap<String, f64>;

/// Sum every `number`/`currency` field over `rows`.
///
/// Missing, null and non-numeric cells count as zero. Other value types
/// never get an entry.
pub fn compute_aggregates(fields: &[SelectedField], rows: &[DisplayRow]) -> AggregateMap {
    let mut totals = AggregateMap::new();

    for field in fields.iter().filter(|f| f.value_type.is_numeric()) {
        if totals.contains_key(&field.field) {
            continue;
        }

        let total = rows
            .iter()
            .map(|row| row.get(&field.field).and_then(CellValue::as_f64).unwrap_or(0.0))
            .fold(0.0, |acc, value| acc + value);
        totals.insert(field.field.clone(), total);
    }

    totals
}
