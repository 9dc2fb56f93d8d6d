use std::collections::HashMap;

use crate::columns::ColumnRole;
use crate::insights::{Outcome, SkipReason};
use crate::table::{Cell, Table};

/// Label counts of one column, descending; equal counts keep first-appearance order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalDistribution {
    pub column: String,
    pub counts: Vec<(String, usize)>,
}

impl CategoricalDistribution {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }
}

pub fn value_counts<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for cell in cells {
        let label = cell.to_string();
        match index.get(&label) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(label.clone(), counts.len());
                counts.push((label, 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

pub fn analyze_categorical(
    table: &Table,
    role: ColumnRole,
    column: Option<&str>,
) -> Outcome<CategoricalDistribution> {
    match column.and_then(|name| table.column(name)) {
        Some(col) => Outcome::Analyzed(CategoricalDistribution {
            column: col.name.clone(),
            counts: value_counts(col.non_null()),
        }),
        None => Outcome::Skipped(SkipReason::UnresolvedColumn(role)),
    }
}
