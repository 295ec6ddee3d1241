//! Labeled comparison table.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Metric comparison across phases, one row per cutoff.
///
/// Rows are keyed by cutoff and always iterate in ascending order. Columns
/// are registered in first-insertion order and shared across rows; a row may
/// hold values for any subset of the registered columns (a phase whose
/// artifact was missing at that cutoff contributes nothing).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonTable {
    columns: Vec<String>,
    rows: BTreeMap<u32, HashMap<String, f64>>,
}

impl ComparisonTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a row for `cutoff` with no values, if not already present.
    pub(crate) fn ensure_row(&mut self, cutoff: u32) {
        self.rows.entry(cutoff).or_default();
    }

    /// Sets one cell, registering the column on first use.
    pub(crate) fn insert(&mut self, cutoff: u32, column: String, value: f64) {
        if !self.columns.contains(&column) {
            self.columns.push(column.clone());
        }
        self.rows.entry(cutoff).or_default().insert(column, value);
    }

    /// Column labels in first-insertion order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row keys in ascending order.
    pub fn cutoffs(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows.keys().copied()
    }

    /// The value of one cell, if populated.
    pub fn get(&self, cutoff: u32, column: &str) -> Option<f64> {
        self.rows.get(&cutoff).and_then(|row| row.get(column)).copied()
    }

    /// Values of one row in column order; `None` for unpopulated cells.
    /// Returns `None` when the cutoff has no row at all.
    pub fn row(&self, cutoff: u32) -> Option<Vec<Option<f64>>> {
        let row = self.rows.get(&cutoff)?;
        Some(
            self.columns
                .iter()
                .map(|column| row.get(column).copied())
                .collect(),
        )
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for ComparisonTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // "0.0000" is 6 characters wide
        let widths: Vec<usize> = self.columns.iter().map(|c| c.len().max(6)).collect();
        let k_width = self
            .rows
            .keys()
            .map(|k| k.to_string().len())
            .max()
            .unwrap_or(0)
            .max(1);

        write!(f, "{:>k_width$}", "k")?;
        for (column, &width) in self.columns.iter().zip(&widths) {
            write!(f, "  {column:>width$}")?;
        }
        writeln!(f)?;

        for (cutoff, row) in &self.rows {
            write!(f, "{cutoff:>k_width$}")?;
            for (column, &width) in self.columns.iter().zip(&widths) {
                match row.get(column) {
                    Some(value) => write!(f, "  {value:>width$.4}")?,
                    None => write!(f, "  {:>width$}", "-")?,
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
