use std::collections::BTreeMap;

use super::model::Dataset;
use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Field selection: which columns the user has toggled on
// ---------------------------------------------------------------------------

/// Per-column toggle state: maps column_name → selected.
/// A column absent from the map is not selected.
pub type ColumnSelection = BTreeMap<String, bool>;

/// Initialise a [`ColumnSelection`] with every column of the dataset off.
pub fn init_selection(dataset: &Dataset) -> ColumnSelection {
    dataset
        .column_names()
        .map(|name| (name.to_string(), false))
        .collect()
}

/// Names of the toggled-on columns, in dataset order.
///
/// Correlation needs a pair, so fewer than two selected columns halts the
/// pass with [`PipelineError::InsufficientColumns`].
pub fn selected_columns(
    dataset: &Dataset,
    selection: &ColumnSelection,
) -> Result<Vec<String>, PipelineError> {
    let selected: Vec<String> = dataset
        .column_names()
        .filter(|name| selection.get(*name).copied().unwrap_or(false))
        .map(str::to_string)
        .collect();

    if selected.len() < 2 {
        return Err(PipelineError::InsufficientColumns {
            selected: selected.len(),
        });
    }
    Ok(selected)
}

// ---------------------------------------------------------------------------
// Numeric subset
// ---------------------------------------------------------------------------

/// The numeric columns of the selection, with fully-missing rows removed.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSubset {
    /// Column names, in dataset order.
    pub columns: Vec<String>,
    /// Column-major values; `None` marks a missing cell.
    pub values: Vec<Vec<Option<f64>>>,
    /// Row number in the source dataset of every retained row.
    pub source_rows: Vec<usize>,
}

impl NumericSubset {
    /// Number of retained rows.
    pub fn len(&self) -> usize {
        self.source_rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source_rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of row `row` across all columns.
    pub fn row(&self, row: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        self.values.iter().map(move |col| col[row])
    }

    /// Observations where both columns are present, as `(a, b)` pairs.
    pub fn paired(&self, a: usize, b: usize) -> Vec<(f64, f64)> {
        self.values[a]
            .iter()
            .zip(&self.values[b])
            .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
            .collect()
    }
}

/// Restrict `selected` to numeric columns and drop rows that are missing in
/// every one of them. Rows with only some values missing are kept.
pub fn numeric_subset(
    dataset: &Dataset,
    selected: &[String],
) -> Result<NumericSubset, PipelineError> {
    let numeric: Vec<_> = selected
        .iter()
        .filter_map(|name| dataset.column(name))
        .filter(|col| col.is_numeric())
        .collect();

    if numeric.len() < 2 {
        return Err(PipelineError::InsufficientNumericColumns {
            found: numeric.len(),
        });
    }

    let source_rows: Vec<usize> = (0..dataset.len())
        .filter(|&row| numeric.iter().any(|col| !col.cells[row].is_null()))
        .collect();

    let values = numeric
        .iter()
        .map(|col| source_rows.iter().map(|&r| col.cells[r].as_f64()).collect())
        .collect();

    let subset = NumericSubset {
        columns: numeric.iter().map(|c| c.name.clone()).collect(),
        values,
        source_rows,
    };
    if subset.is_empty() {
        return Err(PipelineError::EmptyAfterFiltering);
    }
    Ok(subset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bytes;

    fn select(dataset: &Dataset, names: &[&str]) -> ColumnSelection {
        let mut selection = init_selection(dataset);
        for name in names {
            selection.insert(name.to_string(), true);
        }
        selection
    }

    #[test]
    fn selection_keeps_dataset_order() {
        let ds = load_bytes(b"a,b,c\n1,2,3\n").unwrap();
        let selection = select(&ds, &["c", "a"]);
        assert_eq!(selected_columns(&ds, &selection).unwrap(), vec!["a", "c"]);
    }

    #[test]
    fn single_selection_is_insufficient() {
        let ds = load_bytes(b"id,x,y\na,1,2\n").unwrap();
        let selection = select(&ds, &["x"]);
        assert!(matches!(
            selected_columns(&ds, &selection),
            Err(PipelineError::InsufficientColumns { selected: 1 })
        ));
        assert!(matches!(
            selected_columns(&ds, &init_selection(&ds)),
            Err(PipelineError::InsufficientColumns { selected: 0 })
        ));
    }

    #[test]
    fn text_columns_are_not_numeric() {
        let ds = load_bytes(b"id,x,flag\na,1,true\nb,2,false\n").unwrap();
        let cols = vec!["id".to_string(), "x".to_string(), "flag".to_string()];
        assert!(matches!(
            numeric_subset(&ds, &cols),
            Err(PipelineError::InsufficientNumericColumns { found: 1 })
        ));
    }

    #[test]
    fn drops_only_fully_missing_rows() {
        let ds = load_bytes(b"id,x,y\na,1,\nb,,\nc,,3\nd,4,5\n").unwrap();
        let cols = vec!["id".to_string(), "x".to_string(), "y".to_string()];
        let subset = numeric_subset(&ds, &cols).unwrap();

        assert_eq!(subset.columns, vec!["x", "y"]);
        assert_eq!(subset.source_rows, vec![0, 2, 3]);
        assert_eq!(subset.values[0], vec![Some(1.0), None, Some(4.0)]);
        assert_eq!(subset.values[1], vec![None, Some(3.0), Some(5.0)]);
        assert_eq!(subset.paired(0, 1), vec![(4.0, 5.0)]);
    }

    #[test]
    fn all_missing_rows_leave_nothing() {
        let ds = load_bytes(b"id,x,y\na,,\nb,NA,\n").unwrap();
        let cols = vec!["x".to_string(), "y".to_string()];
        assert!(matches!(
            numeric_subset(&ds, &cols),
            Err(PipelineError::EmptyAfterFiltering)
        ));
    }
}
