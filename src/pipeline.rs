use crate::data::correlation::{
    CorrelationMatrix, CorrelationMethod, StrongPair, correlation_matrix, strong_pairs,
};
use crate::data::filter::{ColumnSelection, NumericSubset, numeric_subset, selected_columns};
use crate::data::model::Dataset;
use crate::error::PipelineError;

/// Most columns the scatter matrix will draw.
pub const MAX_SCATTER_COLUMNS: usize = 6;

/// Threshold slider increment.
pub const THRESHOLD_STEP: f64 = 0.05;

// ---------------------------------------------------------------------------
// User configuration – every control the session exposes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct UserConfig {
    /// Column toggles, keyed by column name.
    pub selection: ColumnSelection,
    pub method: CorrelationMethod,
    /// Minimum |r| shown in the heatmap, in `[0, 1]`.
    pub threshold: f64,
    /// Columns for the scatter matrix; `None` means the first six numeric ones.
    pub scatter_columns: Option<Vec<String>>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            selection: ColumnSelection::new(),
            method: CorrelationMethod::Pearson,
            threshold: 0.0,
            scatter_columns: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Render artifacts – everything the presenter draws
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RenderArtifacts {
    pub method: CorrelationMethod,
    pub numeric: NumericSubset,
    pub matrix: CorrelationMatrix,
    /// `matrix` with entries below the threshold masked out.
    pub filtered: CorrelationMatrix,
    pub strong_pairs: Vec<StrongPair>,
    pub scatter_columns: Vec<String>,
}

/// Run the whole pipeline for one configuration. Pure: the same inputs always
/// give the same artifacts, so it is simply re-run on every change.
pub fn render(dataset: &Dataset, config: &UserConfig) -> Result<RenderArtifacts, PipelineError> {
    let selected = selected_columns(dataset, &config.selection)?;
    let numeric = numeric_subset(dataset, &selected)?;

    let matrix = correlation_matrix(&numeric, config.method);
    let filtered = matrix.masked(config.threshold);
    let strong_pairs = strong_pairs(&matrix);
    let scatter_columns = resolve_scatter_columns(&numeric, config.scatter_columns.as_deref());

    log::debug!(
        "Rendered {} numeric columns × {} rows, {} strong pairs",
        numeric.column_count(),
        numeric.len(),
        strong_pairs.len()
    );

    Ok(RenderArtifacts {
        method: config.method,
        numeric,
        matrix,
        filtered,
        strong_pairs,
        scatter_columns,
    })
}

/// The requested scatter columns that are in the numeric subset, in subset
/// order and capped at [`MAX_SCATTER_COLUMNS`]. With no request, the first
/// `min(6, N)` numeric columns.
pub fn resolve_scatter_columns(subset: &NumericSubset, requested: Option<&[String]>) -> Vec<String> {
    let columns = subset.columns.iter();
    match requested {
        None => columns.take(MAX_SCATTER_COLUMNS).cloned().collect(),
        Some(requested) => columns
            .filter(|c| requested.contains(c))
            .take(MAX_SCATTER_COLUMNS)
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::init_selection;
    use crate::data::loader::load_bytes;

    fn config_for(dataset: &Dataset, names: &[&str]) -> UserConfig {
        let mut selection = init_selection(dataset);
        for name in names {
            selection.insert(name.to_string(), true);
        }
        UserConfig {
            selection,
            ..UserConfig::default()
        }
    }

    #[test]
    fn scenario_perfect_positive() {
        let ds = load_bytes(b"id,x,y\na,1,2\nb,2,4\nc,3,6\nd,4,8\n").unwrap();
        let out = render(&ds, &config_for(&ds, &["x", "y"])).unwrap();
        assert_eq!(out.matrix.get_by_name("x", "y"), Some(1.0));
        assert_eq!(out.matrix.get_by_name("y", "x"), Some(1.0));
    }

    #[test]
    fn scenario_perfect_negative() {
        let ds = load_bytes(b"id,x,y\na,1,8\nb,2,6\nc,3,4\nd,4,2\n").unwrap();
        let out = render(&ds, &config_for(&ds, &["x", "y"])).unwrap();
        assert_eq!(out.matrix.get_by_name("x", "y"), Some(-1.0));
    }

    #[test]
    fn scenario_single_column_selected() {
        let ds = load_bytes(b"id,x,y\na,1,2\nb,2,4\n").unwrap();
        let err = render(&ds, &config_for(&ds, &["x"])).unwrap_err();
        assert!(matches!(err, PipelineError::InsufficientColumns { selected: 1 }));
    }

    #[test]
    fn scenario_weak_entry_masked() {
        let ds = load_bytes(b"x,y\n1,1\n2,3\n3,2\n4,2.5\n").unwrap();
        let mut config = config_for(&ds, &["x", "y"]);
        config.threshold = 0.9;
        let out = render(&ds, &config).unwrap();

        let r = out.matrix.get_by_name("x", "y").unwrap();
        assert!(r.abs() > 0.4 && r.abs() < 0.9);
        assert_eq!(out.filtered.get_by_name("x", "y"), None);
        assert_eq!(out.filtered.get_by_name("x", "x"), Some(1.0));
    }

    #[test]
    fn scenario_all_rows_missing() {
        let ds = load_bytes(b"id,x,y\na,,\nb,,\n").unwrap();
        let err = render(&ds, &config_for(&ds, &["id", "x", "y"])).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyAfterFiltering));
    }

    #[test]
    fn text_only_selection_lacks_numeric_columns() {
        let ds = load_bytes(b"id,name,x\na,b,1\n").unwrap();
        let err = render(&ds, &config_for(&ds, &["id", "name", "x"])).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InsufficientNumericColumns { found: 1 }
        ));
    }

    #[test]
    fn spearman_method_is_applied() {
        let ds = load_bytes(b"x,y\n1,1\n2,8\n3,27\n4,64\n5,125\n").unwrap();
        let mut config = config_for(&ds, &["x", "y"]);
        config.method = CorrelationMethod::Spearman;
        let out = render(&ds, &config).unwrap();
        assert_eq!(out.matrix.get_by_name("x", "y"), Some(1.0));
    }

    #[test]
    fn render_is_repeatable() {
        let ds = load_bytes(b"a,b,c\n1,2,9\n2,1,7\n3,4,3\n4,3,1\n").unwrap();
        let config = config_for(&ds, &["a", "b", "c"]);
        let first = render(&ds, &config).unwrap();
        let second = render(&ds, &config).unwrap();
        assert_eq!(first.matrix, second.matrix);
        assert_eq!(first.strong_pairs, second.strong_pairs);
    }

    #[test]
    fn scatter_columns_default_to_first_six() {
        let header = (0..8).map(|i| format!("c{i}")).collect::<Vec<_>>().join(",");
        let row = (0..8).map(|i| i.to_string()).collect::<Vec<_>>().join(",");
        let csv = format!("{header}\n{row}\n{row}\n");
        let ds = load_bytes(csv.as_bytes()).unwrap();
        let names: Vec<String> = ds.column_names().map(str::to_string).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let out = render(&ds, &config_for(&ds, &refs)).unwrap();
        assert_eq!(out.scatter_columns, vec!["c0", "c1", "c2", "c3", "c4", "c5"]);
    }

    #[test]
    fn scatter_columns_follow_request() {
        let ds = load_bytes(b"a,b,c\n1,2,3\n2,1,5\n").unwrap();
        let mut config = config_for(&ds, &["a", "b", "c"]);
        config.scatter_columns = Some(vec!["c".into(), "a".into(), "missing".into()]);
        let out = render(&ds, &config).unwrap();
        assert_eq!(out.scatter_columns, vec!["a", "c"]);
    }
}
