use std::path::Path;

use crate::data::correlation::CorrelationMethod;
use crate::data::export::{export_file, export_heatmap_png};
use crate::data::filter::init_selection;
use crate::data::loader::load_file;
use crate::data::model::Dataset;
use crate::error::PipelineError;
use crate::pipeline::{MAX_SCATTER_COLUMNS, RenderArtifacts, UserConfig, render};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which result the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Preview,
    Heatmap,
    ScatterMatrix,
    Summary,
}

impl View {
    pub const ALL: [View; 4] = [View::Preview, View::Heatmap, View::ScatterMatrix, View::Summary];

    pub fn label(self) -> &'static str {
        match self {
            View::Preview => "Data preview",
            View::Heatmap => "Heatmap",
            View::ScatterMatrix => "Scatter matrix",
            View::Summary => "Strong correlations",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// File name of the loaded dataset, for the top bar.
    pub source_name: Option<String>,

    /// Every user control, passed explicitly into the pipeline.
    pub config: UserConfig,

    /// Result of the last pipeline run for `config`.
    pub output: Result<RenderArtifacts, PipelineError>,

    pub view: View,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            source_name: None,
            config: UserConfig::default(),
            output: Err(PipelineError::NoFileProvided),
            view: View::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset with every column toggled off.
    pub fn set_dataset(&mut self, dataset: Dataset, source_name: Option<String>) {
        self.config = UserConfig {
            selection: init_selection(&dataset),
            ..UserConfig::default()
        };
        self.dataset = Some(dataset);
        self.source_name = source_name;
        self.status_message = None;
        self.view = View::Preview;
        self.refresh();
    }

    /// Re-run the pipeline for the current configuration.
    pub fn refresh(&mut self) {
        self.output = match &self.dataset {
            Some(ds) => render(ds, &self.config),
            None => Err(PipelineError::NoFileProvided),
        };
        if let Err(e) = &self.output {
            log::debug!("Render pass halted: {e}");
        }
    }

    pub fn artifacts(&self) -> Option<&RenderArtifacts> {
        self.output.as_ref().ok()
    }

    /// Why the last pipeline run stopped, if it did.
    pub fn halt(&self) -> Option<&PipelineError> {
        self.output.as_ref().err()
    }

    pub fn is_selected(&self, column: &str) -> bool {
        self.config.selection.get(column).copied().unwrap_or(false)
    }

    /// Flip a single column toggle.
    pub fn toggle_column(&mut self, column: &str) {
        let selected = self.config.selection.entry(column.to_string()).or_default();
        *selected = !*selected;
        self.refresh();
    }

    /// Turn every column on.
    pub fn select_all_columns(&mut self) {
        self.set_all_columns(true);
    }

    /// Turn every column off.
    pub fn select_no_columns(&mut self) {
        self.set_all_columns(false);
    }

    fn set_all_columns(&mut self, on: bool) {
        for selected in self.config.selection.values_mut() {
            *selected = on;
        }
        self.refresh();
    }

    pub fn set_method(&mut self, method: CorrelationMethod) {
        if self.config.method != method {
            self.config.method = method;
            self.refresh();
        }
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        let threshold = threshold.clamp(0.0, 1.0);
        if self.config.threshold != threshold {
            self.config.threshold = threshold;
            self.refresh();
        }
    }

    /// Add or remove a column from the scatter matrix. Adding beyond
    /// [`MAX_SCATTER_COLUMNS`] is refused with a status message.
    pub fn toggle_scatter_column(&mut self, column: &str) {
        let Some(out) = self.artifacts() else {
            return;
        };
        let mut columns = out.scatter_columns.clone();
        if let Some(pos) = columns.iter().position(|c| c == column) {
            columns.remove(pos);
        } else if columns.len() >= MAX_SCATTER_COLUMNS {
            self.status_message = Some(format!(
                "The scatter matrix shows at most {MAX_SCATTER_COLUMNS} columns."
            ));
            return;
        } else {
            columns.push(column.to_string());
        }
        self.config.scatter_columns = Some(columns);
        self.refresh();
    }

    // -----------------------------------------------------------------------
    // File operations
    // -----------------------------------------------------------------------

    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => {
                if dataset.is_empty() {
                    log::warn!("{} has a header but no data rows", path.display());
                }
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    dataset.len(),
                    dataset.column_names().collect::<Vec<_>>()
                );
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned());
                self.set_dataset(dataset, name);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    pub fn export_csv(&mut self, path: &Path) {
        let Some(out) = self.artifacts() else {
            return;
        };
        let result = export_file(&out.numeric, path);
        self.status_message = match result {
            Ok(()) => Some(format!("Saved {}", path.display())),
            Err(e) => {
                log::error!("CSV export failed: {e:#}");
                Some(format!("Error: {e:#}"))
            }
        };
    }

    pub fn export_heatmap(&mut self, path: &Path) {
        let Some(out) = self.artifacts() else {
            return;
        };
        let result = export_heatmap_png(&out.filtered, path);
        self.status_message = match result {
            Ok(()) => Some(format!("Saved {}", path.display())),
            Err(e) => {
                log::error!("Heatmap export failed: {e:#}");
                Some(format!("Error: {e:#}"))
            }
        };
    }
}
