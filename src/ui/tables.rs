use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::correlation::STRONG_CORRELATION_MIN;
use crate::data::model::{CellValue, Dataset};
use crate::pipeline::RenderArtifacts;
use crate::state::AppState;
use crate::ui::panels::save_csv_dialog;

/// Rows shown in the raw data preview.
const PREVIEW_ROWS: usize = 20;

// ---------------------------------------------------------------------------
// Raw data preview
// ---------------------------------------------------------------------------

/// First rows of the loaded table, every column, with inferred kinds.
pub fn preview_table(ui: &mut Ui, dataset: &Dataset) {
    let rows = dataset.len().min(PREVIEW_ROWS);
    ui.label(format!("First {rows} of {} rows", dataset.len()));
    ui.add_space(4.0);

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(TableColumn::auto().at_least(60.0), dataset.columns.len())
            .header(36.0, |mut header| {
                for col in &dataset.columns {
                    header.col(|ui: &mut Ui| {
                        ui.vertical(|ui: &mut Ui| {
                            ui.strong(&col.name);
                            ui.label(RichText::new(col.kind.label()).weak().small());
                        });
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, rows, |mut row| {
                    let index = row.index();
                    for col in &dataset.columns {
                        row.col(|ui: &mut Ui| match &col.cells[index] {
                            CellValue::Null => {
                                ui.label(RichText::new("NA").weak());
                            }
                            cell => {
                                ui.label(cell.to_string());
                            }
                        });
                    }
                });
            });
    });
}

// ---------------------------------------------------------------------------
// Strong-pair summary
// ---------------------------------------------------------------------------

/// Plain-language list of strongly correlated pairs plus the export action.
pub fn summary(ui: &mut Ui, out: &RenderArtifacts) -> SummaryAction {
    let mut action = SummaryAction::None;

    ui.label(format!(
        "{} numeric columns, {} rows after dropping empty rows.",
        out.numeric.column_count(),
        out.numeric.len()
    ));
    let cells = out.filtered.size() * out.filtered.size();
    ui.label(format!(
        "{} of {cells} heatmap cells shown with the {} method.",
        out.filtered.defined_count(),
        out.method.label()
    ));
    ui.add_space(6.0);
    ui.strong(format!("Strong correlations (|r| ≥ {STRONG_CORRELATION_MIN:.1})"));

    if out.strong_pairs.is_empty() {
        ui.label("No strongly correlated pairs found.");
    } else {
        for pair in &out.strong_pairs {
            ui.label(format!("• {pair}"));
        }
    }

    ui.add_space(12.0);
    if ui.button("Download filtered data (CSV)…").clicked() {
        action = SummaryAction::ExportCsv;
    }
    action
}

/// Something the summary view asks the app to do after drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryAction {
    None,
    ExportCsv,
}

impl SummaryAction {
    pub fn apply(self, state: &mut AppState) {
        match self {
            SummaryAction::None => {}
            SummaryAction::ExportCsv => save_csv_dialog(state),
        }
    }
}
