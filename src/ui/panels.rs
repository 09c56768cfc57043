use eframe::egui::{self, Checkbox, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::correlation::CorrelationMethod;
use crate::data::export::EXPORT_FILE_NAME;
use crate::error::{PipelineError, Severity};
use crate::pipeline::{MAX_SCATTER_COLUMNS, THRESHOLD_STEP};
use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Left side panel – field selection and analysis controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Analysis");
    ui.separator();

    let columns: Vec<(String, &'static str)> = match &state.dataset {
        Some(ds) => ds
            .columns
            .iter()
            .map(|c| (c.name.clone(), c.kind.label()))
            .collect(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- 1) Field toggles ----
            ui.strong("1) Fields to analyse");
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_columns();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_columns();
                }
            });
            for (name, kind) in &columns {
                let mut checked = state.is_selected(name);
                ui.horizontal(|ui: &mut Ui| {
                    if ui.checkbox(&mut checked, name.as_str()).changed() {
                        state.toggle_column(name);
                    }
                    ui.label(RichText::new(*kind).weak().small());
                });
            }
            ui.separator();

            // ---- 2) Method ----
            ui.strong("2) Correlation method");
            let current = state.config.method;
            egui::ComboBox::from_id_salt("method")
                .selected_text(current.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for method in CorrelationMethod::ALL {
                        if ui.selectable_label(current == method, method.label()).clicked() {
                            state.set_method(method);
                        }
                    }
                });
            ui.separator();

            // ---- 3) Threshold ----
            ui.strong("3) Minimum |r| shown");
            let mut threshold = state.config.threshold;
            if ui
                .add(Slider::new(&mut threshold, 0.0..=1.0).step_by(THRESHOLD_STEP))
                .changed()
            {
                state.set_threshold(threshold);
            }
            ui.separator();

            // ---- 4) Scatter matrix columns ----
            ui.strong(format!("4) Scatter matrix (max {MAX_SCATTER_COLUMNS})"));
            let Some(out) = state.artifacts() else {
                ui.label(RichText::new("Select at least two numeric fields.").weak());
                return;
            };
            let numeric = out.numeric.columns.clone();
            let chosen = out.scatter_columns.clone();
            for col in &numeric {
                let mut on = chosen.contains(col);
                let enabled = on || chosen.len() < MAX_SCATTER_COLUMNS;
                if ui
                    .add_enabled(enabled, Checkbox::new(&mut on, col.as_str()))
                    .changed()
                {
                    state.toggle_scatter_column(col);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open CSV…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let has_output = state.artifacts().is_some();
            if ui
                .add_enabled(has_output, egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                save_csv_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(has_output, egui::Button::new("Export heatmap PNG…"))
                .clicked()
            {
                save_heatmap_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let name = state.source_name.as_deref().unwrap_or("dataset");
            ui.label(format!(
                "{name}: {} rows, {} columns ({} numeric)",
                ds.len(),
                ds.columns.len(),
                ds.numeric_column_count()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().weak_text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

/// Tab strip selecting the central view.
pub fn view_tabs(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for view in View::ALL {
            ui.selectable_value(&mut state.view, view, view.label());
        }
    });
}

/// A halted render pass, coloured by severity.
pub fn notice(ui: &mut Ui, error: &PipelineError) {
    let color = match error.severity() {
        Severity::Info => Color32::LIGHT_BLUE,
        Severity::Warning => Color32::from_rgb(230, 170, 30),
        Severity::Error => Color32::RED,
    };
    ui.add_space(8.0);
    ui.label(RichText::new(error.to_string()).color(color).size(15.0));
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open CSV data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn save_csv_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered data")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_csv(&path);
    }
}

pub fn save_heatmap_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export heatmap")
        .set_file_name("correlation_heatmap.png")
        .add_filter("PNG image", &["png"])
        .save_file();

    if let Some(path) = file {
        state.export_heatmap(&path);
    }
}
