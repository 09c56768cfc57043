use eframe::egui;

use crate::state::{AppState, View};
use crate::ui::tables::SummaryAction;
use crate::ui::{panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RustyCorrApp {
    pub state: AppState,
}

impl eframe::App for RustyCorrApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: field selection and controls ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: current view ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::view_tabs(ui, &mut self.state);
            ui.separator();

            let state = &self.state;
            let action = match (state.view, &state.dataset, &state.output) {
                (View::Preview, Some(ds), _) => {
                    if let Some(e) = state.halt() {
                        panels::notice(ui, e);
                        ui.separator();
                    }
                    tables::preview_table(ui, ds);
                    SummaryAction::None
                }
                (_, _, Err(e)) => {
                    panels::notice(ui, e);
                    SummaryAction::None
                }
                (View::Preview, None, Ok(_)) => SummaryAction::None,
                (View::Heatmap, _, Ok(out)) => {
                    plot::heatmap(ui, out);
                    SummaryAction::None
                }
                (View::ScatterMatrix, _, Ok(out)) => {
                    plot::scatter_matrix(ui, out);
                    SummaryAction::None
                }
                (View::Summary, _, Ok(out)) => tables::summary(ui, out),
            };
            action.apply(&mut self.state);
        });
    }
}
