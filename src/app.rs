use std::time::Duration;

use eframe::egui;

use crate::config::Config;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FinViewerApp {
    pub state: AppState,
}

impl Default for FinViewerApp {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl FinViewerApp {
    /// Build the app and kick off the configured retrieval, if any.
    pub fn new(config: Config) -> Self {
        let mut state = AppState::new(config);
        state.reload();
        Self { state }
    }
}

impl eframe::App for FinViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_fetch();
        if self.state.loading {
            // Keep polling the retrieval channel while a request is in flight.
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: trend plot ----
        if !self.state.view.is_pending() {
            egui::TopBottomPanel::bottom("trend_panel")
                .default_height(220.0)
                .resizable(true)
                .show(ctx, |ui| {
                    plot::trend_plot(ui, &self.state);
                });
        }

        // ---- Central panel: table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::records_table(ui, &mut self.state);
        });
    }
}
