use eframe::egui::{self, Color32, RichText, TextEdit, Ui};

use crate::data::filter::FilterAxis;
use crate::state::{AppState, Source};

// ---------------------------------------------------------------------------
// Left side panel – bound inputs
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    egui::Grid::new("filter_grid")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            for axis in FilterAxis::ALL {
                ui.label(format!("{}:", axis.label()));

                let mut text = state.inputs.get(&axis).cloned().unwrap_or_default();
                let hint = if axis.is_year() { "YYYY" } else { "$" };
                let response = ui.add(
                    TextEdit::singleline(&mut text)
                        .hint_text(hint)
                        .desired_width(140.0),
                );
                if response.changed() {
                    state.edit_bound(axis, &text);
                }
                ui.end_row();
            }
        });

    ui.add_space(6.0);
    let active = state.view.filter().active_count();
    ui.horizontal(|ui: &mut Ui| {
        if ui
            .add_enabled(active > 0, egui::Button::new("Clear"))
            .clicked()
        {
            state.clear_filters();
        }
        if active > 0 {
            ui.weak(format!("{active} active"));
        }
    });

    if let Some(msg) = &state.input_error {
        ui.label(RichText::new(msg).color(Color32::RED));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(records) = state.view.current_view().records() {
            ui.label(format!(
                "{} records loaded, {} shown",
                state.view.raw_len(),
                records.len()
            ));
        } else if state.loading {
            ui.label("Loading…");
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open financial records")
        .add_filter("Supported files", &["json", "csv", "parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        state.load_from(Source::File(path));
    }
}
