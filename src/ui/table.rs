use eframe::egui::{self, Align, CursorIcon, Layout, RichText, Sense, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::amount_color;
use crate::data::model::Record;
use crate::data::sort::{SortKey, SortSpec};
use crate::data::view::ViewStatus;
use crate::state::AppState;
use crate::ui::format::usd_or_missing;

const ROW_HEIGHT: f32 = 22.0;

/// Header text for a sortable column: label plus the direction marker when
/// it is the active key.
pub fn header_text(key: SortKey, sort: &SortSpec) -> String {
    match sort.direction_for(key) {
        Some(direction) => format!("{} {}", key.label(), direction.arrow()),
        None => key.label().to_string(),
    }
}

/// Render the records table (central panel).
pub fn records_table(ui: &mut Ui, state: &mut AppState) {
    let records = match state.view.current_view() {
        ViewStatus::Pending => {
            pending(ui, state);
            return;
        }
        ViewStatus::Ready(records) => records,
    };

    if records.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No records match the current filters.");
        });
        return;
    }

    let sort = *state.view.sort();
    let dark = ui.visuals().dark_mode;
    let mut clicked: Option<SortKey> = None;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(Column::auto().at_least(110.0), 6)
        .header(ROW_HEIGHT + 4.0, |mut header| {
            for key in SortKey::ALL {
                header.col(|ui: &mut Ui| {
                    let label = egui::Label::new(RichText::new(header_text(key, &sort)).strong())
                        .sense(Sense::click());
                    if ui.add(label).on_hover_cursor(CursorIcon::PointingHand).clicked() {
                        clicked = Some(key);
                    }
                });
            }
            for title in ["Gross Profit", "EPS", "Operating Income"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, records.len(), |mut row| {
                let record: &Record = &records[row.index()];
                row.col(|ui: &mut Ui| {
                    ui.label(&record.date);
                });
                for value in [
                    record.revenue,
                    record.net_income,
                    record.gross_profit,
                    record.eps,
                    record.operating_income,
                ] {
                    row.col(|ui: &mut Ui| {
                        let mut text = RichText::new(usd_or_missing(value));
                        if let Some(c) = amount_color(value, dark) {
                            text = text.color(c);
                        }
                        ui.label(text);
                    });
                }
            });
        });

    if let Some(key) = clicked {
        state.sort_by(key);
    }
}

/// Spinner while the first retrieval is in flight, a hint otherwise.
fn pending(ui: &mut Ui, state: &AppState) {
    ui.centered_and_justified(|ui: &mut Ui| {
        if state.loading {
            ui.add(egui::Spinner::new().size(32.0));
        } else {
            ui.heading("Open a file to view records  (File → Open…)");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sort::SortDirection;

    #[test]
    fn header_marks_only_active_column() {
        let sort = SortSpec::default();
        assert_eq!(header_text(SortKey::Date, &sort), "Date ▽");
        assert_eq!(header_text(SortKey::Revenue, &sort), "Revenue");

        let sort = SortSpec::new(SortKey::NetIncome, SortDirection::Ascending);
        assert_eq!(header_text(SortKey::NetIncome, &sort), "Net Income △");
    }
}
