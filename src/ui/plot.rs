use chrono::Datelike;
use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::color::generate_palette;
use crate::data::model::{Record, parse_date};
use crate::state::AppState;

type Figure = fn(&Record) -> Option<f64>;

fn revenue(r: &Record) -> Option<f64> {
    r.revenue
}

fn net_income(r: &Record) -> Option<f64> {
    r.net_income
}

fn gross_profit(r: &Record) -> Option<f64> {
    r.gross_profit
}

fn operating_income(r: &Record) -> Option<f64> {
    r.operating_income
}

/// Figures drawn in the trend plot, with their legend names.
const SERIES: [(&str, Figure); 4] = [
    ("Revenue", revenue),
    ("Net Income", net_income),
    ("Gross Profit", gross_profit),
    ("Operating Income", operating_income),
];

/// Points `[fractional year, value]` for one figure, ordered by date.
/// Records without a parseable date or without the figure are left out.
pub fn series_points(records: &[Record], value: Figure) -> Vec<[f64; 2]> {
    let mut points: Vec<[f64; 2]> = records
        .iter()
        .filter_map(|r| {
            let date = parse_date(&r.date)?;
            let x = f64::from(date.year()) + f64::from(date.ordinal0()) / 366.0;
            Some([x, value(r)?])
        })
        .collect();
    points.sort_by(|a, b| a[0].total_cmp(&b[0]));
    points
}

// ---------------------------------------------------------------------------
// Trend plot (bottom panel)
// ---------------------------------------------------------------------------

/// Plot the main figures of the current view over time.
pub fn trend_plot(ui: &mut Ui, state: &AppState) {
    let Some(records) = state.view.current_view().records() else {
        return;
    };

    let colors = generate_palette(SERIES.len());

    Plot::new("trend_plot")
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("USD")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for ((name, value), color) in SERIES.iter().zip(colors) {
                let points: PlotPoints = series_points(records, *value).into_iter().collect();
                plot_ui.line(Line::new(points).name(*name).color(color).width(1.5));
            }
        });
}
