//! FinViewer – yearly financial statements in a filterable, sortable table.
//!
//! The engine lives in [`data`]: records come in from a provider, pass
//! through the year/revenue/net-income bounds, get sorted, and the result is
//! read back from a [`data::view::ViewController`]. Everything under [`ui`]
//! and [`app`] is the egui front end.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;

pub use data::model::Record;
pub use data::view::{ViewController, ViewStatus};
