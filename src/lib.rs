pub mod app;
pub mod cli;
pub mod config;
pub mod dropdowns;
pub mod errors;
pub mod event;
pub mod form;
pub mod ids;
pub mod logging;
pub mod multiselect;
pub mod sample;
pub mod schema;
pub mod section;
pub mod session;
pub mod spreadsheet;
pub mod store;
pub mod tui;
pub mod types;
pub mod ui;
