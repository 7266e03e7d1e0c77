//! Terminal viewer for the business dashboard datasets: category tabs of
//! tables with filtering, sorting and CSV export.

pub mod column;
pub mod controller;
pub mod dataset;
pub mod domain;
pub mod export;
pub mod filter;
pub mod inputter;
pub mod logging;
pub mod model;
pub mod sort;
pub mod ui;
pub mod value;
pub mod view;
pub mod views;
