//! Custom widgets for chart rendering

pub mod ratio_bar;

pub use ratio_bar::RatioBar;
