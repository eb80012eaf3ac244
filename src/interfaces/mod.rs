pub mod chart;

pub use chart::ChartWindow;
