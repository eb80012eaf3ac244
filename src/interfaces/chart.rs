//! Native chart window: close series, trend-coloured markers and the
//! out-of-sample predictions.

use crate::application::workflow::EvaluationReport;
use crate::domain::ports::SeriesSink;
use crate::domain::types::{ChartPoint, TrendSign};
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

const CLOSE_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 200, 255);
const PREDICTION_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 165, 0);
const UP_COLOR: egui::Color32 = egui::Color32::from_rgb(46, 160, 67);
const DOWN_COLOR: egui::Color32 = egui::Color32::from_rgb(248, 81, 73);

fn x_of(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

/// Collects the series on `render` and shows it in a window on `show`.
#[derive(Default)]
pub struct ChartWindow {
    title: String,
    points: Vec<ChartPoint>,
    summary: Option<String>,
}

impl ChartWindow {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_report(mut self, report: &EvaluationReport) -> Self {
        self.summary = Some(format!(
            "train {} / test {}   RMSE {:.4}   R² {:.4}",
            report.n_train, report.n_test, report.rmse, report.r2
        ));
        self
    }

    /// Blocks until the window is closed.
    pub fn show(self) -> Result<()> {
        let native_options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1100.0, 650.0])
                .with_title(self.title.clone()),
            ..Default::default()
        };

        let title = self.title.clone();
        eframe::run_native(&title, native_options, Box::new(|_cc| Ok(Box::new(self))))
            .map_err(|e| anyhow::anyhow!("Eframe error: {}", e))
    }
}

impl SeriesSink for ChartWindow {
    fn render(&mut self, points: &[ChartPoint]) -> Result<()> {
        self.points = points.to_vec();
        Ok(())
    }
}

impl eframe::App for ChartWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(egui::RichText::new(&self.title).strong().size(16.0));
            if let Some(summary) = &self.summary {
                ui.label(summary.as_str());
            }
            ui.add_space(8.0);

            if self.points.is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label("No series to plot.");
                });
                return;
            }

            let close: Vec<[f64; 2]> = self
                .points
                .iter()
                .map(|p| [x_of(p.date), p.close])
                .collect();
            let (up, down): (Vec<_>, Vec<_>) = self
                .points
                .iter()
                .partition(|p| p.trend_3_day == TrendSign::Up);
            let up: Vec<[f64; 2]> = up.iter().map(|p| [x_of(p.date), p.close]).collect();
            let down: Vec<[f64; 2]> = down.iter().map(|p| [x_of(p.date), p.close]).collect();
            let predicted: Vec<[f64; 2]> = self
                .points
                .iter()
                .filter_map(|p| p.prediction.map(|v| [x_of(p.date), v]))
                .collect();

            Plot::new("close_series_plot")
                .legend(Legend::default())
                .x_axis_formatter(|mark, _range| {
                    NaiveDate::from_num_days_from_ce_opt(mark.value as i32)
                        .map(|d| d.to_string())
                        .unwrap_or_default()
                })
                .show(ui, |plot_ui| {
                    plot_ui.line(
                        Line::new("close", PlotPoints::from(close))
                            .color(CLOSE_COLOR)
                            .width(1.5),
                    );
                    plot_ui.points(
                        Points::new("trend +1", PlotPoints::from(up))
                            .color(UP_COLOR)
                            .radius(2.5),
                    );
                    plot_ui.points(
                        Points::new("trend -1", PlotPoints::from(down))
                            .color(DOWN_COLOR)
                            .radius(2.5),
                    );
                    if !predicted.is_empty() {
                        plot_ui.line(
                            Line::new("prediction", PlotPoints::from(predicted))
                                .color(PREDICTION_COLOR)
                                .width(1.5),
                        );
                    }
                });
        });
    }
}
