use std::ops::RangeInclusive;

use eframe::egui::{self, Align2, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::color::{state_color, ColorScale};
use crate::state::AppState;
use crate::views::{Dashboard, DashboardViews, SeriesView, StackedView, StateTotalsView, TableView};

const CHART_HEIGHT: f32 = 320.0;
const AREA_COLOR: Color32 = Color32::from_rgb(99, 110, 250);

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the dashboard in the central panel.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    ui.heading("Análise do Desmatamento na Amazônia Legal");
    ui.label(RichText::new("Dados disponibilizados pelo PRODES").italics());
    ui.separator();

    let views = match state.dashboard() {
        Dashboard::Ready(views) => views,
        Dashboard::AwaitingInput { message } => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(format!("{message}  (Arquivo → Abrir…)"));
            });
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            charts(ui, views);
        });
}

fn charts(ui: &mut Ui, views: &DashboardViews) {
    ui.heading("Análises Gráficas");
    total_series_chart(ui, &views.total_series);
    ui.add_space(12.0);
    state_totals_chart(ui, &views.state_totals);
    ui.add_space(12.0);
    scatter_chart(ui, &views.scatter);
    ui.add_space(12.0);
    stacked_chart(ui, &views.stacked);
    ui.add_space(12.0);
    table(ui, &views.table);
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

fn year_ticks(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    if mark.value.fract() == 0.0 {
        format!("{:.0}", mark.value)
    } else {
        String::new()
    }
}

fn chart_frame(id: &str, x_label: &str, y_label: &str) -> Plot<'static> {
    Plot::new(id.to_string())
        .height(CHART_HEIGHT)
        .x_axis_label(x_label.to_string())
        .y_axis_label(y_label.to_string())
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_zoom(true)
}

/// Filled area of total deforestation per year.
fn total_series_chart(ui: &mut Ui, view: &SeriesView) {
    ui.strong(view.title);
    let points: PlotPoints = view
        .points
        .iter()
        .map(|p| [p.year as f64, p.value])
        .collect();

    chart_frame("total_series", view.axes.x, view.axes.y)
        .x_axis_formatter(year_ticks)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name(view.axes.y)
                    .color(AREA_COLOR)
                    .fill(0.0)
                    .width(2.0),
            );
        });
}

/// Horizontal bars, smallest state at the bottom, with the value printed
/// past the end of each bar.
fn state_totals_chart(ui: &mut Ui, view: &StateTotalsView) {
    ui.strong(view.title);

    let labels: Vec<&'static str> = view.bars.iter().map(|t| t.state.column()).collect();
    let bars: Vec<Bar> = view
        .bars
        .iter()
        .enumerate()
        .map(|(i, t)| {
            Bar::new(i as f64, t.summed_area)
                .name(t.state.display_name())
                .fill(state_color(t.state))
        })
        .collect();

    chart_frame("state_totals", view.axes.x, view.axes.y)
        .y_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).map(|s| s.to_string()).unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().width(0.7));
            for (i, t) in view.bars.iter().enumerate() {
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(t.summed_area, i as f64),
                        format!(" {:.0}", t.summed_area),
                    )
                    .anchor(Align2::LEFT_CENTER),
                );
            }
        });
}

/// One marker per year; radius and colour both follow the value.
fn scatter_chart(ui: &mut Ui, view: &SeriesView) {
    ui.strong(view.title);
    let scale = ColorScale::spanning(view.points.iter().map(|p| p.value));

    chart_frame("scatter", view.axes.x, view.axes.y)
        .x_axis_formatter(year_ticks)
        .show(ui, |plot_ui| {
            for p in &view.points {
                let t = scale.normalize(p.value);
                plot_ui.points(
                    Points::new(PlotPoints::from(vec![[p.year as f64, p.value]]))
                        .radius(4.0 + 12.0 * t)
                        .color(scale.color_for(p.value))
                        .name(p.year.to_string()),
                );
            }
        });
}

/// One bar per record, one coloured segment per state.
fn stacked_chart(ui: &mut Ui, view: &StackedView) {
    ui.strong(view.title);

    let mut charts: Vec<BarChart> = Vec::with_capacity(view.series.len());
    for &state in &view.series {
        let bars: Vec<Bar> = view
            .years
            .iter()
            .map(|c| Bar::new(c.year as f64, c.areas[state]).name(c.year.to_string()))
            .collect();
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(state.column())
            .color(state_color(state))
            .width(0.8)
            .stack_on(&below);
        charts.push(chart);
    }

    chart_frame("stacked", view.axes.x, view.axes.y)
        .x_axis_formatter(year_ticks)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

fn table(ui: &mut Ui, view: &TableView) {
    ui.heading(view.title);

    if view.rows.is_empty() {
        ui.label("Nenhum registro no período selecionado.");
        return;
    }

    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(Column::auto().at_least(70.0), view.columns.len())
            .header(20.0, |mut header| {
                for name in &view.columns {
                    header.col(|ui| {
                        ui.strong(*name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, view.rows.len(), |mut row| {
                    let record = &view.rows[row.index()];
                    for cell in TableView::cells(record) {
                        row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}
