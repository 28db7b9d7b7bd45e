use std::io::Write;

use serde::Serialize;

use crate::data::aggregate::{
    scatter_series, stacked_by_year, state_totals, total_series, SeriesPoint, StateTotal,
    YearComposition,
};
use crate::data::filter::FilteredDataset;
use crate::data::loader::required_columns;
use crate::data::model::{Record, State, YearRange};

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

pub const YEAR_LABEL: &str = "Ano";
pub const TOTAL_AREA_LABEL: &str = "Área Total Desmatada (km²)";
pub const AREA_LABEL: &str = "Área Desmatada (km²)";
pub const STATE_LABEL: &str = "Estado";

pub const TOTAL_SERIES_TITLE: &str = "Evolução do Desmatamento Total";
pub const STATE_TOTALS_TITLE: &str = "Desmatamento Total por Estado";
pub const SCATTER_TITLE: &str = "Dispersão: Desmatamento Total vs. Ano";
pub const STACKED_TITLE: &str = "Contribuição dos Estados no Desmatamento ao Longo dos Anos";
pub const TABLE_TITLE: &str = "Visão Geral";

pub const AWAITING_INPUT_MESSAGE: &str = "Por favor, carregue o arquivo para iniciar a análise.";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisLabels {
    pub x: &'static str,
    pub y: &'static str,
}

// ---------------------------------------------------------------------------
// Render contracts
// ---------------------------------------------------------------------------

/// `(year, area)` points for the area chart and the scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesView {
    pub title: &'static str,
    pub axes: AxisLabels,
    pub points: Vec<SeriesPoint>,
}

/// Horizontal bars, one per state, ascending by area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateTotalsView {
    pub title: &'static str,
    pub axes: AxisLabels,
    pub bars: Vec<StateTotal>,
}

/// Stacked bars: one column per record, one segment per state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedView {
    pub title: &'static str,
    pub axes: AxisLabels,
    /// Stacking order, bottom to top.
    pub series: Vec<State>,
    pub years: Vec<YearComposition>,
}

/// Flat echo of the filtered records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub title: &'static str,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Record>,
}

impl TableView {
    /// Cells of one row, in `columns` order.
    pub fn cells(record: &Record) -> Vec<String> {
        let mut cells = Vec::with_capacity(2 + State::ALL.len());
        cells.push(record.year.to_string());
        cells.push(record.total_deforested_area.to_string());
        cells.extend(record.states.iter().map(|(_, v)| v.to_string()));
        cells
    }
}

/// Everything one render pass needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardViews {
    pub range: YearRange,
    /// Records inside `range`.
    pub visible_records: usize,
    pub total_series: SeriesView,
    pub state_totals: StateTotalsView,
    pub scatter: SeriesView,
    pub stacked: StackedView,
    pub table: TableView,
}

/// What the UI shows: either the waiting notice or the full set of views.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Dashboard {
    AwaitingInput { message: &'static str },
    Ready(Box<DashboardViews>),
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Compute all views for one selection. Pure: the same input always gives
/// the same output, and order established by the aggregations is kept.
pub fn assemble(filtered: &FilteredDataset<'_>) -> DashboardViews {
    let series_axes = AxisLabels {
        x: YEAR_LABEL,
        y: TOTAL_AREA_LABEL,
    };

    DashboardViews {
        range: filtered.range,
        visible_records: filtered.len(),
        total_series: SeriesView {
            title: TOTAL_SERIES_TITLE,
            axes: series_axes,
            points: total_series(filtered),
        },
        state_totals: StateTotalsView {
            title: STATE_TOTALS_TITLE,
            axes: AxisLabels {
                x: AREA_LABEL,
                y: STATE_LABEL,
            },
            bars: state_totals(filtered),
        },
        scatter: SeriesView {
            title: SCATTER_TITLE,
            axes: series_axes,
            points: scatter_series(filtered),
        },
        stacked: StackedView {
            title: STACKED_TITLE,
            axes: AxisLabels {
                x: YEAR_LABEL,
                y: AREA_LABEL,
            },
            series: State::ALL.to_vec(),
            years: stacked_by_year(filtered),
        },
        table: TableView {
            title: TABLE_TITLE,
            columns: required_columns().collect(),
            rows: filtered.records().iter().map(|r| (*r).clone()).collect(),
        },
    }
}

/// Write the dashboard as pretty-printed JSON.
pub fn export_json<W: Write>(dashboard: &Dashboard, writer: W) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, dashboard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::filter_by_years;
    use crate::data::loader::load_csv_str;

    const SAMPLE: &str = "\
referencia,area_total_desmatamento,acre,amazonas,amapa,maranhao,mato_grosso,para,rondonia,roraima,tocantins
2019,10129,682,1434,32,237,1702,3862,1257,590,23
2018,7536,444,1045,24,253,1490,2744,1316,195,25
2020,10851,706,1512,24,336,1779,4899,1273,297,25
";

    #[test]
    fn labels_and_titles() {
        let ds = load_csv_str(SAMPLE).unwrap();
        let views = assemble(&filter_by_years(&ds, ds.year_range().unwrap()));

        assert_eq!(views.total_series.title, "Evolução do Desmatamento Total");
        assert_eq!(views.total_series.axes.x, "Ano");
        assert_eq!(views.state_totals.axes.y, "Estado");
        assert_eq!(views.state_totals.axes.x, "Área Desmatada (km²)");
        assert_eq!(views.scatter.axes.y, "Área Total Desmatada (km²)");
        assert_eq!(views.table.title, "Visão Geral");
        assert_eq!(views.table.columns.len(), 11);
        assert_eq!(views.table.columns[0], "referencia");
    }

    #[test]
    fn identity_filter_echoes_the_dataset() {
        let ds = load_csv_str(SAMPLE).unwrap();
        let views = assemble(&filter_by_years(&ds, ds.year_range().unwrap()));
        assert_eq!(views.table.rows.as_slice(), ds.records());
    }

    #[test]
    fn keeps_aggregation_order() {
        let ds = load_csv_str(SAMPLE).unwrap();
        let views = assemble(&filter_by_years(&ds, YearRange::new(2018, 2020)));

        let years: Vec<i32> = views.total_series.points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2019, 2018, 2020]);
        let stacked: Vec<i32> = views.stacked.years.iter().map(|c| c.year).collect();
        assert_eq!(stacked, years);

        let bars = &views.state_totals.bars;
        assert_eq!(bars.first().unwrap().state, State::Tocantins);
        assert_eq!(bars.last().unwrap().state, State::Para);
        assert_eq!(bars.last().unwrap().summed_area, 3862.0 + 2744.0 + 4899.0);
    }

    #[test]
    fn table_cells_follow_column_order() {
        let ds = load_csv_str(SAMPLE).unwrap();
        let cells = TableView::cells(&ds.records()[0]);
        assert_eq!(cells.len(), 11);
        assert_eq!(cells[0], "2019");
        assert_eq!(cells[1], "10129");
        assert_eq!(cells[6], "1702");
    }

    #[test]
    fn export_tags_status() {
        let mut buf = Vec::new();
        export_json(
            &Dashboard::AwaitingInput {
                message: AWAITING_INPUT_MESSAGE,
            },
            &mut buf,
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["status"], "awaiting_input");

        let ds = load_csv_str(SAMPLE).unwrap();
        let views = assemble(&filter_by_years(&ds, YearRange::new(2020, 2020)));
        let mut buf = Vec::new();
        export_json(&Dashboard::Ready(Box::new(views)), &mut buf).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["state_totals"]["bars"][8]["state"], "para");
        assert_eq!(json["table"]["rows"][0]["referencia"], 2020);
    }
}
