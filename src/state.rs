use std::path::PathBuf;

use crate::config::DashboardConfig;
use crate::data::filter::filter_by_years;
use crate::data::model::{Dataset, YearRange};
use crate::views::{assemble, Dashboard, AWAITING_INPUT_MESSAGE};

pub const NO_DATASET_NOTICE: &str = "Nenhum conjunto de dados carregado.";
pub const EMPTY_DATASET_NOTICE: &str = "Conjunto de dados carregado, mas sem registros.";

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Holds the last loaded dataset and the selected years. The views are a
/// pure function of those two and are rebuilt whenever either changes.
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Display name of the file the dataset came from.
    pub source_name: Option<String>,

    /// Selected `[start_year, end_year]`.
    pub selection: YearRange,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Suggested target for JSON export.
    pub export_path: PathBuf,

    /// Views for the current dataset and selection (cached).
    dashboard: Dashboard,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&DashboardConfig::default())
    }
}

impl AppState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            dataset: None,
            source_name: None,
            selection: YearRange::new(0, 0),
            status_message: None,
            export_path: config.export_path.clone(),
            dashboard: Dashboard::AwaitingInput {
                message: AWAITING_INPUT_MESSAGE,
            },
        }
    }

    /// Ingest a newly loaded dataset and select its full year span.
    pub fn set_dataset(&mut self, dataset: Dataset, source_name: impl Into<String>) {
        self.selection = dataset.year_range().unwrap_or(YearRange::new(0, 0));
        self.dataset = Some(dataset);
        self.source_name = Some(source_name.into());
        self.status_message = None;
        self.refresh();
    }

    /// Record a failed load. The previous dataset, if any, stays in place.
    pub fn set_load_error(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Observed year span of the loaded dataset: the slider limits.
    pub fn year_bounds(&self) -> Option<YearRange> {
        self.dataset.as_ref().and_then(Dataset::year_range)
    }

    /// Why the year filters cannot be shown, or `None` when they can.
    pub fn filter_notice(&self) -> Option<&'static str> {
        match &self.dataset {
            None => Some(NO_DATASET_NOTICE),
            Some(ds) if ds.is_empty() => Some(EMPTY_DATASET_NOTICE),
            Some(_) => None,
        }
    }

    /// Move the lower bound, clamped to the observed span. The bounds are
    /// not reordered: start past end selects nothing.
    pub fn set_start_year(&mut self, year: i32) {
        let year = self.year_bounds().map_or(year, |b| b.clamp(year));
        if year != self.selection.start {
            self.selection.start = year;
            log::debug!("Selection changed to {}", self.selection);
            self.refresh();
        }
    }

    /// Move the upper bound, clamped to the observed span.
    pub fn set_end_year(&mut self, year: i32) {
        let year = self.year_bounds().map_or(year, |b| b.clamp(year));
        if year != self.selection.end {
            self.selection.end = year;
            log::debug!("Selection changed to {}", self.selection);
            self.refresh();
        }
    }

    /// Compute the dashboard from scratch for the current dataset and
    /// selection.
    pub fn render(&self) -> Dashboard {
        match &self.dataset {
            None => Dashboard::AwaitingInput {
                message: AWAITING_INPUT_MESSAGE,
            },
            Some(ds) => {
                let filtered = filter_by_years(ds, self.selection);
                if filtered.is_empty() {
                    log::debug!("No records in {}", self.selection);
                }
                Dashboard::Ready(Box::new(assemble(&filtered)))
            }
        }
    }

    /// Views for the current dataset and selection.
    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    fn refresh(&mut self) {
        self.dashboard = self.render();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_str;

    const CSV: &str = "\
referencia,area_total_desmatamento,acre,amazonas,amapa,maranhao,mato_grosso,para,rondonia,roraima,tocantins
2020,100,10,10,10,10,10,10,10,10,20
2021,200,20,20,20,20,20,20,20,20,40
2022,300,30,30,30,30,30,30,30,30,60
";

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(load_csv_str(CSV).unwrap(), "prodes.csv");
        state
    }

    fn ready(state: &AppState) -> &crate::views::DashboardViews {
        match state.dashboard() {
            Dashboard::Ready(views) => &**views,
            other => panic!("expected views, got {other:?}"),
        }
    }

    #[test]
    fn awaiting_input_until_a_file_is_loaded() {
        let state = AppState::default();
        assert!(matches!(
            state.dashboard(),
            Dashboard::AwaitingInput { message } if *message == AWAITING_INPUT_MESSAGE
        ));
        assert_eq!(state.year_bounds(), None);
    }

    #[test]
    fn loading_selects_full_span() {
        let state = loaded();
        assert_eq!(state.selection, YearRange::new(2020, 2022));
        assert_eq!(ready(&state).table.rows.len(), 3);
    }

    #[test]
    fn bounds_are_clamped_to_observed_years() {
        let mut state = loaded();
        state.set_start_year(1900);
        state.set_end_year(3000);
        assert_eq!(state.selection, YearRange::new(2020, 2022));

        state.set_start_year(2021);
        assert_eq!(ready(&state).total_series.points.len(), 2);
    }

    #[test]
    fn start_after_end_renders_empty_views() {
        let mut state = loaded();
        state.set_end_year(2020);
        state.set_start_year(2022);

        let views = ready(&state);
        assert!(views.total_series.points.is_empty());
        assert!(views.table.rows.is_empty());
        assert!(views.state_totals.bars.iter().all(|b| b.summed_area == 0.0));
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let mut state = loaded();
        let before = state.render();
        state.set_load_error("Error: row 1: 'abcd' is not a 4-digit year");
        assert!(state.status_message.is_some());
        assert_eq!(state.dashboard(), &before);
    }

    #[test]
    fn header_only_file_is_loaded_but_has_no_filters() {
        let mut state = AppState::default();
        assert_eq!(state.filter_notice(), Some(NO_DATASET_NOTICE));

        let header = CSV.lines().next().unwrap();
        state.set_dataset(load_csv_str(header).unwrap(), "empty.csv");
        assert!(state.dataset.is_some());
        assert_eq!(state.year_bounds(), None);
        assert_eq!(state.filter_notice(), Some(EMPTY_DATASET_NOTICE));
        let views = ready(&state);
        assert_eq!(views.visible_records, 0);
        assert!(views.table.rows.is_empty());

        state.set_dataset(load_csv_str(CSV).unwrap(), "prodes.csv");
        assert_eq!(state.filter_notice(), None);
    }

    #[test]
    fn visible_count_follows_selection() {
        let mut state = loaded();
        assert_eq!(ready(&state).visible_records, 3);
        state.set_end_year(2021);
        assert_eq!(ready(&state).visible_records, 2);
    }

    #[test]
    fn new_file_resets_selection() {
        let mut state = loaded();
        state.set_start_year(2022);
        let second = load_csv_str(&CSV.replace("2022", "2030")).unwrap();
        state.set_dataset(second, "other.csv");
        assert_eq!(state.selection, YearRange::new(2020, 2030));
        assert_eq!(state.source_name.as_deref(), Some("other.csv"));
    }
}
