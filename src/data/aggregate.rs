use serde::Serialize;

use super::filter::FilteredDataset;
use super::model::{State, StateAreas};

/// One `(year, area)` point of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
}

/// A state's deforested area summed over the selected years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateTotal {
    pub state: State,
    pub summed_area: f64,
}

/// Per-state areas for one record, used for stacked bars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearComposition {
    pub year: i32,
    pub areas: StateAreas,
}

/// `(year, total)` for each record, in filtered order. No gap filling.
pub fn total_series(filtered: &FilteredDataset<'_>) -> Vec<SeriesPoint> {
    filtered
        .iter()
        .map(|r| SeriesPoint {
            year: r.year,
            value: r.total_deforested_area,
        })
        .collect()
}

/// Same points as [`total_series`]; the scatter view derives marker size
/// and colour from `value` itself.
pub fn scatter_series(filtered: &FilteredDataset<'_>) -> Vec<SeriesPoint> {
    total_series(filtered)
}

/// Sum of each state's column, sorted ascending by the sum.
///
/// Always nine entries (all zero for an empty selection). The sort is
/// stable, so ties keep [`State::ALL`] order.
pub fn state_totals(filtered: &FilteredDataset<'_>) -> Vec<StateTotal> {
    let mut sums = StateAreas::default();
    for record in filtered.iter() {
        for (state, area) in record.states.iter() {
            sums[state] += area;
        }
    }

    let mut totals: Vec<StateTotal> = sums
        .iter()
        .map(|(state, summed_area)| StateTotal { state, summed_area })
        .collect();
    totals.sort_by(|a, b| a.summed_area.total_cmp(&b.summed_area));
    totals
}

/// Per-state breakdown of every record, in filtered order.
pub fn stacked_by_year(filtered: &FilteredDataset<'_>) -> Vec<YearComposition> {
    filtered
        .iter()
        .map(|r| YearComposition {
            year: r.year,
            areas: r.states,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::filter_by_years;
    use crate::data::model::{Dataset, Record, YearRange};

    /// Two records: acre = 10/20, the other eight states split 90/180.
    fn two_years() -> Dataset {
        let mk = |year: i32, total: f64, acre: f64, rest: f64| {
            let mut states = StateAreas::default();
            for state in State::ALL.iter().skip(1) {
                states[*state] = rest / 8.0;
            }
            states.acre = acre;
            Record {
                year,
                total_deforested_area: total,
                states,
            }
        };
        Dataset::from_records(vec![mk(2020, 100.0, 10.0, 90.0), mk(2021, 200.0, 20.0, 180.0)])
    }

    fn total_of(totals: &[StateTotal], state: State) -> f64 {
        totals.iter().find(|t| t.state == state).unwrap().summed_area
    }

    #[test]
    fn single_year_selection() {
        let ds = two_years();
        let f = filter_by_years(&ds, YearRange::new(2020, 2020));

        assert_eq!(f.len(), 1);
        assert_eq!(total_of(&state_totals(&f), State::Acre), 10.0);
        assert_eq!(
            total_series(&f),
            vec![SeriesPoint {
                year: 2020,
                value: 100.0
            }]
        );
    }

    #[test]
    fn state_totals_sum_each_column() {
        let ds = two_years();
        let f = filter_by_years(&ds, ds.year_range().unwrap());
        let totals = state_totals(&f);

        assert_eq!(totals.len(), 9);
        assert_eq!(total_of(&totals, State::Acre), 30.0);
        assert_eq!(total_of(&totals, State::Para), (90.0 + 180.0) / 8.0);
        let grand: f64 = totals.iter().map(|t| t.summed_area).sum();
        assert_eq!(grand, 300.0);
    }

    #[test]
    fn state_totals_sorted_ascending() {
        let mut states = StateAreas::default();
        states.para = 50.0;
        states.acre = 30.0;
        states.tocantins = 40.0;
        states.roraima = -1.0;
        let ds = Dataset::from_records(vec![Record {
            year: 2000,
            total_deforested_area: 119.0,
            states,
        }]);
        let f = filter_by_years(&ds, YearRange::new(2000, 2000));
        let totals = state_totals(&f);

        let values: Vec<f64> = totals.iter().map(|t| t.summed_area).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(totals.first().unwrap().state, State::Roraima);
        assert_eq!(totals.last().unwrap().state, State::Para);
        // zero ties keep declaration order
        let zeros: Vec<State> = totals
            .iter()
            .filter(|t| t.summed_area == 0.0)
            .map(|t| t.state)
            .collect();
        assert_eq!(
            zeros,
            vec![
                State::Amazonas,
                State::Amapa,
                State::Maranhao,
                State::MatoGrosso,
                State::Rondonia
            ]
        );
    }

    #[test]
    fn state_totals_ignore_record_order() {
        let ds = two_years();
        let mut reversed = ds.records().to_vec();
        reversed.reverse();
        let rev = Dataset::from_records(reversed);

        let range = YearRange::new(2000, 2030);
        assert_eq!(
            state_totals(&filter_by_years(&ds, range)),
            state_totals(&filter_by_years(&rev, range))
        );
    }

    #[test]
    fn empty_selection_gives_empty_series_and_zero_totals() {
        let ds = two_years();
        let f = filter_by_years(&ds, YearRange::new(2021, 2020));

        assert!(total_series(&f).is_empty());
        assert!(scatter_series(&f).is_empty());
        assert!(stacked_by_year(&f).is_empty());
        let totals = state_totals(&f);
        assert_eq!(totals.len(), 9);
        assert!(totals.iter().all(|t| t.summed_area == 0.0));
    }

    #[test]
    fn stacked_keeps_record_order_and_values() {
        let ds = two_years();
        let f = filter_by_years(&ds, YearRange::new(2020, 2021));
        let stacked = stacked_by_year(&f);

        assert_eq!(stacked.len(), 2);
        assert_eq!(stacked[0].year, 2020);
        assert_eq!(stacked[1].areas.acre, 20.0);
        assert_eq!(stacked[1].areas, ds.records()[1].states);
    }

    #[test]
    fn aggregations_are_repeatable() {
        let ds = two_years();
        let f = filter_by_years(&ds, YearRange::new(2020, 2021));
        assert_eq!(total_series(&f), total_series(&f));
        assert_eq!(scatter_series(&f), total_series(&f));
        assert_eq!(state_totals(&f), state_totals(&f));
        assert_eq!(stacked_by_year(&f), stacked_by_year(&f));
    }
}
