//! Reshapes forecasts into presentation series. Inputs are never modified.

use crate::inference::domain::{CallCategory, Forecast, HourlyPrediction};

use super::domain::{CategorySeries, CategoryShare, ForecastTable, PresentationSeries, TableRow};

pub fn format(forecast: &Forecast) -> PresentationSeries {
    let hours = forecast.hours();

    let stacked = CallCategory::ALL
        .iter()
        .map(|category| CategorySeries {
            category: *category,
            label: category.label(),
            values: hours.iter().map(|h| h.counts()[*category]).collect(),
        })
        .collect::<Vec<_>>();

    let grand_total: f64 = hours.iter().map(HourlyPrediction::total).sum();
    let distribution = stacked
        .iter()
        .map(|series| {
            let count: f64 = series.values.iter().sum();
            CategoryShare {
                category: series.category,
                label: series.label,
                count,
                share: if grand_total > 0.0 {
                    count / grand_total
                } else {
                    0.0
                },
            }
        })
        .collect();

    PresentationSeries {
        subject: forecast.subject().to_string(),
        hours: hours.iter().map(hour_label).collect(),
        total: hours.iter().map(HourlyPrediction::total).collect(),
        table: hours.first().map(table),
        stacked,
        distribution,
    }
}

/// `"22:00"`, or `"Fri 22:00"` when the weekday is known.
pub fn hour_label(prediction: &HourlyPrediction) -> String {
    match prediction.weekday() {
        Some(day) => format!("{day} {:02}:00", prediction.hour()),
        None => format!("{:02}:00", prediction.hour()),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn table(prediction: &HourlyPrediction) -> ForecastTable {
    let rows: Vec<TableRow> = prediction
        .counts()
        .iter()
        .map(|(category, count)| TableRow {
            call_category: category.label(),
            predicted_count: round1(count),
        })
        .collect();
    ForecastTable {
        hour_label: hour_label(prediction),
        total_predicted_calls: round1(rows.iter().map(|r| r.predicted_count).sum()),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ids::UnitId;
    use crate::inference::domain::{CategoryCounts, HourSlot, UnitForecast};
    use chrono::Weekday;
    use pretty_assertions::assert_eq;

    fn forecast(counts: &[[f64; 5]]) -> Forecast {
        let hours = counts
            .iter()
            .enumerate()
            .map(|(offset, values)| {
                let slot = HourSlot {
                    offset: offset as u32,
                    hour: (23 + offset as u32) % 24,
                    weekday: None,
                };
                HourlyPrediction::new(slot, CategoryCounts::clipped(*values).unwrap())
            })
            .collect();
        Forecast::Unit(UnitForecast {
            unit_id: UnitId::new("med-3"),
            hours,
        })
    }

    #[test]
    fn stacks_one_series_per_category() {
        let input = forecast(&[[1.0, 2.0, 0.0, 0.5, 0.0], [2.0, 0.0, 1.0, 0.5, 0.5]]);
        let series = format(&input);

        assert_eq!(series.subject, "med-3");
        assert_eq!(series.hours, vec!["23:00".to_string(), "00:00".to_string()]);
        assert_eq!(series.stacked.len(), CallCategory::COUNT);
        assert_eq!(series.stacked[0].label, "Clinical");
        assert_eq!(series.stacked[0].values, vec![1.0, 2.0]);
        assert_eq!(series.total, vec![3.5, 4.0]);
    }

    #[test]
    fn distribution_sums_over_horizon() {
        let input = forecast(&[[1.0, 1.0, 0.0, 0.0, 0.0], [1.0, 1.0, 0.0, 0.0, 0.0]]);
        let series = format(&input);
        let clinical = &series.distribution[0];
        assert_eq!(clinical.count, 2.0);
        assert_eq!(clinical.share, 0.5);
        let shares: f64 = series.distribution.iter().map(|d| d.share).sum();
        assert!((shares - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_forecast_has_zero_shares() {
        let series = format(&forecast(&[[0.0; 5]]));
        assert!(series.distribution.iter().all(|d| d.share == 0.0));
    }

    #[test]
    fn table_rounds_first_hour() {
        let series = format(&forecast(&[[1.26, 0.04, 2.0, 0.0, 0.31]]));
        let table = series.table.unwrap();
        assert_eq!(table.hour_label, "23:00");
        let counts: Vec<f64> = table.rows.iter().map(|r| r.predicted_count).collect();
        assert_eq!(counts, vec![1.3, 0.0, 2.0, 0.0, 0.3]);
        assert_eq!(table.total_predicted_calls, 3.6);
        assert_eq!(table.rows[2].call_category, "Basic Need");
    }

    #[test]
    fn input_is_left_untouched() {
        let input = forecast(&[[1.0, 2.0, 3.0, 4.0, 5.0]]);
        let before = input.clone();
        let _ = format(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn weekday_appears_in_labels() {
        let slot = HourSlot::at(7).on(Weekday::Mon);
        let prediction = HourlyPrediction::new(slot, CategoryCounts::zero());
        assert_eq!(hour_label(&prediction), "Mon 07:00");
    }
}
