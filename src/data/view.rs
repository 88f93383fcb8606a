use super::filter::{apply, FilterSelection};
use super::model::BusTable;
use super::series::{dedup_for_display, ChartSeries};
use super::summary::Summary;

/// Presentation toggles that do not affect the filtered table itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub show_visuals: bool,
    /// Collapse (route, bus, link) duplicates before deriving chart series.
    pub remove_duplicates: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            show_visuals: true,
            remove_duplicates: true,
        }
    }
}

/// Everything the dashboard shows for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub filtered: BusTable,
    pub overall: Summary,
    pub filtered_summary: Summary,
    /// `None` when visuals are switched off.
    pub series: Option<ChartSeries>,
}

/// One full recomputation: filter, summarize both tables, derive chart
/// series from the (optionally deduplicated) filtered rows.
pub fn compute_view(
    table: &BusTable,
    selection: &FilterSelection,
    options: ViewOptions,
) -> DashboardView {
    let filtered = apply(table, selection);

    let series = options.show_visuals.then(|| {
        if options.remove_duplicates {
            ChartSeries::from_table(&dedup_for_display(&filtered))
        } else {
            ChartSeries::from_table(&filtered)
        }
    });

    DashboardView {
        overall: Summary::of(table),
        filtered_summary: Summary::of(&filtered),
        filtered,
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::Membership;
    use crate::data::model::Cell;

    fn duplicated() -> BusTable {
        let row = |price: &str| {
            ["X", "Volvo", "l1", price]
                .iter()
                .map(|v| Cell::from_field(v))
                .collect::<Vec<_>>()
        };
        BusTable::new(
            ["Route Name", "Bus Name", "Route Link", "Price"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            vec![row("100"), row("300")],
        )
    }

    #[test]
    fn dedup_only_affects_series() {
        let t = duplicated();
        let view = compute_view(&t, &FilterSelection::default(), ViewOptions::default());

        assert_eq!(view.filtered.len(), 2);
        assert_eq!(view.filtered_summary.avg_price, 200.0);
        let top = view.series.unwrap().top_routes.unwrap();
        assert_eq!(top, vec![("X".to_string(), 1)]);
    }

    #[test]
    fn duplicates_kept_when_disabled() {
        let t = duplicated();
        let options = ViewOptions {
            remove_duplicates: false,
            ..Default::default()
        };
        let view = compute_view(&t, &FilterSelection::default(), options);
        assert_eq!(view.series.unwrap().top_routes.unwrap()[0].1, 2);
    }

    #[test]
    fn visuals_off_skips_series() {
        let options = ViewOptions {
            show_visuals: false,
            ..Default::default()
        };
        let view = compute_view(&duplicated(), &FilterSelection::default(), options);
        assert!(view.series.is_none());
    }

    #[test]
    fn overall_summary_ignores_selection() {
        let sel = FilterSelection {
            route: Membership::none(),
            ..Default::default()
        };
        let view = compute_view(&duplicated(), &sel, ViewOptions::default());
        assert_eq!(view.overall.total_buses, 2);
        assert_eq!(view.filtered_summary.total_buses, 0);
    }
}
