//! Chart-ready series derived from a (filtered) table.
//!
//! Nothing here renders. The UI layer turns these into bars and boxes.

use std::collections::{HashMap, HashSet};

use super::model::{columns, BusTable, Cell};

/// Number of bins in the price histogram.
pub const PRICE_BINS: usize = 30;
/// Number of routes in the frequency chart.
pub const TOP_ROUTES: usize = 10;

// ---------------------------------------------------------------------------
// Deduplication
// ---------------------------------------------------------------------------

/// Collapse rows sharing the same (route name, bus name, route link) triple to
/// the first occurrence. Returns the table unchanged when any of the three
/// columns is absent. Missing values compare equal to each other.
pub fn dedup_for_display(table: &BusTable) -> BusTable {
    let key_columns = [columns::ROUTE_NAME, columns::BUS_NAME, columns::ROUTE_LINK]
        .map(|name| table.column_index(name));
    let [Some(route), Some(bus), Some(link)] = key_columns else {
        return table.clone();
    };

    let mut seen: HashSet<(&Cell, &Cell, &Cell)> = HashSet::new();
    let mut keep = Vec::with_capacity(table.len());
    for (i, row) in table.rows().iter().enumerate() {
        if seen.insert((&row[route], &row[bus], &row[link])) {
            keep.push(i);
        }
    }

    if keep.len() < table.len() {
        log::debug!("Dropped {} duplicate rows for display", table.len() - keep.len());
    }
    table.select(&keep)
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width bins over `[min, max]`; the last bin is closed on the right.
/// When every value is equal the range is widened to `[v - 0.5, v + 0.5]`;
/// if that still leaves no usable width, everything goes into one bin.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let (Some(min), Some(max)) = (
        values.iter().copied().reduce(f64::min),
        values.iter().copied().reduce(f64::max),
    ) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    let (lo, hi) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    // Divide before subtracting so a span wider than f64::MAX stays finite.
    let n = bins as f64;
    let width = hi / n - lo / n;
    if !width.is_finite() || width <= 0.0 {
        return vec![HistogramBin {
            start: lo,
            end: hi,
            count: values.len(),
        }];
    }

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: lo + width * i as f64,
            end: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v / n - lo / n) / width * n) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

// ---------------------------------------------------------------------------
// Box summaries
// ---------------------------------------------------------------------------

/// Five-number summary plus outliers for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub label: String,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// `None` for an empty sample.
    pub fn from_values(label: impl Into<String>, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let reach = 1.5 * (q3 - q1);
        let (lo_fence, hi_fence) = (q1 - reach, q3 + reach);

        let inside = sorted.iter().copied().filter(|v| (lo_fence..=hi_fence).contains(v));
        let lower_whisker = inside.clone().reduce(f64::min).unwrap_or(q1);
        let upper_whisker = inside.reduce(f64::max).unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| !(lo_fence..=hi_fence).contains(v))
            .collect();

        Some(BoxSummary {
            label: label.into(),
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

// ---------------------------------------------------------------------------
// All three series
// ---------------------------------------------------------------------------

/// Everything the chart area needs. Each series is `None` when the columns
/// it depends on are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub price_histogram: Option<Vec<HistogramBin>>,
    pub top_routes: Option<Vec<(String, usize)>>,
    pub price_by_bus_type: Option<Vec<BoxSummary>>,
}

impl ChartSeries {
    pub fn from_table(table: &BusTable) -> Self {
        ChartSeries {
            price_histogram: price_histogram(table),
            top_routes: top_routes(table, TOP_ROUTES),
            price_by_bus_type: price_by_bus_type(table),
        }
    }
}

fn price_histogram(table: &BusTable) -> Option<Vec<HistogramBin>> {
    let prices = table.numeric_column(columns::PRICE)?;
    if prices.is_empty() {
        return None;
    }
    Some(histogram(&prices, PRICE_BINS))
}

/// Most frequent route names, count descending; ties keep first appearance.
pub fn top_routes(table: &BusTable, n: usize) -> Option<Vec<(String, usize)>> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for route in table.column(columns::ROUTE_NAME)?.filter_map(Cell::as_str) {
        match index.get(route) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(route, counts.len());
                counts.push((route.to_string(), 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    Some(counts)
}

/// One box per bus type, in first-appearance order.
pub fn price_by_bus_type(table: &BusTable) -> Option<Vec<BoxSummary>> {
    let ty = table.column_index(columns::BUS_TYPE)?;
    let price = table.column_index(columns::PRICE)?;

    let mut groups: Vec<(&str, Vec<f64>)> = Vec::new();
    for row in table.rows() {
        let (Some(label), Some(value)) = (row[ty].as_str(), row[price].as_number()) else {
            continue;
        };
        match groups.iter_mut().find(|(l, _)| *l == label) {
            Some((_, values)) => values.push(value),
            None => groups.push((label, vec![value])),
        }
    }

    Some(
        groups
            .into_iter()
            .filter_map(|(label, values)| BoxSummary::from_values(label, &values))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> BusTable {
        BusTable::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| Cell::from_field(v)).collect())
                .collect(),
        )
    }

    #[test]
    fn dedup_keeps_first_of_each_triple() {
        let t = table(
            &["Route Name", "Bus Name", "Route Link", "Price"],
            &[
                &["X", "Volvo", "l1", "100"],
                &["X", "Volvo", "l1", "120"],
                &["X", "Volvo", "l2", "130"],
                &["X", "", "", "140"],
                &["X", "", "", "150"],
            ],
        );
        let d = dedup_for_display(&t);
        let prices: Vec<_> = d.column("Price").unwrap().map(|c| c.to_string()).collect();
        assert_eq!(prices, ["100", "130", "140"]);
    }

    #[test]
    fn dedup_is_noop_without_all_key_columns() {
        let t = table(&["Route Name", "Bus Name"], &[&["X", "A"], &["X", "A"]]);
        assert_eq!(dedup_for_display(&t), t);
    }

    #[test]
    fn histogram_covers_every_value() {
        let values: Vec<f64> = (0..=100).map(f64::from).collect();
        let bins = histogram(&values, PRICE_BINS);
        assert_eq!(bins.len(), PRICE_BINS);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[PRICE_BINS - 1].end, 100.0);
        // The maximum lands in the closed last bin.
        assert!(bins[PRICE_BINS - 1].count >= 1);
    }

    #[test]
    fn histogram_of_a_single_value_is_widened() {
        let bins = histogram(&[500.0, 500.0], 30);
        assert_eq!(bins[0].start, 499.5);
        assert_eq!(bins[29].end, 500.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
    }

    #[test]
    fn histogram_handles_extreme_spans() {
        let bins = histogram(&[-1e308, 0.0, 1e308], PRICE_BINS);
        assert_eq!(bins.len(), PRICE_BINS);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[PRICE_BINS / 2].count, 1);
        assert_eq!(bins[PRICE_BINS - 1].count, 1);
    }

    #[test]
    fn histogram_of_a_huge_constant_is_one_bin() {
        let bins = histogram(&[1e300, 1e300], PRICE_BINS);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
    }

    #[test]
    fn top_routes_orders_by_count_then_appearance() {
        let t = table(
            &["Route Name"],
            &[&["B"], &["A"], &["A"], &["C"], &["B"], &[""], &["D"]],
        );
        let top = top_routes(&t, 3).unwrap();
        assert_eq!(
            top,
            vec![("B".to_string(), 2), ("A".to_string(), 2), ("C".to_string(), 1)]
        );
    }

    #[test]
    fn box_summary_matches_linear_quartiles() {
        let b = BoxSummary::from_values("AC", &[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(b.q1, 2.0);
        assert_eq!(b.median, 3.0);
        assert_eq!(b.q3, 4.0);
        assert_eq!(b.lower_whisker, 1.0);
        assert_eq!(b.upper_whisker, 4.0);
        assert_eq!(b.outliers, vec![100.0]);
    }

    #[test]
    fn boxes_follow_first_appearance_and_skip_missing() {
        let t = table(
            &["Bus Type", "Price"],
            &[&["Sleeper", "900"], &["AC", "500"], &["", "1"], &["Sleeper", "x"], &["AC", "700"]],
        );
        let boxes = price_by_bus_type(&t).unwrap();
        let labels: Vec<_> = boxes.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Sleeper", "AC"]);
        assert_eq!(boxes[1].median, 600.0);
    }

    #[test]
    fn series_absent_without_columns() {
        let s = ChartSeries::from_table(&table(&["Bus Name"], &[&["Volvo"]]));
        assert_eq!(s, ChartSeries::default());
    }
}
