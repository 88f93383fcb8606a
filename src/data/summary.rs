use std::collections::HashSet;

use serde::Serialize;

use super::model::{columns, BusTable, Cell};

/// The four headline metrics shown above the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    /// Distinct non-missing route names.
    pub total_routes: usize,
    /// Row count.
    pub total_buses: usize,
    /// Mean of the numeric prices; 0.0 when there are none.
    pub avg_price: f64,
    /// Distinct non-missing bus types.
    pub bus_types: usize,
}

impl Summary {
    pub fn of(table: &BusTable) -> Self {
        Summary {
            total_routes: distinct_count(table, columns::ROUTE_NAME),
            total_buses: table.len(),
            avg_price: table
                .numeric_column(columns::PRICE)
                .and_then(|prices| mean(&prices))
                .unwrap_or(0.0),
            bus_types: distinct_count(table, columns::BUS_TYPE),
        }
    }

    /// Average price as displayed, e.g. `150.00`.
    pub fn avg_price_label(&self) -> String {
        format!("{:.2}", self.avg_price)
    }
}

fn distinct_count(table: &BusTable, column: &str) -> usize {
    table
        .column(column)
        .map(|cells| cells.filter_map(Cell::as_str).collect::<HashSet<_>>().len())
        .unwrap_or(0)
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
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
    fn mean_ignores_non_numeric_and_missing() {
        let t = table(&["Price"], &[&["10"], &["x"], &["20"], &[""]]);
        assert_eq!(Summary::of(&t).avg_price, 15.0);
    }

    #[test]
    fn distinct_counts_ignore_missing() {
        let t = table(&["Route Name"], &[&["A"], &["A"], &[""], &["B"]]);
        let s = Summary::of(&t);
        assert_eq!(s.total_routes, 2);
        assert_eq!(s.total_buses, 4);
        assert_eq!(s.bus_types, 0);
    }

    #[test]
    fn absent_columns_give_zero() {
        let s = Summary::of(&BusTable::empty());
        assert_eq!(s, Summary::default());
        assert_eq!(s.avg_price_label(), "0.00");
    }

    #[test]
    fn price_column_without_numbers_averages_to_zero() {
        let t = table(&["Price"], &[&["n/a"], &["free"]]);
        assert_eq!(Summary::of(&t).avg_price, 0.0);
    }

    #[test]
    fn label_has_two_decimals() {
        let s = Summary {
            avg_price: 150.0,
            ..Default::default()
        };
        assert_eq!(s.avg_price_label(), "150.00");
    }
}
