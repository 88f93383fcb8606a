use std::collections::BTreeSet;

use super::model::{columns, BusTable, Cell};

// ---------------------------------------------------------------------------
// Selection types
// ---------------------------------------------------------------------------

/// Membership constraint on a categorical column.
///
/// `All` constrains nothing (rows with a missing value pass too). `Only` is
/// literal: an empty set keeps no rows, and a missing value is never a member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Membership {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl Membership {
    pub fn only<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Membership::Only(values.into_iter().map(Into::into).collect())
    }

    /// Explicitly deselect everything.
    pub fn none() -> Self {
        Membership::Only(BTreeSet::new())
    }

    pub fn contains(&self, value: &str) -> bool {
        match self {
            Membership::All => true,
            Membership::Only(set) => set.contains(value),
        }
    }

    /// Toggle one value. Leaving `All` materialises the full `options` set
    /// first so the toggle removes exactly one value.
    pub fn toggle(&mut self, value: &str, options: &[String]) {
        if let Membership::All = self {
            *self = Membership::only(options.iter().cloned());
        }
        if let Membership::Only(set) = self {
            if !set.remove(value) {
                set.insert(value.to_string());
            }
        }
    }
}

/// Closed price interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }
}

/// The user's current constraints. The default constrains nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    pub route: Membership,
    pub bus_type: Membership,
    pub price: Option<PriceRange>,
}

// ---------------------------------------------------------------------------
// Widget options derived from the unified table
// ---------------------------------------------------------------------------

/// Integer-rounded bounds of the numeric prices, used to seed a range slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBounds {
    pub min: f64,
    pub max: f64,
}

impl PriceBounds {
    pub fn full_range(&self) -> PriceRange {
        PriceRange::new(self.min, self.max)
    }
}

/// What the selection widgets can offer for a given table. A field is `None`
/// when the table cannot support that filter (column absent, or no numeric
/// prices).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub routes: Option<Vec<String>>,
    pub bus_types: Option<Vec<String>>,
    pub price: Option<PriceBounds>,
}

impl FilterOptions {
    pub fn from_table(table: &BusTable) -> Self {
        let price = table.numeric_column(columns::PRICE).and_then(|prices| {
            let min = prices.iter().copied().reduce(f64::min)?;
            let max = prices.iter().copied().reduce(f64::max)?;
            Some(PriceBounds {
                min: min.floor(),
                max: max.ceil(),
            })
        });
        FilterOptions {
            routes: distinct_sorted(table, columns::ROUTE_NAME),
            bus_types: distinct_sorted(table, columns::BUS_TYPE),
            price,
        }
    }

    /// The selection a fresh dashboard starts with: every offered value
    /// selected and the full price range. Rows whose route, bus type or
    /// price is missing do not match any offered value and are left out.
    pub fn default_selection(&self) -> FilterSelection {
        let all_of = |values: &Option<Vec<String>>| match values {
            Some(values) => Membership::only(values.iter().cloned()),
            None => Membership::All,
        };
        FilterSelection {
            route: all_of(&self.routes),
            bus_type: all_of(&self.bus_types),
            price: self.price.map(|bounds| bounds.full_range()),
        }
    }
}

fn distinct_sorted(table: &BusTable, column: &str) -> Option<Vec<String>> {
    let values: BTreeSet<&str> = table.column(column)?.filter_map(Cell::as_str).collect();
    Some(values.into_iter().map(str::to_string).collect())
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// A constraint bound to a column position that exists in the table.
enum Predicate<'a> {
    Member { column: usize, allowed: &'a Membership },
    Price { column: usize, range: PriceRange },
}

impl Predicate<'_> {
    fn accepts(&self, row: &[Cell]) -> bool {
        match self {
            Predicate::Member { column, allowed } => match &row[*column] {
                Cell::Text(v) => allowed.contains(v),
                Cell::Missing => matches!(allowed, Membership::All),
            },
            Predicate::Price { column, range } => row[*column]
                .as_number()
                .is_some_and(|price| range.contains(price)),
        }
    }
}

/// Schema probe: keep only the constraints whose column is present and which
/// actually constrain something.
fn compile<'a>(table: &BusTable, selection: &'a FilterSelection) -> Vec<Predicate<'a>> {
    let mut predicates = Vec::new();

    for (name, allowed) in [
        (columns::ROUTE_NAME, &selection.route),
        (columns::BUS_TYPE, &selection.bus_type),
    ] {
        if let Membership::All = allowed {
            continue;
        }
        match table.column_index(name) {
            Some(column) => predicates.push(Predicate::Member { column, allowed }),
            None => log::debug!("No '{name}' column; skipping its filter"),
        }
    }

    if let (Some(range), Some(column)) = (selection.price, table.column_index(columns::PRICE)) {
        let has_numeric = table.rows().iter().any(|row| row[column].as_number().is_some());
        if has_numeric {
            predicates.push(Predicate::Price { column, range });
        } else {
            log::debug!("'{}' has no numeric values; skipping price filter", columns::PRICE);
        }
    }

    predicates
}

/// Return indices of rows that pass every active constraint, in table order.
pub fn filtered_indices(table: &BusTable, selection: &FilterSelection) -> Vec<usize> {
    let predicates = compile(table, selection);
    table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| predicates.iter().all(|p| p.accepts(row)))
        .map(|(i, _)| i)
        .collect()
}

/// The filtered table: a row subset of `table` with the same columns.
pub fn apply(table: &BusTable, selection: &FilterSelection) -> BusTable {
    table.select(&filtered_indices(table, selection))
}
