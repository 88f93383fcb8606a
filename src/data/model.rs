use std::fmt;

// ---------------------------------------------------------------------------
// Well-known column names
// ---------------------------------------------------------------------------

/// Column names produced by the bus scraper. None of them is required: every
/// operation that depends on one probes the schema first.
pub mod columns {
    pub const ROUTE_NAME: &str = "Route Name";
    pub const BUS_NAME: &str = "Bus Name";
    pub const BUS_TYPE: &str = "Bus Type";
    pub const PRICE: &str = "Price";
    pub const ROUTE_LINK: &str = "Route Link";
}

/// Field values that read as "missing", mirroring the usual dataframe NA set.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Cell – a single untyped field
// ---------------------------------------------------------------------------

/// One field of a raw record. Values stay textual until a caller asks for a
/// typed view (see [`Cell::as_number`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cell {
    Text(String),
    Missing,
}

impl Cell {
    /// Build a cell from a raw CSV field, mapping NA tokens to [`Cell::Missing`].
    pub fn from_field(field: &str) -> Self {
        if NA_TOKENS.contains(&field) {
            Cell::Missing
        } else {
            Cell::Text(field.to_string())
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Numeric coercion: anything that does not parse as a finite number is
    /// treated as missing.
    pub fn as_number(&self) -> Option<f64> {
        let v = self.as_str()?.trim().parse::<f64>().ok()?;
        v.is_finite().then_some(v)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Missing => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// BusTable – the unified table
// ---------------------------------------------------------------------------

/// An ordered set of columns plus rows of [`Cell`]s aligned to them.
///
/// Every row has exactly `columns.len()` cells. The table is built once by
/// the loader (or derived by the filter engine) and then only read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl BusTable {
    /// A table with no columns and no rows: the "no data" state.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from a header and rows. Short rows are padded with
    /// [`Cell::Missing`]; long rows are truncated to the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Missing);
                row
            })
            .collect();
        BusTable { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Schema probe: position of `name` in the column list.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// All cells of one column, in row order. `None` if the column is absent.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Numeric values of one column, skipping anything that fails coercion.
    pub fn numeric_column(&self, name: &str) -> Option<Vec<f64>> {
        Some(self.column(name)?.filter_map(Cell::as_number).collect())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A new table with the same columns holding the rows at `indices`, in
    /// the given order.
    pub fn select(&self, indices: &[usize]) -> BusTable {
        BusTable {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// Concatenate tables vertically. The resulting column set is the union
    /// of all inputs in first-appearance order; rows coming from a table that
    /// lacks a column get [`Cell::Missing`] there.
    pub fn concat(tables: Vec<BusTable>) -> BusTable {
        let mut columns: Vec<String> = Vec::new();
        for table in &tables {
            for col in &table.columns {
                if !columns.contains(col) {
                    columns.push(col.clone());
                }
            }
        }

        let total: usize = tables.iter().map(BusTable::len).sum();
        let mut rows = Vec::with_capacity(total);
        for table in tables {
            let mapping: Vec<usize> = table
                .columns
                .iter()
                .map(|c| columns.iter().position(|u| u == c).unwrap_or_default())
                .collect();
            for row in table.rows {
                let mut unified = vec![Cell::Missing; columns.len()];
                for (cell, &target) in row.into_iter().zip(&mapping) {
                    unified[target] = cell;
                }
                rows.push(unified);
            }
        }

        BusTable { columns, rows }
    }
}
