use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use redbus_dashboard::config::Config;
use redbus_dashboard::data::cache::TableCache;
use redbus_dashboard::data::export::write_csv;
use redbus_dashboard::data::filter::{FilterOptions, FilterSelection, Membership, PriceRange};
use redbus_dashboard::data::model::BusTable;
use redbus_dashboard::data::view::{compute_view, DashboardView, ViewOptions};

use crate::color::ColorMap;

/// Which categorical filter a widget edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Route,
    BusType,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Directory the dashboard reads from.
    pub data_dir: PathBuf,

    /// Loaded tables, keyed by directory.
    pub cache: TableCache,

    /// Unified table for `data_dir` (None until the first load succeeds).
    pub table: Option<Arc<BusTable>>,

    /// What the filter widgets can offer for `table`.
    pub options: FilterOptions,

    /// Current filter selection.
    pub selection: FilterSelection,

    /// Chart toggles.
    pub view_options: ViewOptions,

    /// Filtered table, metrics and chart series for the current selection.
    pub view: Option<DashboardView>,

    /// Colours per bus type.
    pub bus_type_colors: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            cache: TableCache::new(config.cache_ttl()),
            table: None,
            options: FilterOptions::default(),
            selection: FilterSelection::default(),
            view_options: ViewOptions::default(),
            view: None,
            bus_type_colors: None,
            status_message: None,
        }
    }

    /// Load (or fetch from cache) the table for `data_dir` and rebuild the
    /// view from it.
    pub fn load(&mut self) {
        match self.cache.get_or_load(&self.data_dir) {
            Ok(table) => {
                self.set_table(table);
                self.rebuild_view();
            }
            Err(e) => {
                log::error!("Failed to load data: {e}");
                self.table = None;
                self.view = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Drop cached tables and reload from disk.
    pub fn refresh(&mut self) {
        self.cache.refresh();
        self.load();
    }

    /// Point the dashboard at another directory and load it.
    pub fn set_data_dir(&mut self, dir: PathBuf) {
        log::info!("Switching data directory to {}", dir.display());
        self.data_dir = dir;
        self.load();
    }

    /// Ingest a (possibly cached) table. The selection survives when the
    /// new table offers the same choices, otherwise it is reset to every
    /// offered value and the full price range.
    fn set_table(&mut self, table: Arc<BusTable>) {
        if self.table.as_ref().is_some_and(|t| Arc::ptr_eq(t, &table)) {
            return;
        }

        let options = FilterOptions::from_table(&table);
        if self.table.is_none() || options != self.options {
            self.selection = options.default_selection();
        }
        self.bus_type_colors = options.bus_types.as_deref().map(ColorMap::new);
        self.options = options;

        self.status_message = table.is_empty().then(|| {
            format!(
                "No CSV files found or no data loaded in {}",
                self.data_dir.display()
            )
        });
        self.table = Some(table);
    }

    /// Whether a non-empty table is loaded.
    pub fn has_data(&self) -> bool {
        self.table.as_ref().is_some_and(|t| !t.is_empty())
    }

    /// Re-run the pipeline after a selection or option change. The table is
    /// fetched through the cache first, so an expired entry is reloaded.
    pub fn recompute(&mut self) {
        self.load();
    }

    fn rebuild_view(&mut self) {
        self.view = self
            .table
            .as_ref()
            .map(|t| compute_view(t, &self.selection, self.view_options));
    }

    pub fn category_options(&self, category: Category) -> Option<&[String]> {
        match category {
            Category::Route => self.options.routes.as_deref(),
            Category::BusType => self.options.bus_types.as_deref(),
        }
    }

    pub fn membership(&self, category: Category) -> &Membership {
        match category {
            Category::Route => &self.selection.route,
            Category::BusType => &self.selection.bus_type,
        }
    }

    fn membership_mut(&mut self, category: Category) -> &mut Membership {
        match category {
            Category::Route => &mut self.selection.route,
            Category::BusType => &mut self.selection.bus_type,
        }
    }

    /// Toggle a single value in a categorical filter.
    pub fn toggle_value(&mut self, category: Category, value: &str) {
        let options = self.category_options(category).unwrap_or_default().to_vec();
        self.membership_mut(category).toggle(value, &options);
        self.recompute();
    }

    /// Select every offered value in a categorical filter.
    pub fn select_all(&mut self, category: Category) {
        let all = match self.category_options(category) {
            Some(options) => Membership::only(options.iter().cloned()),
            None => Membership::All,
        };
        *self.membership_mut(category) = all;
        self.recompute();
    }

    /// Deselect every value; no rows pass until something is re-selected.
    pub fn select_none(&mut self, category: Category) {
        *self.membership_mut(category) = Membership::none();
        self.recompute();
    }

    /// Price range currently applied, or the full bounds if untouched.
    pub fn effective_price_range(&self) -> Option<PriceRange> {
        let bounds = self.options.price?;
        Some(self.selection.price.unwrap_or_else(|| bounds.full_range()))
    }

    pub fn set_price_range(&mut self, range: PriceRange) {
        let range = PriceRange::new(range.min.min(range.max), range.max.max(range.min));
        self.selection.price = Some(range);
        self.recompute();
    }

    pub fn set_view_options(&mut self, options: ViewOptions) {
        if options != self.view_options {
            self.view_options = options;
            self.recompute();
        }
    }

    /// Write the filtered table to `path`.
    pub fn export_to(&self, path: &Path) -> Result<usize> {
        let view = self.view.as_ref().context("no data loaded")?;
        write_csv(&view.filtered, path)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(view.filtered.len())
    }
}
