use std::fs;
use std::path::Path;

use redbus_dashboard::data::export::to_csv_bytes;
use redbus_dashboard::data::filter::{apply, FilterOptions};
use redbus_dashboard::data::loader::{load_directory, LoadError};
use redbus_dashboard::{
    compute_view, BusTable, Cell, FilterSelection, Membership, PriceRange, Summary, ViewOptions,
};

fn write(dir: &Path, name: &str, contents: &[u8]) {
    fs::write(dir.join(name), contents).unwrap();
}

fn two_file_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.csv", b"Route Name,Bus Type,Price\nX,AC,100\n");
    write(dir.path(), "b.csv", b"Route Name,Bus Type,Price\nY,Non-AC,200\n");
    dir
}

#[test]
fn test_missing_directory_is_empty_not_error() {
    let dir = tempfile::tempdir().unwrap();
    let table = load_directory(&dir.path().join("absent")).unwrap();
    assert!(table.is_empty());
    assert!(table.columns().is_empty());
}

#[test]
fn test_directory_without_csv_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "notes.txt", b"Route Name\nX\n");
    fs::create_dir(dir.path().join("nested.csv")).unwrap();

    let table = load_directory(dir.path()).unwrap();
    assert!(table.is_empty());
    assert!(table.columns().is_empty());
}

#[test]
fn test_two_file_scenario() {
    let dir = two_file_dir();
    let table = load_directory(dir.path()).unwrap();
    assert_eq!(table.len(), 2);

    let sel = FilterSelection {
        route: Membership::only(["X"]),
        ..Default::default()
    };
    let filtered = apply(&table, &sel);
    assert_eq!(filtered.len(), 1);
    let price: Vec<_> = filtered.column("Price").unwrap().collect();
    assert_eq!(price, [&Cell::Text("100".into())]);

    let summary = Summary::of(&table);
    assert_eq!(summary.total_routes, 2);
    assert_eq!(summary.total_buses, 2);
    assert_eq!(summary.avg_price_label(), "150.00");
    assert_eq!(summary.bus_types, 2);
}

#[test]
fn test_files_are_concatenated_in_name_order_with_union_columns() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "b.CSV", b"Route Name,Route Link\nY,l2\n");
    write(dir.path(), "a.csv", b"Route Name,Price\nX,1\nZ,2\n");

    let table = load_directory(dir.path()).unwrap();
    assert_eq!(table.columns(), &["Route Name", "Price", "Route Link"]);
    let routes: Vec<String> = table
        .column("Route Name")
        .unwrap()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(routes, ["X", "Z", "Y"]);
    assert!(table.rows()[2][1].is_missing());
    assert!(table.rows()[0][2].is_missing());
}

#[test]
fn test_legacy_encoded_file_is_included() {
    let dir = two_file_dir();
    write(dir.path(), "c.csv", b"Route Name,Bus Type,Price\nPanaji to Marg\xE3o,AC,300\n");

    let table = load_directory(dir.path()).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(
        table.rows()[2][0],
        Cell::Text("Panaji to Marg\u{e3}o".to_string())
    );
}

#[test]
fn test_unparseable_file_names_the_file() {
    let dir = two_file_dir();
    write(dir.path(), "broken.csv", b"a,b\n1,2,3\n");

    let err = load_directory(dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }));
    assert!(err.path().ends_with("broken.csv"));
    assert!(err.to_string().contains("broken.csv"));
}

#[test]
fn test_price_slider_scenario() {
    let table = BusTable::new(
        vec!["Price".into()],
        ["10", "100", "200"]
            .iter()
            .map(|p| vec![Cell::from_field(p)])
            .collect(),
    );
    let sel = FilterSelection {
        price: Some(PriceRange::new(50.0, 150.0)),
        ..Default::default()
    };
    let filtered = apply(&table, &sel);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered.rows()[0][0], Cell::Text("100".into()));
}

#[test]
fn test_export_round_trip() {
    let dir = two_file_dir();
    let table = load_directory(dir.path()).unwrap();
    let sel = FilterSelection {
        bus_type: Membership::only(["AC", "Non-AC"]),
        ..Default::default()
    };
    let view = compute_view(&table, &sel, ViewOptions::default());

    let out = tempfile::tempdir().unwrap();
    write(out.path(), "filtered_buses.csv", &to_csv_bytes(&view.filtered).unwrap());
    let reloaded = load_directory(out.path()).unwrap();

    assert_eq!(reloaded.len(), view.filtered.len());
    assert_eq!(reloaded.columns(), view.filtered.columns());
}

#[test]
fn test_view_series_and_options() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "routes.csv",
        b"Route Name,Bus Name,Route Link,Bus Type,Price\n\
          X,Volvo,l1,AC,100\n\
          X,Volvo,l1,AC,100\n\
          Y,Scania,l2,Sleeper,abc\n\
          Y,Scania,l3,Sleeper,400\n",
    );
    let table = load_directory(dir.path()).unwrap();

    let options = FilterOptions::from_table(&table);
    assert_eq!(options.routes.as_deref(), Some(&["X".to_string(), "Y".to_string()][..]));

    let view = compute_view(&table, &FilterSelection::default(), ViewOptions::default());
    assert_eq!(view.filtered.len(), 4);
    let series = view.series.unwrap();
    assert_eq!(
        series.top_routes.unwrap(),
        vec![("Y".to_string(), 2), ("X".to_string(), 1)]
    );
    let boxes = series.price_by_bus_type.unwrap();
    assert_eq!(boxes.len(), 2);
    assert_eq!(boxes[1].median, 400.0);
    let hist = series.price_histogram.unwrap();
    assert_eq!(hist.iter().map(|b| b.count).sum::<usize>(), 2);
}
