//! Filter, aggregate and export behaviour over a CSV-loaded table.

use salesboard_core::aggregate::{monthly_totals, sum_by, value_counts};
use salesboard_core::{
    Dataset, Dimension, FilterSelection, Measure, apply, summarize, to_csv_bytes, write_csv_file,
};
use tempfile::TempDir;

const ORDERS_CSV: &str = "\
Row ID,Order ID,Order Date,Ship Mode,Customer ID,Segment,City,Region,Category,Sub-Category,Sales,Quantity,Discount,Profit
1,CA-2016-152156,11/8/2016,Second Class,CG-12520,Consumer,Henderson,South,Furniture,Bookcases,261.96,2,0,41.9136
2,CA-2016-152156,11/8/2016,Second Class,CG-12520,Consumer,Henderson,South,Furniture,Chairs,731.94,3,0,219.582
3,CA-2016-138688,6/12/2016,Second Class,DV-13045,Corporate,Los Angeles,West,Office Supplies,Labels,14.62,2,0,6.8714
4,US-2015-108966,10/11/2015,Standard Class,SO-20335,Consumer,Fort Lauderdale,South,Furniture,Tables,957.5775,5,0.45,-383.031
5,US-2015-108966,10/11/2015,Standard Class,SO-20335,Consumer,Fort Lauderdale,South,Office Supplies,Storage,22.368,2,0.2,2.5164
6,CA-2014-115812,6/9/2014,Standard Class,BH-11710,Consumer,Los Angeles,West,Furnishings,Furnishings,48.86,7,0,14.1694
7,CA-2017-114412,4/15/2017,Standard Class,AA-10480,Consumer,Concord,South,Office Supplies,Paper,15.552,3,0.2,5.4432
8,CA-2016-161389,12/5/2016,Standard Class,IM-15070,Consumer,Seattle,West,Office Supplies,Binders,407.976,3,0.2,132.5922
9,US-2015-118983,11/22/2015,Standard Class,HP-14815,Home Office,Fort Worth,Central,Office Supplies,Appliances,68.81,5,0.8,-123.858
10,CA-2014-105893,11/11/2014,Standard Class,PK-19075,Consumer,Madison,Central,Office Supplies,Storage,665.88,6,0,13.3176
11,CA-2014-167164,5/13/2014,Second Class,AG-10270,Consumer,West Jordan,West,Office Supplies,Storage,55.5,2,0,9.99
12,CA-2016-143336,8/27/2016,Second Class,ZD-21925,Consumer,San Francisco,West,Technology,Phones,213.48,3,0.2,16.011
";

fn load() -> (TempDir, Dataset) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("orders.csv");
    std::fs::write(&path, ORDERS_CSV).unwrap();
    let dataset = Dataset::load(&path).expect("load csv");
    (temp, dataset)
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn test_loads_every_row() {
    let (_temp, dataset) = load();
    assert_eq!(dataset.len(), 12);
    assert_eq!(dataset.distinct_regions(), vec!["South", "West", "Central"]);
    assert_eq!(dataset.distinct_segments(), vec!["Consumer", "Corporate", "Home Office"]);
}

#[test]
fn test_full_selection_matches_base_table() {
    let (_temp, dataset) = load();
    let view = apply(&dataset, &FilterSelection::all(&dataset));
    let summary = summarize(&view);

    let total: f64 = dataset.records().iter().map(|r| r.sales).sum();
    assert_eq!(summary.row_count, dataset.len());
    assert!(close(summary.total_sales, total));
    assert_eq!(summary.order_count, 10);
    assert_eq!(summary.customer_count, 10);
}

#[test]
fn test_filtered_sales_never_exceed_base() {
    let (_temp, dataset) = load();
    let base: f64 = dataset.records().iter().map(|r| r.sales).sum();

    let full = FilterSelection::all(&dataset);
    assert!(close(summarize(&apply(&dataset, &full)).total_sales, base));

    let west = FilterSelection::all(&dataset).with_regions(strings(&["West"]));
    let partial = summarize(&apply(&dataset, &west)).total_sales;
    assert!(partial < base);
    assert!(close(partial, 14.62 + 48.86 + 407.976 + 55.5 + 213.48));

    let consumer = FilterSelection::all(&dataset).with_segments(strings(&["Consumer"]));
    assert!(summarize(&apply(&dataset, &consumer)).total_sales < base);
}

#[test]
fn test_filter_is_idempotent() {
    let (_temp, dataset) = load();
    let selection = FilterSelection::all(&dataset).with_regions(strings(&["West"]));
    let first = apply(&dataset, &selection);
    let second = apply(&dataset, &selection);
    assert_eq!(first.rows(), second.rows());
    assert!(first.len() <= dataset.len());
}

#[test]
fn test_disjoint_regions_partition_totals() {
    let (_temp, dataset) = load();
    let all = FilterSelection::all(&dataset);
    let south = apply(&dataset, &all.clone().with_regions(strings(&["South"])));
    let rest = apply(&dataset, &all.clone().with_regions(strings(&["West", "Central"])));
    let base = summarize(&apply(&dataset, &all));

    let a = summarize(&south);
    let b = summarize(&rest);
    assert_eq!(a.row_count + b.row_count, base.row_count);
    assert!(close(a.total_sales + b.total_sales, base.total_sales));
    assert!(close(a.total_profit + b.total_profit, base.total_profit));
}

#[test]
fn test_every_kept_row_matches_selection() {
    let (_temp, dataset) = load();
    let selection = FilterSelection::new(strings(&["South", "Central"]), strings(&["Consumer"]));
    let view = apply(&dataset, &selection);

    assert_eq!(view.len(), 6);
    for row in view.iter() {
        assert!(selection.regions.contains(&row.region));
        assert!(selection.segments.contains(&row.segment));
    }
}

#[test]
fn test_empty_selection_has_no_statistics() {
    let (_temp, dataset) = load();
    let selection = FilterSelection::all(&dataset).with_segments(Vec::new());
    let summary = summarize(&apply(&dataset, &selection));

    assert_eq!(summary.row_count, 0);
    assert_eq!(summary.total_sales, 0.0);
    assert!(summary.sales.is_none());
}

#[test]
fn test_chart_groupings() {
    let (_temp, dataset) = load();
    let view = apply(&dataset, &FilterSelection::all(&dataset));

    let regions = sum_by(&view, Dimension::Region, Measure::Sales);
    let keys: Vec<_> = regions.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["Central", "South", "West"]);
    let grouped: f64 = regions.iter().map(|g| g.value).sum();
    assert!(close(grouped, summarize(&view).total_sales));

    let segments = value_counts(&view, Dimension::Segment);
    assert_eq!(segments[0].key, "Consumer");
    assert_eq!(segments[0].count, 10);

    // 2014-05 through 2017-04 inclusive.
    let monthly = monthly_totals(&view, Measure::Sales);
    assert_eq!(monthly.len(), 36);
    assert!(monthly.iter().any(|m| m.value == 0.0));
}

#[test]
fn test_export_round_trip() {
    let (temp, dataset) = load();
    let out = temp.path().join("filtered_data.csv");
    write_csv_file(&dataset, &out).unwrap();

    let reloaded = Dataset::load(&out).unwrap();
    assert_eq!(reloaded.columns(), dataset.columns());
    assert_eq!(reloaded.records(), dataset.records());
    assert_eq!(to_csv_bytes(&reloaded).unwrap(), to_csv_bytes(&dataset).unwrap());
}
