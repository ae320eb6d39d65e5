use dz_core::{CoreError, Workspace};
use dz_ingest::ImportOptions;
use dz_model::{
    ActiveView, CacheKey, ColumnKind, ComparisonOp, FilterSpec, MissingAction, Operand,
    SortDirection, SortSpec, Table, ViewEdit,
};
use dz_transform::{Axis, JoinKind};
use polars::prelude::*;
use proptest::prelude::*;

const PEOPLE: &[u8] = b"name,age,city\nann,31,Lyon\nbob,,Paris\ncy,27,Lyon\ndee,45,NA\n";
const CITIES: &[u8] = b"city,country\nLyon,FR\nParis,FR\nBerlin,DE\n";

fn import(workspace: &Workspace, name: &str, bytes: &[u8]) -> CacheKey {
    workspace
        .try_import(name, bytes, &ImportOptions::default())
        .unwrap()
        .0
}

#[test]
fn reimporting_identical_bytes_reuses_the_key() {
    let workspace = Workspace::default();
    let first = import(&workspace, "people.csv", PEOPLE);
    let second = import(&workspace, "people-copy.csv", PEOPLE);
    assert_eq!(first, second);
    assert_eq!(workspace.entries().len(), 1);
    assert_eq!(first, CacheKey::from_content(PEOPLE));
}

#[test]
fn import_failures_are_captured() {
    let workspace = Workspace::default();
    let outcome = workspace.import("slides.pptx", b"xx", &ImportOptions::default());
    assert!(!outcome.is_success());
    assert!(outcome.error.unwrap().contains("slides.pptx"));
    assert!(workspace.entries().is_empty());

    let outcome = workspace.import("people.csv", PEOPLE, &ImportOptions::default());
    assert!(outcome.is_success());
    assert_eq!(outcome.data.unwrap().height(), 4);
}

#[test]
fn view_edits_render_filtered_sorted_tables() {
    let workspace = Workspace::default();
    let key = import(&workspace, "people.csv", PEOPLE);
    let view = workspace.open_view(&key).unwrap();

    let (view, rendered) = workspace
        .update_view(
            &view,
            ViewEdit::AddFilter {
                spec: FilterSpec::MissingValue {
                    column: "age".into(),
                    action: MissingAction::Drop,
                },
            },
        )
        .unwrap();
    assert_eq!(rendered.table.height(), 3);

    let (view, rendered) = workspace
        .update_view(
            &view,
            ViewEdit::AddSort {
                spec: SortSpec::new("age", SortDirection::Desc),
            },
        )
        .unwrap();
    let ages: Vec<_> = rendered
        .table
        .data()
        .column("age")
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(ages, vec![Some(45), Some(31), Some(27)]);

    let (view, _) = view.with_filter(FilterSpec::Comparison {
        column: "city".into(),
        value: Operand::Number(1.0),
        operator: ComparisonOp::Gt,
    });
    let rendered = workspace.render(&view).unwrap();
    assert_eq!(rendered.skipped.len(), 1);
    assert_eq!(rendered.table.height(), 3);

    let first = workspace.render(&view).unwrap().table;
    let second = workspace.render(&view).unwrap().table;
    assert_eq!(first, second);
}

#[test]
fn summaries_use_the_filtered_table() {
    let workspace = Workspace::default();
    let key = import(&workspace, "people.csv", PEOPLE);
    let view = workspace.open_view(&key).unwrap();

    let counts = workspace.summary(&view).unwrap();
    assert_eq!(counts.rows, 4);
    assert_eq!(counts.quantitative, 1);
    assert_eq!(counts.qualitative, 2);

    let (filtered, _) = view.with_filter(FilterSpec::ColumnTypeKeep {
        kind: ColumnKind::Numeric,
    });
    let counts = workspace.summary(&filtered).unwrap();
    assert_eq!(counts.qualitative, 0);

    let description = workspace.describe_column(&view, "age").unwrap();
    assert_eq!(description.count, 3);
    let frequencies = workspace.frequencies(&view, "city").unwrap();
    assert_eq!(frequencies[0].value, "Lyon");
    assert_eq!(frequencies[0].count, 2);
}

#[test]
fn combines_create_new_entries() {
    let workspace = Workspace::default();
    let people = import(&workspace, "people.csv", PEOPLE);
    let cities = import(&workspace, "cities.csv", CITIES);

    let merged = workspace
        .merge(&people, &cities, "city", "city", JoinKind::Left)
        .unwrap();
    assert_eq!(merged.table.height(), 4);
    assert_eq!(
        merged.table.column_names(),
        vec!["name", "age", "city", "city_right", "country"]
    );
    assert!(merged.entry.name.starts_with("merged_"));
    assert_eq!(workspace.entries().len(), 3);
    assert_eq!(workspace.cache().get(&people).unwrap().width(), 3);

    let err = workspace.concat(&people, &cities, Axis::Rows).unwrap_err();
    assert!(matches!(err, CoreError::Transform(_)));
    assert_eq!(workspace.entries().len(), 3);

    let stacked = workspace.concat(&people, &people, Axis::Rows).unwrap();
    assert_eq!(stacked.table.height(), 8);
    assert!(stacked.entry.name.starts_with("concat_"));
}

#[test]
fn save_edits_keeps_column_order() {
    let workspace = Workspace::default();
    let key = import(&workspace, "cities.csv", CITIES);
    let edited = Table::new(
        DataFrame::new(vec![
            Column::new("country".into(), ["FR", "FR", "DE"]),
            Column::new("city".into(), ["Lyon", "Paris", "Munich"]),
        ])
        .unwrap(),
    );
    workspace.save_edits(&key, &edited).unwrap();
    let stored = workspace.cache().get(&key).unwrap();
    assert_eq!(stored.column_names(), vec!["city", "country"]);

    let broken = Table::new(
        DataFrame::new(vec![Column::new("city".into(), ["x"])]).unwrap(),
    );
    assert!(workspace.save_edits(&key, &broken).is_err());
    assert_eq!(workspace.cache().get(&key).unwrap().height(), 3);
}

#[test]
fn removed_entries_become_cache_misses() {
    let workspace = Workspace::default();
    let key = import(&workspace, "people.csv", PEOPLE);
    let view = workspace.open_view(&key).unwrap();
    let removed = workspace.remove(&key).unwrap();
    assert_eq!(removed.name, "people.csv");

    let err = workspace.render(&view).unwrap_err();
    assert!(err.is_cache_miss());
    assert!(workspace.open_view(&key).unwrap_err().is_cache_miss());
}

#[test]
fn export_round_trips_through_import() {
    let workspace = Workspace::default();
    let key = import(&workspace, "cities.csv", CITIES);
    let csv = workspace.export_csv(&key).unwrap();
    assert_eq!(csv, CITIES);
}

#[test]
fn reimport_keeps_saved_edits() {
    let workspace = Workspace::default();
    let key = import(&workspace, "cities.csv", CITIES);
    let edited = Table::new(
        DataFrame::new(vec![
            Column::new("city".into(), ["Lyon", "Paris"]),
            Column::new("country".into(), ["FR", "FR"]),
        ])
        .unwrap(),
    );
    workspace.save_edits(&key, &edited).unwrap();

    let again = import(&workspace, "cities-again.csv", CITIES);
    assert_eq!(again, key);
    assert_eq!(workspace.cache().get(&key).unwrap().height(), 2);
    assert_eq!(workspace.entries()[0].name, "cities.csv");
    assert_eq!(
        workspace.export_csv(&key).unwrap(),
        b"city,country\nLyon,FR\nParis,FR\n"
    );
}

#[test]
fn export_of_missing_key_is_a_cache_miss() {
    let workspace = Workspace::default();
    let err = workspace
        .export_csv(&CacheKey::from_content(CITIES))
        .unwrap_err();
    assert!(err.is_cache_miss());
}

#[test]
fn views_render_the_same_after_a_wire_round_trip() {
    let workspace = Workspace::default();
    let key = import(&workspace, "people.csv", PEOPLE);
    let (view, _) = workspace.open_view(&key).unwrap().with_filter(FilterSpec::Comparison {
        column: "age".into(),
        value: Operand::Number(30.0),
        operator: ComparisonOp::Ge,
    });
    let view = view.with_sort(SortSpec::new("name", SortDirection::Desc));

    let json = serde_json::to_string(&view).unwrap();
    let restored: ActiveView = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, view);
    assert_eq!(
        workspace.render(&restored).unwrap().table,
        workspace.render(&view).unwrap().table
    );
}

fn ages_csv(ages: &[i64]) -> Vec<u8> {
    let mut csv = String::from("age\n");
    for age in ages {
        csv.push_str(&format!("{age}\n"));
    }
    csv.into_bytes()
}

proptest! {
    #[test]
    fn rendering_is_stable_and_matches_the_filter(
        ages in proptest::collection::vec(-500i64..500, 1..40),
        threshold in -500i64..500,
    ) {
        let workspace = Workspace::default();
        let key = import(&workspace, "ages.csv", &ages_csv(&ages));
        let (view, _) = workspace.open_view(&key).unwrap().with_filter(FilterSpec::Comparison {
            column: "age".into(),
            value: Operand::Number(threshold as f64),
            operator: ComparisonOp::Gt,
        });
        let view = view.with_sort(SortSpec::new("age", SortDirection::Asc));

        let first = workspace.render(&view).unwrap().table;
        let second = workspace.render(&view).unwrap().table;
        prop_assert_eq!(&first, &second);

        let mut expected: Vec<i64> = ages.iter().copied().filter(|age| *age > threshold).collect();
        expected.sort_unstable();
        let rendered: Vec<i64> = first
            .data()
            .column("age")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        prop_assert_eq!(rendered, expected);
    }
}
