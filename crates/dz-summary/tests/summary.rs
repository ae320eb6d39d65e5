use dz_model::Table;
use dz_summary::{correlation_matrix, describe_column, frequency_table, summarize};
use polars::prelude::*;

fn survey() -> Table {
    Table::new(
        DataFrame::new(vec![
            Column::new(
                "city".into(),
                [Some("Lyon"), Some("Paris"), None, Some("Lyon"), Some("Nice"), Some("Lyon")],
            ),
            Column::new(
                "age".into(),
                [Some(31i64), Some(45), Some(27), None, Some(52), Some(38)],
            ),
            Column::new("member".into(), [true, false, true, true, false, true]),
        ])
        .unwrap(),
    )
}

#[test]
fn counts_snapshot() {
    let counts = summarize(&survey()).unwrap();
    insta::assert_json_snapshot!(counts, @r#"
    {
      "rows": 6,
      "quantitative": 1,
      "qualitative": 1,
      "missing": 2
    }
    "#);
}

#[test]
fn frequency_snapshot() {
    let rows = frequency_table(&survey(), "city").unwrap();
    let rendered: Vec<String> = rows
        .iter()
        .map(|row| format!("{} {} {}", row.value, row.count, row.percentage))
        .collect();
    insta::assert_snapshot!(rendered.join("\n"), @r"
    Lyon 3 50
    Paris 1 16.67
    NA 1 16.67
    Nice 1 16.67
    ");
}

#[test]
fn describe_after_missing_values() {
    let description = describe_column(&survey(), "age").unwrap();
    assert_eq!(description.count, 5);
    assert_eq!(description.missing, 1);
    assert_eq!(description.min, Some(27.0));
    assert_eq!(description.max, Some(52.0));
    assert_eq!(description.median, Some(38.0));
}

#[test]
fn correlation_ignores_booleans_and_text() {
    let matrix = correlation_matrix(&survey()).unwrap();
    assert_eq!(matrix.columns, vec!["age"]);
    assert_eq!(matrix.get("age", "age"), Some(1.0));
}
