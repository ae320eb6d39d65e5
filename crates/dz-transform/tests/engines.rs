//! End-to-end checks of the filter, sort and combine engines.

use dz_model::{
    ColumnKind, ComparisonOp, FilterPipeline, FilterSpec, MissingAction, Operand, SortDirection,
    SortPipeline, SortSpec, Table,
};
use dz_transform::{
    Axis, JoinKind, TransformError, apply_filters, apply_sort, concat, merge,
};
use polars::prelude::*;
use proptest::prelude::*;

fn test_df(columns: Vec<Column>) -> Table {
    Table::new(DataFrame::new(columns).unwrap())
}

fn two_by_two(a: &str, b: &str, first: [i64; 2], second: [i64; 2]) -> Table {
    test_df(vec![
        Column::new(a.into(), first),
        Column::new(b.into(), second),
    ])
}

#[test]
fn concat_rows_sums_row_counts() {
    let df1 = two_by_two("A", "B", [1, 2], [3, 4]);
    let df2 = two_by_two("A", "B", [5, 6], [7, 8]);
    let out = concat(&df1, &df2, Axis::Rows).unwrap();
    assert_eq!(out.height(), 4);
    assert_eq!(out.column_names(), vec!["A", "B"]);
}

#[test]
fn concat_rows_rejects_different_columns() {
    let df1 = two_by_two("A", "B", [1, 2], [3, 4]);
    let df2 = two_by_two("C", "D", [5, 6], [7, 8]);
    let err = concat(&df1, &df2, Axis::Rows).unwrap_err();
    assert!(matches!(err, TransformError::ShapeMismatch { .. }));
}

#[test]
fn concat_columns_requires_equal_heights() {
    let df1 = two_by_two("A", "B", [1, 2], [3, 4]);
    let df2 = test_df(vec![Column::new("C".into(), [1i64, 2, 3])]);
    let err = concat(&df1, &df2, Axis::Columns).unwrap_err();
    assert!(matches!(err, TransformError::ShapeMismatch { .. }));

    let df3 = two_by_two("C", "D", [5, 6], [7, 8]);
    let out = concat(&df1, &df3, Axis::Columns).unwrap();
    assert_eq!(out.width(), 4);
    assert_eq!(out.height(), 2);
}

#[test]
fn merge_inner_and_outer_shapes() {
    let df1 = two_by_two("A", "B", [1, 2], [10, 20]);
    let df2 = two_by_two("C", "D", [1, 2], [30, 40]);
    let inner = merge(&df1, &df2, "A", "C", JoinKind::Inner).unwrap();
    assert_eq!(inner.height(), 2);
    assert_eq!(inner.width(), 4);

    let df3 = two_by_two("C", "D", [2, 3], [30, 40]);
    let outer = merge(&df1, &df3, "A", "C", JoinKind::Outer).unwrap();
    assert_eq!(outer.height(), 3);
    assert_eq!(outer.width(), 4);
    assert_eq!(outer.data().column("A").unwrap().null_count(), 1);
    assert_eq!(outer.data().column("C").unwrap().null_count(), 1);

    let left = merge(&df1, &df3, "A", "C", JoinKind::Left).unwrap();
    assert_eq!(left.height(), 2);
    let right = merge(&df1, &df3, "A", "C", JoinKind::Right).unwrap();
    assert_eq!(right.height(), 2);
}

#[test]
fn columns_dropped_earlier_fail_later_specs() {
    let table = test_df(vec![
        Column::new("name".into(), ["a", "b"]),
        Column::new("score".into(), [Some(1.0f64), None]),
    ]);
    let (pipeline, _) = FilterPipeline::new().with_filter(FilterSpec::ColumnTypeKeep {
        kind: ColumnKind::Text,
    });
    let (pipeline, _) = pipeline.with_filter(FilterSpec::MissingValue {
        column: "score".into(),
        action: MissingAction::Drop,
    });
    let err = apply_filters(&table, &pipeline).unwrap_err();
    assert!(matches!(err, TransformError::Filter { .. }));
}

fn scores() -> Table {
    test_df(vec![
        Column::new(
            "name".into(),
            [Some("ann"), Some("bob"), Some("cy"), None, Some("dee"), Some("ed")],
        ),
        Column::new(
            "score".into(),
            [Some(3.5f64), None, Some(1.0), Some(8.0), Some(2.0), Some(400.0)],
        ),
        Column::new("pass".into(), [true, false, true, true, false, true]),
    ])
}

proptest! {
    #[test]
    fn view_derivation_is_idempotent(
        threshold in -5.0f64..10.0,
        descending in any::<bool>(),
        by_name in any::<bool>(),
    ) {
        let (filters, _) = FilterPipeline::new().with_filter(FilterSpec::Comparison {
            column: "score".into(),
            value: Operand::Number(threshold),
            operator: ComparisonOp::Ge,
        });
        let (filters, _) = filters.with_filter(FilterSpec::MissingValue {
            column: "name".into(),
            action: MissingAction::Zero,
        });
        let direction = if descending { SortDirection::Desc } else { SortDirection::Asc };
        let column = if by_name { "name" } else { "score" };
        let sort = SortPipeline::new().with_sort(SortSpec::new(column, direction));

        let table = scores();
        let first = apply_sort(&apply_filters(&table, &filters).unwrap(), &sort).unwrap();
        let second = apply_sort(&apply_filters(&table, &filters).unwrap(), &sort).unwrap();
        prop_assert_eq!(first, second);
    }
}
