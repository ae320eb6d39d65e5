use dz_model::{
    ActiveView, CacheKey, ColumnKind, FilterPipeline, FilterSpec, MissingAction, SortDirection,
    SortSpec, ViewPipeline,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn content_key_is_deterministic(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        prop_assert_eq!(CacheKey::from_content(&bytes), CacheKey::from_content(&bytes));
    }

    #[test]
    fn single_byte_change_changes_key(
        bytes in proptest::collection::vec(any::<u8>(), 1..256),
        idx in any::<prop::sample::Index>(),
    ) {
        let mut changed = bytes.clone();
        let pos = idx.index(changed.len());
        changed[pos] = changed[pos].wrapping_add(1);
        prop_assert_ne!(CacheKey::from_content(&bytes), CacheKey::from_content(&changed));
    }
}

#[test]
fn view_pipeline_survives_json() {
    let (filters, _) = FilterPipeline::new().with_filter(FilterSpec::ColumnTypeKeep {
        kind: ColumnKind::Numeric,
    });
    let (filters, _) = filters.with_filter(FilterSpec::MissingValue {
        column: "score".to_string(),
        action: MissingAction::Mean,
    });
    let view = ActiveView::with_pipeline(
        CacheKey::from_content(b"score\n1\n"),
        ViewPipeline {
            filters,
            sort: Default::default(),
        },
    )
    .with_sort(SortSpec::new("score", SortDirection::Desc));

    let json = serde_json::to_string(&view).unwrap();
    let back: ActiveView = serde_json::from_str(&json).unwrap();
    assert_eq!(back, view);
}
