// End-to-end reads against the in-memory store: offset/limit semantics
// across file boundaries, schema merging, and per-file failure handling.

use cloudpeek::read::{FormatOptions, read_multi_file, read_single_file};
use cloudpeek::storage::FileEntry;
use cloudpeek::storage::fake::FakeStore;
use cloudpeek::{Format, PeekError, TypeTag};
use serde_json::Value;

fn jsonl(ids: std::ops::Range<i64>) -> String {
    ids.map(|i| format!("{{\"id\":{i}}}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Store the given bodies and return matching entries, in key order.
fn seed(store: &FakeStore, files: &[(&str, String)]) -> Vec<FileEntry> {
    files
        .iter()
        .map(|(key, body)| {
            store.put(*key, body.clone().into_bytes());
            FileEntry::new(*key, body.len() as u64)
        })
        .collect()
}

#[test]
fn single_file_offset_and_limit_fold_into_one_budget() {
    let store = FakeStore::new();
    let files = seed(&store, &[("data.jsonl", jsonl(1..11))]);

    // 10 rows, offset 8, limit 5: budget 13, and only rows 9 and 10 remain.
    let table = read_single_file(
        &store,
        &files[0].name,
        Format::Json,
        8,
        5,
        None,
        &FormatOptions::default(),
    )
    .unwrap();
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0]["id"], Value::from(9));
    assert_eq!(table.rows[1]["id"], Value::from(10));
}

#[test]
fn single_file_offset_past_the_end_keeps_the_schema() {
    let store = FakeStore::new();
    let files = seed(&store, &[("data.jsonl", jsonl(1..4))]);

    let table = read_single_file(
        &store,
        &files[0].name,
        Format::Json,
        50,
        0,
        None,
        &FormatOptions::default(),
    )
    .unwrap();
    assert!(table.rows.is_empty());
    assert_eq!(table.schema.get("id"), Some(TypeTag::Int));
}

#[test]
fn multi_file_accumulation_matches_the_formula() {
    let store = FakeStore::new();
    let files = seed(
        &store,
        &[
            ("part-0.jsonl", jsonl(0..3)),
            ("part-1.jsonl", jsonl(3..7)),
            ("part-2.jsonl", jsonl(7..12)),
        ],
    );
    let total: i64 = 12;

    for offset in 0..14usize {
        for limit in 1..7usize {
            let (table, seen) = read_multi_file(
                &store,
                &files,
                Format::Json,
                offset,
                limit,
                None,
                &FormatOptions::default(),
            )
            .unwrap();
            let expected = limit.min((total as usize).saturating_sub(offset));
            assert_eq!(
                table.rows.len(),
                expected,
                "offset={offset} limit={limit}"
            );
            // Rows come back in file order, so ids are contiguous from offset.
            for (i, row) in table.rows.iter().enumerate() {
                assert_eq!(row["id"], Value::from((offset + i) as i64));
            }
            assert!(seen <= total as u64);
        }
    }
}

#[test]
fn offset_spans_a_file_boundary() {
    let store = FakeStore::new();
    let files = seed(
        &store,
        &[("a.jsonl", jsonl(1..4)), ("b.jsonl", jsonl(4..8))],
    );

    // 3 + 4 rows, offset 5, limit 1: the first file is skipped entirely,
    // the second skips two more rows and contributes exactly one.
    let (table, _) = read_multi_file(
        &store,
        &files,
        Format::Json,
        5,
        1,
        None,
        &FormatOptions::default(),
    )
    .unwrap();
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0]["id"], Value::from(6));
}

#[test]
fn offset_skipping_everything_is_a_warning_not_an_error() {
    let store = FakeStore::new();
    let files = seed(
        &store,
        &[("a.jsonl", jsonl(0..2)), ("b.jsonl", jsonl(2..4))],
    );

    let (table, seen) = read_multi_file(
        &store,
        &files,
        Format::Json,
        10,
        5,
        None,
        &FormatOptions::default(),
    )
    .unwrap();
    assert!(table.rows.is_empty());
    assert_eq!(seen, 4, "total decoded rows are still reported");
}

#[test]
fn schemas_are_recorded_even_for_fully_skipped_files() {
    let store = FakeStore::new();
    let files = seed(
        &store,
        &[
            ("a.jsonl", "{\"a_only\":1}\n{\"a_only\":2}".to_string()),
            ("b.jsonl", "{\"b_only\":\"x\"}\n{\"b_only\":\"y\"}".to_string()),
        ],
    );

    let (table, _) = read_multi_file(
        &store,
        &files,
        Format::Json,
        2,
        0,
        None,
        &FormatOptions::default(),
    )
    .unwrap();
    assert_eq!(table.rows.len(), 2, "only file b survives the offset");
    assert_eq!(table.schema.get("a_only"), Some(TypeTag::Int));
    assert_eq!(table.schema.get("b_only"), Some(TypeTag::Str));
}

#[test]
fn conflicting_column_types_merge_to_mixed() {
    let store = FakeStore::new();
    let files = seed(
        &store,
        &[
            ("a.jsonl", "{\"v\":1}".to_string()),
            ("b.jsonl", "{\"v\":\"text\"}".to_string()),
        ],
    );

    let (table, _) = read_multi_file(
        &store,
        &files,
        Format::Json,
        0,
        0,
        None,
        &FormatOptions::default(),
    )
    .unwrap();
    assert_eq!(table.schema.get("v"), Some(TypeTag::Mixed));
}

#[test]
fn satisfied_limit_stops_before_later_files() {
    let store = FakeStore::new();
    let files = seed(
        &store,
        &[
            ("a.jsonl", "{\"from_a\":1}\n{\"from_a\":2}".to_string()),
            ("b.jsonl", "{\"from_b\":1}".to_string()),
        ],
    );

    let (table, _) = read_multi_file(
        &store,
        &files,
        Format::Json,
        0,
        2,
        None,
        &FormatOptions::default(),
    )
    .unwrap();
    assert_eq!(table.rows.len(), 2);
    assert_eq!(
        table.schema.get("from_b"),
        None,
        "the second file is never opened once the limit is met"
    );
}

#[test]
fn a_broken_file_is_skipped_with_the_rest_still_read() {
    let store = FakeStore::new();
    let files = seed(
        &store,
        &[
            ("a.jsonl", "{\"id\":1}".to_string()),
            ("broken.jsonl", "][ not json".to_string()),
            ("c.jsonl", "{\"id\":3}".to_string()),
        ],
    );

    let (table, seen) = read_multi_file(
        &store,
        &files,
        Format::Json,
        0,
        0,
        None,
        &FormatOptions::default(),
    )
    .unwrap();
    assert_eq!(table.rows.len(), 2);
    assert_eq!(seen, 2);
}

#[test]
fn all_files_failing_is_no_data_read() {
    let store = FakeStore::new();
    let files = seed(
        &store,
        &[
            ("a.jsonl", "][".to_string()),
            ("b.jsonl", "][".to_string()),
        ],
    );

    let err = read_multi_file(
        &store,
        &files,
        Format::Json,
        0,
        0,
        None,
        &FormatOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err, PeekError::NoDataRead);
}

#[test]
fn counting_decodes_everything_for_row_formats() {
    let store = FakeStore::new();
    let files = seed(&store, &[("data.jsonl", jsonl(0..37))]);
    let count = cloudpeek::read::count_records(
        &store,
        &files[0].name,
        Format::Json,
        &FormatOptions::default(),
    )
    .unwrap();
    assert_eq!(count, 37);
}

#[test]
fn csv_reads_end_to_end_with_projection() {
    let store = FakeStore::new();
    let files = seed(
        &store,
        &[(
            "people.csv",
            "id,name,age\n1,alice,34\n2,bob,28\n3,carol,45\n".to_string(),
        )],
    );

    let columns = vec!["name".to_string(), "age".to_string()];
    let table = read_single_file(
        &store,
        &files[0].name,
        Format::Csv,
        1,
        2,
        Some(&columns),
        &FormatOptions::default(),
    )
    .unwrap();
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0]["name"], Value::from("bob"));
    assert!(table.rows[0].get("id").is_none(), "projected out");
    assert_eq!(table.schema.len(), 3, "schema is never projected");
}
