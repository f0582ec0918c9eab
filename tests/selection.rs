use cloudpeek::select::{MultiFileMode, SelectionCriteria, find_first, select_files, select_for_budget};
use cloudpeek::storage::FileEntry;
use cloudpeek::{Format, PeekError};

fn entry(name: &str, size: u64) -> FileEntry {
    FileEntry::new(name, size)
}

#[test]
fn budget_scenario_includes_the_crossing_file() {
    let listing = vec![
        entry("a.csv", 100),
        entry("_SUCCESS", 0),
        entry("b.csv", 200),
    ];
    let selected = select_for_budget(&listing, "p/", None, 150).unwrap();
    assert_eq!(selected, vec![entry("a.csv", 100), entry("b.csv", 200)]);
}

#[test]
fn selection_is_sorted_regardless_of_listing_order() {
    let orders: [&[&str]; 3] = [
        &["c.csv", "a.csv", "b.csv"],
        &["b.csv", "c.csv", "a.csv"],
        &["a.csv", "b.csv", "c.csv"],
    ];
    for names in orders {
        let listing: Vec<FileEntry> = names.iter().map(|n| entry(n, 10)).collect();
        let selected = select_for_budget(&listing, "p/", None, u64::MAX).unwrap();
        let got: Vec<&str> = selected.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(got, vec!["a.csv", "b.csv", "c.csv"], "input order {names:?}");
        assert!(selected.windows(2).all(|w| w[0].name <= w[1].name));
    }
}

#[test]
fn metadata_files_are_dropped_but_never_to_emptiness() {
    let listing = vec![
        entry("data.csv", 1024),
        entry("_SUCCESS", 4),
        entry("file.crc", 128),
        entry("data.committed", 64),
        entry("data.pending", 32),
        entry("_metadata", 256),
    ];
    let selected = select_for_budget(&listing, "p/", None, u64::MAX).unwrap();
    assert_eq!(selected, vec![entry("data.csv", 1024)]);

    // All-metadata listings fall back instead of failing.
    let only_meta = vec![entry("_SUCCESS", 4), entry("file.crc", 128)];
    let selected = select_for_budget(&only_meta, "p/", None, u64::MAX).unwrap();
    assert_eq!(selected.len(), 2);
}

#[test]
fn format_filter_narrows_or_falls_back() {
    let listing = vec![
        entry("data1.csv", 1024),
        entry("data2.json", 2048),
        entry("data3.parquet", 4096),
    ];
    let selected =
        select_for_budget(&listing, "p/", Some(Format::Csv), u64::MAX).unwrap();
    assert_eq!(selected, vec![entry("data1.csv", 1024)]);

    let json_only = vec![entry("a.json", 1), entry("b.json", 2)];
    let selected =
        select_for_budget(&json_only, "p/", Some(Format::Csv), u64::MAX).unwrap();
    assert_eq!(selected.len(), 2, "no matches keeps the whole set");
}

#[test]
fn format_filter_sees_through_compression_suffixes() {
    let listing = vec![entry("x.csv.gz", 10), entry("y.json.gz", 10)];
    let selected =
        select_for_budget(&listing, "p/", Some(Format::Json), u64::MAX).unwrap();
    assert_eq!(selected, vec![entry("y.json.gz", 10)]);
}

#[test]
fn empty_and_all_zero_listings_are_fatal() {
    assert!(matches!(
        find_first(&[], "p/", None),
        Err(PeekError::EmptyDirectory { .. })
    ));
    let zeroes = vec![entry("_SUCCESS", 0), entry("x.crc", 0)];
    assert!(matches!(
        find_first(&zeroes, "p/", None),
        Err(PeekError::NoNonEmptyFiles { .. })
    ));
}

#[test]
fn find_first_prefers_data_files() {
    let listing = vec![
        entry("_SUCCESS", 8),
        entry("data1.csv", 1024),
        entry("data2.csv", 2048),
    ];
    assert_eq!(find_first(&listing, "p/", None).unwrap().name, "data1.csv");
}

#[test]
fn criteria_mode_controls_single_versus_multi() {
    let listing = vec![entry("a.csv", 10), entry("b.csv", 10)];

    let first = SelectionCriteria {
        format: None,
        max_total_bytes: Some(1024),
        mode: MultiFileMode::First,
    };
    assert_eq!(select_files(&listing, "p/", &first).unwrap().len(), 1);

    let all = SelectionCriteria {
        format: None,
        max_total_bytes: Some(1024),
        mode: MultiFileMode::All,
    };
    assert_eq!(select_files(&listing, "p/", &all).unwrap().len(), 2);

    let auto_no_budget = SelectionCriteria {
        format: None,
        max_total_bytes: Some(0),
        mode: MultiFileMode::Auto,
    };
    assert_eq!(
        select_files(&listing, "p/", &auto_no_budget).unwrap().len(),
        1,
        "auto with a zero budget degrades to first-file"
    );
}
