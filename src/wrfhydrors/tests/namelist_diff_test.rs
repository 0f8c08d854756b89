// wrfhydrors/tests/namelist_diff_test.rs

use serde_json::json;
use std::path::PathBuf;
use wrfhydrors::{diff_namelist, diff_namelist_str, DiffOptions};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_diff_hydro_namelists() {
    let diff = diff_namelist(
        fixture("reference.namelist"),
        fixture("candidate.namelist"),
        &DiffOptions::default(),
    )
    .unwrap();

    assert_eq!(diff.len(), 6);
    assert_eq!(
        diff.values_changed["root['hydro_nlist']['dxrt']"].new_value,
        json!(100.0)
    );
    assert_eq!(
        diff.values_changed["root['hydro_nlist']['channel_option']"].old_value,
        json!(3)
    );

    let rst_dt = &diff.type_changes["root['hydro_nlist']['rst_dt']"];
    assert_eq!((rst_dt.old_type, rst_dt.new_type), ("int", "float"));

    assert!(diff
        .dictionary_item_added
        .contains("root['hydro_nlist']['compound_channel']"));
    assert!(diff
        .dictionary_item_removed
        .contains("root['hydro_nlist']['udmp_opt']"));
}

#[test]
fn test_identical_files() {
    let path = fixture("candidate.namelist");
    let diff = diff_namelist(&path, &path, &DiffOptions::default()).unwrap();
    assert!(diff.is_empty());
    assert!(diff.to_map().unwrap().is_empty());
}

#[test]
fn test_reordered_repeated_groups() {
    let first = "
&forcing station='a' dt=3600 /
&forcing station='b' dt=60 /
&output freq=1 /
";
    let second = "
&output freq=1 /
&forcing station='b' dt=60 /
&forcing station='a' dt=3600 /
";

    let diff = diff_namelist_str(first, second, &DiffOptions::default()).unwrap();
    assert!(diff.is_empty());

    let ordered = DiffOptions {
        ignore_order: false,
        ..Default::default()
    };
    let diff = diff_namelist_str(first, second, &ordered).unwrap();
    assert_eq!(diff.values_changed.len(), 4);
}

#[test]
fn test_repeated_group_gains_a_block() {
    let first = "&forcing station='a' /";
    let second = "&forcing station='a' /\n&forcing station='b' /";

    let diff = diff_namelist_str(first, second, &DiffOptions::default()).unwrap();
    let change = &diff.type_changes["root['forcing']"];

    assert_eq!((change.old_type, change.new_type), ("dict", "list"));
}

#[test]
fn test_missing_file_names_path() {
    let err = diff_namelist(
        fixture("absent.namelist"),
        fixture("reference.namelist"),
        &DiffOptions::default(),
    )
    .unwrap_err();

    assert!(format!("{:#}", err).contains("absent.namelist"));
}

#[test]
fn test_parse_error_is_reported() {
    let err = diff_namelist_str("&g x 1 /", "&g x = 1 /", &DiffOptions::default()).unwrap_err();
    assert!(err.to_string().contains("first namelist"));
}
