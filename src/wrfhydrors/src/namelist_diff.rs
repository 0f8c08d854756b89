// wrfhydrors/src/namelist_diff.rs

//! Structural differences between two namelists.
//!
//! Both namelists are turned into plain JSON trees and walked side by side.
//! Changes are keyed by paths such as `root['hydro_nlist']['dxrt']` or
//! `root['nudging_nlist'][1]['nlastobs']` for the second block of a repeated
//! group, and grouped the same way DeepDiff groups them.

use anyhow::Context;
use f90nmlrs::Namelist;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

const ROOT: &str = "root";

#[derive(Debug, Clone, PartialEq)]
pub struct DiffOptions {
    /// Compare lists as multisets; repeated groups and array values may be reordered
    pub ignore_order: bool,
    pub ignore_string_case: bool,
    /// Treat `1` and `1.0` as the same type
    pub ignore_numeric_type_changes: bool,
    /// Compare numbers rounded to this many decimal places
    pub significant_digits: Option<usize>,
    /// Paths skipped along with everything below them, matched case-insensitively
    pub exclude_paths: Vec<String>,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            ignore_order: true,
            ignore_string_case: false,
            ignore_numeric_type_changes: false,
            significant_digits: None,
            exclude_paths: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueChange {
    pub new_value: Value,
    pub old_value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeChange {
    pub old_type: &'static str,
    pub new_type: &'static str,
    pub old_value: Value,
    pub new_value: Value,
}

/// Differences found going from the first namelist to the second
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NamelistDiff {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub values_changed: BTreeMap<String, ValueChange>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub type_changes: BTreeMap<String, TypeChange>,

    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub dictionary_item_added: BTreeSet<String>,

    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub dictionary_item_removed: BTreeSet<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub iterable_item_added: BTreeMap<String, Value>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub iterable_item_removed: BTreeMap<String, Value>,
}

impl NamelistDiff {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of reported changes
    pub fn len(&self) -> usize {
        self.values_changed.len()
            + self.type_changes.len()
            + self.dictionary_item_added.len()
            + self.dictionary_item_removed.len()
            + self.iterable_item_added.len()
            + self.iterable_item_removed.len()
    }

    /// Plain nested mapping with only the non-empty sections
    pub fn to_map(&self) -> serde_json::Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}

/// Diff two namelist files
pub fn diff_namelist<P, Q>(path1: P, path2: Q, options: &DiffOptions) -> anyhow::Result<NamelistDiff>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let old = read_namelist(path1.as_ref())?;
    let new = read_namelist(path2.as_ref())?;
    diff_namelists(&old, &new, options)
}

/// Diff two namelists given as text
pub fn diff_namelist_str(text1: &str, text2: &str, options: &DiffOptions) -> anyhow::Result<NamelistDiff> {
    let old = f90nmlrs::reads(text1).context("Error parsing first namelist")?;
    let new = f90nmlrs::reads(text2).context("Error parsing second namelist")?;
    diff_namelists(&old, &new, options)
}

pub fn diff_namelists(old: &Namelist, new: &Namelist, options: &DiffOptions) -> anyhow::Result<NamelistDiff> {
    let old = f90nmlrs::to_json_value(old).context("Error converting namelist to a tree")?;
    let new = f90nmlrs::to_json_value(new).context("Error converting namelist to a tree")?;
    Ok(diff_values(&old, &new, options))
}

/// Diff two arbitrary JSON trees
pub fn diff_values(old: &Value, new: &Value, options: &DiffOptions) -> NamelistDiff {
    let mut differ = Differ::new(options);
    differ.diff(ROOT, old, new);
    differ.diff
}

fn read_namelist(path: &Path) -> anyhow::Result<Namelist> {
    let content = fs_err::read_to_string(path)
        .context(format!("Error reading {} to string.", path.display()))?;
    f90nmlrs::reads(&content).context(format!("Error parsing namelist: {}", path.display()))
}

/// DeepDiff's names for the types a namelist tree can hold
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn is_numeric(type_name: &str) -> bool {
    matches!(type_name, "int" | "float")
}

fn key_path(path: &str, key: &str) -> String {
    format!("{}['{}']", path, key)
}

fn index_path(path: &str, index: usize) -> String {
    format!("{}[{}]", path, index)
}

struct Differ<'a> {
    options: &'a DiffOptions,
    excluded: Vec<String>,
    diff: NamelistDiff,
}

impl<'a> Differ<'a> {
    fn new(options: &'a DiffOptions) -> Self {
        Self {
            options,
            excluded: options
                .exclude_paths
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            diff: NamelistDiff::default(),
        }
    }

    fn is_excluded(&self, path: &str) -> bool {
        if self.excluded.is_empty() {
            return false;
        }
        let path = path.to_lowercase();
        self.excluded.iter().any(|excluded| {
            path == *excluded
                || (path.starts_with(excluded.as_str()) && path[excluded.len()..].starts_with('['))
        })
    }

    fn diff(&mut self, path: &str, old: &Value, new: &Value) {
        if self.is_excluded(path) {
            return;
        }

        match (old, new) {
            (Value::Object(old), Value::Object(new)) => self.diff_objects(path, old, new),
            (Value::Array(old), Value::Array(new)) if self.options.ignore_order => {
                self.diff_unordered(path, old, new)
            }
            (Value::Array(old), Value::Array(new)) => self.diff_ordered(path, old, new),
            _ => self.diff_scalars(path, old, new),
        }
    }

    fn diff_objects(&mut self, path: &str, old: &Map<String, Value>, new: &Map<String, Value>) {
        for (key, old_value) in old {
            let item_path = key_path(path, key);
            match new.get(key) {
                Some(new_value) => self.diff(&item_path, old_value, new_value),
                None if !self.is_excluded(&item_path) => {
                    self.diff.dictionary_item_removed.insert(item_path);
                }
                None => {}
            }
        }

        for key in new.keys().filter(|key| !old.contains_key(*key)) {
            let item_path = key_path(path, key);
            if !self.is_excluded(&item_path) {
                self.diff.dictionary_item_added.insert(item_path);
            }
        }
    }

    fn diff_ordered(&mut self, path: &str, old: &[Value], new: &[Value]) {
        for (i, (old_item, new_item)) in old.iter().zip(new).enumerate() {
            self.diff(&index_path(path, i), old_item, new_item);
        }
        for (i, item) in old.iter().enumerate().skip(new.len()) {
            self.record_removed(path, i, item);
        }
        for (i, item) in new.iter().enumerate().skip(old.len()) {
            self.record_added(path, i, item);
        }
    }

    /// Items equal under the active options cancel out regardless of position.
    /// Leftover containers are paired in order and diffed member by member;
    /// leftover scalars are reported as removed or added.
    fn diff_unordered(&mut self, path: &str, old: &[Value], new: &[Value]) {
        let new_keys: Vec<String> = new.iter().map(|item| self.canonical(item)).collect();
        let mut matched = vec![false; new.len()];
        let mut removed = Vec::new();

        for (i, item) in old.iter().enumerate() {
            let key = self.canonical(item);
            match (0..new.len()).find(|&j| !matched[j] && new_keys[j] == key) {
                Some(j) => matched[j] = true,
                None => removed.push((i, item)),
            }
        }

        let mut added: Vec<(usize, &Value)> = new
            .iter()
            .enumerate()
            .filter(|(j, _)| !matched[*j])
            .collect();

        for (i, old_item) in removed {
            let partner = added
                .iter()
                .position(|(_, new_item)| same_container_kind(old_item, new_item));

            match partner {
                Some(pos) => {
                    let (_, new_item) = added.remove(pos);
                    self.diff(&index_path(path, i), old_item, new_item);
                }
                None => self.record_removed(path, i, old_item),
            }
        }

        for (j, item) in added {
            self.record_added(path, j, item);
        }
    }

    fn diff_scalars(&mut self, path: &str, old: &Value, new: &Value) {
        let old_type = type_name(old);
        let new_type = type_name(new);

        let numeric_pair = is_numeric(old_type) && is_numeric(new_type);
        if old_type != new_type && !(numeric_pair && self.options.ignore_numeric_type_changes) {
            self.diff.type_changes.insert(
                path.to_string(),
                TypeChange {
                    old_type,
                    new_type,
                    old_value: old.clone(),
                    new_value: new.clone(),
                },
            );
            return;
        }

        if !self.scalars_equal(old, new) {
            self.diff.values_changed.insert(
                path.to_string(),
                ValueChange {
                    new_value: new.clone(),
                    old_value: old.clone(),
                },
            );
        }
    }

    fn scalars_equal(&self, old: &Value, new: &Value) -> bool {
        match (old, new) {
            (Value::Number(a), Value::Number(b)) => self.numbers_equal(a, b),
            (Value::String(a), Value::String(b)) if self.options.ignore_string_case => {
                a.to_lowercase() == b.to_lowercase()
            }
            _ => old == new,
        }
    }

    fn numbers_equal(&self, a: &Number, b: &Number) -> bool {
        if let Some(digits) = self.options.significant_digits {
            return round(a, digits) == round(b, digits);
        }
        match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => a.as_f64() == b.as_f64(),
        }
    }

    /// Key under which two values compare equal, used to match list items
    fn canonical(&self, value: &Value) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => format!("bool:{}", b),
            Value::Number(n) => self.number_key(n),
            Value::String(s) if self.options.ignore_string_case => {
                format!("str:{:?}", s.to_lowercase())
            }
            Value::String(s) => format!("str:{:?}", s),
            Value::Array(items) => {
                let mut keys: Vec<String> = items.iter().map(|item| self.canonical(item)).collect();
                if self.options.ignore_order {
                    keys.sort();
                }
                format!("[{}]", keys.join(","))
            }
            Value::Object(map) => {
                let mut entries: Vec<String> = map
                    .iter()
                    .map(|(key, item)| format!("{:?}:{}", key, self.canonical(item)))
                    .collect();
                entries.sort();
                format!("{{{}}}", entries.join(","))
            }
        }
    }

    fn number_key(&self, n: &Number) -> String {
        let kind = if self.options.ignore_numeric_type_changes {
            "num"
        } else {
            type_name(&Value::Number(n.clone()))
        };

        match self.options.significant_digits {
            Some(digits) => format!("{}:{}", kind, round(n, digits)),
            None if self.options.ignore_numeric_type_changes => {
                format!("{}:{:?}", kind, n.as_f64().unwrap_or(f64::NAN))
            }
            None => format!("{}:{}", kind, n),
        }
    }

    fn record_removed(&mut self, path: &str, index: usize, item: &Value) {
        let item_path = index_path(path, index);
        if !self.is_excluded(&item_path) {
            self.diff.iterable_item_removed.insert(item_path, item.clone());
        }
    }

    fn record_added(&mut self, path: &str, index: usize, item: &Value) {
        let item_path = index_path(path, index);
        if !self.is_excluded(&item_path) {
            self.diff.iterable_item_added.insert(item_path, item.clone());
        }
    }
}

fn round(n: &Number, digits: usize) -> String {
    format!("{:.*}", digits, n.as_f64().unwrap_or(f64::NAN))
}

fn same_container_kind(a: &Value, b: &Value) -> bool {
    matches!(
        (a, b),
        (Value::Object(_), Value::Object(_)) | (Value::Array(_), Value::Array(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn diff(old: Value, new: Value) -> NamelistDiff {
        diff_values(&old, &new, &DiffOptions::default())
    }

    #[test]
    fn test_identical_is_empty() {
        let tree = json!({"hydro_nlist": {"dxrt": 250.0, "sys_cpl": 1}});
        assert!(diff(tree.clone(), tree).is_empty());
    }

    #[test]
    fn test_value_changed() {
        let result = diff(
            json!({"hydro_nlist": {"dxrt": 250.0}}),
            json!({"hydro_nlist": {"dxrt": 100.0}}),
        );

        assert_eq!(result.len(), 1);
        assert_eq!(
            result.values_changed["root['hydro_nlist']['dxrt']"],
            ValueChange {
                new_value: json!(100.0),
                old_value: json!(250.0)
            }
        );
    }

    #[test]
    fn test_int_to_float_is_type_change() {
        let result = diff(json!({"g": {"v": 1}}), json!({"g": {"v": 1.0}}));

        let change = &result.type_changes["root['g']['v']"];
        assert_eq!(change.old_type, "int");
        assert_eq!(change.new_type, "float");
    }

    #[test]
    fn test_ignore_numeric_type_changes() {
        let options = DiffOptions {
            ignore_numeric_type_changes: true,
            ..Default::default()
        };

        let same = diff_values(&json!({"v": 1}), &json!({"v": 1.0}), &options);
        assert!(same.is_empty());

        let changed = diff_values(&json!({"v": 1}), &json!({"v": 2.5}), &options);
        assert_eq!(changed.values_changed.len(), 1);
    }

    #[test]
    fn test_dictionary_items() {
        let result = diff(
            json!({"g": {"a": 1, "b": 2}, "old_group": {}}),
            json!({"g": {"a": 1, "c": 3}, "new_group": {}}),
        );

        assert_eq!(
            result.dictionary_item_removed,
            BTreeSet::from(["root['g']['b']".to_string(), "root['old_group']".to_string()])
        );
        assert_eq!(
            result.dictionary_item_added,
            BTreeSet::from(["root['g']['c']".to_string(), "root['new_group']".to_string()])
        );
    }

    #[test]
    fn test_reordered_list_is_equal() {
        assert!(diff(json!({"v": [1, 2, 3]}), json!({"v": [3, 1, 2]})).is_empty());
    }

    #[test]
    fn test_reordered_blocks_are_equal() {
        let old = json!({"g": [{"id": 1, "x": "a"}, {"id": 2, "x": "b"}]});
        let new = json!({"g": [{"x": "b", "id": 2}, {"id": 1, "x": "a"}]});
        assert!(diff(old, new).is_empty());
    }

    #[test]
    fn test_unordered_scalars_added_and_removed() {
        let result = diff(json!({"v": [1, 2, 2]}), json!({"v": [2, 5, 1]}));

        assert_eq!(result.iterable_item_removed, BTreeMap::from([("root['v'][2]".to_string(), json!(2))]));
        assert_eq!(result.iterable_item_added, BTreeMap::from([("root['v'][1]".to_string(), json!(5))]));
    }

    #[test]
    fn test_unmatched_blocks_are_diffed_member_wise() {
        let old = json!({"g": [{"id": 1, "x": 10}, {"id": 2, "x": 20}]});
        let new = json!({"g": [{"id": 2, "x": 20}, {"id": 1, "x": 11}]});

        let result = diff(old, new);

        assert_eq!(result.len(), 1);
        assert!(result.values_changed.contains_key("root['g'][0]['x']"));
    }

    #[test]
    fn test_ordered_lists() {
        let options = DiffOptions {
            ignore_order: false,
            ..Default::default()
        };
        let result = diff_values(&json!({"v": [1, 2, 3]}), &json!({"v": [2, 1]}), &options);

        assert_eq!(result.values_changed.len(), 2);
        assert_eq!(result.iterable_item_removed["root['v'][2]"], json!(3));
    }

    #[test]
    fn test_string_case() {
        let old = json!({"v": "./DOMAIN/Fulldom.nc"});
        let new = json!({"v": "./domain/fulldom.nc"});

        assert_eq!(diff(old.clone(), new.clone()).len(), 1);

        let options = DiffOptions {
            ignore_string_case: true,
            ..Default::default()
        };
        assert!(diff_values(&old, &new, &options).is_empty());
    }

    #[test]
    fn test_significant_digits() {
        let options = DiffOptions {
            significant_digits: Some(2),
            ..Default::default()
        };

        let close = diff_values(&json!({"v": [0.1234, 5.0]}), &json!({"v": [5.0001, 0.1201]}), &options);
        assert!(close.is_empty());

        let far = diff_values(&json!({"v": 0.12}), &json!({"v": 0.13}), &options);
        assert_eq!(far.values_changed.len(), 1);
    }

    #[test]
    fn test_exclude_paths() {
        let options = DiffOptions {
            exclude_paths: vec!["root['HYDRO_nlist']['geogrid']".to_string()],
            ..Default::default()
        };
        let old = json!({"hydro_nlist": {"geogrid": "a.nc", "geogrid_file": 1}});
        let new = json!({"hydro_nlist": {"geogrid": "b.nc", "geogrid_file": 2}});

        let result = diff_values(&old, &new, &options);

        assert_eq!(result.len(), 1);
        assert!(result.values_changed.contains_key("root['hydro_nlist']['geogrid_file']"));
    }

    #[test]
    fn test_null_to_value_is_type_change() {
        let result = diff(json!({"v": null}), json!({"v": "x"}));
        assert_eq!(result.type_changes["root['v']"].old_type, "NoneType");
    }

    #[test]
    fn test_to_map_omits_empty_sections() {
        let result = diff(json!({"v": 1}), json!({"v": 2, "w": 3}));
        let map = result.to_map().unwrap();

        assert_eq!(map.len(), 2);
        assert!(!map.contains_key("type_changes"));
        assert_eq!(map["values_changed"]["root['v']"]["old_value"], json!(1));
        assert_eq!(map["dictionary_item_added"], json!(["root['w']"]));
    }

    #[test]
    fn test_complex_parts_keep_their_order() {
        let swapped =
            diff_namelist_str("&g z = (1.0, 2.0) /", "&g z = (2.0, 1.0) /", &DiffOptions::default())
                .unwrap();

        assert_eq!(swapped.values_changed.len(), 2);
        assert!(swapped.values_changed.contains_key("root['g']['z']['re']"));
        assert!(swapped.values_changed.contains_key("root['g']['z']['im']"));

        let reordered = diff_namelist_str(
            "&g z = (1.0, 2.0), (3.0, 4.0) /",
            "&g z = (3.0, 4.0), (1.0, 2.0) /",
            &DiffOptions::default(),
        )
        .unwrap();
        assert!(reordered.is_empty());
    }
}
