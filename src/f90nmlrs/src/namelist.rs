// f90nmlrs/src/namelist.rs

//! Namelist and group data structures.
//!
//! A namelist file may contain the same group name more than once; every
//! occurrence is kept as its own block, in file order.

use crate::value::FortranValue;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::HashMap;

/// A complete Fortran namelist containing multiple groups.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Namelist {
    /// Blocks for each group name, in the order they appeared
    groups: HashMap<String, Vec<NamelistGroup>>,
    /// Order of first appearance of each group name
    group_order: Vec<String>,
}

impl Namelist {
    /// Create a new empty namelist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new block for `name` and return a mutable reference to it.
    pub fn insert_group(&mut self, name: &str) -> &mut NamelistGroup {
        let name = name.to_lowercase();
        if !self.groups.contains_key(&name) {
            self.group_order.push(name.clone());
        }
        let blocks = self.groups.entry(name).or_default();
        blocks.push(NamelistGroup::new());
        let last = blocks.len() - 1;
        &mut blocks[last]
    }

    /// Append a group block. Repeated names accumulate rather than replace.
    pub fn push_group(&mut self, name: &str, group: NamelistGroup) {
        let name = name.to_lowercase();
        if !self.groups.contains_key(&name) {
            self.group_order.push(name.clone());
        }
        self.groups.entry(name).or_default().push(group);
    }

    /// Get the first block with the given name.
    pub fn get_group(&self, name: &str) -> Option<&NamelistGroup> {
        self.groups
            .get(&name.to_lowercase())
            .and_then(|blocks| blocks.first())
    }

    /// Get every block with the given name.
    pub fn get_groups(&self, name: &str) -> &[NamelistGroup] {
        self.groups
            .get(&name.to_lowercase())
            .map(|blocks| blocks.as_slice())
            .unwrap_or(&[])
    }

    /// Check if a group exists.
    pub fn has_group(&self, name: &str) -> bool {
        self.groups.contains_key(&name.to_lowercase())
    }

    /// Get all distinct group names in order of first appearance.
    pub fn group_names(&self) -> &[String] {
        &self.group_order
    }

    /// Iterate over `(name, blocks)` in order of first appearance.
    pub fn groups(&self) -> impl Iterator<Item = (&String, &[NamelistGroup])> {
        self.group_order.iter().filter_map(move |name| {
            self.groups
                .get(name)
                .map(|blocks| (name, blocks.as_slice()))
        })
    }

    /// Check if the namelist is empty.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Get the number of distinct group names.
    pub fn len(&self) -> usize {
        self.group_order.len()
    }
}

impl Serialize for Namelist {
    /// Groups serialize as a map; a repeated group becomes a list of blocks.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.group_order.len()))?;
        for (name, blocks) in self.groups() {
            if blocks.len() == 1 {
                map.serialize_entry(name, &blocks[0])?;
            } else {
                map.serialize_entry(name, blocks)?;
            }
        }
        map.end()
    }
}

/// A single namelist group containing variables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NamelistGroup {
    variables: HashMap<String, FortranValue>,
    variable_order: Vec<String>,
}

impl NamelistGroup {
    /// Create a new empty namelist group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable, replacing any previous value.
    pub fn insert<T: Into<FortranValue>>(&mut self, name: &str, value: T) -> &mut Self {
        *self.slot_mut(name) = value.into();
        self
    }

    /// Get the slot for a variable, creating a null slot if absent.
    pub(crate) fn slot_mut(&mut self, name: &str) -> &mut FortranValue {
        let name = name.to_lowercase();
        if !self.variables.contains_key(&name) {
            self.variable_order.push(name.clone());
        }
        self.variables.entry(name).or_insert(FortranValue::Null)
    }

    /// Get a variable by name.
    pub fn get(&self, name: &str) -> Option<&FortranValue> {
        self.variables.get(&name.to_lowercase())
    }

    /// Check if a variable exists.
    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.contains_key(&name.to_lowercase())
    }

    /// Get all variable names in order.
    pub fn variable_names(&self) -> &[String] {
        &self.variable_order
    }

    /// Get an iterator over all variables.
    pub fn variables(&self) -> impl Iterator<Item = (&String, &FortranValue)> {
        self.variable_order
            .iter()
            .filter_map(move |name| self.variables.get(name).map(|value| (name, value)))
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(FortranValue::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FortranValue::as_f64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FortranValue::as_bool)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FortranValue::as_str)
    }

    /// Check if the group is empty.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Get the number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }
}

impl Serialize for NamelistGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.variable_order.len()))?;
        for (name, value) in self.variables() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl From<i64> for FortranValue {
    fn from(value: i64) -> Self {
        FortranValue::Integer(value)
    }
}

impl From<i32> for FortranValue {
    fn from(value: i32) -> Self {
        FortranValue::Integer(value as i64)
    }
}

impl From<f64> for FortranValue {
    fn from(value: f64) -> Self {
        FortranValue::Real(value)
    }
}

impl From<bool> for FortranValue {
    fn from(value: bool) -> Self {
        FortranValue::Logical(value)
    }
}

impl From<&str> for FortranValue {
    fn from(value: &str) -> Self {
        FortranValue::Character(value.to_string())
    }
}

impl From<String> for FortranValue {
    fn from(value: String) -> Self {
        FortranValue::Character(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_groups_accumulate() {
        let mut nml = Namelist::new();
        nml.insert_group("domain").insert("id", 1i32);
        nml.insert_group("DOMAIN").insert("id", 2i32);
        nml.insert_group("other").insert("flag", true);

        assert_eq!(nml.len(), 2);
        assert_eq!(nml.group_names(), ["domain", "other"]);
        assert_eq!(nml.get_groups("domain").len(), 2);
        assert_eq!(nml.get_group("domain").unwrap().get_i64("id"), Some(1));
    }

    #[test]
    fn test_variable_lookup_is_case_insensitive() {
        let mut group = NamelistGroup::new();
        group.insert("SYS_CPL", 1i32).insert("Restart_File", "HYDRO_RST");

        assert!(group.has_variable("sys_cpl"));
        assert_eq!(group.get_str("restart_file"), Some("HYDRO_RST"));
        assert_eq!(group.variable_names(), ["sys_cpl", "restart_file"]);
    }

    #[test]
    fn test_insert_replaces_value_in_place() {
        let mut group = NamelistGroup::new();
        group.insert("a", 1i32).insert("b", 2i32).insert("a", 3i32);

        assert_eq!(group.len(), 2);
        assert_eq!(group.variable_names(), ["a", "b"]);
        assert_eq!(group.get_i64("a"), Some(3));
    }
}
