// f90nmlrs/src/lib.rs

//! A Rust-native reader for Fortran 90 namelists.
//!
//! This library provides functionality to:
//! - Parse Fortran namelist files into native Rust data structures
//! - Handle repeated groups, indexed array assignments, repeat counts,
//!   derived-type components and complex numbers
//! - Convert parsed namelists into plain JSON or YAML trees

pub mod error;
pub mod namelist;
pub mod parser;
pub mod scanner;
pub mod value;

use std::fs::File;
use std::io::Read;
use std::path::Path;

pub use error::{F90nmlError, Result};
pub use namelist::{Namelist, NamelistGroup};
pub use parser::Parser;
pub use value::FortranValue;

/// Parse a Fortran namelist from a file path.
///
/// # Examples
///
/// ```no_run
/// fn main() -> Result<(), f90nmlrs::F90nmlError> {
///     let nml = f90nmlrs::read("hydro.namelist")?;
///     println!("{:#?}", nml);
///     Ok(())
/// }
/// ```
pub fn read<P: AsRef<Path>>(path: P) -> Result<Namelist> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    reads(&contents)
}

/// Parse a Fortran namelist from a string.
///
/// # Examples
///
/// ```
/// fn main() -> Result<(), f90nmlrs::F90nmlError> {
///     let nml = f90nmlrs::reads("&data_nml x=1 y=2.0 z=.true. /")?;
///     assert!(nml.has_group("data_nml"));
///     Ok(())
/// }
/// ```
pub fn reads(content: &str) -> Result<Namelist> {
    let mut parser = Parser::new(content)?;
    parser.parse()
}

#[cfg(feature = "json")]
/// Convert a namelist to a JSON tree. Repeated groups become arrays of objects.
pub fn to_json_value(nml: &Namelist) -> Result<serde_json::Value> {
    serde_json::to_value(nml).map_err(F90nmlError::from)
}

#[cfg(feature = "json")]
/// Convert a namelist to a pretty-printed JSON string.
pub fn to_json(nml: &Namelist) -> Result<String> {
    serde_json::to_string_pretty(nml).map_err(F90nmlError::from)
}

#[cfg(feature = "yaml")]
/// Convert a namelist to YAML string.
pub fn to_yaml(nml: &Namelist) -> Result<String> {
    serde_yaml::to_string(nml).map_err(F90nmlError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_simple() {
        let nml = reads("&data_nml x=1 y=2.0 z=.true. /").unwrap();

        let group = nml.get_group("data_nml").unwrap();
        assert_eq!(group.get_i64("x"), Some(1));
        assert_eq!(group.get_f64("y"), Some(2.0));
        assert_eq!(group.get_bool("z"), Some(true));
    }

    #[test]
    fn test_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "&hydro_nlist\n  sys_cpl = 1\n/").unwrap();

        let nml = read(file.path()).unwrap();
        assert_eq!(nml.get_group("hydro_nlist").unwrap().get_i64("sys_cpl"), Some(1));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read("/definitely/not/here.nml").unwrap_err();
        assert!(matches!(err, F90nmlError::Io(_)));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_tree() {
        let nml = reads("&a x=1 /\n&b y='s', z=1.5, 2.5 /\n&b y='t' /").unwrap();
        let json = to_json_value(&nml).unwrap();

        assert_eq!(json["a"]["x"], serde_json::json!(1));
        assert_eq!(json["b"][0]["z"], serde_json::json!([1.5, 2.5]));
        assert_eq!(json["b"][1]["y"], serde_json::json!("t"));
    }
}
