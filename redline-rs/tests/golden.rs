//! Golden-output tests.
//!
//! Each directory under `tests/cases/` holds `old.xml`, `new.xml` and the
//! expected single-column output in `expected.xml`. The move tie-break cases
//! pin down a product heuristic: any change in their output is a regression.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use xml_redline::compare;

/// One fixture directory.
#[derive(Debug)]
struct GoldenCase {
    name: String,
    old: String,
    new: String,
    expected: String,
}

fn cases_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("cases")
}

fn load_case(dir: &Path) -> Option<GoldenCase> {
    let read = |file: &str| fs::read_to_string(dir.join(file)).ok();
    Some(GoldenCase {
        name: dir.file_name()?.to_str()?.to_string(),
        old: read("old.xml")?,
        new: read("new.xml")?,
        expected: read("expected.xml")?,
    })
}

fn load_cases() -> Vec<GoldenCase> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(cases_dir())
        .expect("tests/cases must exist")
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    dirs.iter().filter_map(|dir| load_case(dir)).collect()
}

#[test]
fn test_golden_outputs() {
    let cases = load_cases();
    assert!(!cases.is_empty(), "no golden cases found");

    for case in &cases {
        let actual = compare(&case.old, &case.new)
            .unwrap_or_else(|e| panic!("{}: compare failed: {}", case.name, e));
        assert_eq!(actual, case.expected, "case {}", case.name);
    }
}

#[test]
fn test_golden_inputs_are_idempotent() {
    for case in load_cases() {
        assert_eq!(compare(&case.old, &case.old).unwrap(), case.old, "case {}", case.name);
        assert_eq!(compare(&case.new, &case.new).unwrap(), case.new, "case {}", case.name);
    }
}

#[test]
fn test_move_cases_are_present() {
    let names: Vec<String> = load_cases().into_iter().map(|c| c.name).collect();
    for required in ["move-to-end", "move-to-front", "swap-tie"] {
        assert!(names.iter().any(|n| n == required), "missing case {}", required);
    }
}
