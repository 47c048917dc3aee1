//! Keeps tests/unit mirroring src one file and one module declaration at a time

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::{Path, PathBuf};
    use walkdir::WalkDir;

    const SRC: &str = "src";
    const UNIT: &str = "tests/unit";
    const TESTS: &str = "tests";

    // Entry points and module wiring files carry no logic of their own
    fn is_wiring(path: &Path) -> bool {
        matches!(
            path.file_name().and_then(|name| name.to_str()),
            Some("main.rs" | "lib.rs" | "mod.rs")
        )
    }

    fn rust_files(root: &str) -> BTreeSet<PathBuf> {
        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "rs"))
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(root)
                    .ok()
                    .map(Path::to_path_buf)
            })
            .collect()
    }

    // Names from `mod x;` and `pub mod x;` lines
    fn declared_modules(file: &Path) -> BTreeSet<String> {
        let Ok(content) = fs::read_to_string(file) else {
            return BTreeSet::new();
        };
        content
            .lines()
            .map(str::trim)
            .filter_map(|line| line.strip_prefix("pub ").or(Some(line)))
            .filter_map(|line| line.strip_prefix("mod "))
            .filter_map(|line| line.strip_suffix(';'))
            .map(|name| name.trim().to_owned())
            .collect()
    }

    fn listing(paths: &[String]) -> String {
        paths
            .iter()
            .map(|path| format!("  - {path}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // Tests every logic-bearing source file has a mirrored unit test file
    // Verified by deleting tests/unit/algorithm/search.rs
    #[test]
    fn test_every_source_file_has_unit_tests() {
        let sources = rust_files(SRC);
        let units = rust_files(UNIT);
        assert!(!sources.is_empty(), "No sources found under {SRC}");

        let missing: Vec<String> = sources
            .iter()
            .filter(|path| !is_wiring(path) && !units.contains(*path))
            .map(|path| format!("src/{0} -> tests/unit/{0}", path.display()))
            .collect();

        assert!(
            missing.is_empty(),
            "Source files without unit tests:\n{}",
            listing(&missing)
        );
    }

    // Tests no unit test file outlives the source file it covers
    // Verified by adding tests/unit/math/unused.rs
    #[test]
    fn test_every_unit_test_has_source_file() {
        let sources = rust_files(SRC);
        let orphaned: Vec<String> = rust_files(UNIT)
            .iter()
            .filter(|path| !is_wiring(path) && !sources.contains(*path))
            .map(|path| format!("tests/unit/{}", path.display()))
            .collect();

        assert!(
            orphaned.is_empty(),
            "Unit test files without a source counterpart:\n{}",
            listing(&orphaned)
        );
    }

    // Tests each module declared in src is also declared in the unit tree
    // Verified by removing `mod observer;` from tests/unit/algorithm/mod.rs
    #[test]
    fn test_module_declarations_are_mirrored() {
        let mut unwired = Vec::new();

        for path in rust_files(SRC) {
            let name = path.file_name().and_then(|name| name.to_str());
            let unit_wiring = match name {
                Some("lib.rs") => Path::new(UNIT).join("mod.rs"),
                Some("mod.rs") => Path::new(UNIT).join(&path),
                _ => continue,
            };

            let expected = declared_modules(&Path::new(SRC).join(&path));
            let actual = declared_modules(&unit_wiring);
            for module in expected.difference(&actual) {
                unwired.push(format!("mod {module}; in {}", unit_wiring.display()));
            }
        }

        assert!(
            unwired.is_empty(),
            "Module declarations missing from the unit test tree:\n{}",
            listing(&unwired)
        );
    }

    // Tests unit files gate their module on cfg(test) and every test file holds a test
    // Verified by dropping #[test] from tests/pipeline.rs
    #[test]
    fn test_test_files_contain_tests() {
        let mut defective = Vec::new();

        for path in rust_files(TESTS) {
            if path.file_name().is_some_and(|name| name == "mod.rs") {
                continue;
            }
            let full = Path::new(TESTS).join(&path);
            let content = fs::read_to_string(&full).unwrap_or_default();

            if !content.contains("#[test]") {
                defective.push(format!("{} has no #[test]", full.display()));
            }
            if path.starts_with("unit") && !content.contains("#[cfg(test)]") {
                defective.push(format!("{} is not gated by #[cfg(test)]", full.display()));
            }
        }

        assert!(
            defective.is_empty(),
            "Malformed test files:\n{}",
            listing(&defective)
        );
    }
}
