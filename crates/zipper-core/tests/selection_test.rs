use zipper_core::pattern::PathPattern;
use zipper_core::{select_files, FileSelector, FilterPatterns};
use zipper_testing::fixtures::{create_project_tree, PROJECT_FILES};
use zipper_testing::TestDir;

fn project() -> TestDir {
    let test_dir = TestDir::new().unwrap();
    create_project_tree(&test_dir).unwrap();
    test_dir
}

/// Selection must equal "(no includes or some include matches) and no
/// exclude matches", evaluated path by path
fn assert_selection_rule(test_dir: &TestDir, includes: &[&str], excludes: &[&str]) {
    let filter = FilterPatterns::new(includes, excludes);
    let selection = select_files(test_dir.path(), &filter).unwrap();

    let include_patterns: Vec<PathPattern> =
        includes.iter().map(|p| PathPattern::new(p).unwrap()).collect();
    let exclude_patterns: Vec<PathPattern> =
        excludes.iter().map(|p| PathPattern::new(p).unwrap()).collect();

    let expected: Vec<&str> = PROJECT_FILES
        .iter()
        .copied()
        .filter(|path| {
            (include_patterns.is_empty() || include_patterns.iter().any(|p| p.matches(path)))
                && !exclude_patterns.iter().any(|p| p.matches(path))
        })
        .collect();

    assert_eq!(
        selection.files(),
        expected.as_slice(),
        "includes {:?} excludes {:?}",
        includes,
        excludes
    );
}

#[test]
fn test_selection_rule_over_filter_table() {
    let test_dir = project();

    let cases: &[(&[&str], &[&str])] = &[
        (&[], &[]),
        (&["**/*.java"], &[]),
        (&["**/*.java"], &["**/test/**"]),
        (&[], &["target/"]),
        (&["*.xml", "*.md"], &[]),
        (&["src/**", "docs/*"], &["**/util/**"]),
        (&["**/A*"], &["**/*.class"]),
        (&["target/classes/?pp.class"], &[]),
        (&["**"], &["**"]),
    ];

    for (includes, excludes) in cases {
        assert_selection_rule(&test_dir, includes, excludes);
    }
}

#[test]
fn test_known_selections() {
    let test_dir = project();

    let selection = select_files(
        test_dir.path(),
        &FilterPatterns::parse(Some("src/**,!**/util/**")),
    )
    .unwrap();
    assert_eq!(
        selection.files(),
        ["src/main/java/App.java", "src/test/java/AppTest.java"]
    );
    assert_eq!(selection.excluded_files(), ["src/main/java/util/Strings.java"]);

    // Only top level files: `*` never crosses a separator
    let selection = select_files(test_dir.path(), &FilterPatterns::parse(Some("*"))).unwrap();
    assert_eq!(selection.files(), ["README.md", "pom.xml"]);
}

#[test]
fn test_matching_ignores_case() {
    let test_dir = project();
    let selection = select_files(
        test_dir.path(),
        &FilterPatterns::parse(Some("**/*.JAVA,!SRC/TEST/**")),
    )
    .unwrap();
    assert_eq!(
        selection.files(),
        ["src/main/java/App.java", "src/main/java/util/Strings.java"]
    );
}

#[test]
fn test_scan_is_deterministic() {
    let test_dir = project();
    let selector = FileSelector::new(test_dir.path(), &FilterPatterns::default()).unwrap();

    let first = selector.select();
    let second = selector.select();
    assert_eq!(first, second);
    assert_eq!(first.files(), PROJECT_FILES);
}

#[test]
fn test_anchored_pattern_never_matches_relative_paths() {
    let test_dir = project();
    let selection =
        select_files(test_dir.path(), &FilterPatterns::parse(Some("/src/**"))).unwrap();
    assert!(selection.is_empty());
}
