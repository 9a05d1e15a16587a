//! Common test fixtures for zipper testing

use crate::TestDir;
use anyhow::Result;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Files created by [`create_project_tree`], in sorted traversal order
pub const PROJECT_FILES: [&str; 8] = [
    "README.md",
    "docs/guide.txt",
    "pom.xml",
    "src/main/java/App.java",
    "src/main/java/util/Strings.java",
    "src/test/java/AppTest.java",
    "target/classes/App.class",
    "target/classes/util/Strings.class",
];

/// Creates a small Java-style project tree, plus an empty `logs` directory
/// that contributes no files
pub fn create_project_tree(test_dir: &TestDir) -> Result<()> {
    test_dir.create_file("README.md", b"# Project\n\nA sample project.")?;
    test_dir.create_file("docs/guide.txt", b"Read the source.")?;
    test_dir.create_file("pom.xml", b"<project></project>")?;
    test_dir.create_file(
        "src/main/java/App.java",
        b"public class App { public static void main(String[] a) {} }",
    )?;
    test_dir.create_file(
        "src/main/java/util/Strings.java",
        b"final class Strings { private Strings() {} }",
    )?;
    test_dir.create_file("src/test/java/AppTest.java", b"class AppTest {}")?;
    test_dir.create_file("target/classes/App.class", &[0xCA, 0xFE, 0xBA, 0xBE, 0, 0])?;
    test_dir.create_file(
        "target/classes/util/Strings.class",
        &[0xCA, 0xFE, 0xBA, 0xBE, 1, 1],
    )?;
    test_dir.create_dir("logs")?;

    Ok(())
}

/// Creates `count` files of `size` bytes each, named `file_000.bin` and up,
/// filled with bytes that do not compress well
pub fn create_sized_files(test_dir: &TestDir, count: usize, size: usize) -> Result<Vec<String>> {
    let mut names = Vec::with_capacity(count);
    for i in 0..count {
        let name = format!("file_{:03}.bin", i);
        test_dir.create_file(&name, &noise(size, i as u64))?;
        names.push(name);
    }
    Ok(names)
}

/// Deterministic random bytes (incompressible)
pub fn noise(size: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; size];
    rng.fill_bytes(&mut data);
    data
}

/// Creates symlinks next to a regular file (Unix only): one to the file,
/// one to a directory and one dangling
#[cfg(unix)]
pub fn create_symlink_structure(test_dir: &TestDir) -> Result<()> {
    use std::os::unix::fs::symlink;

    let original = test_dir.create_file("data/original.txt", b"Original file")?;
    let data_dir = test_dir.path().join("data");

    symlink(&original, test_dir.path().join("link_to_file.txt"))?;
    symlink(&data_dir, test_dir.path().join("link_to_dir"))?;
    symlink(
        test_dir.path().join("missing.txt"),
        test_dir.path().join("dangling.txt"),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_tree_matches_file_list() {
        let test_dir = TestDir::new().unwrap();
        create_project_tree(&test_dir).unwrap();
        for name in PROJECT_FILES {
            assert!(test_dir.path().join(name).is_file(), "missing {}", name);
        }
        assert!(test_dir.path().join("logs").is_dir());
    }

    #[test]
    fn test_noise_is_deterministic() {
        assert_eq!(noise(64, 7), noise(64, 7));
        assert_ne!(noise(64, 7), noise(64, 8));
    }
}
