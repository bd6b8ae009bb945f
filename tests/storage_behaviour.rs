mod common;
use crate::common::init_tracing;

use std::error::Error;

use proptest::prelude::*;
use tempfile::TempDir;

use scriptq::storage::{LogArchive, ScriptStore, sanitize_file_name};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn sanitize_replaces_every_unsafe_character() {
    assert_eq!(sanitize_file_name("print.py"), "print.py");
    assert_eq!(sanitize_file_name("dir/file.py"), "dir_file.py");
    assert_eq!(sanitize_file_name("a\\b:c*d?e\"f<g>h|i"), "a_b_c_d_e_f_g_h_i");
    assert_eq!(sanitize_file_name(""), "");
    assert_eq!(sanitize_file_name("héllo wörld.py"), "héllo wörld.py");
}

proptest! {
    /// Whatever name a client sends, the sanitized form is a single path
    /// component of the same length, and sanitizing is idempotent.
    #[test]
    fn sanitized_names_are_stable_single_path_components(name in ".*") {
        let sanitized = sanitize_file_name(&name);

        prop_assert!(!sanitized.contains('/'));
        prop_assert!(!sanitized.contains('\\'));
        prop_assert_eq!(sanitized.chars().count(), name.chars().count());
        prop_assert_eq!(&sanitize_file_name(&sanitized), &sanitized);
    }
}

#[tokio::test]
async fn script_store_creates_its_directory_and_overwrites() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let dir = TempDir::new()?;
        let store = ScriptStore::new(dir.path().join("scripts"));

        let path = store.save("a.py", b"print(1)\n").await?;
        assert_eq!(tokio::fs::read(&path).await?, b"print(1)\n");

        // Same name again: newest upload wins.
        let path = store.save("a.py", b"print(2)\n").await?;
        assert_eq!(tokio::fs::read(&path).await?, b"print(2)\n");

        Ok(())
    })
    .await
}

#[tokio::test]
async fn archive_write_read_and_list() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let dir = TempDir::new()?;
        let archive = LogArchive::new(dir.path().join("logs"));

        // Empty archive (directory not even created yet).
        assert!(archive.list().await?.is_empty());
        assert_eq!(archive.read("a.py").await?, None);

        archive.write("b.py", b"second\n").await?;
        archive.write("a.py", b"first\n").await?;

        assert_eq!(archive.read("a.py").await?, Some(b"first\n".to_vec()));
        assert_eq!(archive.list().await?, vec!["a.py.txt", "b.py.txt"]);

        // Overwrite on re-run of the same id.
        archive.write("a.py", b"fresh\n").await?;
        assert_eq!(archive.read("a.py").await?, Some(b"fresh\n".to_vec()));

        Ok(())
    })
    .await
}

#[tokio::test]
async fn archive_serves_ids_with_consecutive_dots() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let dir = TempDir::new()?;
        let archive = LogArchive::new(dir.path().join("logs"));

        // "a..py" survives sanitization unchanged, so it is a legal task id
        // and its archived output must stay reachable under that id.
        assert_eq!(sanitize_file_name("a..py"), "a..py");

        archive.write("a..py", b"captured\n").await?;

        assert_eq!(archive.list().await?, vec!["a..py.txt"]);
        assert_eq!(archive.read("a..py").await?, Some(b"captured\n".to_vec()));
        assert_eq!(
            archive.read_file("a..py.txt").await?,
            Some(b"captured\n".to_vec())
        );

        Ok(())
    })
    .await
}

#[tokio::test]
async fn archive_reads_are_confined_to_the_logs_directory() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let dir = TempDir::new()?;
        let outside = dir.path().join("secret.txt");
        tokio::fs::write(&outside, b"secret").await?;

        let archive = LogArchive::new(dir.path().join("logs"));
        archive.write("a.py", b"content\n").await?;

        assert_eq!(archive.read_file("../secret.txt").await?, None);
        assert_eq!(archive.read_file("..").await?, None);
        assert_eq!(archive.read_file(".").await?, None);
        assert_eq!(archive.read_file("sub/a.py.txt").await?, None);
        assert_eq!(
            archive.read_file("a.py.txt").await?,
            Some(b"content\n".to_vec())
        );

        Ok(())
    })
    .await
}
