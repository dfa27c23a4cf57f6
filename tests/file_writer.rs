// tests/file_writer.rs

mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::fs;

use pssh::writer::{FileWriter, OutputWriter};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn output_lands_in_per_host_files() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let outdir = dir.path().join("out");
    let errdir = dir.path().join("nested/err");

    let writer = FileWriter::spawn(Some(outdir.clone()), Some(errdir.clone()))?;
    assert!(outdir.is_dir());
    assert!(errdir.is_dir());

    let (out, err) = writer.open_files("web1:2222");
    let (out, err) = (out.unwrap(), err.unwrap());
    assert_ne!(out, err);

    writer.write(out, b"line 1\n");
    writer.write(out, b"line 2\n");
    writer.write(err, b"oops\n");
    writer.close(out);
    writer.close(err);
    writer.shutdown()?;

    assert_eq!(fs::read_to_string(outdir.join("web1:2222"))?, "line 1\nline 2\n");
    assert_eq!(fs::read_to_string(errdir.join("web1:2222"))?, "oops\n");
    Ok(())
}

#[test]
fn only_configured_directories_get_files() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let writer = FileWriter::spawn(Some(dir.path().to_path_buf()), None)?;

    let (out, err) = writer.open_files("web1");
    assert!(out.is_some());
    assert!(err.is_none());

    writer.shutdown()?;
    // Second shutdown is harmless.
    writer.shutdown()?;
    assert!(dir.path().join("web1").exists());
    Ok(())
}

#[test]
fn writes_after_shutdown_are_dropped() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let writer = FileWriter::spawn(Some(dir.path().to_path_buf()), None)?;
    writer.shutdown()?;

    let (out, _) = writer.open_files("late");
    writer.write(out.unwrap(), b"ignored");
    assert!(!dir.path().join("late").exists());
    Ok(())
}
