//! Runs the `brc` binary end to end.

use std::fs;
use std::process::Command;

use anyhow::Result;
use tempfile::tempdir;

#[test]
fn test_cli_prints_report() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("measurements.txt");
    fs::write(&path, "Hamburg;12.0\nBulawayo;8.9\nHamburg;34.2\n")?;

    let output = Command::new(env!("CARGO_BIN_EXE_brc"))
        .arg(&path)
        .args(["--threads", "2", "--chunks", "3"])
        .output()?;

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8(output.stdout)?,
        "{Bulawayo=8.9/8.9/8.9, Hamburg=12.0/23.1/34.2}\n"
    );
    Ok(())
}

#[test]
fn test_cli_fails_on_malformed_input() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("measurements.txt");
    fs::write(&path, "Hamburg;12.0\nBulawayo\n")?;

    let output = Command::new(env!("CARGO_BIN_EXE_brc"))
        .arg(&path)
        .args(["--chunks", "1"])
        .output()?;

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("chunk 0"), "{stderr}");
    assert!(stderr.contains("byte 13"), "{stderr}");
    Ok(())
}
