use pretty_assertions::assert_eq;
use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

const DUMP: &str = r#"<?xml version="1.0"?>
<database>
  <table name="host">
    <row ref="OpaqueRef:h1" name__label="host-a"/>
  </table>
  <table name="VM">
    <row ref="OpaqueRef:v1" resident_on="OpaqueRef:h1"/>
  </table>
</database>
"#;

fn dump_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn xapidb(file: &NamedTempFile, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_xapidb"))
        .arg(file.path())
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("XAPIDB_REF_KEY")
        .env_remove("XAPIDB_REF_PREFIX")
        .output()
        .unwrap()
}

#[test]
fn test_tables_command() {
    let file = dump_file(DUMP);
    let output = xapidb(&file, &["tables"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "host\t1\nVM\t1\n");
}

#[test]
fn test_follow_command() {
    let file = dump_file(DUMP);
    let output = xapidb(&file, &["follow", "OpaqueRef:h1"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("owner: host (1)\nexpand:\n  database (2)\n    host (1)\n"));
    assert!(stdout.ends_with("path: /database/table/row\n"));
}

#[test]
fn test_follow_missing_reference_fails() {
    let file = dump_file(DUMP);
    let output = xapidb(&file, &["follow", "OpaqueRef:missing"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("failed to find OpaqueRef:missing in the reference index"));
    assert!(!stderr.contains("panicked"));
}

#[test]
fn test_custom_prefix_from_environment() {
    let file = dump_file(DUMP);
    let output = Command::new(env!("CARGO_BIN_EXE_xapidb"))
        .arg(file.path())
        .args(["follow", "OpaqueRef:v1"])
        .env_remove("RUST_LOG")
        .env("XAPIDB_REF_PREFIX", "Ref:")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("OpaqueRef:v1 is not a followable reference"));
}

#[test]
fn test_malformed_dump_fails() {
    let file = dump_file("<database><table name=VM/></database>");
    let output = xapidb(&file, &["tables"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("failed to load"));
}
