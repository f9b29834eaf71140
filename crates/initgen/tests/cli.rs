use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const DEFINITIONS: &str = r#"
[serial]
name = "Serial console"
required = false
per_cpu = false
phase = "cpp_init"
routine = "drivers::serial::init"
provides_capabilities = ["console"]

[lapic_id]
name = "LAPIC id"
required = true
per_cpu = true
phase = "processor_early"
routine = "arch::lapic_id"
provides_capabilities = ["logical_cpu_id"]
depends_on_capabilities = ["console"]
"#;

fn initgen(args: &[&OsStr]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_initgen"))
        .args(args)
        .output()
        .unwrap()
}

fn flag(name: &str) -> &OsStr {
    OsStr::new(name)
}

fn write_definitions(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn writes_the_generated_table() {
    let dir = tempfile::tempdir().unwrap();
    let defs = write_definitions(dir.path(), "init.toml", DEFINITIONS);
    let out = dir.path().join("init_table.cpp");

    let output = initgen(&[flag("-o"), out.as_os_str(), defs.as_os_str()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("#include <init.h>\n"));
    assert!(text.contains("namespace drivers::serial {\n\textern bool init();\n}\n"));
    assert!(text.contains("Atomic<bool> complete_components[8];"));
}

#[test]
fn check_mode_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let defs = write_definitions(dir.path(), "init.toml", DEFINITIONS);
    let out = dir.path().join("init_table.cpp");

    let output = initgen(&[flag("--check"), flag("-o"), out.as_os_str(), defs.as_os_str()]);
    assert!(output.status.success());
    assert!(!out.exists());
}

#[test]
fn rejected_registry_fails_and_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let defs = write_definitions(
        dir.path(),
        "init.toml",
        r#"
        [a]
        name = "A"
        required = false
        per_cpu = false
        phase = "cpp_init"
        routine = "a"
        depends_on = ["a"]
        "#,
    );
    let out = dir.path().join("init_table.cpp");

    let output = initgen(&[flag("-o"), out.as_os_str(), defs.as_os_str()]);
    assert!(!output.status.success());
    assert!(!out.exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("dependency cycle"), "{stderr}");
}

#[test]
fn missing_output_directory_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let defs = write_definitions(dir.path(), "init.toml", DEFINITIONS);
    let out = dir.path().join("missing").join("init_table.cpp");

    let output = initgen(&[flag("-o"), out.as_os_str(), defs.as_os_str()]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn custom_config_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let defs = write_definitions(dir.path(), "init.toml", DEFINITIONS);
    let config = write_definitions(dir.path(), "encoder.toml", "namespace = \"boot\"\n");
    let out = dir.path().join("init_table.cpp");

    let output = initgen(&[flag("--config"), config.as_os_str(), flag("-o"), out.as_os_str(), defs.as_os_str()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(fs::read_to_string(&out).unwrap().contains("namespace boot {\n"));
}
