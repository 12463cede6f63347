//! CLI behavior tests for the `lolc` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn lolc() -> Command {
    Command::cargo_bin("lolc").expect("lolc binary builds")
}

fn write_program(dir: &tempfile::TempDir, source: &str) -> std::path::PathBuf {
    let path = dir.path().join("prog.lol");
    std::fs::write(&path, source).expect("write source");
    path
}

#[test]
fn test_compile_success_exits_zero() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_program(&dir, "HAI 1.2\nVISIBLE \"kthx\"\nKTHXBYE\n");

    lolc().arg("compile").arg(&input).assert().success();

    let out = dir.path().join("prog.c");
    assert!(out.exists());
    let code = std::fs::read_to_string(out).expect("read output");
    assert!(code.contains("int main(void)"));
}

#[test]
fn test_parse_error_exits_nonzero_with_span_diagnostic() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_program(&dir, "HAI 1.2\nSUM OF 1\nKTHXBYE\n");

    lolc()
        .arg("compile")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expected AN keyword for SUM"))
        .stderr(predicate::str::contains("prog.lol:16..17:"));
}

#[test]
fn test_unterminated_string_reports_both_phases() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_program(&dir, "HAI 1.2\n\"unterminated\nKTHXBYE");

    lolc()
        .arg("compile")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unterminated string literal"))
        .stderr(predicate::str::contains("Expected valid statement"));
}

#[test]
fn test_undeclared_variable_diagnostic() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_program(&dir, "HAI 1.2\nVISIBLE mystery\nKTHXBYE\n");

    lolc()
        .arg("compile")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Undeclared variable 'mystery'"));
}

#[test]
fn test_emit_tokens_dumps_and_stops() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_program(&dir, "HAI 1.2\nKTHXBYE\n");

    lolc()
        .arg("compile")
        .arg(&input)
        .arg("--emit-tokens")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hai"))
        .stdout(predicate::str::contains("Kthxbye"))
        .stdout(predicate::str::contains("Eof"));

    assert!(!dir.path().join("prog.c").exists());
}

#[test]
fn test_emit_ir_dumps_mnemonics() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_program(&dir, "HAI 1.2\nI HAS A x ITZ NUMBER\nx R 7\nKTHXBYE\n");

    lolc()
        .arg("compile")
        .arg(&input)
        .arg("--emit-ir")
        .assert()
        .success()
        .stdout(predicate::str::contains("entry (stack 256, heap 256):"))
        .stdout(predicate::str::contains("push 7.0"))
        .stdout(predicate::str::contains("halt"));
}

#[test]
fn test_asm_target_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_program(&dir, "HAI 1.2\nKTHXBYE\n");

    lolc()
        .arg("compile")
        .arg(&input)
        .arg("--target")
        .arg("asm")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not supported"));
}

#[test]
fn test_missing_input_fails() {
    lolc()
        .arg("compile")
        .arg("no/such/file.lol")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn test_custom_output_and_geometry() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_program(&dir, "HAI 1.2\nKTHXBYE\n");
    let out = dir.path().join("build").join("prog.c");
    std::fs::create_dir_all(dir.path().join("build")).expect("mkdir");

    lolc()
        .arg("compile")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .arg("--stack-size")
        .arg("1024")
        .arg("--heap-size")
        .arg("2048")
        .assert()
        .success();

    let code = std::fs::read_to_string(out).expect("read output");
    assert!(code.contains("machine_new(1024, 2048)"));
}
