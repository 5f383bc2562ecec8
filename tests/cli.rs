use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

mod common;
use common::{blank_journal_pdf, write_config};

/// The binary with a private home, so no user-level config is picked up.
fn rmjournal(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rmjournal").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_items_reads_config_from_cwd() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_config(temp_dir.path(), "");

    rmjournal(temp_dir.path())
        .args(["items", "2025-01-05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-01-05 Sun"))
        .stdout(predicate::str::contains("page 6"))
        .stdout(predicate::str::contains("Meditate"))
        .stdout(predicate::str::contains("Plan week"));
}

#[test]
fn test_items_range_switches_span() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_config(temp_dir.path(), "");

    rmjournal(temp_dir.path())
        .args(["items", "2025-02-28", "--days", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Read"))
        .stdout(predicate::str::contains("Run"));
}

#[test]
fn test_items_rejects_bad_date() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_config(temp_dir.path(), "");

    rmjournal(temp_dir.path())
        .args(["items", "31/12/2025"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a date"));
}

#[test]
fn test_pages_with_explicit_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_dir = temp_dir.path().join("settings");
    std::fs::create_dir_all(&config_dir).unwrap();
    let config = write_config(&config_dir, "");

    rmjournal(temp_dir.path())
        .arg("pages")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Date pages 2-366 hold 2025 (365 days)"));
}

#[test]
fn test_pages_checks_template() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(temp_dir.path().join("base.pdf"), blank_journal_pdf(30)).unwrap();
    write_config(temp_dir.path(), "base_pdf_template: base.pdf\n");

    rmjournal(temp_dir.path())
        .arg("pages")
        .assert()
        .success()
        .stdout(predicate::str::contains("Template has 30 pages"));
}

#[test]
fn test_missing_config_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    rmjournal(temp_dir.path())
        .arg("pages")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_invalid_config_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_config(temp_dir.path(), "font_size: 0\n");

    rmjournal(temp_dir.path())
        .arg("items")
        .assert()
        .failure()
        .stderr(predicate::str::contains("font_size"));
}

#[test]
fn test_update_reports_missing_client() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_config(temp_dir.path(), "rmapi_path: /nonexistent/rmapi\n");

    rmjournal(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Remote error"));
}

#[test]
fn test_version_flag() {
    let temp_dir = tempfile::tempdir().unwrap();
    rmjournal(temp_dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("rmjournal "));
}

#[cfg(unix)]
mod with_fake_client {
    use super::*;

    /// Config pointing at a shell script that stands in for `rmapi`. The
    /// script logs its arguments and lists nothing, so every run bootstraps
    /// from the template.
    fn setup(dir: &Path) {
        std::fs::write(dir.join("base.pdf"), blank_journal_pdf(10)).unwrap();
        let script = dir.join("fake-rmapi.sh");
        std::fs::write(
            &script,
            format!(
                "echo \"$@\" >> '{}'\ncase \"$1\" in\n  ls|put) exit 0 ;;\n  *) exit 1 ;;\nesac\n",
                dir.join("calls.log").display()
            ),
        )
        .unwrap();
        write_config(
            dir,
            &format!(
                "base_pdf_template: base.pdf\nrmapi_path: sh\nrmapi_args: ['{}']\n",
                script.display()
            ),
        );
    }

    #[test]
    fn test_update_bootstraps_and_publishes() {
        let temp_dir = tempfile::tempdir().unwrap();
        setup(temp_dir.path());

        rmjournal(temp_dir.path())
            .arg("update")
            .assert()
            .success()
            .stdout(predicate::str::contains("starting a new notebook"))
            .stdout(predicate::str::contains("Added recurring items to 9 pages"))
            .stdout(predicate::str::contains("Published 'Bullet Journal'"));

        let calls = std::fs::read_to_string(temp_dir.path().join("calls.log")).unwrap();
        assert!(calls.lines().any(|line| line == "put Bullet Journal.rmdoc"));
        assert!(!calls.contains("mv"));
    }

    #[test]
    fn test_update_to_output_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        setup(temp_dir.path());

        rmjournal(temp_dir.path())
            .args(["update", "--output", "journal.rmdoc"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Wrote journal.rmdoc"));

        let bytes = std::fs::read(temp_dir.path().join("journal.rmdoc")).unwrap();
        let container = rmjournal::container::decode(&bytes, None).unwrap();
        assert_eq!(container.page_count().unwrap(), 10);
        assert!(container.annotations.is_empty());

        let calls = std::fs::read_to_string(temp_dir.path().join("calls.log")).unwrap();
        assert!(!calls.contains("put"));
    }
}
