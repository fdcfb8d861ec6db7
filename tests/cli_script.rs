use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("daybook_core_cli").unwrap();
    cmd.env("DAYBOOK_CLI_SCRIPT", "1")
        .env("DAYBOOK_HOME", home.path());
    cmd
}

#[test]
fn script_mode_runs_a_quick_add_session() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin(
            "ledger new Demo\n\
             say Today I spent 100 rupees for food\n\
             summary month\n\
             ledger save\n\
             exit\n",
        )
        .assert()
        .success()
        .stdout(contains("New ledger `Demo` created."))
        .stdout(contains("Recorded expense: 100.00 in Food & Dining."))
        .stdout(contains("Income:"))
        .stdout(contains("Ledger `Demo` saved."));

    let json = std::fs::read_to_string(home.path().join("ledgers").join("demo.json")).unwrap();
    assert!(json.contains("\"Demo\""));
    assert!(json.contains("100.0"));
}

#[test]
fn script_mode_suggests_near_miss_commands() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("ledgr new Demo\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `ledgr`."))
        .stdout(contains("Suggestion: `ledger`?"));
}

#[test]
fn script_mode_reopens_a_saved_ledger() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("ledger new Demo\nadd expense 42.50 Shopping new shoes\nledger save\nexit\n")
        .assert()
        .success()
        .stdout(contains("Expense recorded: 42.50 in Shopping."));

    cli(&home)
        .write_stdin("ledger open Demo\nsummary month\nexit\n")
        .assert()
        .success()
        .stdout(contains("Ledger `Demo` loaded."))
        .stdout(contains("42.50"));
}
