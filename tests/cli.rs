use assert_cmd::Command;
use predicates::str::contains;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("joke_courier").unwrap();
    cmd.env_remove("DISCORD_WEBHOOK")
        .env_remove("GIPHY_API_KEY")
        .env_remove("JOKES_PATH")
        .env("RUST_LOG", "info")
        .env("NO_COLOR", "1")
        // unroutable, so an accidental request fails fast
        .env("WEATHER_API_URL", "http://127.0.0.1:9")
        .env("GIPHY_API_URL", "http://127.0.0.1:9");
    cmd
}

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("send"))
        .stdout(contains("serve"));
}

#[test]
fn send_without_webhook_exits_nonzero() {
    cmd()
        .args(["send", "--no-jitter"])
        .assert()
        .failure()
        .code(1)
        .stdout(contains("DISCORD_WEBHOOK is not set"));
}

#[test]
fn send_with_missing_dataset_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .env("DISCORD_WEBHOOK", "http://127.0.0.1:9/webhook")
        .args(["send", "--no-jitter", "--dataset"])
        .arg(dir.path().join("missing.csv"))
        .assert()
        .failure()
        .code(1)
        .stdout(contains("could not read dataset"));
}

#[test]
fn send_with_malformed_dataset_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = dir.path().join("jokes.csv");
    std::fs::write(&dataset, "id|setup|punchline\n1||\n").unwrap();
    cmd()
        .env("DISCORD_WEBHOOK", "http://127.0.0.1:9/webhook")
        .args(["send", "--no-jitter", "--dataset"])
        .arg(&dataset)
        .assert()
        .failure()
        .code(1)
        .stdout(contains("data unavailable"));
}

#[test]
fn send_with_unreachable_webhook_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = dir.path().join("jokes.csv");
    std::fs::write(&dataset, "id|setup|punchline\n1|¿Qué hace una abeja en el gimnasio?|Zum-ba.\n")
        .unwrap();
    cmd()
        .env("DISCORD_WEBHOOK", "http://127.0.0.1:9/webhook")
        .args(["send", "--no-jitter", "--dataset"])
        .arg(&dataset)
        .assert()
        .failure()
        .code(1)
        .stdout(contains("webhook delivery failed"));
}
