use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bootopts(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bootopts").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env_remove("BOOTOPTS_LOG");
    cmd
}

fn write_plugin(root: &Path, name: &str, jar: &str, descriptor: &str) -> String {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(jar), b"").unwrap();
    fs::write(dir.join("plugin-descriptor.properties"), descriptor).unwrap();
    dir.join(jar).to_string_lossy().into_owned()
}

#[test]
fn prints_opts_then_bootclasspath() {
    let home = TempDir::new().unwrap();
    let plugins = TempDir::new().unwrap();
    let agent = write_plugin(
        plugins.path(),
        "agent",
        "agent.jar",
        "type=bootstrap\njava.opts=-Dkey=value -DotherKey=otherValue\n",
    );
    write_plugin(plugins.path(), "search", "search.jar", "type=isolated\n");

    bootopts(&home)
        .arg("--plugins-dir")
        .arg(plugins.path())
        .assert()
        .success()
        .stdout(format!(
            "-Dkey=value -DotherKey=otherValue -Xbootclasspath/a:{agent}\n"
        ));
}

#[test]
fn lines_format_prints_one_option_per_line() {
    let home = TempDir::new().unwrap();
    let plugins = TempDir::new().unwrap();
    let first = write_plugin(plugins.path(), "a", "first.jar", "type=bootstrap\njava.opts=-Da=1\n");
    let second = write_plugin(plugins.path(), "b", "second.jar", "type=bootstrap\n");

    bootopts(&home)
        .args(["--format", "lines", "--plugins-dir"])
        .arg(plugins.path())
        .assert()
        .success()
        .stdout(format!("-Da=1\n-Xbootclasspath/a:{first}:{second}\n"));
}

#[test]
fn no_bootstrap_plugins_prints_nothing() {
    let home = TempDir::new().unwrap();
    let plugins = TempDir::new().unwrap();
    write_plugin(plugins.path(), "search", "search.jar", "type=isolated\n");

    bootopts(&home)
        .arg("--plugins-dir")
        .arg(plugins.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn config_file_supplies_plugins_dirs() {
    let home = TempDir::new().unwrap();
    let plugins = TempDir::new().unwrap();
    let jar = write_plugin(plugins.path(), "agent", "agent.jar", "type=bootstrap\n");

    let config = home.path().join("bootopts.toml");
    fs::write(
        &config,
        format!("[plugins]\ndirs = [{:?}]\n", plugins.path().to_string_lossy()),
    )
    .unwrap();

    bootopts(&home)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(format!("-Xbootclasspath/a:{jar}\n"));
}

#[test]
fn missing_plugins_dir_fails() {
    let home = TempDir::new().unwrap();

    bootopts(&home)
        .arg("--plugins-dir")
        .arg(home.path().join("absent"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be a directory"));
}
