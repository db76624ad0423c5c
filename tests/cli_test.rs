//! Integration tests for the binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn provisioner(home: &Path, path: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("liveproto-setup"));
    cmd.current_dir(home)
        .env("HOME", home)
        .env("PATH", path)
        .env("NO_COLOR", "1")
        .env_remove("LIVEPROTO_SETUP_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("liveproto-setup"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Provision"))
        .stdout(predicate::str::contains("--config"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("liveproto-setup"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_rejects_unknown_flag() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("liveproto-setup"));
    cmd.arg("--dry-run");
    cmd.assert().failure();
    Ok(())
}

#[test]
fn cli_without_package_manager_fails() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let empty_bin = TempDir::new()?;

    provisioner(home.path(), empty_bin.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "No supported package manager detected",
        ));

    assert!(!home.path().join("liveproto-demo").exists());
    Ok(())
}

#[test]
fn cli_missing_config_file_fails() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let empty_bin = TempDir::new()?;

    provisioner(home.path(), empty_bin.path())
        .args(["--config", "/nonexistent/liveproto-setup.yml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration not found"));
    Ok(())
}

#[test]
fn cli_invalid_config_file_fails() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let empty_bin = TempDir::new()?;
    let config = home.path().join("setup.yml");
    fs::write(&config, "pakage: typo/name\n")?;

    provisioner(home.path(), empty_bin.path())
        .env("LIVEPROTO_SETUP_CONFIG", &config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config"));
    Ok(())
}

#[cfg(unix)]
mod fake_host {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    const APT_GET: &str = "#!/bin/sh\nexit 0\n";

    const APT_CACHE: &str = r#"#!/bin/sh
case "$2" in
  php8.2) echo "Package: php8.2"; exit 0 ;;
  *) exit 100 ;;
esac
"#;

    const PHP: &str = r#"#!/bin/sh
case "$1" in
  */composer) script="$1"; shift; exec /bin/sh "$script" "$@" ;;
esac
case "$2" in
  *PHP_VERSION*) echo "8.2.10" ;;
  *PHP_INT_SIZE*) echo "64" ;;
  *"'intl'"*) exit 1 ;;
esac
exit 0
"#;

    const COMPOSER: &str = r#"#!/bin/sh
case "$1" in
  --version) echo "Composer version 2.7.1 2024-02-09 15:26:28" ;;
  require) /bin/mkdir -p vendor/taknone/liveproto ;;
esac
exit 0
"#;

    fn write_tool(dir: &Path, name: &str, script: &str) {
        let path = dir.join(name);
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn fake_bin() -> TempDir {
        let bin = TempDir::new().unwrap();
        write_tool(bin.path(), "apt-get", APT_GET);
        write_tool(bin.path(), "add-apt-repository", APT_GET);
        write_tool(bin.path(), "apt-cache", APT_CACHE);
        write_tool(bin.path(), "php", PHP);
        write_tool(bin.path(), "composer", COMPOSER);
        bin
    }

    #[test]
    fn full_run_provisions_scratch_project() -> Result<(), Box<dyn std::error::Error>> {
        let home = TempDir::new()?;
        let bin = fake_bin();

        provisioner(home.path(), bin.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("PHP: 8.2.10"))
            .stdout(predicate::str::contains("Composer: 2.7.1"))
            .stdout(predicate::str::contains("taknone/liveproto: installed"))
            .stdout(predicate::str::contains("Missing PHP extensions: intl"));

        let project = home.path().join("liveproto-demo");
        assert!(project.join("composer.json").is_file());
        assert!(project.join("vendor/taknone/liveproto").is_dir());
        Ok(())
    }

    #[test]
    fn rerun_keeps_existing_manifest() -> Result<(), Box<dyn std::error::Error>> {
        let home = TempDir::new()?;
        let bin = fake_bin();
        let project = home.path().join("liveproto-demo");
        fs::create_dir_all(&project)?;
        let manifest = r#"{"require": {"taknone/liveproto": "dev-main"}}"#;
        fs::write(project.join("composer.json"), manifest)?;

        provisioner(home.path(), bin.path()).assert().success();
        provisioner(home.path(), bin.path()).assert().success();

        assert_eq!(fs::read_to_string(project.join("composer.json"))?, manifest);
        Ok(())
    }

    #[test]
    fn quiet_run_still_prints_summary() -> Result<(), Box<dyn std::error::Error>> {
        let home = TempDir::new()?;
        let bin = fake_bin();

        provisioner(home.path(), bin.path())
            .arg("--quiet")
            .assert()
            .success()
            .stdout(predicate::str::contains("[1/7]").not())
            .stdout(predicate::str::contains("Summary"));
        Ok(())
    }

    #[test]
    fn user_config_changes_package() -> Result<(), Box<dyn std::error::Error>> {
        let home = TempDir::new()?;
        let bin = fake_bin();
        let config_dir = home.path().join(".config/liveproto-setup");
        fs::create_dir_all(&config_dir)?;
        fs::write(
            config_dir.join("config.yml"),
            "project_dir: other-demo\nextensions: [gmp]\n",
        )?;

        provisioner(home.path(), bin.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Missing PHP extensions").not());

        assert!(home.path().join("other-demo/composer.json").is_file());
        assert!(!home.path().join("liveproto-demo").exists());
        Ok(())
    }
}
