mod common;

use common::{CARTORSON_OFFLINE, CARTORSON_ONLINE, Fixture};
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn derive_prints_known_offline_uuids() {
    assert_cmd::cargo::cargo_bin_cmd!("offline-migrate")
        .args(["derive", "TNTbros101", "Cartorson"])
        .assert()
        .success()
        .stdout("TNTbros101 32965ceb-5084-3608-b1c8-0bd04a9a83af\nCartorson a582e4fb-c7ae-3cfd-84e6-9f123b8baa3a\n");
}

#[test]
fn derive_requires_a_name() {
    assert_cmd::cargo::cargo_bin_cmd!("offline-migrate")
        .arg("derive")
        .assert()
        .failure();
}

#[test]
fn verify_passes_after_migrate_and_catches_tampering() {
    let tmp = tempdir().expect("tempdir");
    let fx = Fixture::new(tmp.path(), &[(CARTORSON_ONLINE, "Cartorson")]);
    fx.seed_all(CARTORSON_ONLINE);

    fx.cmd().arg("migrate").assert().success();
    fx.cmd()
        .arg("verify")
        .assert()
        .success()
        .stdout(predicate::str::contains("files_checked=4"));

    fs::write(fx.file("stats", CARTORSON_OFFLINE, ".json"), "{}").expect("tamper");
    fx.cmd()
        .arg("verify")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "E003_VERIFY_MISMATCH Cartorson: stats/",
        ))
        .stderr(predicate::str::contains("content differs from source"));
}

#[test]
fn verify_before_migrate_reports_missing_destinations() {
    let tmp = tempdir().expect("tempdir");
    let fx = Fixture::new(tmp.path(), &[(CARTORSON_ONLINE, "Cartorson")]);
    fx.seed(CARTORSON_ONLINE, "playerdata", ".dat");

    fx.cmd()
        .arg("verify")
        .assert()
        .failure()
        .stderr(predicate::str::contains("destination missing"));
}

#[test]
fn subjects_renders_usercache_as_config_toml() {
    let tmp = tempdir().expect("tempdir");
    let fx = Fixture::new(tmp.path(), &[(CARTORSON_ONLINE, "Cartorson")]);
    let usercache = tmp.path().join("usercache.json");
    fs::write(
        &usercache,
        r#"[{"name":"ITTABD","uuid":"5642c527-26d9-4c5b-948c-e6d3098ef626","expiresOn":"2025-01-01 00:00:00 +0000"}]"#,
    )
    .expect("write usercache");

    fx.cmd()
        .arg("subjects")
        .arg("--toml")
        .arg("--usercache")
        .arg(&usercache)
        .assert()
        .success()
        .stdout(predicate::str::contains("[[subjects]]"))
        .stdout(predicate::str::contains(
            "online = \"5642c527-26d9-4c5b-948c-e6d3098ef626\"",
        ))
        .stdout(predicate::str::contains("name = \"ITTABD\""));
}

#[test]
fn subjects_lists_derived_ids() {
    let tmp = tempdir().expect("tempdir");
    let fx = Fixture::new(tmp.path(), &[(CARTORSON_ONLINE, "Cartorson")]);

    fx.cmd()
        .arg("subjects")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "{CARTORSON_ONLINE} -> {CARTORSON_OFFLINE} Cartorson\n"
        )));
}

#[test]
fn status_reports_resolved_layout() {
    let tmp = tempdir().expect("tempdir");
    let fx = Fixture::new(tmp.path(), &[(CARTORSON_ONLINE, "Cartorson")]);

    fx.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "world_dir={}",
            fx.data_dir.join("world").display()
        )))
        .stdout(predicate::str::contains("subjects=1"))
        .stdout(predicate::str::contains("mode=600"))
        .stdout(predicate::str::contains("OFFLINE_MIGRATE_DATA_DIR"));
}

#[test]
fn invalid_config_fails_before_any_io() {
    let tmp = tempdir().expect("tempdir");
    let fx = Fixture::new(tmp.path(), &[(CARTORSON_ONLINE, "Cartorson")]);
    fx.seed_all(CARTORSON_ONLINE);
    fs::write(&fx.config, "[owner]\nuid = \"root\"\n").expect("write bad config");

    fx.cmd()
        .arg("migrate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config invalid"));
    assert!(!fx.file("playerdata", CARTORSON_OFFLINE, ".dat").exists());
}

#[test]
fn explicit_config_flag_overrides_env() {
    let tmp = tempdir().expect("tempdir");
    let fx = Fixture::new(tmp.path(), &[(CARTORSON_ONLINE, "Cartorson")]);
    let other = tmp.path().join("other.toml");
    fs::write(
        &other,
        "[[subjects]]\nonline = \"5642c527-26d9-4c5b-948c-e6d3098ef626\"\nname = \"ITTABD\"\n",
    )
    .expect("write other config");

    fx.cmd()
        .arg("subjects")
        .arg("--config")
        .arg(&other)
        .assert()
        .success()
        .stdout(predicate::str::contains("ITTABD"))
        .stdout(predicate::str::contains("Cartorson").not());
}
