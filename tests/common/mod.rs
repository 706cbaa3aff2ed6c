#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

pub const CARTORSON_ONLINE: &str = "0caec4bb-581d-480b-a5aa-1bddfd5d2175";
pub const CARTORSON_OFFLINE: &str = "a582e4fb-c7ae-3cfd-84e6-9f123b8baa3a";

pub const TARGETS: [(&str, &str); 4] = [
    ("playerdata", ".dat"),
    ("playerdata", ".dat_old"),
    ("advancements", ".json"),
    ("stats", ".json"),
];

pub struct Fixture {
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub config: PathBuf,
    pub uid: u32,
    pub gid: u32,
}

impl Fixture {
    /// Data dir with an empty world layout and a config naming `subjects`.
    pub fn new(root: &Path, subjects: &[(&str, &str)]) -> Self {
        let data_dir = root.join("data");
        for (subdir, _) in TARGETS {
            fs::create_dir_all(data_dir.join("world").join(subdir)).expect("mkdir world subdir");
        }
        let meta = fs::metadata(root).expect("root metadata");

        let mut toml = String::new();
        for (online, name) in subjects {
            toml.push_str(&format!(
                "[[subjects]]\nonline = \"{online}\"\nname = \"{name}\"\n\n"
            ));
        }
        let config = root.join("offline-migrate.toml");
        fs::write(&config, toml).expect("write config");

        Self {
            root: root.to_path_buf(),
            data_dir,
            config,
            uid: meta.uid(),
            gid: meta.gid(),
        }
    }

    pub fn file(&self, subdir: &str, id: &str, ext: &str) -> PathBuf {
        self.data_dir.join("world").join(subdir).join(format!("{id}{ext}"))
    }

    pub fn seed(&self, id: &str, subdir: &str, ext: &str) -> PathBuf {
        let path = self.file(subdir, id, ext);
        fs::write(&path, format!("{subdir}/{id}{ext} payload\n")).expect("seed file");
        path
    }

    pub fn seed_all(&self, id: &str) {
        for (subdir, ext) in TARGETS {
            self.seed(id, subdir, ext);
        }
    }

    pub fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("offline-migrate");
        cmd.current_dir(&self.root)
            .env("OFFLINE_MIGRATE_HOME", &self.root)
            .env("OFFLINE_MIGRATE_CONFIG", &self.config)
            .env("OFFLINE_MIGRATE_DATA_DIR", &self.data_dir)
            .env("OFFLINE_MIGRATE_UID", self.uid.to_string())
            .env("OFFLINE_MIGRATE_GID", self.gid.to_string())
            .env_remove("OFFLINE_MIGRATE_WORLD")
            .env_remove("OFFLINE_MIGRATE_AUDIT_LOG");
        cmd
    }
}
