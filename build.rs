//! Generates `GENERATED_ENV_ALLOWLIST` for `status` from every quoted
//! `"OFFLINE_MIGRATE_*"` literal under `src/`.

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const QUOTED_PREFIX: &str = "\"OFFLINE_MIGRATE_";

fn source_files(root: &Path) -> Vec<PathBuf> {
    let mut pending = vec![root.to_path_buf()];
    let mut files = Vec::new();
    while let Some(dir) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for path in entries.flatten().map(|entry| entry.path()) {
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

/// Keys that appear as a whole string literal, e.g. `"OFFLINE_MIGRATE_UID"`.
fn quoted_keys(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.match_indices(QUOTED_PREFIX).filter_map(|(at, _)| {
        let rest = &text[at + 1..];
        let end = rest.find('"')?;
        let key = &rest[..end];
        let well_formed = key.len() > QUOTED_PREFIX.len() - 1
            && key
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_');
        well_formed.then_some(key)
    })
}

fn render(keys: &BTreeSet<String>) -> String {
    let body: String = keys.iter().map(|key| format!("    {key:?},\n")).collect();
    format!("pub const GENERATED_ENV_ALLOWLIST: &[&str] = &[\n{body}];\n")
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src");

    let mut keys = BTreeSet::new();
    for file in source_files(Path::new("src")) {
        println!("cargo:rerun-if-changed={}", file.display());
        match fs::read_to_string(&file) {
            Ok(text) => keys.extend(quoted_keys(&text).map(str::to_owned)),
            Err(err) => println!("cargo:warning=skipping {}: {err}", file.display()),
        }
    }

    let out_dir = env::var_os("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    let target = Path::new(&out_dir).join("env_allowlist.rs");
    fs::write(&target, render(&keys)).expect("write env_allowlist.rs");
}
