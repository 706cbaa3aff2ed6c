use anyhow::Result;
use std::fs::{self, FileTimes, Permissions};
use std::io;
use std::os::unix::fs::{PermissionsExt, chown};
use std::path::Path;

use crate::error::MigrateError;
use crate::migrate::config::{OWNER_ONLY_MODE, OwnerIdentity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyResult {
    SourceMissing,
    Copied { bytes: u64, replaced: bool },
}

fn write_failure(path: &Path, action: &str, err: io::Error) -> anyhow::Error {
    MigrateError::WriteFailure {
        path: path.display().to_string(),
        reason: format!("{action}: {err}"),
    }
    .into()
}

/// Mirror the source's access and modification times onto `dst`.
fn copy_timestamps(src: &Path, dst: &Path) -> Result<()> {
    let meta = fs::metadata(src).map_err(|err| write_failure(src, "stat source", err))?;
    let mut times = FileTimes::new();
    if let Ok(modified) = meta.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    // futimens only needs ownership, so a read-only handle is enough
    let file = fs::File::open(dst).map_err(|err| write_failure(dst, "open destination", err))?;
    file.set_times(times)
        .map_err(|err| write_failure(dst, "set timestamps", err))
}

/// Copy `src` over `dst`, then hand `dst` to `owner` with mode 600.
///
/// Any file already at `dst` is removed first, so a destination left
/// behind by an interrupted run (possibly root-owned) is replaced rather
/// than merged into.
pub fn copy_and_chown(src: &Path, dst: &Path, owner: &OwnerIdentity) -> Result<CopyResult> {
    if !src.exists() {
        return Ok(CopyResult::SourceMissing);
    }

    let replaced = fs::symlink_metadata(dst).is_ok();
    if replaced {
        fs::remove_file(dst).map_err(|err| write_failure(dst, "remove stale destination", err))?;
    }

    let bytes = fs::copy(src, dst).map_err(|err| write_failure(dst, "copy", err))?;
    copy_timestamps(src, dst)?;
    chown(dst, Some(owner.uid), Some(owner.gid))
        .map_err(|err| write_failure(dst, "chown", err))?;
    fs::set_permissions(dst, Permissions::from_mode(OWNER_ONLY_MODE))
        .map_err(|err| write_failure(dst, "chmod", err))?;

    Ok(CopyResult::Copied { bytes, replaced })
}
