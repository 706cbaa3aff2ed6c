use anyhow::Result;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

pub fn now_epoch_secs() -> Result<u64> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}

pub fn basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::basename;
    use std::path::Path;

    #[test]
    fn basename_strips_directories() {
        assert_eq!(basename(Path::new("/data/world/stats/a.json")), "a.json");
        assert_eq!(basename(Path::new("/")), "/");
    }
}
