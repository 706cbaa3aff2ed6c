/// One per-player file slot inside the world directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileTarget {
    pub subdir: &'static str,
    pub extension: &'static str,
    /// Backups the server only writes sometimes; a missing source is not worth a warning.
    pub optional: bool,
}

impl FileTarget {
    pub fn label(&self, identifier: &str) -> String {
        format!("{}/{identifier}{}", self.subdir, self.extension)
    }
}

pub const TARGETS: [FileTarget; 4] = [
    FileTarget {
        subdir: "playerdata",
        extension: ".dat",
        optional: false,
    },
    FileTarget {
        subdir: "playerdata",
        extension: ".dat_old",
        optional: true,
    },
    FileTarget {
        subdir: "advancements",
        extension: ".json",
        optional: false,
    },
    FileTarget {
        subdir: "stats",
        extension: ".json",
        optional: false,
    },
];
