use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("config invalid or unreadable: {0}")]
    InvalidConfig(String),
    #[error("usercache invalid or unreadable: {0}")]
    InvalidUsercache(String),
    #[error("write failed for {path}: {reason}")]
    WriteFailure { path: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateErrorCode {
    E001MissingSource,
    E002WriteFailure,
    E003VerifyMismatch,
}

impl MigrateErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::E001MissingSource => "E001_MISSING_SOURCE",
            Self::E002WriteFailure => "E002_WRITE_FAILURE",
            Self::E003VerifyMismatch => "E003_VERIFY_MISMATCH",
        }
    }
}
