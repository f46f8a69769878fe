//! Error types for the c2pa engine bridge

use thiserror::Error;

/// Result type alias for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Engine error tag reported when an asset carries no manifest store
///
/// Read operations treat this as an absent result rather than a failure.
pub const MANIFEST_NOT_FOUND: &str = "ManifestNotFound";

/// Failure categories surfaced by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad certificate/algorithm pairing, malformed manifest JSON
    Construction,
    /// Native stream open/read/write/seek failure
    Io,
    /// Resource identifier or manifest absent
    NotFound,
    /// The engine cannot parse or embed into the container format
    UnsupportedFormat,
    /// Any other engine sentinel
    Engine,
    /// Rejected by the bridge before reaching the engine
    InvalidArgument,
    /// A signing callback failed
    Signing,
    /// The engine library could not be opened
    LibraryLoad,
    /// The engine library lacks a required entry point
    SymbolNotFound,
    /// Bridge configuration could not be read
    Config,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Construction => "Construction",
            ErrorKind::Io => "Io",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::UnsupportedFormat => "UnsupportedFormat",
            ErrorKind::Engine => "Engine",
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::Signing => "Signing",
            ErrorKind::LibraryLoad => "LibraryLoad",
            ErrorKind::SymbolNotFound => "SymbolNotFound",
            ErrorKind::Config => "Config",
        };
        f.write_str(name)
    }
}

/// Error type for bridge operations
///
/// Every variant carries the diagnostic text verbatim; for engine failures
/// this is the engine's last-error message.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("construction failed: {0}")]
    Construction(String),

    #[error("I/O failure: {0}")]
    Io(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("engine error: {0}")]
    Engine(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("signing callback failed: {0}")]
    Signing(String),

    #[error("failed to load engine library: {0}")]
    LibraryLoad(String),

    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl BridgeError {
    /// Build an error of the given kind
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::Construction => BridgeError::Construction(message),
            ErrorKind::Io => BridgeError::Io(message),
            ErrorKind::NotFound => BridgeError::NotFound(message),
            ErrorKind::UnsupportedFormat => BridgeError::UnsupportedFormat(message),
            ErrorKind::Engine => BridgeError::Engine(message),
            ErrorKind::InvalidArgument => BridgeError::InvalidArgument(message),
            ErrorKind::Signing => BridgeError::Signing(message),
            ErrorKind::LibraryLoad => BridgeError::LibraryLoad(message),
            ErrorKind::SymbolNotFound => BridgeError::SymbolNotFound(message),
            ErrorKind::Config => BridgeError::Config(message),
        }
    }

    /// Classify an engine last-error message
    ///
    /// `fallback` is used when the message tag is not one the bridge
    /// recognizes; factories pass `Construction`, everything else `Engine`.
    pub fn from_engine(message: impl Into<String>, fallback: ErrorKind) -> Self {
        let message = message.into();
        let kind = Self::classify(&message).unwrap_or(fallback);
        Self::new(kind, message)
    }

    /// Map an engine message tag (the text before the first `:`) to a kind
    pub fn classify(message: &str) -> Option<ErrorKind> {
        let tag = message.split(':').next().unwrap_or_default().trim();
        match tag {
            "ManifestNotFound" | "ResourceNotFound" | "FileNotFound" | "NotFound" => {
                Some(ErrorKind::NotFound)
            }
            "NotSupported" | "UnsupportedType" => Some(ErrorKind::UnsupportedFormat),
            "Io" | "IoError" => Some(ErrorKind::Io),
            "Json" | "JsonError" | "BadParam" => Some(ErrorKind::Construction),
            _ if message.contains(MANIFEST_NOT_FOUND) => Some(ErrorKind::NotFound),
            _ => None,
        }
    }

    /// Get the category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::Construction(_) => ErrorKind::Construction,
            BridgeError::Io(_) => ErrorKind::Io,
            BridgeError::NotFound(_) => ErrorKind::NotFound,
            BridgeError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            BridgeError::Engine(_) => ErrorKind::Engine,
            BridgeError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            BridgeError::Signing(_) => ErrorKind::Signing,
            BridgeError::LibraryLoad(_) => ErrorKind::LibraryLoad,
            BridgeError::SymbolNotFound(_) => ErrorKind::SymbolNotFound,
            BridgeError::Config(_) => ErrorKind::Config,
        }
    }

    /// Get the diagnostic text without the category prefix
    pub fn message(&self) -> &str {
        match self {
            BridgeError::Construction(m)
            | BridgeError::Io(m)
            | BridgeError::NotFound(m)
            | BridgeError::UnsupportedFormat(m)
            | BridgeError::Engine(m)
            | BridgeError::InvalidArgument(m)
            | BridgeError::Signing(m)
            | BridgeError::LibraryLoad(m)
            | BridgeError::SymbolNotFound(m)
            | BridgeError::Config(m) => m,
        }
    }

    /// True when the engine reported that no manifest store is present
    pub fn is_manifest_not_found(&self) -> bool {
        matches!(self, BridgeError::NotFound(m) if m.contains(MANIFEST_NOT_FOUND))
    }

    /// Returns a stable numeric code for this error
    pub fn error_code(&self) -> u32 {
        match self {
            BridgeError::Construction(_) => 1,
            BridgeError::Io(_) => 2,
            BridgeError::NotFound(_) => 3,
            BridgeError::UnsupportedFormat(_) => 4,
            BridgeError::Engine(_) => 5,
            BridgeError::InvalidArgument(_) => 6,
            BridgeError::Signing(_) => 7,
            BridgeError::LibraryLoad(_) => 8,
            BridgeError::SymbolNotFound(_) => 9,
            BridgeError::Config(_) => 10,
        }
    }
}

impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Construction(err.to_string())
    }
}
