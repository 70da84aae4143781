use std::fmt;

use thiserror::Error;

/// Coarse classification of a failed call to the messaging platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    Network,
    NotFound,
    Permission,
    Other,
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RemoteErrorKind::Network => "network",
            RemoteErrorKind::NotFound => "not found",
            RemoteErrorKind::Permission => "permission",
            RemoteErrorKind::Other => "other",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
pub enum VnoteError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Download error ({kind}): {message}")]
    Download {
        kind: RemoteErrorKind,
        message: String,
    },

    #[error("Upload error ({kind}): {message}")]
    Upload {
        kind: RemoteErrorKind,
        message: String,
    },

    #[error("Send error ({kind}): {message}")]
    Send {
        kind: RemoteErrorKind,
        message: String,
    },

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Lookup error: {0}")]
    Lookup(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A per-event failure tagged with the pipeline stage it happened in.
    #[error("{stage}: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<VnoteError>,
    },
}

impl VnoteError {
    pub fn download(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        VnoteError::Download {
            kind,
            message: message.into(),
        }
    }

    pub fn upload(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        VnoteError::Upload {
            kind,
            message: message.into(),
        }
    }

    pub fn send(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        VnoteError::Send {
            kind,
            message: message.into(),
        }
    }

    /// Remote error kind, looking through stage labels. `None` for local failures.
    pub fn remote_kind(&self) -> Option<RemoteErrorKind> {
        match self {
            VnoteError::Download { kind, .. }
            | VnoteError::Upload { kind, .. }
            | VnoteError::Send { kind, .. } => Some(*kind),
            VnoteError::Stage { source, .. } => source.remote_kind(),
            _ => None,
        }
    }

    /// Stage label of the outermost [`VnoteError::Stage`] wrapper, if any.
    pub fn stage_label(&self) -> Option<&'static str> {
        match self {
            VnoteError::Stage { stage, .. } => Some(stage),
            _ => None,
        }
    }
}

/// Attaches a static stage label ("download mp3", "send voice", ...) to an error.
pub trait StageExt<T> {
    fn stage(self, stage: &'static str) -> Result<T>;
}

impl<T, E> StageExt<T> for std::result::Result<T, E>
where
    E: Into<VnoteError>,
{
    fn stage(self, stage: &'static str) -> Result<T> {
        self.map_err(|e| VnoteError::Stage {
            stage,
            source: Box::new(e.into()),
        })
    }
}

pub type Result<T> = std::result::Result<T, VnoteError>;
