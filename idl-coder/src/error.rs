//! Error taxonomy shared by the layout engine and every coder.

use std::fmt;

use solana_pubkey::Pubkey;

/// One of the four coder kinds a program's IDL may populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Accounts,
    Instructions,
    Events,
    Types,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Accounts => "accounts",
            Capability::Instructions => "instructions",
            Capability::Events => "events",
            Capability::Types => "user-defined types",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure raised by the layout engine while walking a type descriptor.
///
/// `path` names the field being processed (`config.label[3]`), empty at the root.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("shape mismatch at `{path}`: {reason}")]
    ShapeMismatch { path: String, reason: String },

    #[error("truncated input at `{path}`: needed {needed} bytes, {available} available")]
    TruncatedInput {
        path: String,
        needed: usize,
        available: usize,
    },
}

impl LayoutError {
    pub(crate) fn shape(reason: impl Into<String>) -> Self {
        LayoutError::ShapeMismatch {
            path: String::new(),
            reason: reason.into(),
        }
    }

    pub(crate) fn truncated(needed: usize, available: usize) -> Self {
        LayoutError::TruncatedInput {
            path: String::new(),
            needed,
            available,
        }
    }

    /// Prefix the error path with an enclosing field or index segment.
    pub(crate) fn at(mut self, segment: &str) -> Self {
        let path = match &mut self {
            LayoutError::ShapeMismatch { path, .. } => path,
            LayoutError::TruncatedInput { path, .. } => path,
        };
        *path = if path.is_empty() {
            segment.to_string()
        } else if path.starts_with('[') {
            format!("{segment}{path}")
        } else {
            format!("{segment}.{path}")
        };
        self
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LayoutError::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
            LayoutError::TruncatedInput { .. } => ErrorKind::TruncatedInput,
        }
    }
}

/// Flat projection of [`CoderError`] for callers that branch on the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidSchema,
    UnknownName,
    UnknownDiscriminant,
    ShapeMismatch,
    TruncatedInput,
    TrailingBytes,
    CapabilityNotSupported,
    UnknownProgram,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoderError {
    /// The IDL is internally inconsistent. Raised only while building a coder.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("unknown {capability} entry `{name}`")]
    UnknownName { capability: Capability, name: String },

    #[error("no {capability} entry matches discriminator {discriminator:?}")]
    UnknownDiscriminant {
        capability: Capability,
        discriminator: Vec<u8>,
    },

    /// Layout engine failure, tagged with the entry being processed.
    #[error("{capability} `{name}`: {source}")]
    Layout {
        capability: Capability,
        name: String,
        #[source]
        source: LayoutError,
    },

    /// Input is not in the expected text encoding (base58, base64).
    #[error("{capability}: {reason}")]
    Encoding {
        capability: Capability,
        reason: String,
    },

    #[error("{capability} `{name}`: {remaining} trailing bytes after {consumed} consumed")]
    TrailingBytes {
        capability: Capability,
        name: String,
        consumed: usize,
        remaining: usize,
    },

    #[error("{program} program does not have {capability}")]
    CapabilityNotSupported {
        program: String,
        capability: Capability,
    },

    #[error("no coder registered for program {0}")]
    UnknownProgram(Pubkey),
}

impl CoderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoderError::InvalidSchema(_) => ErrorKind::InvalidSchema,
            CoderError::UnknownName { .. } => ErrorKind::UnknownName,
            CoderError::UnknownDiscriminant { .. } => ErrorKind::UnknownDiscriminant,
            CoderError::Layout { source, .. } => source.kind(),
            CoderError::Encoding { .. } => ErrorKind::ShapeMismatch,
            CoderError::TrailingBytes { .. } => ErrorKind::TrailingBytes,
            CoderError::CapabilityNotSupported { .. } => ErrorKind::CapabilityNotSupported,
            CoderError::UnknownProgram(_) => ErrorKind::UnknownProgram,
        }
    }

    pub(crate) fn layout(capability: Capability, name: &str, source: LayoutError) -> Self {
        CoderError::Layout {
            capability,
            name: name.to_string(),
            source,
        }
    }

    pub(crate) fn unknown_name(capability: Capability, name: &str) -> Self {
        CoderError::UnknownName {
            capability,
            name: name.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoderError {
    fn from(err: serde_json::Error) -> Self {
        CoderError::InvalidSchema(format!("malformed IDL document: {err}"))
    }
}

pub type Result<T, E = CoderError> = std::result::Result<T, E>;
