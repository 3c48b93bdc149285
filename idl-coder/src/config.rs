//! Coder configuration.

/// What a decoder does with bytes left over after the matched layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingBytes {
    /// Fail with `TrailingBytes`.
    #[default]
    Reject,
    /// Return the decoded value and drop the rest. Accounts allocated with
    /// spare space, or written by a newer program version with appended
    /// fields, decode under this policy.
    Ignore,
}

/// Settings applied uniformly by every sub-coder of a program coder.
#[derive(Debug, Clone, Default)]
pub struct CoderConfig {
    pub trailing_bytes: TrailingBytes,
    /// Emit a `tracing` debug event for every failed encode/decode.
    pub log_failures: bool,
}

impl CoderConfig {
    /// Reject trailing bytes and stay quiet.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Ignore trailing bytes.
    pub fn lenient() -> Self {
        Self {
            trailing_bytes: TrailingBytes::Ignore,
            ..Self::default()
        }
    }

    /// Read settings from the environment:
    ///
    /// - `IDL_CODER_TRAILING_BYTES`: `reject` (default) or `ignore`
    /// - `IDL_CODER_DEBUG`: `1` or `true` enables failure logging
    pub fn from_env() -> Self {
        let trailing_bytes = match std::env::var("IDL_CODER_TRAILING_BYTES")
            .map(|v| v.to_lowercase())
            .as_deref()
        {
            Ok("ignore") => TrailingBytes::Ignore,
            _ => TrailingBytes::Reject,
        };
        let log_failures = std::env::var("IDL_CODER_DEBUG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            trailing_bytes,
            log_failures,
        }
    }

    pub fn with_trailing_bytes(mut self, policy: TrailingBytes) -> Self {
        self.trailing_bytes = policy;
        self
    }

    pub fn with_log_failures(mut self, enabled: bool) -> Self {
        self.log_failures = enabled;
        self
    }
}
