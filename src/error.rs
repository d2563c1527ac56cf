use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `kolpilot`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains. Note that the engagement pass
/// itself never surfaces errors — `process_post` swallows every failure into
/// a "no action taken" outcome — so these cover startup and plumbing paths.
#[derive(Debug, Error)]
pub enum KolError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("generation: {0}")]
    Generation(#[from] GenerationError),

    #[error("platform: {0}")]
    Platform(#[from] PlatformError),

    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Generation service errors ──────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generator {generator} request failed: {message}")]
    Request { generator: String, message: String },

    #[error("generator {generator} returned empty content")]
    Empty { generator: String },
}

// ─── Platform gateway errors ────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("{action} on post {post_id} failed: {message}")]
    Action {
        action: String,
        post_id: String,
        message: String,
    },

    #[error("stream error: {0}")]
    Stream(String),
}

// ─── Storage errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to open database: {0}")]
    Open(String),

    #[error("query failed: {0}")]
    Query(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsystem_errors_wrap_into_top_level() {
        let err: KolError = ConfigError::Validation("bad rate".into()).into();
        assert!(err.to_string().contains("config:"));
        assert!(err.to_string().contains("bad rate"));
    }

    #[test]
    fn platform_action_error_names_the_post() {
        let err = PlatformError::Action {
            action: "like".into(),
            post_id: "p42".into(),
            message: "forbidden".into(),
        };
        assert_eq!(err.to_string(), "like on post p42 failed: forbidden");
    }
}
