use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("`{name}` must be a positive finite number, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("confidence threshold must lie in [0, 1], got {0}")]
    InvalidConfidence(f32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed recording at line {line}: {source}")]
    Recording {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Checks that a tunable constant is finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter { name, value })
    }
}
