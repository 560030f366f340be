/// Core error type for the exporter.
///
/// The adapter crate maps transport/platform failures into this type so the
/// pipeline can report them consistently. Every variant is fatal: the run
/// terminates on the first error, keeping only files already flushed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("auth rejected: {0}")]
    Auth(String),

    #[error("rate limited by api")]
    RateLimited { retry_after: Option<u64> },

    #[error("api error: {method}: {code}")]
    Api { method: String, code: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
