use std::process::ExitStatus;

/// Anything that can go wrong during one monitoring cycle.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("live API returned code {code}: {message}")]
    Api { code: i64, message: String },
    #[error("unexpected live API response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("uid {0} has no live room")]
    NoRoom(u64),
    #[error("recorder I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("recorder produced nothing ({0})")]
    EmptyRecording(ExitStatus),
    #[error("failed to send the recording: {0}")]
    Telegram(#[from] teloxide::RequestError),
}
