use thiserror::Error;

/// Failures surfaced by the participant registry, upload coordinator,
/// score ledger and leaderboard queries. Every variant is translated to a
/// response at the request boundary; none of them crash the process.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Participant {0} not found")]
    NotFound(i64),

    #[error("A participant with contact id {0} already exists")]
    DuplicateContact(String),

    #[error("No file uploaded")]
    MissingPayload,

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Object store unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Record store failure: {0}")]
    Persistence(#[from] sqlx::Error),
}
