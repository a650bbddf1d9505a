use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// A participant's timed quiz result.
///
/// Always present on a record, zero-valued until the first score is
/// submitted. Never modeled as optional.
#[derive(PartialEq, Debug, FromRow, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QuizScore {
    /// Points scored on the quiz
    pub score: f64,

    /// Time taken to finish the quiz, in seconds
    pub time_taken: f64,

    /// Free-text comment submitted alongside the score
    pub comment: Option<String>,
}

/// A registered participant. The sole unit of storage in this system;
/// created once, mutated in place, never deleted.
#[derive(PartialEq, Debug, FromRow, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Unique participant ID
    pub id: i64,

    /// Display name
    pub name: String,

    /// Home region
    pub region: String,

    /// Contact identifier, unique across all participants.
    /// Compared as an exact string; no normalization is applied.
    pub contact_id: String,

    /// Timed quiz result
    #[sqlx(flatten)]
    pub quiz_score: QuizScore,

    /// Snap score
    pub snap_score: f64,

    /// Locator of the last uploaded image, empty until one is uploaded
    pub image_url: String,

    /// Locator of the last uploaded video, empty until one is uploaded
    pub video_url: String,

    /// Locator of the last file accepted by the generic upload endpoint
    pub file_url: String,
}

/// Which locator column a successful upload links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorSlot {
    Image,
    Video,
    File,
}
