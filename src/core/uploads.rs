use std::sync::Arc;

use crate::{
    core::{
        db::ParticipantDb,
        participant::{LocatorSlot, Participant},
    },
    error::Error,
    integrations::object_store::BlobStore,
};

/// Media category recognized by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Leading key segment for blobs of this kind.
    pub fn category(&self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Video => "videos",
        }
    }

    /// Classifies a client-declared content type. The declared type is
    /// trusted as-is; payload bytes are not sniffed.
    pub fn from_content_type(content_type: &str) -> Option<MediaKind> {
        if content_type.starts_with("image/") {
            Some(MediaKind::Image)
        } else if content_type.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

/// An inbound file as read off the wire.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Validates an inbound payload, stores it in the external blob store and
/// links the resulting locator to the owning participant record.
///
/// Store and link are two separate writes with no rollback: a blob stored
/// before a failed link stays behind unreferenced. Callers retry the whole
/// upload, which re-stores under the same key and re-attempts the link.
pub struct UploadCoordinator {
    db: Arc<ParticipantDb>,
    store: Arc<dyn BlobStore>,
}

impl UploadCoordinator {
    pub fn new(db: Arc<ParticipantDb>, store: Arc<dyn BlobStore>) -> Self {
        UploadCoordinator { db, store }
    }

    /// Stores an image payload and links it to the participant's image
    /// locator. The payload's declared type is not checked.
    pub async fn attach_image(&self, id: i64, payload: UploadPayload) -> Result<String, Error> {
        let participant = self.db.get_participant(id).await?;
        let payload = require_payload(payload)?;

        self.store_and_link(
            &participant,
            MediaKind::Image.category(),
            LocatorSlot::Image,
            payload,
        )
        .await
    }

    /// Stores a video payload and links it to the participant's video
    /// locator. The payload's declared type is not checked.
    pub async fn attach_video(&self, id: i64, payload: UploadPayload) -> Result<String, Error> {
        let participant = self.db.get_participant(id).await?;
        let payload = require_payload(payload)?;

        self.store_and_link(
            &participant,
            MediaKind::Video.category(),
            LocatorSlot::Video,
            payload,
        )
        .await
    }

    /// The generic path: classifies the payload by its declared content
    /// type, stores it under the classified category and links the
    /// combined locator field.
    pub async fn attach_file(&self, id: i64, payload: UploadPayload) -> Result<String, Error> {
        let participant = self.db.get_participant(id).await?;
        let payload = require_payload(payload)?;

        let declared = payload.content_type.clone().unwrap_or_default();
        let kind = MediaKind::from_content_type(&declared)
            .ok_or(Error::UnsupportedMediaType(declared))?;

        self.store_and_link(&participant, kind.category(), LocatorSlot::File, payload)
            .await
    }

    /// The blob write and the record link are separate operations with no
    /// rollback between them. The blob is durable once `store` returns; a
    /// failed link leaves it orphaned.
    async fn store_and_link(
        &self,
        participant: &Participant,
        category: &str,
        slot: LocatorSlot,
        payload: UploadPayload,
    ) -> Result<String, Error> {
        let filename = payload.filename.as_deref().unwrap_or("upload");
        let key = format!("{}/{}/{}", category, participant.id, filename);
        let content_type = payload
            .content_type
            .as_deref()
            .unwrap_or("application/octet-stream");

        log::debug!("Storing {} byte payload at {}", payload.data.len(), key);
        let locator = self.store.store(&key, content_type, payload.data).await?;

        self.db.set_locator(participant.id, slot, &locator).await?;

        log::info!("Linked {} to participant {}", locator, participant.id);
        Ok(locator)
    }
}

/// Upload requests with nothing attached fail before any blob-store
/// round-trip.
fn require_payload(payload: UploadPayload) -> Result<UploadPayload, Error> {
    if payload.data.is_empty() {
        Err(Error::MissingPayload)
    } else {
        Ok(payload)
    }
}
