use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    core::{db::ParticipantDb, participant::Participant},
    error::Error,
};

/// Registration payload for a new participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewParticipant {
    pub name: String,
    pub region: String,
    pub contact_id: String,
}

/// Outcome of a registration attempt.
#[derive(Debug)]
pub enum Registration {
    /// A new record was created.
    Created(Participant),

    /// A record with this contact identifier already existed; creation was
    /// short-circuited and the original record is surfaced instead.
    Existing(Participant),
}

/// Owns record creation and the uniqueness rule on the contact identifier.
pub struct ParticipantRegistry {
    db: Arc<ParticipantDb>,
}

impl ParticipantRegistry {
    pub fn new(db: Arc<ParticipantDb>) -> Self {
        ParticipantRegistry { db }
    }

    /// Registers a participant with zero-valued scores and empty locators.
    /// Contact identifiers are compared as exact strings; a duplicate never
    /// creates a second record.
    pub async fn register(&self, new: &NewParticipant) -> Result<Registration, Error> {
        if let Some(existing) = self.db.find_by_contact(&new.contact_id).await? {
            return Ok(Registration::Existing(existing));
        }

        match self.db.add_participant(new).await {
            Ok(participant) => {
                log::info!(
                    "Registered participant {} ({})",
                    participant.name,
                    participant.id
                );
                Ok(Registration::Created(participant))
            }
            // A registration racing us past the lookup trips the unique
            // index; surface the record that won.
            Err(Error::Persistence(sqlx::Error::Database(e))) if e.is_unique_violation() => self
                .db
                .find_by_contact(&new.contact_id)
                .await?
                .map(Registration::Existing)
                .ok_or(Error::DuplicateContact(new.contact_id.clone())),
            Err(e) => Err(e),
        }
    }
}
