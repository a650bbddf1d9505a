use std::sync::Arc;

use crate::{
    core::{
        db::ParticipantDb,
        participant::{Participant, QuizScore},
    },
    error::Error,
};

/// Applies quiz-score and snap-score updates under simple overwrite
/// semantics: last write wins, no comparison against a prior best.
pub struct ScoreLedger {
    db: Arc<ParticipantDb>,
}

impl ScoreLedger {
    pub fn new(db: Arc<ParticipantDb>) -> Self {
        ScoreLedger { db }
    }

    /// Overwrites the participant's quiz sub-record and returns the
    /// updated record.
    pub async fn set_quiz_score(&self, id: i64, quiz: QuizScore) -> Result<Participant, Error> {
        self.db.get_participant(id).await?;
        self.db.set_quiz_score(id, &quiz).await?;

        log::info!("Set quiz score {} for participant {}", quiz.score, id);
        self.db.get_participant(id).await
    }

    /// Overwrites the participant's snap score and returns the updated
    /// record.
    pub async fn set_snap_score(&self, id: i64, score: f64) -> Result<Participant, Error> {
        self.db.get_participant(id).await?;
        self.db.set_snap_score(id, score).await?;

        log::info!("Set snap score {} for participant {}", score, id);
        self.db.get_participant(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::{NewParticipant, ParticipantRegistry, Registration};

    async fn registered(db: &Arc<ParticipantDb>, contact: &str) -> Participant {
        let registry = ParticipantRegistry::new(db.clone());
        match registry
            .register(&NewParticipant {
                name: contact.to_owned(),
                region: "N".to_owned(),
                contact_id: contact.to_owned(),
            })
            .await
            .unwrap()
        {
            Registration::Created(p) => p,
            Registration::Existing(p) => p,
        }
    }

    #[tokio::test]
    async fn quiz_score_overwrites_all_three_fields() {
        let db = Arc::new(ParticipantDb::open_in_memory().await.unwrap());
        let ledger = ScoreLedger::new(db.clone());
        let participant = registered(&db, "555-0100").await;

        let updated = ledger
            .set_quiz_score(
                participant.id,
                QuizScore {
                    score: 80.0,
                    time_taken: 45.0,
                    comment: Some("close call".to_owned()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.quiz_score.score, 80.0);
        assert_eq!(updated.quiz_score.time_taken, 45.0);
        assert_eq!(updated.quiz_score.comment.as_deref(), Some("close call"));

        // Last write wins; the comment is not carried over.
        let rewritten = ledger
            .set_quiz_score(
                participant.id,
                QuizScore {
                    score: 60.0,
                    time_taken: 30.0,
                    comment: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(rewritten.quiz_score.score, 60.0);
        assert_eq!(rewritten.quiz_score.time_taken, 30.0);
        assert_eq!(rewritten.quiz_score.comment, None);
    }

    #[tokio::test]
    async fn snap_score_leaves_other_fields_untouched() {
        let db = Arc::new(ParticipantDb::open_in_memory().await.unwrap());
        let ledger = ScoreLedger::new(db.clone());
        let participant = registered(&db, "555-0101").await;

        let updated = ledger.set_snap_score(participant.id, 12.0).await.unwrap();
        assert_eq!(updated.snap_score, 12.0);
        assert_eq!(updated.quiz_score, participant.quiz_score);
        assert_eq!(updated.name, participant.name);
    }

    #[tokio::test]
    async fn score_updates_for_missing_participants_fail() {
        let db = Arc::new(ParticipantDb::open_in_memory().await.unwrap());
        let ledger = ScoreLedger::new(db);

        assert!(matches!(
            ledger.set_snap_score(9000, 1.0).await,
            Err(Error::NotFound(9000))
        ));
        assert!(matches!(
            ledger
                .set_quiz_score(9000, QuizScore::default())
                .await,
            Err(Error::NotFound(9000))
        ));
    }
}
