use std::sync::Arc;

use crate::{
    core::{db::ParticipantDb, participant::Participant},
    error::Error,
};

/// Full sorted views over the participant collection. Every call
/// recomputes the ordering from current store state; there is no
/// pagination and no caching.
pub struct LeaderboardQuery {
    db: Arc<ParticipantDb>,
}

impl LeaderboardQuery {
    pub fn new(db: Arc<ParticipantDb>) -> Self {
        LeaderboardQuery { db }
    }

    /// All participants, descending by snap score. Tie order follows the
    /// store's natural order.
    pub async fn by_snap_score(&self) -> Result<Vec<Participant>, Error> {
        self.db.get_participants_by_snap_score().await
    }

    /// All participants, quiz score descending with time taken ascending
    /// as the tie breaker. Unscored participants sort with their
    /// zero-valued defaults.
    pub async fn by_quiz_performance(&self) -> Result<Vec<Participant>, Error> {
        self.db.get_participants_by_quiz_performance().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        participant::QuizScore,
        registry::{NewParticipant, ParticipantRegistry, Registration},
        scores::ScoreLedger,
    };

    async fn registered(db: &Arc<ParticipantDb>, name: &str) -> Participant {
        let registry = ParticipantRegistry::new(db.clone());
        match registry
            .register(&NewParticipant {
                name: name.to_owned(),
                region: "N".to_owned(),
                contact_id: name.to_owned(),
            })
            .await
            .unwrap()
        {
            Registration::Created(p) => p,
            Registration::Existing(p) => p,
        }
    }

    #[tokio::test]
    async fn snap_leaderboard_is_strictly_descending_on_last_write() {
        let db = Arc::new(ParticipantDb::open_in_memory().await.unwrap());
        let ledger = ScoreLedger::new(db.clone());
        let boards = LeaderboardQuery::new(db.clone());

        let ann = registered(&db, "ann").await;
        let ben = registered(&db, "ben").await;
        let cam = registered(&db, "cam").await;

        ledger.set_snap_score(ann.id, 5.0).await.unwrap();
        ledger.set_snap_score(ben.id, 20.0).await.unwrap();
        ledger.set_snap_score(cam.id, 12.0).await.unwrap();

        // Ann's later write reorders her above Cam.
        ledger.set_snap_score(ann.id, 15.0).await.unwrap();

        let names: Vec<String> = boards
            .by_snap_score()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["ben", "ann", "cam"]);
    }

    #[tokio::test]
    async fn quiz_leaderboard_breaks_score_ties_by_faster_time() {
        let db = Arc::new(ParticipantDb::open_in_memory().await.unwrap());
        let ledger = ScoreLedger::new(db.clone());
        let boards = LeaderboardQuery::new(db.clone());

        let a = registered(&db, "a").await;
        let b = registered(&db, "b").await;

        ledger
            .set_quiz_score(
                a.id,
                QuizScore {
                    score: 90.0,
                    time_taken: 30.0,
                    comment: None,
                },
            )
            .await
            .unwrap();
        ledger
            .set_quiz_score(
                b.id,
                QuizScore {
                    score: 90.0,
                    time_taken: 20.0,
                    comment: None,
                },
            )
            .await
            .unwrap();

        let names: Vec<String> = boards
            .by_quiz_performance()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn unscored_participants_rank_with_zero_defaults() {
        let db = Arc::new(ParticipantDb::open_in_memory().await.unwrap());
        let ledger = ScoreLedger::new(db.clone());
        let boards = LeaderboardQuery::new(db.clone());

        let scored = registered(&db, "scored").await;
        registered(&db, "unscored").await;

        ledger
            .set_quiz_score(
                scored.id,
                QuizScore {
                    score: 1.0,
                    time_taken: 600.0,
                    comment: None,
                },
            )
            .await
            .unwrap();

        let board = boards.by_quiz_performance().await.unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].name, "scored");
        assert_eq!(board[1].quiz_score.score, 0.0);
    }
}
