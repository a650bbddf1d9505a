use std::path::PathBuf;

use sqlx::{migrate::MigrateDatabase, sqlite::Sqlite, SqlitePool};

use crate::{
    core::{
        participant::{LocatorSlot, Participant, QuizScore},
        registry::NewParticipant,
    },
    error::Error,
};

/// The participant record store. One table, keyed by rowid, with an
/// explicit unique index on the contact identifier.
pub struct ParticipantDb {
    db: SqlitePool,
}

impl ParticipantDb {
    /// Creates the store file and its schema.
    pub async fn init(file: &PathBuf) -> Result<Self, Error> {
        let url = format!("sqlite://{}", file.to_str().unwrap());
        Sqlite::create_database(&url).await?;

        let db = SqlitePool::connect(&url).await?;
        Self::create_schema(&db).await?;

        Ok(ParticipantDb { db })
    }

    /// Connects to an existing store file.
    pub async fn load(file: &PathBuf) -> Result<Self, Error> {
        let url = format!("sqlite://{}", file.to_str().unwrap());
        Sqlite::create_database(&url).await?;

        let db = SqlitePool::connect(&url).await?;
        Ok(ParticipantDb { db })
    }

    /// A private in-memory store. The pool is pinned to a single
    /// connection so every query sees the same `:memory:` database.
    #[cfg(test)]
    pub async fn open_in_memory() -> Result<Self, Error> {
        let db = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::create_schema(&db).await?;

        Ok(ParticipantDb { db })
    }

    async fn create_schema(db: &SqlitePool) -> Result<(), Error> {
        sqlx::query(
            "create table participants(
                        id integer primary key,
                        name text not null,
                        region text not null,
                        contact_id text not null,
                        score real not null default 0,
                        time_taken real not null default 0,
                        comment text,
                        snap_score real not null default 0,
                        image_url text not null default '',
                        video_url text not null default '',
                        file_url text not null default ''
                    );",
        )
        .execute(db)
        .await?;

        sqlx::query(
            "create unique index participants_contact_id
                        on participants(contact_id);",
        )
        .execute(db)
        .await?;

        Ok(())
    }

    /// Inserts a new participant with zero-valued scores and empty
    /// locators, returning the stored record.
    pub async fn add_participant(&self, new: &NewParticipant) -> Result<Participant, Error> {
        log::debug!("Creating participant for contact {}", new.contact_id);
        let result = sqlx::query("insert into participants(name, region, contact_id) values(?, ?, ?)")
            .bind(&new.name)
            .bind(&new.region)
            .bind(&new.contact_id)
            .execute(&self.db)
            .await?;

        self.get_participant(result.last_insert_rowid()).await
    }

    pub async fn get_participant(&self, id: i64) -> Result<Participant, Error> {
        sqlx::query_as(
            "select * from participants
                        where id = ?
                        limit 1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(Error::NotFound(id))
    }

    pub async fn find_by_contact(&self, contact_id: &str) -> Result<Option<Participant>, Error> {
        Ok(sqlx::query_as(
            "select * from participants
                        where contact_id = ?
                        limit 1",
        )
        .bind(contact_id)
        .fetch_optional(&self.db)
        .await?)
    }

    /// Overwrites all three quiz sub-fields unconditionally.
    pub async fn set_quiz_score(&self, id: i64, quiz: &QuizScore) -> Result<(), Error> {
        Ok(sqlx::query(
            "update participants set score = ?, time_taken = ?, comment = ?
                        where id = ?",
        )
        .bind(quiz.score)
        .bind(quiz.time_taken)
        .bind(&quiz.comment)
        .bind(id)
        .execute(&self.db)
        .await
        .map(|_| ())?)
    }

    pub async fn set_snap_score(&self, id: i64, score: f64) -> Result<(), Error> {
        Ok(sqlx::query("update participants set snap_score = ? where id = ?")
            .bind(score)
            .bind(id)
            .execute(&self.db)
            .await
            .map(|_| ())?)
    }

    /// Overwrites one locator column with the blob store's URL.
    pub async fn set_locator(&self, id: i64, slot: LocatorSlot, url: &str) -> Result<(), Error> {
        let query = match slot {
            LocatorSlot::Image => "update participants set image_url = ? where id = ?",
            LocatorSlot::Video => "update participants set video_url = ? where id = ?",
            LocatorSlot::File => "update participants set file_url = ? where id = ?",
        };

        Ok(sqlx::query(query)
            .bind(url)
            .bind(id)
            .execute(&self.db)
            .await
            .map(|_| ())?)
    }

    /// All participants, best snap score first.
    pub async fn get_participants_by_snap_score(&self) -> Result<Vec<Participant>, Error> {
        Ok(
            sqlx::query_as("select * from participants order by snap_score desc")
                .fetch_all(&self.db)
                .await?,
        )
    }

    /// All participants, best quiz score first; among equal scores the
    /// faster time wins.
    pub async fn get_participants_by_quiz_performance(&self) -> Result<Vec<Participant>, Error> {
        Ok(sqlx::query_as(
            "select * from participants
                        order by score desc, time_taken asc",
        )
        .fetch_all(&self.db)
        .await?)
    }
}
