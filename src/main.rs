use std::{fs::read_to_string, path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use url::Url;

use crate::{
    core::{
        db::ParticipantDb, leaderboard::LeaderboardQuery, registry::ParticipantRegistry,
        scores::ScoreLedger, settings::Settings, uploads::UploadCoordinator,
    },
    integrations::object_store::{BlobStore, HttpObjectStore},
};

mod core;
mod error;
mod integrations;
mod web;

/// Shared handles to the service components, cloned into each request
/// filter. All state lives behind these handles in the record store and
/// the object store; requests share nothing else.
#[derive(Clone)]
pub struct Services {
    pub db: Arc<ParticipantDb>,
    pub registry: Arc<ParticipantRegistry>,
    pub uploads: Arc<UploadCoordinator>,
    pub scores: Arc<ScoreLedger>,
    pub leaderboards: Arc<LeaderboardQuery>,
}

impl Services {
    pub fn new(db: Arc<ParticipantDb>, store: Arc<dyn BlobStore>) -> Self {
        Services {
            registry: Arc::new(ParticipantRegistry::new(db.clone())),
            uploads: Arc::new(UploadCoordinator::new(db.clone(), store)),
            scores: Arc::new(ScoreLedger::new(db.clone())),
            leaderboards: Arc::new(LeaderboardQuery::new(db.clone())),
            db,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "SnapQuest")]
#[command(version = "0.1")]
#[command(about = "A participant registration, upload and leaderboard backend.", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: RunType,
}

#[derive(Subcommand, Debug)]
enum RunType {
    /// Create and initialize a new participant store.
    Init { store_file: PathBuf },

    /// Run the server against an existing store, using the provided
    /// settings file for the port and object-store credentials.
    Run { settings_file: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    match &args.command {
        RunType::Init { store_file } => {
            ParticipantDb::init(store_file).await?;
            println!("Participant store created at {}", store_file.display());
            Ok(())
        }
        RunType::Run { settings_file } => {
            let settings = serde_json::from_str::<Settings>(&read_to_string(settings_file)?)?;

            let endpoint = Url::parse(&settings.object_store.endpoint)?;
            log::info!(
                "Using object store {} bucket {}",
                endpoint,
                settings.object_store.bucket
            );

            let db = Arc::new(ParticipantDb::load(&settings.store_file).await?);
            let store = Arc::new(HttpObjectStore::new(settings.object_store.clone()));
            let services = Services::new(db, store);

            web::run_http_server(services, &settings).await
        }
    }
}
