use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Json struct for server settings
#[derive(Serialize, Deserialize, Clone)]
pub struct Settings {
    pub store_file: PathBuf,
    pub web_port: Option<u16>,
    pub object_store: ObjectStoreSettings,
}

/// Connection details for the external object-store gateway
#[derive(Serialize, Deserialize, Clone)]
pub struct ObjectStoreSettings {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,

    /// Base URL under which stored objects resolve publicly.
    /// Defaults to the endpoint itself.
    pub public_base_url: Option<String>,
}
