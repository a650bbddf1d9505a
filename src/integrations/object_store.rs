use async_trait::async_trait;

use crate::{core::settings::ObjectStoreSettings, error::Error};

/// External blob storage. Implementations accept a binary payload plus a
/// namespacing key and return a durable, publicly resolvable locator.
///
/// Failures are surfaced to the caller as [`Error::StorageUnavailable`]
/// and are never retried here.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn store(&self, key: &str, content_type: &str, payload: Vec<u8>)
        -> Result<String, Error>;
}

/// Client for an HTTP object-store gateway. Objects are PUT to
/// `{endpoint}/{bucket}/{key}`; repeated uploads of the same key overwrite
/// the same object. The returned locator resolves under the configured
/// public base URL when one is set, otherwise under the endpoint itself.
pub struct HttpObjectStore {
    client: reqwest::Client,
    settings: ObjectStoreSettings,
}

impl HttpObjectStore {
    pub fn new(settings: ObjectStoreSettings) -> Self {
        HttpObjectStore {
            client: reqwest::Client::new(),
            settings,
        }
    }

    fn object_url(&self, base: &str, key: &str) -> String {
        format!(
            "{}/{}/{}",
            base.trim_end_matches('/'),
            self.settings.bucket,
            key
        )
    }
}

#[async_trait]
impl BlobStore for HttpObjectStore {
    async fn store(
        &self,
        key: &str,
        content_type: &str,
        payload: Vec<u8>,
    ) -> Result<String, Error> {
        let target = self.object_url(&self.settings.endpoint, key);

        let response = self
            .client
            .put(&target)
            .basic_auth(&self.settings.access_key, Some(&self.settings.secret_key))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(payload)
            .send()
            .await
            .map_err(|e| Error::StorageUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            log::error!("Object store rejected {}: {}", target, response.status());
            return Err(Error::StorageUnavailable(format!(
                "{} returned {}",
                target,
                response.status()
            )));
        }

        let public_base = self
            .settings
            .public_base_url
            .as_deref()
            .unwrap_or(&self.settings.endpoint);
        Ok(self.object_url(public_base, key))
    }
}
