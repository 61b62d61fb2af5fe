//! Google Cloud Storage blob store over the JSON API.

use crate::{ArtifactKey, BlobStore};
use bedtime_error::{BedtimeResult, StorageError, StorageErrorKind};
use reqwest::{Client, StatusCode, Url};

/// Default JSON API endpoint.
pub const DEFAULT_GCS_BASE_URL: &str = "https://storage.googleapis.com";

/// Blob store writing to a Google Cloud Storage bucket.
///
/// Authenticates with an OAuth2 bearer token (for example the output of
/// `gcloud auth print-access-token`). URIs have the form `gs://{bucket}/{key}`.
#[derive(Debug, Clone)]
pub struct GcsBlobStore {
    client: Client,
    base_url: Url,
    bucket: String,
    access_token: String,
}

impl GcsBlobStore {
    /// Create a store for `bucket`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the bucket is empty or `base_url` does not parse.
    pub fn new(
        bucket: impl Into<String>,
        access_token: impl Into<String>,
        base_url: Option<&str>,
    ) -> BedtimeResult<Self> {
        let bucket = bucket.into();
        if bucket.trim().is_empty() {
            return Err(StorageError::new(StorageErrorKind::InvalidConfig(
                "GCS bucket name is empty".to_string(),
            ))
            .into());
        }

        let base_url = Url::parse(base_url.unwrap_or(DEFAULT_GCS_BASE_URL)).map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidConfig(format!(
                "invalid GCS base url: {}",
                e
            )))
        })?;

        tracing::info!(bucket = %bucket, base_url = %base_url, "Created GCS blob store");
        Ok(Self {
            client: Client::new(),
            base_url,
            bucket,
            access_token: access_token.into(),
        })
    }

    /// Build `{base}/{segments...}` with each segment percent-encoded (so `/`
    /// inside an object name becomes `%2F`).
    fn endpoint(&self, segments: &[&str]) -> BedtimeResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                StorageError::new(StorageErrorKind::InvalidConfig(format!(
                    "GCS base url cannot be a base: {}",
                    self.base_url
                )))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn uri_for(&self, key: &ArtifactKey) -> String {
        format!("gs://{}/{}", self.bucket, key)
    }

    async fn rejected(response: reqwest::Response) -> StorageError {
        let status_code = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        StorageError::new(StorageErrorKind::Rejected {
            status_code,
            message,
        })
    }
}

#[async_trait::async_trait]
impl BlobStore for GcsBlobStore {
    #[tracing::instrument(skip(self, data), fields(bucket = %self.bucket, key = %key, size = data.len()))]
    async fn put(
        &self,
        key: &ArtifactKey,
        data: &[u8],
        content_type: &str,
    ) -> BedtimeResult<String> {
        let url = self.endpoint(&["upload", "storage", "v1", "b", &self.bucket, "o"])?;
        let name = key.to_string();

        let response = self
            .client
            .post(url)
            .query(&[("uploadType", "media"), ("name", name.as_str())])
            .bearer_auth(&self.access_token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data.to_vec())
            .send()
            .await
            .map_err(|e| StorageError::new(StorageErrorKind::Unavailable(e.to_string())))?;

        if !response.status().is_success() {
            let err = Self::rejected(response).await;
            tracing::error!(error = %err, "GCS upload rejected");
            return Err(err.into());
        }

        let uri = self.uri_for(key);
        tracing::info!(uri = %uri, "Uploaded artifact");
        Ok(uri)
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.bucket, key = %key))]
    async fn get(&self, key: &ArtifactKey) -> BedtimeResult<Vec<u8>> {
        let name = key.to_string();
        let url = self.endpoint(&["storage", "v1", "b", &self.bucket, "o", &name])?;

        let response = self
            .client
            .get(url)
            .query(&[("alt", "media")])
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| StorageError::new(StorageErrorKind::Unavailable(e.to_string())))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                Err(StorageError::new(StorageErrorKind::NotFound(name)).into())
            }
            status if status.is_success() => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| StorageError::new(StorageErrorKind::Read(e.to_string())))?;
                Ok(bytes.to_vec())
            }
            _ => Err(Self::rejected(response).await.into()),
        }
    }

    async fn exists(&self, key: &ArtifactKey) -> BedtimeResult<bool> {
        let name = key.to_string();
        let url = self.endpoint(&["storage", "v1", "b", &self.bucket, "o", &name])?;

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| StorageError::new(StorageErrorKind::Unavailable(e.to_string())))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            _ => Err(Self::rejected(response).await.into()),
        }
    }

    fn backend_name(&self) -> &'static str {
        "gcs"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn test_object_name_is_escaped_as_one_segment() {
        let store = GcsBlobStore::new("stories", "token", None).unwrap();
        let key = ArtifactKey::new(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            Uuid::nil(),
            "scene_0",
            "image/png",
        )
        .unwrap();
        let name = key.to_string();
        let url = store
            .endpoint(&["storage", "v1", "b", "stories", "o", &name])
            .unwrap();
        assert!(url.as_str().ends_with(
            "/o/2024-05-01%2F00000000-0000-0000-0000-000000000000%2Fscene_0.png"
        ));
        assert_eq!(
            store.uri_for(&key),
            "gs://stories/2024-05-01/00000000-0000-0000-0000-000000000000/scene_0.png"
        );
    }

    #[test]
    fn test_rejects_empty_bucket() {
        assert!(GcsBlobStore::new("  ", "token", None).is_err());
    }
}
