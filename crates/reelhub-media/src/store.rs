use std::sync::Arc;

use bytes::Bytes;
use object_store::{
    aws::AmazonS3Builder, memory::InMemory, path::Path, Attribute, Attributes, ObjectStore,
    PutOptions, PutPayload,
};
use reelhub_core::StorageConfig;

use crate::MediaError;

/// A file received from a client, held in memory until it is stored.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Where an upload ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

/// Build the object key for an upload: `{id}-{file name}`.
///
/// Path separators in the client-supplied name are replaced so every upload
/// lands at the bucket root.
#[must_use]
pub fn object_key(id: &str, file_name: &str) -> String {
    let safe_name: String = file_name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{id}-{safe_name}")
}

/// Shared handle to the media bucket. Cheap to clone.
#[derive(Clone)]
pub struct MediaStore {
    store: Arc<dyn ObjectStore>,
    public_base_url: String,
}

impl std::fmt::Debug for MediaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStore")
            .field("store", &self.store.to_string())
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

impl MediaStore {
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, public_base_url: impl Into<String>) -> Self {
        Self {
            store,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build an S3-backed store from application config.
    ///
    /// Credentials missing from the config fall back to the standard `AWS_*`
    /// environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Config`] if the S3 client cannot be built.
    pub fn from_config(config: &StorageConfig) -> Result<Self, MediaError> {
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(&config.bucket)
            .with_region(&config.region);

        if let Some(key) = &config.access_key_id {
            builder = builder.with_access_key_id(key);
        }
        if let Some(secret) = &config.secret_access_key {
            builder = builder.with_secret_access_key(secret);
        }
        if let Some(endpoint) = &config.endpoint {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }

        let s3 = builder.build().map_err(MediaError::Config)?;
        Ok(Self::new(Arc::new(s3), config.public_base_url.clone()))
    }

    /// An in-memory store, for tests and local development.
    #[must_use]
    pub fn in_memory(public_base_url: impl Into<String>) -> Self {
        Self::new(Arc::new(InMemory::new()), public_base_url)
    }

    #[must_use]
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base_url)
    }

    /// Store `upload` under a key derived from `id` and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Store`] if the object store rejects the write.
    pub async fn put(&self, id: &str, upload: &Upload) -> Result<StoredObject, MediaError> {
        let key = object_key(id, &upload.file_name);

        let mut attributes = Attributes::new();
        if !upload.content_type.is_empty() {
            attributes.insert(Attribute::ContentType, upload.content_type.clone().into());
        }
        let options = PutOptions {
            attributes,
            ..PutOptions::default()
        };

        self.store
            .put_opts(
                &Path::from(key.as_str()),
                PutPayload::from(upload.data.clone()),
                options,
            )
            .await
            .map_err(|source| MediaError::Store {
                key: key.clone(),
                source,
            })?;

        tracing::debug!(key = %key, bytes = upload.data.len(), "stored media object");

        Ok(StoredObject {
            url: self.object_url(&key),
            key,
        })
    }

    /// Read an object back along with its stored content type.
    #[cfg(test)]
    async fn fetch(&self, key: &str) -> Result<(Bytes, Option<String>), MediaError> {
        let to_error = |source| MediaError::Store {
            key: key.to_string(),
            source,
        };

        let result = self
            .store
            .get(&Path::from(key))
            .await
            .map_err(to_error)?;
        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|value| AsRef::<str>::as_ref(value).to_owned());
        let data = result.bytes().await.map_err(to_error)?;

        Ok((data, content_type))
    }
}
