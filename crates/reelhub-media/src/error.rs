use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("invalid object storage configuration: {0}")]
    Config(#[source] object_store::Error),

    #[error("object store request failed for {key}: {source}")]
    Store {
        key: String,
        #[source]
        source: object_store::Error,
    },
}
