//! Real storage backends over the `object_store` crate.
//!
//! `object_store` is async; the pipeline is not. Each backend owns a small
//! current-thread runtime and blocks on every call, so callers see the plain
//! synchronous [`ObjectStore`] interface. Credentials resolve from the
//! environment (and the explicit overrides in [`CloudOptions`]); there is no
//! retry logic here beyond what the client itself does.

use crate::config::CloudOptions;
use crate::error::{PeekError, Result};
use crate::storage::{FileEntry, ObjectStore, Scheme};
use futures::TryStreamExt;
use object_store::ObjectStore as _;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::path::Path as ObjectPath;
use std::sync::Arc;

pub struct RemoteStore {
    inner: Arc<dyn object_store::ObjectStore>,
    runtime: tokio::runtime::Runtime,
}

impl RemoteStore {
    /// Build the client for one bucket/container on the given provider.
    pub fn connect(scheme: Scheme, bucket: &str, options: &CloudOptions) -> Result<Self> {
        let inner: Arc<dyn object_store::ObjectStore> = match scheme {
            Scheme::Gcs => {
                let mut builder =
                    GoogleCloudStorageBuilder::from_env().with_bucket_name(bucket);
                if let Some(credentials) = &options.gcp_credentials {
                    builder = builder.with_service_account_path(credentials);
                }
                Arc::new(builder.build().map_err(storage_err)?)
            }
            Scheme::S3 => {
                let builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
                Arc::new(builder.build().map_err(storage_err)?)
            }
            Scheme::Azure => {
                let mut builder =
                    MicrosoftAzureBuilder::from_env().with_container_name(bucket);
                if let Some(account) = &options.azure_account {
                    builder = builder.with_account(account);
                }
                Arc::new(builder.build().map_err(storage_err)?)
            }
        };
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| PeekError::Storage {
                message: format!("failed to start storage runtime: {e}"),
            })?;
        Ok(Self { inner, runtime })
    }
}

impl ObjectStore for RemoteStore {
    fn list(&self, prefix: &str) -> Result<Vec<FileEntry>> {
        let path = ObjectPath::from(prefix.trim_end_matches('/'));
        let prefix_arg = if prefix.is_empty() { None } else { Some(&path) };
        let objects: Vec<object_store::ObjectMeta> = self
            .runtime
            .block_on(self.inner.list(prefix_arg).try_collect())
            .map_err(storage_err)?;
        Ok(objects
            .into_iter()
            .filter(|meta| !meta.location.as_ref().ends_with('/'))
            .map(|meta| FileEntry::new(meta.location.to_string(), meta.size))
            .collect())
    }

    fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let path = ObjectPath::from(key);
        let bytes = self
            .runtime
            .block_on(async {
                let result = self.inner.get(&path).await?;
                result.bytes().await
            })
            .map_err(storage_err)?;
        Ok(bytes.to_vec())
    }
}

fn storage_err(err: object_store::Error) -> PeekError {
    PeekError::Storage {
        message: err.to_string(),
    }
}
