use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::models::file::FileEntry;
use crate::wipe::storage::{FileNamespace, StorageError};

/// File namespace backed by an S3 (or MinIO) key prefix.
#[derive(Clone)]
pub struct S3FileNamespace {
    client: S3Client,
    bucket: String,
    prefix: String,
}

impl S3FileNamespace {
    pub fn new(client: S3Client, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }
}

#[async_trait]
impl FileNamespace for S3FileNamespace {
    async fn list(&self) -> Result<Vec<FileEntry>, StorageError> {
        let mut entries = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let output = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(&self.prefix)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| StorageError::S3(format!("list failed: {e}")))?;

            for object in output.contents() {
                let Some(key) = object.key() else { continue };
                let mut entry = FileEntry::from_key(key);
                if let Some(etag) = object.e_tag() {
                    entry.id = etag.trim_matches('"').to_string();
                }
                entry.size = object.size();
                entry.last_modified = object
                    .last_modified()
                    .and_then(|t| DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos()));
                entries.push(entry);
            }

            match output.next_continuation_token() {
                Some(token) if output.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }

        debug!("Listed {} objects under s3://{}/{}", entries.len(), self.bucket, self.prefix);
        Ok(entries)
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        if !path.starts_with(&self.prefix) {
            return Err(StorageError::OutsideNamespace {
                path: path.to_string(),
                prefix: self.prefix.clone(),
            });
        }

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| StorageError::S3(format!("delete of '{path}' failed: {e}")))?;

        info!("Deleted s3://{}/{}", self.bucket, path);
        Ok(())
    }
}
