//! Data wipe: lists a user's remote files and, on confirmation, deletes them
//! along with the user's key-value entries.

pub mod eraser;
pub mod handlers;
pub mod kv;
pub mod s3;
pub mod storage;

use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use redis::Client as RedisClient;
use uuid::Uuid;

use crate::wipe::kv::RedisKvNamespace;
use crate::wipe::s3::S3FileNamespace;
use crate::wipe::storage::{file_prefix, kv_prefix, NamespaceProvider, UserNamespaces};

/// Production namespaces: files under `users/<id>/` in the bucket, keys under `kv:<id>:` in Redis.
#[derive(Clone)]
pub struct RemoteNamespaces {
    s3: S3Client,
    bucket: String,
    redis: RedisClient,
}

impl RemoteNamespaces {
    pub fn new(s3: S3Client, bucket: impl Into<String>, redis: RedisClient) -> Self {
        Self {
            s3,
            bucket: bucket.into(),
            redis,
        }
    }
}

impl NamespaceProvider for RemoteNamespaces {
    fn for_user(&self, user_id: Uuid) -> UserNamespaces {
        UserNamespaces {
            files: Arc::new(S3FileNamespace::new(
                self.s3.clone(),
                self.bucket.clone(),
                file_prefix(user_id),
            )),
            kv: Arc::new(RedisKvNamespace::new(self.redis.clone(), kv_prefix(user_id))),
        }
    }
}
