use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};
use tracing::info;

use crate::wipe::storage::{KvNamespace, StorageError};

const SCAN_BATCH: usize = 500;

/// Key-value namespace backed by every Redis key under a prefix.
#[derive(Clone)]
pub struct RedisKvNamespace {
    client: RedisClient,
    prefix: String,
}

impl RedisKvNamespace {
    pub fn new(client: RedisClient, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }

    fn pattern(&self) -> String {
        format!("{}*", escape_glob(&self.prefix))
    }
}

#[async_trait]
impl KvNamespace for RedisKvNamespace {
    async fn clear(&self) -> Result<u64, StorageError> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        let pattern = self.pattern();
        let mut cursor: u64 = 0;
        let mut removed: u64 = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut con)
                .await?;

            if !keys.is_empty() {
                let n: u64 = con.del(&keys).await?;
                removed += n;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        info!("Cleared {removed} keys under '{}'", self.prefix);
        Ok(removed)
    }
}

/// Escapes Redis glob metacharacters so the prefix matches literally.
fn escape_glob(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_glob() {
        assert_eq!(escape_glob("kv:abc:"), "kv:abc:");
        assert_eq!(escape_glob("kv:a*b?[c]:"), "kv:a\\*b\\?\\[c\\]:");
    }

    #[test]
    fn test_pattern_matches_prefix() {
        let client = RedisClient::open("redis://127.0.0.1/").unwrap();
        let ns = RedisKvNamespace::new(client, "kv:42:");
        assert_eq!(ns.pattern(), "kv:42:*");
    }
}
