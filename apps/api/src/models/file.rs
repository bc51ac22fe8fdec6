use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One object in a user's remote file namespace. Always fetched fresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: String,
    pub name: String,
    /// Full object key, used for deletion.
    pub path: String,
    pub size: Option<i64>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl FileEntry {
    /// Entry for an object key; `name` is the last path segment.
    pub fn from_key(key: &str) -> Self {
        let name = key
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(key)
            .to_string();
        FileEntry {
            id: key.to_string(),
            name,
            path: key.to_string(),
            size: None,
            last_modified: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_last_segment() {
        let entry = FileEntry::from_key("users/42/resumes/cv.pdf");
        assert_eq!(entry.name, "cv.pdf");
        assert_eq!(entry.path, "users/42/resumes/cv.pdf");
    }

    #[test]
    fn test_flat_key() {
        assert_eq!(FileEntry::from_key("notes.txt").name, "notes.txt");
    }
}
