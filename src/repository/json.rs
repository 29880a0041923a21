use super::ContactRepository;
use crate::error::RepositoryError;
use crate::index::types::RawContact;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Reads `<root>/<user_id>.json`, a JSON array of raw contacts
#[derive(Debug, Clone)]
pub struct JsonDirRepository {
    root: PathBuf,
}

impl JsonDirRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding `user_id`'s contacts
    ///
    /// Ids that could escape the root directory are rejected.
    pub fn user_path(&self, user_id: &str) -> Result<PathBuf, RepositoryError> {
        let valid = !user_id.is_empty()
            && !user_id.starts_with('.')
            && !user_id.contains(['/', '\\', '\0']);
        if !valid {
            return Err(RepositoryError::InvalidUserId(user_id.to_string()));
        }
        Ok(self.root.join(format!("{user_id}.json")))
    }
}

impl ContactRepository for JsonDirRepository {
    fn fetch(&self, user_id: &str) -> Result<Vec<RawContact>, RepositoryError> {
        let path = self.user_path(user_id)?;
        if !path.is_file() {
            return Err(RepositoryError::UserNotFound(user_id.to_string()));
        }

        let reader = BufReader::new(File::open(&path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_fetch_json_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("u1.json"),
            r#"[
                {"id": "1", "email": "Alice@X.com", "first_name": "Alice", "last_name": "Smith"},
                {"id": "2", "email": "bob@y.com", "first_name": "Bob", "last_name": "Lee"}
            ]"#,
        )
        .unwrap();

        let repo = JsonDirRepository::new(dir.path());
        let contacts = repo.fetch("u1").unwrap();

        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].email, "Alice@X.com"); // not normalized yet
    }

    #[test]
    fn test_missing_user() {
        let dir = tempdir().unwrap();
        let repo = JsonDirRepository::new(dir.path());

        assert!(matches!(
            repo.fetch("ghost"),
            Err(RepositoryError::UserNotFound(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("u1.json"), "[{\"id\": 1}").unwrap();
        let repo = JsonDirRepository::new(dir.path());

        assert!(matches!(repo.fetch("u1"), Err(RepositoryError::Json(_))));
    }

    #[test]
    fn test_rejects_path_like_ids() {
        let repo = JsonDirRepository::new("/tmp");

        for id in ["", "../etc", "a/b", "a\\b", ".hidden"] {
            assert!(
                matches!(repo.fetch(id), Err(RepositoryError::InvalidUserId(_))),
                "accepted {id:?}"
            );
        }
    }
}
