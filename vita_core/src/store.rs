//! Credential persistence with file locking.
//!
//! The credential file is a single JSON object mapping usernames to
//! hex-encoded SHA-256 password digests, rewritten as a whole snapshot
//! on every successful registration. Writes are atomic (temp file +
//! rename) to avoid leaving a torn file behind.

use crate::{Error, Result};
use fs2::FileExt;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Hex-encoded SHA-256 digest length (256 bits -> 64 hex chars)
pub const DIGEST_HEX_LEN: usize = 64;

/// The credential mapping: username -> password digest.
///
/// Invariants enforced on construction and insertion:
/// - usernames are non-empty
/// - digests are exactly [`DIGEST_HEX_LEN`] hex characters
/// - plaintext passwords never appear here
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Credentials {
    entries: BTreeMap<String, String>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a credential snapshot from its JSON form, validating shape.
    ///
    /// Any structural mismatch (non-object, non-string values, empty
    /// usernames, malformed digests) is reported via the returned reason
    /// string; callers wrap it in [`Error::CorruptStore`] with the path.
    pub fn from_json(contents: &str) -> std::result::Result<Self, String> {
        let raw: BTreeMap<String, String> = serde_json::from_str(contents)
            .map_err(|e| format!("not a username -> digest object: {}", e))?;

        for (username, digest) in &raw {
            if username.trim().is_empty() {
                return Err("empty username key".into());
            }
            if !is_valid_digest(digest) {
                return Err(format!(
                    "digest for '{}' is not a {}-char hex string",
                    username, DIGEST_HEX_LEN
                ));
            }
        }

        Ok(Self { entries: raw })
    }

    /// Serialize to the on-disk JSON form (pretty-printed, UTF-8)
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    pub fn contains(&self, username: &str) -> bool {
        self.entries.contains_key(username)
    }

    pub fn digest_for(&self, username: &str) -> Option<&str> {
        self.entries.get(username).map(String::as_str)
    }

    /// Insert a username -> digest pair, enforcing the record invariants
    pub fn insert(&mut self, username: &str, digest: String) -> Result<()> {
        if username.trim().is_empty() {
            return Err(Error::Config("username cannot be empty".into()));
        }
        if !is_valid_digest(&digest) {
            return Err(Error::Config(format!(
                "digest must be {} hex characters",
                DIGEST_HEX_LEN
            )));
        }
        self.entries.insert(username.to_string(), digest);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_valid_digest(digest: &str) -> bool {
    digest.len() == DIGEST_HEX_LEN && digest.chars().all(|c| c.is_ascii_hexdigit())
}

/// Storage abstraction for the credential mapping.
///
/// Injected into [`crate::Authenticator`] so tests can substitute an
/// in-memory store for the file-backed one.
pub trait CredentialStore {
    /// Read the persisted snapshot. Absence of storage yields an empty
    /// mapping; unparseable content is a [`Error::CorruptStore`].
    fn load(&self) -> Result<Credentials>;

    /// Overwrite the persisted snapshot
    fn save(&self, credentials: &Credentials) -> Result<()>;
}

/// File-backed credential store (JSON snapshot, e.g. `users.json`)
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileStore {
    fn load(&self) -> Result<Credentials> {
        if !self.path.exists() {
            tracing::debug!("No credential file at {:?}, starting empty", self.path);
            return Ok(Credentials::new());
        }

        let file = File::open(&self.path)?;

        // Shared lock for reading
        file.lock_shared()?;

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        let read_result = reader.read_to_string(&mut contents);
        file.unlock()?;
        read_result?;

        match Credentials::from_json(&contents) {
            Ok(credentials) => {
                tracing::debug!(
                    "Loaded {} credential(s) from {:?}",
                    credentials.len(),
                    self.path
                );
                Ok(credentials)
            }
            // Never silently reset a corrupt store: the caller must see
            // the diagnostic and halt authentication.
            Err(reason) => Err(Error::CorruptStore {
                path: self.path.clone(),
                reason,
            }),
        }
    }

    fn save(&self, credentials: &Credentials) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(self.path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "store path missing parent")
        })?)?;

        // Exclusive lock on the temp file to serialize concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = credentials.to_json()?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        // Atomically replace the old snapshot
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!(
            "Saved {} credential(s) to {:?}",
            credentials.len(),
            self.path
        );
        Ok(())
    }
}

/// In-memory credential store for tests and the authentication unit tests
#[derive(Default)]
pub struct MemoryStore {
    snapshot: RefCell<Credentials>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<Credentials> {
        Ok(self.snapshot.borrow().clone())
    }

    fn save(&self, credentials: &Credentials) -> Result<()> {
        *self.snapshot.borrow_mut() = credentials.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp_dir.path().join("users.json"));

        let mut credentials = Credentials::new();
        credentials
            .insert("alice", hash_password("hunter2"))
            .unwrap();
        credentials
            .insert("bob", hash_password("swordfish"))
            .unwrap();

        store.save(&credentials).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, credentials);
        assert_eq!(
            loaded.digest_for("alice"),
            Some(hash_password("hunter2").as_str())
        );
    }

    #[test]
    fn test_load_nonexistent_returns_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp_dir.path().join("missing.json"));

        let loaded = store.load().unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("users.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        let result = FileStore::new(&path).load();
        assert!(matches!(result, Err(Error::CorruptStore { .. })));
    }

    #[test]
    fn test_wrong_shape_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("users.json");

        // Valid JSON, wrong structure
        std::fs::write(&path, r#"["alice", "bob"]"#).unwrap();
        assert!(matches!(
            FileStore::new(&path).load(),
            Err(Error::CorruptStore { .. })
        ));

        // Object, but digest is not hex
        std::fs::write(&path, r#"{"alice": "not-a-digest"}"#).unwrap();
        assert!(matches!(
            FileStore::new(&path).load(),
            Err(Error::CorruptStore { .. })
        ));
    }

    #[test]
    fn test_atomic_save_leaves_no_stray_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("users.json");

        let store = FileStore::new(&path);
        store.save(&Credentials::new()).unwrap();

        assert!(path.exists());
        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "users.json")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only users.json, found extras: {:?}",
            extras
        );
    }

    #[test]
    fn test_insert_rejects_bad_records() {
        let mut credentials = Credentials::new();
        assert!(credentials.insert("", hash_password("pw")).is_err());
        assert!(credentials.insert("alice", "plaintext".into()).is_err());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_empty());

        let mut credentials = Credentials::new();
        credentials.insert("carol", hash_password("pw")).unwrap();
        store.save(&credentials).unwrap();

        assert!(store.load().unwrap().contains("carol"));
    }
}
