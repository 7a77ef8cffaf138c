//! User directory backed by `user.txt`.
//!
//! Registration is append-only; accounts are never edited or removed.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::record;
use crate::storage::Storage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub credential: String,
}

/// Outcome of a credential check against the directory
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthOutcome {
    Accepted,
    UnknownUser,
    WrongCredential,
}

/// Loaded users, in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Users {
    entries: Vec<User>,
}

impl Users {
    /// Build from records in file order; a repeated username keeps its
    /// first position and takes the later credential.
    pub fn from_records(records: impl IntoIterator<Item = User>) -> Self {
        let mut users = Users::default();
        for user in records {
            match users.entries.iter_mut().find(|u| u.username == user.username) {
                Some(existing) => existing.credential = user.credential,
                None => users.entries.push(user),
            }
        }
        users
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn exists(&self, username: &str) -> bool {
        self.get(username).is_some()
    }

    pub fn get(&self, username: &str) -> Option<&User> {
        self.entries.iter().find(|user| user.username == username)
    }

    pub fn check(&self, username: &str, credential: &str) -> bool {
        self.authenticate(username, credential) == AuthOutcome::Accepted
    }

    pub fn authenticate(&self, username: &str, credential: &str) -> AuthOutcome {
        match self.get(username) {
            None => AuthOutcome::UnknownUser,
            Some(user) if user.credential == credential => AuthOutcome::Accepted,
            Some(_) => AuthOutcome::WrongCredential,
        }
    }

    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|user| user.username.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.entries.iter()
    }
}

#[derive(Debug, Clone)]
pub struct UserDirectory {
    storage: Storage,
}

impl UserDirectory {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Load every user, or `None` when the user store does not exist
    pub fn load(&self) -> Result<Option<Users>> {
        let path = self.storage.users_file();
        let lines = match self.storage.read_lines(&path)? {
            Some(lines) => lines,
            None => {
                tracing::warn!(path = %path.display(), "user store missing");
                return Ok(None);
            }
        };

        let mut records = Vec::with_capacity(lines.len());
        for (idx, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let user = record::decode_user(line)
                .map_err(|err| Error::malformed(&path, idx + 1, err.to_string()))?;
            records.push(user);
        }
        Ok(Some(Users::from_records(records)))
    }

    /// Load users, treating a missing store as fatal
    pub fn require(&self) -> Result<Users> {
        self.load()?.ok_or_else(|| {
            Error::unavailable(self.storage.users_file(), "user store not found")
        })
    }

    pub fn exists(&self, username: &str) -> Result<bool> {
        Ok(self.require()?.exists(username))
    }

    pub fn check(&self, username: &str, credential: &str) -> Result<bool> {
        Ok(self.require()?.check(username, credential))
    }

    /// Verify credentials, failing with a typed error on mismatch
    pub fn authenticate(&self, username: &str, credential: &str) -> Result<()> {
        match self.require()?.authenticate(username, credential) {
            AuthOutcome::Accepted => Ok(()),
            AuthOutcome::UnknownUser => Err(Error::UnknownUser(username.to_string())),
            AuthOutcome::WrongCredential => Err(Error::InvalidCredential(username.to_string())),
        }
    }

    /// Append a new account; existing usernames are rejected untouched.
    ///
    /// A missing store is created, so the first registration bootstraps it.
    pub fn register(&self, username: &str, credential: &str) -> Result<User> {
        let users = self.load()?.unwrap_or_default();
        if users.exists(username) {
            return Err(Error::DuplicateUser(username.to_string()));
        }

        let user = User {
            username: username.to_string(),
            credential: credential.to_string(),
        };
        self.storage
            .append_line(&self.storage.users_file(), &record::encode_user(&user))?;
        tracing::info!(username, "user registered");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn setup_directory() -> (tempfile::TempDir, UserDirectory) {
        let dir = tempdir().expect("tempdir");
        let users = UserDirectory::new(Storage::for_dir(dir.path().to_path_buf()));
        (dir, users)
    }

    #[test]
    fn missing_store_is_none() {
        let (_dir, users) = setup_directory();
        assert!(users.load().expect("load").is_none());

        let err = users.require().expect_err("missing");
        assert!(matches!(err, Error::StoreUnavailable { .. }));
    }

    #[test]
    fn register_then_query() {
        let (_dir, users) = setup_directory();
        users.register("admin", "adm1n").expect("admin");
        users.register("bob", "secret").expect("bob");

        assert!(users.exists("bob").expect("exists"));
        assert!(!users.exists("amy").expect("exists"));
        assert!(users.check("bob", "secret").expect("check"));
        assert!(!users.check("bob", "Secret").expect("check"));

        let loaded = users.require().expect("load");
        let names: Vec<&str> = loaded.usernames().collect();
        assert_eq!(names, vec!["admin", "bob"]);
    }

    #[test]
    fn duplicate_registration_leaves_store_unchanged() {
        let (_dir, users) = setup_directory();
        users.register("bob", "secret").expect("bob");
        let path = users.storage().users_file();
        let before = fs::read_to_string(&path).expect("read");

        let err = users.register("bob", "other").expect_err("duplicate");
        assert!(matches!(err, Error::DuplicateUser(name) if name == "bob"));
        assert_eq!(fs::read_to_string(&path).expect("read"), before);
    }

    #[test]
    fn authenticate_distinguishes_failures() {
        let (_dir, users) = setup_directory();
        users.register("bob", "secret").expect("bob");

        users.authenticate("bob", "secret").expect("accepted");
        assert!(matches!(
            users.authenticate("amy", "secret"),
            Err(Error::UnknownUser(_))
        ));
        assert!(matches!(
            users.authenticate("bob", "nope"),
            Err(Error::InvalidCredential(_))
        ));
    }

    #[test]
    fn repeated_username_keeps_first_position() {
        let users = Users::from_records(vec![
            User {
                username: "bob".to_string(),
                credential: "one".to_string(),
            },
            User {
                username: "amy".to_string(),
                credential: "x".to_string(),
            },
            User {
                username: "bob".to_string(),
                credential: "two".to_string(),
            },
        ]);
        assert_eq!(users.len(), 2);
        assert_eq!(users.usernames().collect::<Vec<_>>(), vec!["bob", "amy"]);
        assert!(users.check("bob", "two"));
    }

    #[test]
    fn malformed_user_record_fails_load() {
        let (_dir, users) = setup_directory();
        fs::write(users.storage().users_file(), "admin, pw\nbroken").expect("write");
        let err = users.load().expect_err("malformed");
        assert!(matches!(err, Error::MalformedRecord { line: 2, .. }));
    }
}
