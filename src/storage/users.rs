// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository backed by redb.
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized UserAggregate (JSON bytes)
//!
//! The identity authority is the system of record; this table is the
//! local mutate-by-proxy view that session resolution and profile
//! updates operate on.

use std::path::Path;

use redb::{Database, ReadableDatabase, TableDefinition};

use super::StorageResult;
use crate::models::UserAggregate;

/// Primary table: user_id → serialized UserAggregate (JSON bytes).
const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Repository over the local user view.
pub struct UserRepository {
    db: Database,
}

impl UserRepository {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create the table so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Look up a user by id.
    pub fn get(&self, user_id: &str) -> StorageResult<Option<UserAggregate>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(user_id)? {
            Some(value) => {
                let user: UserAggregate = serde_json::from_slice(value.value())?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Insert or replace a user record.
    pub fn put(&self, user: &UserAggregate) -> StorageResult<()> {
        let json = serde_json::to_vec(user)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(USERS)?;
            table.insert(user.id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Remove a user record. Returns whether a record existed.
    pub fn remove(&self, user_id: &str) -> StorageResult<bool> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(USERS)?;
            let existed = table.remove(user_id)?.is_some();
            existed
        };
        write_txn.commit()?;
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_repo() -> (UserRepository, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let repo = UserRepository::open(&dir.path().join("users.redb")).expect("open repo");
        (repo, dir)
    }

    fn test_user(id: &str) -> UserAggregate {
        UserAggregate {
            id: id.to_string(),
            fid: 1001,
            username: Some("alice".to_string()),
            display_name: Some("Alice".to_string()),
            avatar_url: None,
        }
    }

    #[test]
    fn put_then_get_round_trips() {
        let (repo, _dir) = test_repo();
        let user = test_user("user-1");

        repo.put(&user).unwrap();
        let loaded = repo.get("user-1").unwrap().unwrap();
        assert_eq!(loaded, user);
    }

    #[test]
    fn get_missing_returns_none() {
        let (repo, _dir) = test_repo();
        assert!(repo.get("nobody").unwrap().is_none());
    }

    #[test]
    fn put_replaces_existing_record() {
        let (repo, _dir) = test_repo();
        let mut user = test_user("user-1");
        repo.put(&user).unwrap();

        user.display_name = None;
        user.avatar_url = Some("https://blob.example.com/a.png".to_string());
        repo.put(&user).unwrap();

        let loaded = repo.get("user-1").unwrap().unwrap();
        assert_eq!(loaded.display_name, None);
        assert_eq!(
            loaded.avatar_url,
            Some("https://blob.example.com/a.png".to_string())
        );
    }

    #[test]
    fn remove_reports_existence() {
        let (repo, _dir) = test_repo();
        repo.put(&test_user("user-1")).unwrap();

        assert!(repo.remove("user-1").unwrap());
        assert!(!repo.remove("user-1").unwrap());
        assert!(repo.get("user-1").unwrap().is_none());
    }
}
