//! Durable first-contact user records.
//!
//! The directory is an explicitly owned value passed into and returned from
//! store operations; the store itself only knows how to load and persist it.
//! Callers that process commands concurrently must serialise
//! read-modify-write + persist behind a single lock.

use std::{collections::BTreeMap, fs, path::PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{domain::Sender, errors::Error, Result};

/// A person who has ever issued `/start`. Created once, never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    /// RFC 3339 capture time, immutable once set.
    pub joined_at: String,
}

/// Full collection of records, keyed by the platform user id in string form.
pub type UserDirectory = BTreeMap<String, UserRecord>;

/// Adds a record for `user_id` unless one already exists.
///
/// Returns the (possibly updated) directory and whether a record was added.
/// An existing record is never overwritten.
pub fn record_if_absent(mut dir: UserDirectory, sender: &Sender) -> (UserDirectory, bool) {
    let key = sender.user_id.0.to_string();
    if dir.contains_key(&key) {
        return (dir, false);
    }

    dir.insert(
        key,
        UserRecord {
            username: sender.username.clone(),
            first_name: sender.first_name.clone(),
            last_name: sender.last_name.clone(),
            joined_at: Utc::now().to_rfc3339(),
        },
    );
    (dir, true)
}

/// File-backed store for the user directory.
#[derive(Clone, Debug)]
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Reads the directory from disk. A missing file yields an empty
    /// directory; an unparseable file is a hard error so corruption is
    /// never silently discarded.
    pub fn load(&self) -> Result<UserDirectory> {
        if !self.path.exists() {
            return Ok(UserDirectory::new());
        }

        let txt = fs::read_to_string(&self.path).map_err(|e| Error::StorageCorrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&txt).map_err(|e| Error::StorageCorrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Writes the whole directory. Goes through a sibling temp file and a
    /// rename so a crash mid-write cannot leave an unparseable file behind.
    pub fn persist(&self, dir: &UserDirectory) -> Result<()> {
        let txt = serde_json::to_string_pretty(dir)?;

        let tmp = self.path.with_extension("json.tmp");
        let write_err = |e: std::io::Error| Error::StorageWrite {
            path: self.path.clone(),
            reason: e.to_string(),
        };

        fs::write(&tmp, txt).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;
        Ok(())
    }
}
