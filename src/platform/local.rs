//! Platform state kept in a local JSON file

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DatactlError, Result};
use crate::platform::{Group, Platform, User};

#[derive(Debug, Default, Serialize, Deserialize)]
struct State {
    #[serde(default)]
    users: BTreeMap<String, User>,
    #[serde(default)]
    groups: BTreeMap<String, Group>,
}

/// A platform whose state lives in a JSON file, written after every change
#[derive(Debug, Default)]
pub struct LocalPlatform {
    path: Option<PathBuf>,
    state: State,
}

impl LocalPlatform {
    /// Open the state file at `path`; a missing file is an empty platform.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            State::default()
        };
        debug!("Loaded platform state from {}", path.display());
        Ok(Self {
            path: Some(path),
            state,
        })
    }

    /// A platform that never touches the disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(&self.state)?)?;
        Ok(())
    }

    fn group_mut(&mut self, name: &str) -> Result<&mut Group> {
        self.state
            .groups
            .get_mut(name)
            .ok_or_else(|| DatactlError::NotFound(format!("group '{}'", name)))
    }
}

fn require_name(kind: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DatactlError::execution(format!("{} name cannot be empty", kind)));
    }
    Ok(())
}

impl Platform for LocalPlatform {
    fn add_user(
        &mut self,
        username: &str,
        is_superuser: bool,
        password: Option<&str>,
    ) -> Result<User> {
        require_name("user", username)?;
        if self.state.users.contains_key(username) {
            return Err(DatactlError::AlreadyExists(format!("user '{}'", username)));
        }
        let user = User {
            username: username.to_string(),
            is_superuser,
            password_set: password.is_some_and(|p| !p.is_empty()),
            created: Utc::now(),
        };
        self.state.users.insert(username.to_string(), user.clone());
        self.save()?;
        Ok(user)
    }

    fn delete_user(&mut self, username: &str) -> Result<()> {
        if self.state.users.remove(username).is_none() {
            return Err(DatactlError::NotFound(format!("user '{}'", username)));
        }
        for group in self.state.groups.values_mut() {
            group.members.remove(username);
        }
        self.save()
    }

    fn users(&self) -> Result<Vec<User>> {
        Ok(self.state.users.values().cloned().collect())
    }

    fn add_group(&mut self, name: &str) -> Result<Group> {
        require_name("group", name)?;
        if self.state.groups.contains_key(name) {
            return Err(DatactlError::AlreadyExists(format!("group '{}'", name)));
        }
        let group = Group {
            name: name.to_string(),
            members: BTreeSet::new(),
            created: Utc::now(),
        };
        self.state.groups.insert(name.to_string(), group.clone());
        self.save()?;
        Ok(group)
    }

    fn delete_group(&mut self, name: &str) -> Result<()> {
        if self.state.groups.remove(name).is_none() {
            return Err(DatactlError::NotFound(format!("group '{}'", name)));
        }
        self.save()
    }

    fn groups(&self) -> Result<Vec<Group>> {
        Ok(self.state.groups.values().cloned().collect())
    }

    fn add_member(&mut self, group: &str, username: &str) -> Result<()> {
        if !self.state.users.contains_key(username) {
            return Err(DatactlError::NotFound(format!("user '{}'", username)));
        }
        let entry = self.group_mut(group)?;
        if !entry.members.insert(username.to_string()) {
            return Err(DatactlError::AlreadyExists(format!(
                "'{}' is already a member of '{}'",
                username, group
            )));
        }
        self.save()
    }

    fn remove_member(&mut self, group: &str, username: &str) -> Result<()> {
        let entry = self.group_mut(group)?;
        if !entry.members.remove(username) {
            return Err(DatactlError::NotFound(format!(
                "'{}' is not a member of '{}'",
                username, group
            )));
        }
        self.save()
    }
}
