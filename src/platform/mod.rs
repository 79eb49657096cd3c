//! Access to the data platform
//!
//! Everything datactl changes goes through the [`Platform`] trait. The
//! shipped implementation keeps its state in a local JSON file.

pub mod local;

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use local::LocalPlatform;

/// A platform user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub is_superuser: bool,
    /// Passwords are never kept, only whether one was given
    pub password_set: bool,
    pub created: DateTime<Utc>,
}

/// A group of users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub members: BTreeSet<String>,
    pub created: DateTime<Utc>,
}

/// Operations the platform offers
pub trait Platform {
    fn add_user(&mut self, username: &str, is_superuser: bool, password: Option<&str>)
        -> Result<User>;

    /// Delete a user, removing it from every group.
    fn delete_user(&mut self, username: &str) -> Result<()>;

    fn users(&self) -> Result<Vec<User>>;

    fn add_group(&mut self, name: &str) -> Result<Group>;

    fn delete_group(&mut self, name: &str) -> Result<()>;

    fn groups(&self) -> Result<Vec<Group>>;

    fn add_member(&mut self, group: &str, username: &str) -> Result<()>;

    fn remove_member(&mut self, group: &str, username: &str) -> Result<()>;
}
