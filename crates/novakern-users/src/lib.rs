//! User and group directory.
//!
//! The full user-management subsystem (persistence, authentication flows)
//! lives outside the kernel core. This crate is the narrow seam the shell
//! needs: who is the current user, and do they hold a given group. Strict
//! commands check membership in [`ADMINISTRATOR_GROUP`] before executing.

use std::collections::{BTreeMap, BTreeSet};

use novakern_types::{KernelError, Result};

/// Group that gates strict (privileged) commands.
pub const ADMINISTRATOR_GROUP: &str = "Administrator";

/// One known user and their group memberships.
#[derive(Debug, Clone)]
pub struct User {
    name: String,
    groups: BTreeSet<String>,
}

impl User {
    /// The login name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Groups the user belongs to, sorted.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(String::as_str)
    }

    /// Whether the user belongs to `group`.
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }
}

/// Directory of known users with one designated current user.
pub struct UserDirectory {
    users: BTreeMap<String, User>,
    current: String,
}

impl UserDirectory {
    /// Create a directory containing only `current_user`, with no groups.
    pub fn new(current_user: &str) -> Self {
        let mut users = BTreeMap::new();
        users.insert(
            current_user.to_string(),
            User {
                name: current_user.to_string(),
                groups: BTreeSet::new(),
            },
        );
        Self {
            users,
            current: current_user.to_string(),
        }
    }

    /// Add a user. Re-adding an existing name is a no-op.
    pub fn add_user(&mut self, name: &str) {
        self.users.entry(name.to_string()).or_insert_with(|| User {
            name: name.to_string(),
            groups: BTreeSet::new(),
        });
    }

    /// Put a user into a group.
    pub fn add_to_group(&mut self, name: &str, group: &str) -> Result<()> {
        let user = self
            .users
            .get_mut(name)
            .ok_or_else(|| KernelError::NoSuchUser(name.to_string()))?;
        if user.groups.insert(group.to_string()) {
            log::debug!("user {name} added to group {group}");
        }
        Ok(())
    }

    /// Remove a user from a group.
    pub fn remove_from_group(&mut self, name: &str, group: &str) -> Result<()> {
        let user = self
            .users
            .get_mut(name)
            .ok_or_else(|| KernelError::NoSuchUser(name.to_string()))?;
        user.groups.remove(group);
        Ok(())
    }

    /// Switch the current user.
    pub fn set_current(&mut self, name: &str) -> Result<()> {
        if !self.users.contains_key(name) {
            return Err(KernelError::NoSuchUser(name.to_string()));
        }
        self.current = name.to_string();
        Ok(())
    }

    /// The currently signed-in user.
    pub fn current(&self) -> &User {
        // The constructor guarantees the current user exists and
        // set_current refuses unknown names.
        &self.users[&self.current]
    }

    /// Whether the current user holds the Administrator group.
    pub fn current_is_administrator(&self) -> bool {
        self.current().in_group(ADMINISTRATOR_GROUP)
    }

    /// All known users, sorted by name.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    /// Look up one user by name.
    pub fn user(&self, name: &str) -> Option<&User> {
        self.users.get(name)
    }
}
