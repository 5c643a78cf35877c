use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A built-in or custom role granted on one database.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleGrant {
    pub role: String,
    pub db: String,
}

impl RoleGrant {
    pub fn read_write(db: &str) -> Self {
        Self { role: "readWrite".to_string(), db: db.to_string() }
    }

    pub fn to_document(&self) -> Document {
        doc! { "role": &self.role, "db": &self.db }
    }
}

impl fmt::Display for RoleGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.role, self.db)
    }
}

/// Application credential to create.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSpec {
    pub username: String,
    pub password: String,
    /// Database the user is defined in (its authentication source).
    pub database: String,
    pub roles: Vec<RoleGrant>,
}

impl fmt::Debug for UserSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserSpec")
            .field("username", &self.username)
            .field("password", &"***")
            .field("database", &self.database)
            .field("roles", &self.roles)
            .finish()
    }
}

impl UserSpec {
    pub fn create_user_command(&self) -> Document {
        let roles = self.roles.iter().map(RoleGrant::to_document).collect::<Vec<_>>();
        doc! { "createUser": &self.username, "pwd": &self.password, "roles": roles }
    }
}

/// A user as reported by `usersInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    #[serde(rename = "user")]
    pub username: String,
    #[serde(rename = "db")]
    pub database: String,
    #[serde(default)]
    pub roles: Vec<RoleGrant>,
}

impl UserInfo {
    /// Role sets are compared without regard to order or duplicates.
    pub fn has_exactly_roles(&self, roles: &[RoleGrant]) -> bool {
        self.roles.iter().collect::<BTreeSet<_>>() == roles.iter().collect::<BTreeSet<_>>()
    }

    pub fn describe_roles(&self) -> String {
        describe_roles(&self.roles)
    }
}

pub fn describe_roles(roles: &[RoleGrant]) -> String {
    let roles = roles.iter().map(|r| r.to_string()).collect::<Vec<_>>();
    format!("[{}]", roles.join(", "))
}
