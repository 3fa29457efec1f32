//! Connection definitions referenced by step metadata
//!
//! Steps never embed a connection. They store the connection's name and
//! resolve it against the shared list of connections when loaded.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Named database connection definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseMeta {
    /// Object id of the shared definition
    pub object_id: Uuid,
    /// Connection name, the identity used by references
    pub name: String,
    /// Database plugin id (e.g., "ORACLE", "POSTGRESQL")
    pub database_type: String,
    /// Access type (e.g., "Native", "JNDI")
    pub access_type: String,
    pub host_name: String,
    pub database_name: String,
    pub port: String,
    pub username: String,
}

impl DatabaseMeta {
    /// Create a native connection definition with a fresh object id
    ///
    /// # Example
    ///
    /// ```rust
    /// use step_metadata_sdk::models::DatabaseMeta;
    ///
    /// let db = DatabaseMeta::new("warehouse", "ORACLE", "dbhost", "ORCL", "1521", "scott");
    /// assert_eq!(db.access_type, "Native");
    /// ```
    pub fn new(
        name: impl Into<String>,
        database_type: impl Into<String>,
        host_name: impl Into<String>,
        database_name: impl Into<String>,
        port: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            object_id: Uuid::new_v4(),
            name: name.into(),
            database_type: database_type.into(),
            access_type: "Native".to_string(),
            host_name: host_name.into(),
            database_name: database_name.into(),
            port: port.into(),
            username: username.into(),
        }
    }

    /// Connection name
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Find a connection by name, ignoring case
pub fn find_database<'a>(databases: &'a [DatabaseMeta], name: &str) -> Option<&'a DatabaseMeta> {
    if name.is_empty() {
        return None;
    }
    databases
        .iter()
        .find(|db| db.name.eq_ignore_ascii_case(name))
}
