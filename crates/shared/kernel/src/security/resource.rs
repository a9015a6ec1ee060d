use autoims_database::DatabaseError;
use autoims_domain::constants;
use rusqlite::{Connection, OptionalExtension};
use std::borrow::Cow;

#[autoims_derive::autoims_error]
pub enum ResourceGuardError {
    #[error("Unknown resource '{name}'")]
    UnknownEntity { name: String },

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("Resource lookup failed{}: {source}", format_context(.context))]
    Database { source: DatabaseError, context: Option<Cow<'static, str>> },
}

/// Every table a request may reference by primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    User,
    Customer,
    Vehicle,
    ServiceRequest,
    Employee,
    InventoryItem,
    ServiceJob,
    JobPart,
    Bill,
}

impl Entity {
    pub const ALL: &'static [Self] = &[
        Self::User,
        Self::Customer,
        Self::Vehicle,
        Self::ServiceRequest,
        Self::Employee,
        Self::InventoryItem,
        Self::ServiceJob,
        Self::JobPart,
        Self::Bill,
    ];

    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::User => constants::USERS,
            Self::Customer => constants::CUSTOMERS,
            Self::Vehicle => constants::VEHICLES,
            Self::ServiceRequest => constants::SERVICE_REQUESTS,
            Self::Employee => constants::EMPLOYEES,
            Self::InventoryItem => constants::INVENTORY,
            Self::ServiceJob => constants::SERVICE_JOBS,
            Self::JobPart => constants::JOB_PARTS_USED,
            Self::Bill => constants::BILLING,
        }
    }

    /// Primary key column.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::User => "user_id",
            Self::Customer => "customer_id",
            Self::Vehicle => "vehicle_id",
            Self::ServiceRequest => "request_id",
            Self::Employee => "id",
            Self::InventoryItem => "part_id",
            Self::ServiceJob => "job_id",
            Self::JobPart => "job_part_id",
            Self::Bill => "bill_id",
        }
    }

    /// Name used in "<label> not found" answers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Customer => "Customer",
            Self::Vehicle => "Vehicle",
            Self::ServiceRequest => "Service request",
            Self::Employee => "Employee",
            Self::InventoryItem => "Item",
            Self::ServiceJob => "Job",
            Self::JobPart => "Part usage record",
            Self::Bill => "Bill",
        }
    }
}

/// Existence checks against the fixed table registry.
///
/// Table and column names never come from the request; callers resolve a
/// name to an [`Entity`] first, so only known identifiers reach the SQL.
#[derive(Debug)]
pub struct ResourceGuard;

impl ResourceGuard {
    /// Resolves a table name to its [`Entity`].
    ///
    /// # Errors
    ///
    /// [`ResourceGuardError::UnknownEntity`] for anything outside the registry.
    pub fn verify(name: impl AsRef<str>) -> Result<Entity, ResourceGuardError> {
        let name = name.as_ref();
        Entity::ALL
            .iter()
            .copied()
            .find(|entity| entity.table() == name)
            .ok_or_else(|| ResourceGuardError::UnknownEntity { name: name.to_owned() })
    }

    /// # Errors
    ///
    /// Propagates SQLite failures.
    pub fn exists(conn: &Connection, entity: Entity, id: i64) -> Result<bool, DatabaseError> {
        let sql = format!("SELECT 1 FROM {} WHERE {} = ?1", entity.table(), entity.key());
        let found = conn
            .query_row(&sql, [id], |_| Ok(()))
            .optional()
            .map_err(|source| DatabaseError::Sqlite {
                source,
                context: Some(format!("Checking {} {id}", entity.table()).into()),
            })?;
        Ok(found.is_some())
    }

    /// Like [`Self::exists`] but fails with [`ResourceGuardError::NotFound`].
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing row, `Database` when the lookup fails.
    pub fn require(conn: &Connection, entity: Entity, id: i64) -> Result<(), ResourceGuardError> {
        if Self::exists(conn, entity, id)? {
            Ok(())
        } else {
            Err(ResourceGuardError::NotFound { entity: entity.label() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_resolves_known_tables_only() {
        assert_eq!(ResourceGuard::verify("customers").ok(), Some(Entity::Customer));
        assert_eq!(ResourceGuard::verify("job_parts_used").ok(), Some(Entity::JobPart));
        assert!(ResourceGuard::verify("customers; DROP TABLE users").is_err());
        assert!(ResourceGuard::verify("sqlite_master").is_err());
    }

    #[test]
    fn labels_feed_not_found_messages() {
        let err = ResourceGuardError::NotFound { entity: Entity::ServiceRequest.label() };
        assert_eq!(err.to_string(), "Service request not found");
    }
}
