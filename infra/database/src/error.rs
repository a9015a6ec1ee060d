use std::borrow::Cow;

/// Errors of the storage layer.
#[autoims_derive::autoims_error]
pub enum DatabaseError {
    #[error("Validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The database file could not be opened or configured.
    #[error("Database connection failed{}: {message}", format_context(.context))]
    Connection { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("SQLite error{}: {source}", format_context(.context))]
    Sqlite {
        #[source]
        source: rusqlite::Error,
        context: Option<Cow<'static, str>>,
    },

    /// A migration failed or an applied one was edited afterwards.
    #[error("Migration error{}: {message}", format_context(.context))]
    Migration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal database error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl DatabaseError {
    /// `true` when a UNIQUE or PRIMARY KEY constraint rejected the statement.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::Sqlite { source, .. } if source.is_unique_violation())
    }

    #[must_use]
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, Self::Sqlite { source, .. } if source.is_foreign_key_violation())
    }
}

/// Constraint classification straight on [`rusqlite::Error`], for code that
/// works with the connection directly.
pub trait ConstraintViolation {
    fn is_unique_violation(&self) -> bool;
    fn is_foreign_key_violation(&self) -> bool;
}

impl ConstraintViolation for rusqlite::Error {
    fn is_unique_violation(&self) -> bool {
        extended_code(self).is_some_and(|code| {
            code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        })
    }

    fn is_foreign_key_violation(&self) -> bool {
        extended_code(self).is_some_and(|code| code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY)
    }
}

const fn extended_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => Some(failure.extended_code),
        _ => None,
    }
}
