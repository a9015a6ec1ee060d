use rusqlite::types::ToSql;
use rusqlite::{Connection, OptionalExtension, Row, params_from_iter};
use std::fmt;

/// Column assignments for a partial `UPDATE`.
///
/// Only the columns that were set end up in the statement, which keeps
/// "change what was sent" updates to a single round trip.
///
/// ```rust
/// use autoims_database::Changes;
///
/// let changes = Changes::new().set_opt("name", Some("Ada".to_owned())).set_opt("phone", None::<String>);
/// assert_eq!(changes.columns(), vec!["name"]);
/// ```
#[derive(Default)]
pub struct Changes {
    values: Vec<(&'static str, Box<dyn ToSql + Send>)>,
}

impl fmt::Debug for Changes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Changes").field("columns", &self.columns()).finish()
    }
}

impl Changes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn set(mut self, column: &'static str, value: impl ToSql + Send + 'static) -> Self {
        self.values.push((column, Box::new(value)));
        self
    }

    /// Sets `column` only when a value is present.
    #[must_use]
    pub fn set_opt<T: ToSql + Send + 'static>(self, column: &'static str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.set(column, value),
            None => self,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn columns(&self) -> Vec<&'static str> {
        self.values.iter().map(|(column, _)| *column).collect()
    }

    /// Runs `UPDATE table SET .. WHERE key = id RETURNING *` and maps the row.
    ///
    /// `table` and `key` must be trusted identifiers. Returns `None` when no
    /// row matched; an empty change set touches nothing and also returns `None`.
    ///
    /// # Errors
    ///
    /// Any SQLite failure, constraint violations included.
    pub fn apply<T, F>(
        &self,
        conn: &Connection,
        table: &str,
        key: &str,
        id: i64,
        map: F,
    ) -> rusqlite::Result<Option<T>>
    where
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        if self.is_empty() {
            return Ok(None);
        }
        let assignments = self
            .values
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{column} = ?{}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {table} SET {assignments} WHERE {key} = ?{} RETURNING *",
            self.values.len() + 1
        );

        let params = self
            .values
            .iter()
            .map(|(_, value)| value.as_ref() as &dyn ToSql)
            .chain(std::iter::once(&id as &dyn ToSql));
        conn.query_row(&sql, params_from_iter(params), map).optional()
    }
}
