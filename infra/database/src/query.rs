use rusqlite::types::Type;
use rusqlite::{Connection, Params, Row};
use std::error::Error;
use std::str::FromStr;

/// Runs a cached statement and collects every mapped row.
///
/// # Errors
///
/// Preparation, binding or mapping failures.
pub fn fetch_all<T, P, F>(conn: &Connection, sql: &str, params: P, map: F) -> rusqlite::Result<Vec<T>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare_cached(sql)?;
    stmt.query_map(params, map)?.collect()
}

/// Reads a text column through `FromStr`, e.g. a status enum.
///
/// # Errors
///
/// A missing column, a non-text value, or text `T` rejects.
pub fn parse_column<T>(row: &Row<'_>, column: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: Error + Send + Sync + 'static,
{
    let index = row.as_ref().column_index(column)?;
    let text: String = row.get(index)?;
    text.parse().map_err(|err| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err)))
}
