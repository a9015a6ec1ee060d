use crate::error::{IdentityError, IdentityErrorExt};
use crate::model::{NewUser, User};
use crate::password::Passwords;
use autoims_kernel::prelude::ConstraintViolation;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub const USER_COLUMNS: &str = "user_id, name, username, email, created_at";

pub fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        username: row.get("username")?,
        email: row.get("email")?,
        created_at: row.get("created_at")?,
    })
}

pub(crate) fn find_by_id(conn: &Connection, user_id: i64) -> Result<Option<User>, IdentityError> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
        [user_id],
        user_from_row,
    )
    .optional()
    .context("Loading user")
}

fn email_taken(conn: &Connection, email: &str) -> Result<bool, IdentityError> {
    conn.query_row("SELECT 1 FROM users WHERE email = ?1", [email], |_| Ok(()))
        .optional()
        .map(|found| found.is_some())
        .context("Checking email")
}

fn username_taken(conn: &Connection, username: &str) -> Result<bool, IdentityError> {
    conn.query_row("SELECT 1 FROM users WHERE username = ?1", [username], |_| Ok(()))
        .optional()
        .map(|found| found.is_some())
        .context("Checking username")
}

/// Stores a new account after the uniqueness checks, email first.
pub(crate) fn register(
    conn: &Connection,
    passwords: &Passwords,
    user: &NewUser,
) -> Result<User, IdentityError> {
    if email_taken(conn, &user.email)? {
        return Err(IdentityError::EmailTaken);
    }
    if let Some(username) = &user.username
        && username_taken(conn, username)?
    {
        return Err(IdentityError::UsernameTaken);
    }

    let password_hash = passwords.hash(&user.password)?;
    insert(conn, user, &password_hash)
}

/// The UNIQUE constraints back the checks in [`register`]; a violation
/// answers with the same conflict.
fn insert(conn: &Connection, user: &NewUser, password_hash: &str) -> Result<User, IdentityError> {
    conn.query_row(
        &format!(
            "INSERT INTO users (name, username, email, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {USER_COLUMNS}"
        ),
        params![user.name, user.username, user.email, password_hash, Utc::now()],
        user_from_row,
    )
    .or_else(|err| {
        if !err.is_unique_violation() {
            return Err(err).context("Creating user");
        }
        if email_taken(conn, &user.email)? {
            Err(IdentityError::EmailTaken)
        } else {
            Err(IdentityError::UsernameTaken)
        }
    })
}

/// Resolves credentials; unknown email and wrong password look the same.
pub(crate) fn authenticate(
    conn: &Connection,
    passwords: &Passwords,
    email: &str,
    password: &str,
) -> Result<User, IdentityError> {
    let found = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = ?1"),
            [email],
            |row| Ok((user_from_row(row)?, row.get::<_, String>("password_hash")?)),
        )
        .optional()
        .context("Loading credentials")?;

    match found {
        Some((user, hash)) if passwords.verify(password, &hash) => Ok(user),
        _ => Err(IdentityError::InvalidCredentials),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MIGRATIONS;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().expect("memory db");
        for migration in MIGRATIONS {
            conn.execute_batch(migration.script).expect("migrate");
        }
        conn
    }

    fn new_user(email: &str, username: Option<&str>) -> NewUser {
        NewUser {
            name: "Ada".to_owned(),
            username: username.map(ToOwned::to_owned),
            email: email.to_owned(),
            password: "secret1".to_owned(),
        }
    }

    #[test]
    fn register_then_authenticate() {
        let conn = conn();
        let passwords = Passwords::default();
        let user = register(&conn, &passwords, &new_user("ada@garage.test", Some("ada"))).expect("register");
        assert_eq!(user.username.as_deref(), Some("ada"));

        let found = authenticate(&conn, &passwords, "ada@garage.test", "secret1").expect("login");
        assert_eq!(found, user);
        assert_eq!(find_by_id(&conn, user.user_id).expect("lookup"), Some(user));
    }

    #[test]
    fn duplicate_email_wins_over_duplicate_username() {
        let conn = conn();
        let passwords = Passwords::default();
        register(&conn, &passwords, &new_user("ada@garage.test", Some("ada"))).expect("first");

        let err = register(&conn, &passwords, &new_user("ada@garage.test", Some("ada"))).expect_err("dup");
        assert!(matches!(err, IdentityError::EmailTaken));

        let err = register(&conn, &passwords, &new_user("bob@garage.test", Some("ada"))).expect_err("dup");
        assert!(matches!(err, IdentityError::UsernameTaken));
    }

    #[test]
    fn constraint_violations_map_to_conflicts() {
        let conn = conn();
        let passwords = Passwords::default();
        register(&conn, &passwords, &new_user("ada@garage.test", Some("ada"))).expect("first");

        // A signup that passed its checks just before another one committed.
        let err = insert(&conn, &new_user("ada@garage.test", None), "hash").expect_err("email");
        assert!(matches!(err, IdentityError::EmailTaken));

        let err = insert(&conn, &new_user("bob@garage.test", Some("ada")), "hash").expect_err("username");
        assert!(matches!(err, IdentityError::UsernameTaken));
    }

    #[test]
    fn wrong_password_and_unknown_email_are_indistinguishable() {
        let conn = conn();
        let passwords = Passwords::default();
        register(&conn, &passwords, &new_user("ada@garage.test", None)).expect("register");

        let wrong = authenticate(&conn, &passwords, "ada@garage.test", "nope").expect_err("wrong");
        let unknown = authenticate(&conn, &passwords, "who@garage.test", "secret1").expect_err("unknown");
        assert_eq!(wrong.to_string(), unknown.to_string());
    }
}
