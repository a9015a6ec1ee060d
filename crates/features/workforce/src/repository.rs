//! SQL for the `employees` table.

use crate::error::{WorkforceError, WorkforceErrorExt};
use crate::model::{Employee, EmployeePatch, NewEmployee};
use autoims_kernel::prelude::{Changes, ConstraintViolation, EMPLOYEES, WorkingStatus, fetch_all, parse_column};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn employee_from_row(row: &Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get("id")?,
        name: row.get("name")?,
        position: row.get("position")?,
        salary: row.get("salary")?,
        phone: row.get("phone")?,
        email: row.get("email")?,
        working_status: parse_column(row, "working_status")?,
        rating: row.get("rating")?,
        jobs_done: row.get("jobs_done")?,
        created_at: row.get("created_at")?,
    })
}

/// Newest first; inactive employees only on request.
pub(crate) fn list(conn: &Connection, include_inactive: bool) -> Result<Vec<Employee>, WorkforceError> {
    let rows = if include_inactive {
        fetch_all(conn, "SELECT * FROM employees ORDER BY created_at DESC, id DESC", [], employee_from_row)
    } else {
        fetch_all(
            conn,
            "SELECT * FROM employees WHERE working_status = ?1 ORDER BY created_at DESC, id DESC",
            [WorkingStatus::Working.as_str()],
            employee_from_row,
        )
    };
    rows.context("Listing employees")
}

pub(crate) fn get(conn: &Connection, id: i64) -> Result<Employee, WorkforceError> {
    conn.query_row("SELECT * FROM employees WHERE id = ?1", [id], employee_from_row)
        .optional()
        .context("Loading employee")?
        .ok_or(WorkforceError::NotFound)
}

pub(crate) fn create(conn: &Connection, employee: &NewEmployee) -> Result<Employee, WorkforceError> {
    conn.query_row(
        "INSERT INTO employees
            (name, position, salary, phone, email, working_status, rating, jobs_done, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) RETURNING *",
        params![
            employee.name,
            employee.position,
            employee.salary,
            employee.phone,
            employee.email,
            employee.working_status.as_str(),
            employee.rating,
            employee.jobs_done,
            Utc::now()
        ],
        employee_from_row,
    )
    .map_err(|err| conflict_or(err, "Creating employee"))
}

pub(crate) fn update(conn: &Connection, id: i64, patch: EmployeePatch) -> Result<Employee, WorkforceError> {
    let changes = Changes::new()
        .set_opt("name", patch.name)
        .set_opt("position", patch.position)
        .set_opt("salary", patch.salary)
        .set_opt("phone", patch.phone)
        .set_opt("email", patch.email)
        .set_opt("working_status", patch.working_status.map(WorkingStatus::as_str))
        .set_opt("rating", patch.rating)
        .set_opt("jobs_done", patch.jobs_done);
    if changes.is_empty() {
        return get(conn, id);
    }

    changes
        .apply(conn, EMPLOYEES, "id", id, employee_from_row)
        .map_err(|err| conflict_or(err, "Updating employee"))?
        .ok_or(WorkforceError::NotFound)
}

/// Employees stay on record for their past jobs; removal only stops them working.
pub(crate) fn deactivate(conn: &Connection, id: i64) -> Result<Employee, WorkforceError> {
    conn.query_row(
        "UPDATE employees SET working_status = ?1 WHERE id = ?2 RETURNING *",
        params![WorkingStatus::NotWorking.as_str(), id],
        employee_from_row,
    )
    .optional()
    .context("Deactivating employee")?
    .ok_or(WorkforceError::NotFound)
}

fn conflict_or(err: rusqlite::Error, context: &'static str) -> WorkforceError {
    if err.is_unique_violation() {
        WorkforceError::Duplicate
    } else {
        WorkforceError::Sqlite { source: err, context: Some(context.into()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().expect("memory db");
        for migration in crate::MIGRATIONS {
            conn.execute_batch(migration.script).expect("migrate");
        }
        conn
    }

    fn hire(name: &str, phone: Option<&str>) -> NewEmployee {
        NewEmployee {
            name: name.to_owned(),
            position: "Mechanic".to_owned(),
            salary: 42_000.0,
            phone: phone.map(ToOwned::to_owned),
            email: None,
            working_status: WorkingStatus::Working,
            rating: 4.5,
            jobs_done: 0,
        }
    }

    #[test]
    fn deactivated_employees_leave_the_default_list() {
        let conn = conn();
        let ann = create(&conn, &hire("Ann", Some("555-1"))).expect("ann");
        create(&conn, &hire("Ben", None)).expect("ben");

        let gone = deactivate(&conn, ann.id).expect("deactivate");
        assert_eq!(gone.working_status, WorkingStatus::NotWorking);

        let names = |list: Vec<Employee>| list.into_iter().map(|e| e.name).collect::<Vec<_>>();
        assert_eq!(names(list(&conn, false).expect("active")), ["Ben"]);
        assert_eq!(names(list(&conn, true).expect("all")), ["Ben", "Ann"]);
        assert!(matches!(deactivate(&conn, 99), Err(WorkforceError::NotFound)));
    }

    #[test]
    fn phones_are_unique_but_optional() {
        let conn = conn();
        create(&conn, &hire("Ann", Some("555-1"))).expect("ann");
        create(&conn, &hire("Ben", None)).expect("no phone");
        create(&conn, &hire("Cid", None)).expect("no phone either");

        assert!(matches!(create(&conn, &hire("Dee", Some("555-1"))), Err(WorkforceError::Duplicate)));
    }

    #[test]
    fn partial_update() {
        let conn = conn();
        let ann = create(&conn, &hire("Ann", None)).expect("ann");

        let patch = EmployeePatch { jobs_done: Some(3), rating: Some(4.9), ..Default::default() };
        let updated = update(&conn, ann.id, patch).expect("update");
        assert_eq!(updated.jobs_done, 3);
        assert_eq!(updated.name, "Ann");

        let patch = EmployeePatch { name: Some("X".into()), ..Default::default() };
        assert!(matches!(update(&conn, 99, patch), Err(WorkforceError::NotFound)));
    }
}
