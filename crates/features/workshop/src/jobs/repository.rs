//! SQL for the `service_jobs` table.

use super::model::{JobDetails, NewJob, ServiceJob};
use crate::error::{WorkshopError, WorkshopErrorExt};
use autoims_kernel::prelude::{Entity, JobStatus, ResourceGuard, fetch_all, parse_column};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};

const DETAILS: &str = "SELECT sj.*, sr.service_type, sr.status AS request_status,
            v.plate_no, v.brand, v.model, e.name AS employee_name
     FROM service_jobs sj
     LEFT JOIN service_requests sr ON sj.request_id = sr.request_id
     LEFT JOIN vehicles v ON sr.vehicle_id = v.vehicle_id
     LEFT JOIN employees e ON sj.assigned_employee = e.id";

pub fn job_from_row(row: &Row<'_>) -> rusqlite::Result<ServiceJob> {
    Ok(ServiceJob {
        job_id: row.get("job_id")?,
        request_id: row.get("request_id")?,
        assigned_employee: row.get("assigned_employee")?,
        job_status: parse_column(row, "job_status")?,
        labor_cost: row.get("labor_cost")?,
        start_time: row.get("start_time")?,
        end_time: row.get("end_time")?,
        notes: row.get("notes")?,
    })
}

pub fn details_from_row(row: &Row<'_>) -> rusqlite::Result<JobDetails> {
    Ok(JobDetails {
        job: job_from_row(row)?,
        service_type: row.get("service_type")?,
        request_status: row.get("request_status")?,
        plate_no: row.get("plate_no")?,
        brand: row.get("brand")?,
        model: row.get("model")?,
        employee_name: row.get("employee_name")?,
    })
}

/// Latest started first.
pub fn list(conn: &Connection, request_id: Option<i64>) -> Result<Vec<JobDetails>, WorkshopError> {
    let rows = match request_id {
        Some(request_id) => fetch_all(
            conn,
            &format!("{DETAILS} WHERE sj.request_id = ?1 ORDER BY sj.start_time DESC, sj.job_id DESC"),
            [request_id],
            details_from_row,
        ),
        None => fetch_all(conn, &format!("{DETAILS} ORDER BY sj.start_time DESC, sj.job_id DESC"), [], details_from_row),
    };
    rows.context("Listing service jobs")
}

pub(crate) fn get(conn: &Connection, job_id: i64) -> Result<JobDetails, WorkshopError> {
    conn.query_row(&format!("{DETAILS} WHERE sj.job_id = ?1"), [job_id], details_from_row)
        .optional()
        .context("Loading service job")?
        .ok_or(WorkshopError::JobNotFound)
}

pub(crate) fn ensure_job(conn: &Connection, job_id: i64) -> Result<(), WorkshopError> {
    if ResourceGuard::exists(conn, Entity::ServiceJob, job_id)? { Ok(()) } else { Err(WorkshopError::JobNotFound) }
}

/// The request must exist, and so must the employee when one is assigned.
pub(crate) fn create(conn: &Connection, job: &NewJob) -> Result<JobDetails, WorkshopError> {
    if !ResourceGuard::exists(conn, Entity::ServiceRequest, job.request_id)? {
        return Err(WorkshopError::RequestNotFound);
    }
    if let Some(employee) = job.assigned_employee
        && !ResourceGuard::exists(conn, Entity::Employee, employee)?
    {
        return Err(WorkshopError::EmployeeNotFound);
    }

    let job_id: i64 = conn
        .query_row(
            "INSERT INTO service_jobs (request_id, assigned_employee, job_status, labor_cost, notes)
             VALUES (?1, ?2, ?3, ?4, ?5) RETURNING job_id",
            params![job.request_id, job.assigned_employee, JobStatus::Pending.as_str(), job.labor_cost, job.notes],
            |row| row.get(0),
        )
        .context("Creating service job")?;
    get(conn, job_id)
}

pub(crate) fn set_status(conn: &Connection, job_id: i64, status: JobStatus) -> Result<JobDetails, WorkshopError> {
    let job = conn
        .query_row("SELECT * FROM service_jobs WHERE job_id = ?1", [job_id], job_from_row)
        .optional()
        .context("Loading service job")?
        .ok_or(WorkshopError::JobNotFound)?;

    let (start_time, end_time) = job.stamps_for(status, Utc::now());
    conn.execute(
        "UPDATE service_jobs SET job_status = ?1, start_time = ?2, end_time = ?3 WHERE job_id = ?4",
        params![status.as_str(), start_time, end_time, job_id],
    )
    .context("Updating job status")?;
    get(conn, job_id)
}
