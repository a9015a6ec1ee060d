//! SQL for the `billing` table. One bill per job.

use super::model::{Bill, BillDetails, NewBill};
use crate::error::{WorkshopError, WorkshopErrorExt};
use crate::jobs::repository::job_from_row;
use crate::parts::repository::total_cost;
use autoims_kernel::prelude::{ConstraintViolation, PaymentStatus, fetch_all, parse_column};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Row, params};

const DETAILS: &str = "SELECT b.*, sj.job_status, sr.service_type, v.plate_no, c.name AS customer_name
     FROM billing b
     LEFT JOIN service_jobs sj ON b.job_id = sj.job_id
     LEFT JOIN service_requests sr ON sj.request_id = sr.request_id
     LEFT JOIN vehicles v ON sr.vehicle_id = v.vehicle_id
     LEFT JOIN customers c ON v.customer_id = c.customer_id";

pub fn bill_from_row(row: &Row<'_>) -> rusqlite::Result<Bill> {
    Ok(Bill {
        bill_id: row.get("bill_id")?,
        job_id: row.get("job_id")?,
        labor_cost: row.get("labor_cost")?,
        parts_cost: row.get("parts_cost")?,
        total_amount: row.get("total_amount")?,
        payment_status: parse_column(row, "payment_status")?,
        bill_date: row.get("bill_date")?,
    })
}

pub fn details_from_row(row: &Row<'_>) -> rusqlite::Result<BillDetails> {
    Ok(BillDetails {
        bill: bill_from_row(row)?,
        job_status: row.get("job_status")?,
        service_type: row.get("service_type")?,
        plate_no: row.get("plate_no")?,
        customer_name: row.get("customer_name")?,
    })
}

/// Newest bill first.
pub fn list(conn: &Connection) -> Result<Vec<BillDetails>, WorkshopError> {
    fetch_all(conn, &format!("{DETAILS} ORDER BY b.bill_date DESC, b.bill_id DESC"), [], details_from_row)
        .context("Listing bills")
}

pub(crate) fn get(conn: &Connection, bill_id: i64) -> Result<BillDetails, WorkshopError> {
    conn.query_row(&format!("{DETAILS} WHERE b.bill_id = ?1"), [bill_id], details_from_row)
        .optional()
        .context("Loading bill")?
        .ok_or(WorkshopError::BillNotFound)
}

/// Bills the job at its current parts total, dated today and unpaid.
pub(crate) fn create(conn: &Connection, bill: NewBill) -> Result<BillDetails, WorkshopError> {
    let job = conn
        .query_row("SELECT * FROM service_jobs WHERE job_id = ?1", [bill.job_id], job_from_row)
        .optional()
        .context("Loading service job")?
        .ok_or(WorkshopError::JobNotFound)?;

    let labor_cost = bill.labor_cost.unwrap_or(job.labor_cost);
    let parts_cost = total_cost(conn, job.job_id)?;
    let inserted = conn.query_row(
        "INSERT INTO billing (job_id, labor_cost, parts_cost, total_amount, payment_status, bill_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING bill_id",
        params![
            job.job_id,
            labor_cost,
            parts_cost,
            labor_cost + parts_cost,
            PaymentStatus::Unpaid.as_str(),
            Local::now().date_naive()
        ],
        |row| row.get::<_, i64>(0),
    );
    let bill_id = match inserted {
        Err(err) if err.is_unique_violation() => return Err(WorkshopError::BillExists),
        other => other.context("Creating bill")?,
    };
    get(conn, bill_id)
}

pub(crate) fn mark_paid(conn: &Connection, bill_id: i64) -> Result<BillDetails, WorkshopError> {
    let updated = conn
        .execute("UPDATE billing SET payment_status = ?1 WHERE bill_id = ?2", params![
            PaymentStatus::Paid.as_str(),
            bill_id
        ])
        .context("Marking bill paid")?;
    if updated == 0 {
        return Err(WorkshopError::BillNotFound);
    }
    get(conn, bill_id)
}
