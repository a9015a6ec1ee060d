//! SQL for the `job_parts_used` table. Stock moves in the same transaction.

use super::model::{JobPart, JobPartDetails, NewJobPart};
use crate::error::{WorkshopError, WorkshopErrorExt};
use crate::jobs::repository::ensure_job;
use autoims_inventory::InventoryError;
use autoims_inventory::repository as inventory;
use autoims_kernel::prelude::fetch_all;
use rusqlite::{Connection, OptionalExtension, Row, params};

const DETAILS: &str = "SELECT jpu.*, i.part_name, i.part_code, i.brand
     FROM job_parts_used jpu JOIN inventory i ON jpu.part_id = i.part_id";

fn details_from_row(row: &Row<'_>) -> rusqlite::Result<JobPartDetails> {
    Ok(JobPartDetails {
        usage: JobPart {
            job_part_id: row.get("job_part_id")?,
            job_id: row.get("job_id")?,
            part_id: row.get("part_id")?,
            quantity_used: row.get("quantity_used")?,
            unit_price_at_time: row.get("unit_price_at_time")?,
        },
        part_name: row.get("part_name")?,
        part_code: row.get("part_code")?,
        brand: row.get("brand")?,
    })
}

/// Every part used on the job, with the job's parts total.
pub(crate) fn for_job(conn: &Connection, job_id: i64) -> Result<(Vec<JobPartDetails>, f64), WorkshopError> {
    ensure_job(conn, job_id)?;
    let parts = fetch_all(
        conn,
        &format!("{DETAILS} WHERE jpu.job_id = ?1 ORDER BY jpu.job_part_id"),
        [job_id],
        details_from_row,
    )
    .context("Listing job parts")?;
    Ok((parts, total_cost(conn, job_id)?))
}

/// `SUM(quantity_used * unit_price_at_time)`, zero for a job without parts.
pub(crate) fn total_cost(conn: &Connection, job_id: i64) -> Result<f64, WorkshopError> {
    conn.query_row(
        "SELECT COALESCE(SUM(quantity_used * unit_price_at_time), 0.0) FROM job_parts_used WHERE job_id = ?1",
        [job_id],
        |row| row.get(0),
    )
    .context("Summing job parts")
}

pub(crate) fn checked_total(conn: &Connection, job_id: i64) -> Result<f64, WorkshopError> {
    ensure_job(conn, job_id)?;
    total_cost(conn, job_id)
}

/// Records the usage at the current unit price and takes it out of stock.
pub(crate) fn add(conn: &mut Connection, usage: NewJobPart) -> Result<JobPartDetails, WorkshopError> {
    ensure_job(conn, usage.job_id)?;
    let tx = conn.transaction().context("Starting part usage transaction")?;

    let part = inventory::find(&tx, usage.part_id).context("Loading part")?.ok_or(WorkshopError::PartNotFound)?;
    if part.quantity_in_stock < usage.quantity_used {
        return Err(WorkshopError::InsufficientStock {
            available: part.quantity_in_stock,
            requested: usage.quantity_used,
        });
    }

    let job_part_id: i64 = tx
        .query_row(
            "INSERT INTO job_parts_used (job_id, part_id, quantity_used, unit_price_at_time)
             VALUES (?1, ?2, ?3, ?4) RETURNING job_part_id",
            params![usage.job_id, usage.part_id, usage.quantity_used, part.unit_price],
            |row| row.get(0),
        )
        .context("Recording part usage")?;
    move_stock(&tx, usage.part_id, -usage.quantity_used)?;

    let details = tx
        .query_row(&format!("{DETAILS} WHERE jpu.job_part_id = ?1"), [job_part_id], details_from_row)
        .context("Loading part usage")?;
    tx.commit().context("Committing part usage")?;
    Ok(details)
}

/// Deletes the usage and puts the quantity back in stock.
pub(crate) fn remove(conn: &mut Connection, job_part_id: i64) -> Result<(), WorkshopError> {
    let tx = conn.transaction().context("Starting part removal transaction")?;

    let (part_id, quantity_used): (i64, i64) = tx
        .query_row(
            "DELETE FROM job_parts_used WHERE job_part_id = ?1 RETURNING part_id, quantity_used",
            [job_part_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .context("Removing part usage")?
        .ok_or(WorkshopError::UsageNotFound)?;
    move_stock(&tx, part_id, quantity_used)?;

    tx.commit().context("Committing part removal")
}

/// Moves stock inside the caller's transaction.
fn move_stock(tx: &Connection, part_id: i64, delta: i64) -> Result<(), WorkshopError> {
    match inventory::change_stock(tx, part_id, delta) {
        Ok(_) => Ok(()),
        Err(InventoryError::NotFound) => Err(WorkshopError::PartNotFound),
        Err(err @ InventoryError::StockOutOfRange { .. }) => {
            Err(WorkshopError::Validation { message: err.to_string().into() })
        }
        Err(err) => Err(err).context("Moving stock"),
    }
}
