//! Read-only queries across every workshop table.

use crate::error::{DashboardError, DashboardErrorExt};
use crate::model::DashboardStats;
use autoims_customers::Customer;
use autoims_customers::repository::customer_from_row;
use autoims_identity::User;
use autoims_identity::repository::{USER_COLUMNS, user_from_row};
use autoims_inventory::InventoryItem;
use autoims_inventory::repository::item_from_row;
use autoims_kernel::prelude::{JobStatus, PaymentStatus, RequestStatus, fetch_all};
use autoims_requests::ServiceRequestDetails;
use autoims_vehicles::VehicleDetails;
use autoims_workshop::billing::model::BillDetails;
use autoims_workshop::jobs::model::JobDetails;
use rusqlite::{Connection, OptionalExtension};

pub(crate) fn user(conn: &Connection, user_id: i64) -> Result<User, DashboardError> {
    conn.query_row(&format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"), [user_id], user_from_row)
        .optional()
        .context("Loading user")?
        .ok_or(DashboardError::UserNotFound)
}

fn count(conn: &Connection, sql: &str) -> rusqlite::Result<i64> {
    conn.query_row(sql, [], |row| row.get(0))
}

fn total(conn: &Connection, status: PaymentStatus) -> rusqlite::Result<f64> {
    conn.query_row(
        "SELECT COALESCE(SUM(total_amount), 0.0) FROM billing WHERE payment_status = ?1",
        [status.as_str()],
        |row| row.get(0),
    )
}

pub(crate) fn stats(conn: &Connection) -> Result<DashboardStats, DashboardError> {
    Ok(DashboardStats {
        customers_count: count(conn, "SELECT COUNT(*) FROM customers").context("Counting customers")?,
        vehicles_count: count(conn, "SELECT COUNT(*) FROM vehicles").context("Counting vehicles")?,
        pending_requests: conn
            .query_row("SELECT COUNT(*) FROM service_requests WHERE status = ?1", [RequestStatus::Pending.as_str()], |row| {
                row.get(0)
            })
            .context("Counting pending requests")?,
        active_jobs: conn
            .query_row("SELECT COUNT(*) FROM service_jobs WHERE job_status = ?1", [JobStatus::InProgress.as_str()], |row| {
                row.get(0)
            })
            .context("Counting active jobs")?,
        low_stock_items: count(conn, "SELECT COUNT(*) FROM inventory WHERE quantity_in_stock <= reorder_level")
            .context("Counting low stock items")?,
        unpaid_total: total(conn, PaymentStatus::Unpaid).context("Summing unpaid bills")?,
        total_revenue: total(conn, PaymentStatus::Paid).context("Summing revenue")?,
    })
}

pub(crate) fn customers(conn: &Connection) -> Result<Vec<Customer>, DashboardError> {
    fetch_all(conn, "SELECT * FROM customers ORDER BY created_at DESC, customer_id DESC", [], customer_from_row)
        .context("Listing customers")
}

pub(crate) fn vehicles(conn: &Connection) -> Result<Vec<VehicleDetails>, DashboardError> {
    fetch_all(
        conn,
        "SELECT v.*, c.name AS customer_name, c.phone AS customer_phone
         FROM vehicles v LEFT JOIN customers c ON v.customer_id = c.customer_id
         ORDER BY v.vehicle_id DESC",
        [],
        autoims_vehicles::repository::listed_from_row,
    )
    .context("Listing vehicles")
}

pub(crate) fn service_requests(conn: &Connection) -> Result<Vec<ServiceRequestDetails>, DashboardError> {
    fetch_all(
        conn,
        "SELECT sr.*,
                v.plate_no, v.brand AS vehicle_brand, v.model AS vehicle_model,
                v.year AS vehicle_year, v.color AS vehicle_color,
                c.customer_id, c.name AS customer_name, c.phone AS customer_phone,
                c.email AS customer_email, c.address AS customer_address
         FROM service_requests sr
         LEFT JOIN vehicles v ON sr.vehicle_id = v.vehicle_id
         LEFT JOIN customers c ON v.customer_id = c.customer_id
         ORDER BY sr.request_date DESC, sr.request_id DESC",
        [],
        autoims_requests::repository::details_from_row,
    )
    .context("Listing service requests")
}

pub(crate) fn service_jobs(conn: &Connection) -> Result<Vec<JobDetails>, DashboardError> {
    fetch_all(
        conn,
        "SELECT sj.*, sr.service_type, sr.status AS request_status,
                v.plate_no, v.brand, v.model, e.name AS employee_name
         FROM service_jobs sj
         LEFT JOIN service_requests sr ON sj.request_id = sr.request_id
         LEFT JOIN vehicles v ON sr.vehicle_id = v.vehicle_id
         LEFT JOIN employees e ON sj.assigned_employee = e.id
         ORDER BY sj.start_time DESC, sj.job_id DESC",
        [],
        autoims_workshop::jobs::repository::details_from_row,
    )
    .context("Listing service jobs")
}

pub(crate) fn inventory(conn: &Connection) -> Result<Vec<InventoryItem>, DashboardError> {
    fetch_all(conn, "SELECT * FROM inventory ORDER BY part_name, part_id", [], item_from_row).context("Listing inventory")
}

pub(crate) fn billing(conn: &Connection) -> Result<Vec<BillDetails>, DashboardError> {
    fetch_all(
        conn,
        "SELECT b.*, sj.job_status, sr.service_type, v.plate_no, c.name AS customer_name
         FROM billing b
         LEFT JOIN service_jobs sj ON b.job_id = sj.job_id
         LEFT JOIN service_requests sr ON sj.request_id = sr.request_id
         LEFT JOIN vehicles v ON sr.vehicle_id = v.vehicle_id
         LEFT JOIN customers c ON v.customer_id = c.customer_id
         ORDER BY b.bill_date DESC, b.bill_id DESC",
        [],
        autoims_workshop::billing::repository::details_from_row,
    )
    .context("Listing billing records")
}
