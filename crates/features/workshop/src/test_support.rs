//! Fixtures shared by the repository tests.

use autoims_customers::NewCustomer;
use autoims_kernel::prelude::RequestStatus;
use autoims_requests::NewRequest;
use autoims_vehicles::NewVehicle;
use rusqlite::{Connection, params};

pub(crate) fn conn() -> Connection {
    let conn = Connection::open_in_memory().expect("memory db");
    conn.pragma_update(None, "foreign_keys", true).expect("fk");
    let migrations = autoims_customers::MIGRATIONS
        .iter()
        .chain(autoims_vehicles::MIGRATIONS)
        .chain(autoims_workforce::MIGRATIONS)
        .chain(autoims_inventory::MIGRATIONS)
        .chain(autoims_requests::MIGRATIONS)
        .chain(crate::MIGRATIONS);
    for migration in migrations {
        conn.execute_batch(migration.script).expect("migrate");
    }
    conn
}

/// A pending request for a fresh customer and vehicle with plate `plate`.
pub(crate) fn request(conn: &Connection, plate: &str) -> i64 {
    let customer = NewCustomer {
        name: format!("Owner of {plate}"),
        phone: format!("tel-{plate}"),
        email: format!("{plate}@garage.test"),
        address: "1 Main St".to_owned(),
    };
    let customer = autoims_customers::repository::insert(conn, &customer).expect("customer");
    let vehicle = NewVehicle {
        plate_no: plate.to_owned(),
        brand: "Toyota".to_owned(),
        model: "Corolla".to_owned(),
        year: 2020,
        color: "Grey".to_owned(),
        customer_id: customer.customer_id,
    };
    let vehicle = autoims_vehicles::repository::insert(conn, &vehicle).expect("vehicle");
    let request = NewRequest {
        vehicle_id: vehicle.vehicle_id,
        service_type: "General service".to_owned(),
        problem_note: None,
        priority: "Normal".to_owned(),
        status: RequestStatus::Pending,
    };
    autoims_requests::repository::insert(conn, &request).expect("request").request_id
}

pub(crate) fn employee(conn: &Connection, name: &str) -> i64 {
    conn.query_row("INSERT INTO employees (name, position) VALUES (?1, 'Mechanic') RETURNING id", [name], |row| {
        row.get(0)
    })
    .expect("employee")
}

pub(crate) fn part(conn: &Connection, code: &str, stock: i64, unit_price: f64) -> i64 {
    conn.query_row(
        "INSERT INTO inventory (part_name, part_code, unit_price, quantity_in_stock, reorder_level)
         VALUES (?1, ?1, ?2, ?3, 1) RETURNING part_id",
        params![code, unit_price, stock],
        |row| row.get(0),
    )
    .expect("part")
}

pub(crate) fn job(conn: &Connection, request_id: i64, labor_cost: f64) -> i64 {
    conn.query_row(
        "INSERT INTO service_jobs (request_id, labor_cost) VALUES (?1, ?2) RETURNING job_id",
        params![request_id, labor_cost],
        |row| row.get(0),
    )
    .expect("job")
}

pub(crate) fn stock(conn: &Connection, part_id: i64) -> i64 {
    conn.query_row("SELECT quantity_in_stock FROM inventory WHERE part_id = ?1", [part_id], |row| row.get(0))
        .expect("stock")
}
