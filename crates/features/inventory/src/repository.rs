//! SQL for the `inventory` table.

use crate::error::{InventoryError, InventoryErrorExt};
use crate::model::{InventoryItem, ItemPatch, NewItem, StockAdjustment};
use autoims_kernel::prelude::{Changes, ConstraintViolation, Entity, INVENTORY, ResourceGuard, fetch_all};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn item_from_row(row: &Row<'_>) -> rusqlite::Result<InventoryItem> {
    Ok(InventoryItem {
        part_id: row.get("part_id")?,
        part_name: row.get("part_name")?,
        part_code: row.get("part_code")?,
        brand: row.get("brand")?,
        unit_price: row.get("unit_price")?,
        quantity_in_stock: row.get("quantity_in_stock")?,
        reorder_level: row.get("reorder_level")?,
        description: row.get("description")?,
        last_updated: row.get("last_updated")?,
    })
}

pub(crate) fn list(conn: &Connection) -> Result<Vec<InventoryItem>, InventoryError> {
    fetch_all(conn, "SELECT * FROM inventory ORDER BY part_name, part_id", [], item_from_row).context("Listing inventory")
}

/// Items at or below their reorder level, largest shortfall first.
pub(crate) fn low_stock(conn: &Connection) -> Result<Vec<InventoryItem>, InventoryError> {
    fetch_all(
        conn,
        "SELECT * FROM inventory WHERE quantity_in_stock <= reorder_level
         ORDER BY (quantity_in_stock - reorder_level) ASC, part_id",
        [],
        item_from_row,
    )
    .context("Listing low stock items")
}

/// # Errors
///
/// SQLite failures.
pub fn find(conn: &Connection, part_id: i64) -> rusqlite::Result<Option<InventoryItem>> {
    conn.query_row("SELECT * FROM inventory WHERE part_id = ?1", [part_id], item_from_row).optional()
}

pub(crate) fn get(conn: &Connection, part_id: i64) -> Result<InventoryItem, InventoryError> {
    find(conn, part_id).context("Loading item")?.ok_or(InventoryError::NotFound)
}

pub(crate) fn create(conn: &Connection, item: &NewItem) -> Result<InventoryItem, InventoryError> {
    conn.query_row(
        "INSERT INTO inventory
            (part_name, part_code, brand, unit_price, quantity_in_stock, reorder_level, description, last_updated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) RETURNING *",
        params![
            item.part_name,
            item.part_code,
            item.brand,
            item.unit_price,
            item.quantity_in_stock,
            item.reorder_level,
            item.description,
            Utc::now()
        ],
        item_from_row,
    )
    .map_err(|err| conflict_or(err, "Adding item"))
}

/// Changes the present fields and refreshes `last_updated`.
pub(crate) fn update(conn: &Connection, part_id: i64, patch: ItemPatch) -> Result<InventoryItem, InventoryError> {
    if !ResourceGuard::exists(conn, Entity::InventoryItem, part_id)? {
        return Err(InventoryError::NotFound);
    }

    let changes = Changes::new()
        .set_opt("part_name", patch.part_name)
        .set_opt("part_code", patch.part_code)
        .set_opt("brand", patch.brand)
        .set_opt("unit_price", patch.unit_price)
        .set_opt("quantity_in_stock", patch.quantity_in_stock)
        .set_opt("reorder_level", patch.reorder_level)
        .set_opt("description", patch.description);
    if changes.is_empty() {
        return get(conn, part_id);
    }

    changes
        .set("last_updated", Utc::now())
        .apply(conn, INVENTORY, "part_id", part_id, item_from_row)
        .map_err(|err| conflict_or(err, "Updating item"))?
        .ok_or(InventoryError::NotFound)
}

/// Adds `delta` (negative to take stock out) and refreshes `last_updated`.
///
/// The sum is checked here rather than in SQL, where an overflow would turn
/// the column into a REAL. Shared with flows that move stock inside their
/// own transaction.
///
/// # Errors
///
/// `NotFound` for an unknown part, `StockOutOfRange` when the result would
/// be negative or overflow.
pub fn change_stock(conn: &Connection, part_id: i64, delta: i64) -> Result<InventoryItem, InventoryError> {
    let available: i64 = conn
        .query_row("SELECT quantity_in_stock FROM inventory WHERE part_id = ?1", [part_id], |row| row.get(0))
        .optional()
        .context("Loading stock")?
        .ok_or(InventoryError::NotFound)?;
    let quantity = available
        .checked_add(delta)
        .filter(|quantity| *quantity >= 0)
        .ok_or(InventoryError::StockOutOfRange { available, change: delta })?;
    set_stock(conn, part_id, quantity)
}

fn set_stock(conn: &Connection, part_id: i64, quantity: i64) -> Result<InventoryItem, InventoryError> {
    conn.query_row(
        "UPDATE inventory SET quantity_in_stock = ?1, last_updated = ?2 WHERE part_id = ?3 RETURNING *",
        params![quantity, Utc::now(), part_id],
        item_from_row,
    )
    .optional()
    .context("Updating stock")?
    .ok_or(InventoryError::NotFound)
}

pub(crate) fn adjust_stock(
    conn: &Connection,
    part_id: i64,
    adjustment: StockAdjustment,
) -> Result<InventoryItem, InventoryError> {
    match adjustment {
        StockAdjustment::Change(delta) => change_stock(conn, part_id, delta),
        StockAdjustment::Set(quantity) => set_stock(conn, part_id, quantity),
    }
}

fn conflict_or(err: rusqlite::Error, context: &'static str) -> InventoryError {
    if err.is_unique_violation() {
        InventoryError::DuplicateCode
    } else {
        InventoryError::Sqlite { source: err, context: Some(context.into()) }
    }
}
