use crate::error::InventoryError;
use autoims_kernel::prelude::{NumberLike, api_model, trimmed};
use chrono::{DateTime, Utc};

#[api_model(response)]
#[derive(Clone, PartialEq)]
pub struct InventoryItem {
    pub part_id: i64,
    pub part_name: String,
    pub part_code: String,
    pub brand: Option<String>,
    pub unit_price: f64,
    pub quantity_in_stock: i64,
    pub reorder_level: i64,
    pub description: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl InventoryItem {
    #[must_use]
    pub const fn is_low(&self) -> bool {
        self.quantity_in_stock <= self.reorder_level
    }
}

#[api_model(request)]
/// Item fields; name, code, price and reorder level are required on create
#[derive(Default)]
pub struct ItemInput {
    pub part_name: Option<String>,
    pub part_code: Option<String>,
    pub brand: Option<String>,
    pub unit_price: Option<NumberLike>,
    pub quantity_in_stock: Option<NumberLike>,
    pub reorder_level: Option<NumberLike>,
    pub description: Option<String>,
}

#[api_model(request)]
/// `quantity_change` adds to the stock, `quantity` replaces it
#[derive(Default)]
pub struct StockInput {
    pub quantity_change: Option<NumberLike>,
    pub quantity: Option<NumberLike>,
}

#[api_model(response)]
pub struct ItemResponse {
    pub message: &'static str,
    pub item: InventoryItem,
}

#[api_model(response)]
pub struct ItemList {
    pub message: &'static str,
    pub items: Vec<InventoryItem>,
}

#[api_model(response)]
pub struct LowStockList {
    pub message: &'static str,
    pub items: Vec<InventoryItem>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub part_name: String,
    pub part_code: String,
    pub brand: Option<String>,
    pub unit_price: f64,
    pub quantity_in_stock: i64,
    pub reorder_level: i64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub part_name: Option<String>,
    pub part_code: Option<String>,
    pub brand: Option<String>,
    pub unit_price: Option<f64>,
    pub quantity_in_stock: Option<i64>,
    pub reorder_level: Option<i64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAdjustment {
    Change(i64),
    Set(i64),
}

fn present(value: Option<NumberLike>) -> Option<NumberLike> {
    value.filter(|v| !matches!(v, NumberLike::Text(text) if text.trim().is_empty()))
}

fn invalid_numbers() -> InventoryError {
    InventoryError::invalid("Invalid numeric values")
}

fn numeric<T>(value: Option<NumberLike>, read: impl Fn(&NumberLike) -> Option<T>) -> Result<Option<T>, InventoryError> {
    present(value).map(|v| read(&v).ok_or_else(invalid_numbers)).transpose()
}

impl ItemInput {
    /// Presence first (name, code, price, reorder level), then the numbers.
    ///
    /// # Errors
    ///
    /// [`InventoryError::Validation`] naming the missing field, or
    /// "Invalid numeric values".
    pub fn into_new(self) -> Result<NewItem, InventoryError> {
        let part_name =
            trimmed(self.part_name.as_deref()).ok_or_else(|| InventoryError::invalid("part_name is required"))?;
        let part_code =
            trimmed(self.part_code.as_deref()).ok_or_else(|| InventoryError::invalid("part_code is required"))?;
        let unit_price = present(self.unit_price).ok_or_else(|| InventoryError::invalid("unit_price is required"))?;
        let reorder_level =
            present(self.reorder_level).ok_or_else(|| InventoryError::invalid("reorder_level is required"))?;

        Ok(NewItem {
            part_name,
            part_code,
            brand: trimmed(self.brand.as_deref()),
            unit_price: unit_price.as_f64().ok_or_else(invalid_numbers)?,
            quantity_in_stock: numeric(self.quantity_in_stock, NumberLike::as_i64)?.unwrap_or(0),
            reorder_level: reorder_level.as_i64().ok_or_else(invalid_numbers)?,
            description: trimmed(self.description.as_deref()),
        })
    }

    /// # Errors
    ///
    /// "Invalid numeric values" for a present number that does not parse.
    pub fn into_patch(self) -> Result<ItemPatch, InventoryError> {
        Ok(ItemPatch {
            part_name: trimmed(self.part_name.as_deref()),
            part_code: trimmed(self.part_code.as_deref()),
            brand: trimmed(self.brand.as_deref()),
            unit_price: numeric(self.unit_price, NumberLike::as_f64)?,
            quantity_in_stock: numeric(self.quantity_in_stock, NumberLike::as_i64)?,
            reorder_level: numeric(self.reorder_level, NumberLike::as_i64)?,
            description: trimmed(self.description.as_deref()),
        })
    }
}

impl StockInput {
    /// `quantity_change` wins when both are sent.
    ///
    /// # Errors
    ///
    /// Non-integers, a negative `quantity`, or neither field.
    pub fn into_adjustment(self) -> Result<StockAdjustment, InventoryError> {
        if let Some(change) = self.quantity_change {
            let change =
                change.as_i64().ok_or_else(|| InventoryError::invalid("quantity_change must be an integer"))?;
            return Ok(StockAdjustment::Change(change));
        }
        if let Some(quantity) = self.quantity {
            let quantity = quantity.as_i64().ok_or_else(|| InventoryError::invalid("quantity must be an integer"))?;
            if quantity < 0 {
                return Err(InventoryError::invalid("quantity cannot be negative"));
            }
            return Ok(StockAdjustment::Set(quantity));
        }
        Err(InventoryError::invalid("Either quantity_change or quantity is required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brake_pad() -> ItemInput {
        ItemInput {
            part_name: Some(" Brake Pad ".into()),
            part_code: Some("BP-001".into()),
            unit_price: Some(NumberLike::Text("250.50".into())),
            reorder_level: Some(NumberLike::Int(10)),
            ..Default::default()
        }
    }

    #[test]
    fn required_fields_come_before_numbers() {
        let input = ItemInput { part_code: None, unit_price: Some(NumberLike::Text("cheap".into())), ..brake_pad() };
        assert_eq!(input.into_new().expect_err("code").to_string(), "part_code is required");

        let input = ItemInput { reorder_level: None, ..brake_pad() };
        assert_eq!(input.into_new().expect_err("reorder").to_string(), "reorder_level is required");

        let input = ItemInput { unit_price: Some(NumberLike::Text("cheap".into())), ..brake_pad() };
        assert_eq!(input.into_new().expect_err("price").to_string(), "Invalid numeric values");
    }

    #[test]
    fn stock_defaults_to_zero() {
        let item = brake_pad().into_new().expect("valid");
        assert_eq!(item.part_name, "Brake Pad");
        assert!((item.unit_price - 250.5).abs() < f64::EPSILON);
        assert_eq!(item.quantity_in_stock, 0);
        assert_eq!(item.brand, None);
    }

    #[test]
    fn stock_adjustment_modes() {
        let change = StockInput { quantity_change: Some(NumberLike::Int(-3)), quantity: Some(NumberLike::Int(9)) };
        assert_eq!(change.into_adjustment().expect("change"), StockAdjustment::Change(-3));

        let set = StockInput { quantity: Some(NumberLike::Text("12".into())), ..Default::default() };
        assert_eq!(set.into_adjustment().expect("set"), StockAdjustment::Set(12));

        let negative = StockInput { quantity: Some(NumberLike::Int(-1)), ..Default::default() };
        assert_eq!(negative.into_adjustment().expect_err("negative").to_string(), "quantity cannot be negative");

        let fractional = StockInput { quantity_change: Some(NumberLike::Float(1.5)), ..Default::default() };
        assert_eq!(
            fractional.into_adjustment().expect_err("fraction").to_string(),
            "quantity_change must be an integer"
        );

        let neither = StockInput::default().into_adjustment().expect_err("neither");
        assert_eq!(neither.to_string(), "Either quantity_change or quantity is required");
    }
}
