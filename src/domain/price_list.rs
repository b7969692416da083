use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::price::{Price, PriceEntry};

/// How prices of a list interact with the variant's base prices.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriceListType {
    /// Prices are offered as a sale next to the original price.
    #[default]
    Sale,
    /// Prices replace the original price outright.
    Override,
}

/// Whether a price list is currently applied.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriceListStatus {
    Active,
    #[default]
    Draft,
}

impl From<&str> for PriceListType {
    fn from(value: &str) -> Self {
        match value {
            "override" => Self::Override,
            _ => Self::Sale,
        }
    }
}

impl From<PriceListType> for &'static str {
    fn from(value: PriceListType) -> Self {
        match value {
            PriceListType::Sale => "sale",
            PriceListType::Override => "override",
        }
    }
}

impl From<&str> for PriceListStatus {
    fn from(value: &str) -> Self {
        match value {
            "active" => Self::Active,
            _ => Self::Draft,
        }
    }
}

impl From<PriceListStatus> for &'static str {
    fn from(value: PriceListStatus) -> Self {
        match value {
            PriceListStatus::Active => "active",
            PriceListStatus::Draft => "draft",
        }
    }
}

/// Domain representation of a price list together with its prices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceList {
    /// Unique identifier of the price list.
    pub id: i32,
    /// Human-readable name of the price list.
    pub name: String,
    /// Free-form description shown to operators.
    pub description: String,
    /// Sale or override semantics of the list.
    pub list_type: PriceListType,
    /// Activation status of the list.
    pub status: PriceListStatus,
    /// Optional start of the validity window.
    pub starts_at: Option<NaiveDateTime>,
    /// Optional end of the validity window.
    pub ends_at: Option<NaiveDateTime>,
    /// Timestamp for when the price list record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the price list record.
    pub updated_at: NaiveDateTime,
    /// Prices of the list; empty unless loaded explicitly.
    pub prices: Vec<Price>,
}

/// A validated request to add, update or replace the prices of one price list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Target price list.
    pub price_list_id: i32,
    /// Incoming prices, applied in order.
    pub prices: Vec<PriceEntry>,
    /// Replace the whole price set of the list instead of merging into it.
    #[serde(rename = "override", default)]
    pub override_existing: bool,
}

impl BatchRequest {
    /// Build a merging batch for `price_list_id`.
    pub fn new(price_list_id: i32, prices: Vec<PriceEntry>) -> Self {
        Self {
            price_list_id,
            prices,
            override_existing: false,
        }
    }

    /// Switch the batch into override mode.
    pub fn override_existing(mut self, override_existing: bool) -> Self {
        self.override_existing = override_existing;
        self
    }
}
