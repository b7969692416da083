use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scope a price applies to: either a currency or a region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceScope {
    /// Price charged in a specific ISO 4217 currency.
    Currency(String),
    /// Price charged inside a region (the region determines the currency).
    Region(String),
}

impl PriceScope {
    /// Resolve the scope from the optional currency and region columns.
    ///
    /// A region wins over a currency when both are present. Currency codes are
    /// compared case-insensitively.
    pub fn resolve(currency_code: Option<&str>, region_id: Option<&str>) -> Option<Self> {
        match (region_id, currency_code) {
            (Some(region_id), _) => Some(Self::Region(region_id.to_string())),
            (None, Some(currency_code)) => Some(Self::Currency(currency_code.to_lowercase())),
            (None, None) => None,
        }
    }
}

/// Identity of a price inside a price list when no explicit id is supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopingTuple {
    pub variant_id: String,
    pub scope: PriceScope,
    pub min_quantity: Option<i32>,
    pub max_quantity: Option<i32>,
}

/// Domain representation of a price stored inside a price list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Price {
    /// Unique identifier of the price.
    pub id: i32,
    /// Owning price list identifier.
    pub price_list_id: i32,
    /// Product variant the price applies to.
    pub variant_id: String,
    /// ISO 4217 currency code, when the price is currency scoped.
    pub currency_code: Option<String>,
    /// Region identifier, when the price is region scoped.
    pub region_id: Option<String>,
    /// Amount in the smallest currency unit (for example cents).
    pub amount: i64,
    /// Lower quantity bound for the price, inclusive.
    pub min_quantity: Option<i32>,
    /// Upper quantity bound for the price, inclusive.
    pub max_quantity: Option<i32>,
    /// Timestamp for when the price record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the price record.
    pub updated_at: NaiveDateTime,
}

impl Price {
    /// Scoping tuple of the stored price, `None` for rows without any scope.
    pub fn scoping_tuple(&self) -> Option<ScopingTuple> {
        let scope = PriceScope::resolve(self.currency_code.as_deref(), self.region_id.as_deref())?;
        Some(ScopingTuple {
            variant_id: self.variant_id.clone(),
            scope,
            min_quantity: self.min_quantity,
            max_quantity: self.max_quantity,
        })
    }
}

/// Reasons an incoming price entry is rejected before anything is written.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PriceEntryError {
    #[error("price for variant `{variant_id}` has negative amount {amount}")]
    NegativeAmount { variant_id: String, amount: i64 },
    #[error("price for variant `{variant_id}` has min_quantity {min} greater than max_quantity {max}")]
    InvalidQuantityRange {
        variant_id: String,
        min: i32,
        max: i32,
    },
    #[error("price for variant `{variant_id}` needs a currency_code or a region_id")]
    MissingScope { variant_id: String },
    #[error("price entry is missing a variant_id")]
    MissingVariant,
}

/// One incoming price of a batch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceEntry {
    /// Existing price to update; `None` means match by scope or create.
    pub id: Option<i32>,
    /// Product variant the price applies to.
    pub variant_id: String,
    /// ISO 4217 currency code.
    pub currency_code: Option<String>,
    /// Region identifier.
    pub region_id: Option<String>,
    /// Amount in the smallest currency unit.
    pub amount: i64,
    /// Lower quantity bound, inclusive.
    pub min_quantity: Option<i32>,
    /// Upper quantity bound, inclusive.
    pub max_quantity: Option<i32>,
}

impl PriceEntry {
    /// Build an entry for `variant_id` without scope, id or quantity bounds.
    pub fn new(variant_id: impl Into<String>, amount: i64) -> Self {
        Self {
            id: None,
            variant_id: variant_id.into(),
            currency_code: None,
            region_id: None,
            amount,
            min_quantity: None,
            max_quantity: None,
        }
    }

    /// Target an existing price by id.
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    /// Scope the entry to a currency.
    pub fn with_currency(mut self, currency_code: impl Into<String>) -> Self {
        self.currency_code = Some(currency_code.into());
        self
    }

    /// Scope the entry to a region.
    pub fn with_region(mut self, region_id: impl Into<String>) -> Self {
        self.region_id = Some(region_id.into());
        self
    }

    /// Attach quantity bounds to the entry.
    pub fn with_quantity_bounds(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.min_quantity = min;
        self.max_quantity = max;
        self
    }

    /// Check the semantic rules and return the entry's scoping tuple.
    pub fn validate(&self) -> Result<ScopingTuple, PriceEntryError> {
        if self.variant_id.trim().is_empty() {
            return Err(PriceEntryError::MissingVariant);
        }

        if self.amount < 0 {
            return Err(PriceEntryError::NegativeAmount {
                variant_id: self.variant_id.clone(),
                amount: self.amount,
            });
        }

        if let (Some(min), Some(max)) = (self.min_quantity, self.max_quantity) {
            if min > max {
                return Err(PriceEntryError::InvalidQuantityRange {
                    variant_id: self.variant_id.clone(),
                    min,
                    max,
                });
            }
        }

        let scope = PriceScope::resolve(self.currency_code.as_deref(), self.region_id.as_deref())
            .ok_or_else(|| PriceEntryError::MissingScope {
                variant_id: self.variant_id.clone(),
            })?;

        Ok(ScopingTuple {
            variant_id: self.variant_id.clone(),
            scope,
            min_quantity: self.min_quantity,
            max_quantity: self.max_quantity,
        })
    }
}

/// Payload required to insert a new price into a price list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPrice {
    pub price_list_id: i32,
    pub variant_id: String,
    pub currency_code: Option<String>,
    pub region_id: Option<String>,
    pub amount: i64,
    pub min_quantity: Option<i32>,
    pub max_quantity: Option<i32>,
}

impl NewPrice {
    /// Build an insert payload for `price_list_id` from an incoming entry.
    ///
    /// Currency codes are stored lowercase.
    pub fn from_entry(price_list_id: i32, entry: &PriceEntry) -> Self {
        Self {
            price_list_id,
            variant_id: entry.variant_id.clone(),
            currency_code: entry.currency_code.as_deref().map(str::to_lowercase),
            region_id: entry.region_id.clone(),
            amount: entry.amount,
            min_quantity: entry.min_quantity,
            max_quantity: entry.max_quantity,
        }
    }

    /// Scoping tuple the new price will occupy once inserted.
    pub fn scoping_tuple(&self) -> Option<ScopingTuple> {
        let scope = PriceScope::resolve(self.currency_code.as_deref(), self.region_id.as_deref())?;
        Some(ScopingTuple {
            variant_id: self.variant_id.clone(),
            scope,
            min_quantity: self.min_quantity,
            max_quantity: self.max_quantity,
        })
    }
}

/// Full replacement of the mutable columns of an existing price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePrice {
    pub variant_id: String,
    pub currency_code: Option<String>,
    pub region_id: Option<String>,
    pub amount: i64,
    pub min_quantity: Option<i32>,
    pub max_quantity: Option<i32>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl UpdatePrice {
    /// Build a patch from the current column values of `price`.
    pub fn from_price(price: &Price) -> Self {
        Self {
            variant_id: price.variant_id.clone(),
            currency_code: price.currency_code.clone(),
            region_id: price.region_id.clone(),
            amount: price.amount,
            min_quantity: price.min_quantity,
            max_quantity: price.max_quantity,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }
}
