use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::price::PriceEntry;
use crate::domain::price_list::BatchRequest;
use crate::services::ServiceError;

const VARIANT_ID_MAX_LEN: u64 = 128;
const REGION_ID_MAX_LEN: u64 = 128;
/// ISO 4217 codes are always three letters.
const CURRENCY_CODE_LEN: u64 = 3;

/// Result type returned by the price list form helpers.
pub type PriceBatchFormResult<T> = Result<T, PriceBatchFormError>;

/// Errors that can occur while processing a batch price payload.
#[derive(Debug, Error)]
pub enum PriceBatchFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// A price entry has no variant after trimming.
    #[error("price #{index} is missing a variant_id")]
    EmptyVariant { index: usize },
}

impl From<PriceBatchFormError> for ServiceError {
    fn from(value: PriceBatchFormError) -> Self {
        ServiceError::invalid_argument(value.to_string())
    }
}

/// JSON body of `POST /admin/price-lists/{id}/prices/batch`.
#[derive(Debug, Deserialize, Validate)]
pub struct BatchPricesPayload {
    #[validate(nested)]
    pub prices: Vec<PriceEntryPayload>,
    /// Replace the current price set instead of merging into it.
    #[serde(rename = "override", default)]
    pub override_existing: bool,
}

/// One price inside a [`BatchPricesPayload`].
#[derive(Debug, Deserialize, Validate)]
pub struct PriceEntryPayload {
    #[serde(default)]
    pub id: Option<i32>,
    #[validate(length(min = 1, max = VARIANT_ID_MAX_LEN))]
    pub variant_id: String,
    #[serde(default)]
    #[validate(length(equal = CURRENCY_CODE_LEN))]
    pub currency_code: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = REGION_ID_MAX_LEN))]
    pub region_id: Option<String>,
    pub amount: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub min_quantity: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub max_quantity: Option<i32>,
}

impl BatchPricesPayload {
    /// Validate and normalize the payload into a [`BatchRequest`].
    ///
    /// Semantic rules such as non-negative amounts are left to the service
    /// layer so both update paths report them the same way.
    pub fn into_batch_request(self, price_list_id: i32) -> PriceBatchFormResult<BatchRequest> {
        self.validate()?;

        let prices = self
            .prices
            .into_iter()
            .enumerate()
            .map(|(index, payload)| payload.into_entry(index))
            .collect::<PriceBatchFormResult<Vec<_>>>()?;

        Ok(BatchRequest::new(price_list_id, prices).override_existing(self.override_existing))
    }
}

impl PriceEntryPayload {
    fn into_entry(self, index: usize) -> PriceBatchFormResult<PriceEntry> {
        let variant_id = self.variant_id.trim();
        if variant_id.is_empty() {
            return Err(PriceBatchFormError::EmptyVariant { index });
        }

        Ok(PriceEntry {
            id: self.id,
            variant_id: variant_id.to_string(),
            currency_code: non_blank(self.currency_code).map(|code| code.to_lowercase()),
            region_id: non_blank(self.region_id),
            amount: self.amount,
            min_quantity: self.min_quantity,
            max_quantity: self.max_quantity,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> BatchPricesPayload {
        serde_json::from_str(json).expect("valid json")
    }

    #[test]
    fn converts_and_normalizes_entries() {
        let form = payload(
            r#"{
                "override": true,
                "prices": [
                    {"id": 7, "variant_id": " V1 ", "currency_code": "EUR", "amount": 1000},
                    {"variant_id": "V2", "region_id": "reg_1", "amount": 50, "min_quantity": 2}
                ]
            }"#,
        );

        let request = form.into_batch_request(3).expect("expected success");

        assert_eq!(request.price_list_id, 3);
        assert!(request.override_existing);
        assert_eq!(request.prices.len(), 2);
        assert_eq!(request.prices[0].id, Some(7));
        assert_eq!(request.prices[0].variant_id, "V1");
        assert_eq!(request.prices[0].currency_code.as_deref(), Some("eur"));
        assert_eq!(request.prices[1].region_id.as_deref(), Some("reg_1"));
        assert_eq!(request.prices[1].min_quantity, Some(2));
    }

    #[test]
    fn override_defaults_to_false() {
        let form = payload(r#"{"prices": []}"#);

        let request = form.into_batch_request(1).expect("expected success");

        assert!(!request.override_existing);
        assert!(request.prices.is_empty());
    }

    #[test]
    fn rejects_malformed_currency_code() {
        let form = payload(r#"{"prices": [{"variant_id": "V1", "currency_code": "euro", "amount": 1}]}"#);

        let result = form.into_batch_request(1);

        assert!(matches!(result, Err(PriceBatchFormError::Validation(_))));
    }

    #[test]
    fn rejects_blank_variant() {
        let form = payload(r#"{"prices": [{"variant_id": "   ", "currency_code": "usd", "amount": 1}]}"#);

        let result = form.into_batch_request(1);

        assert!(matches!(
            result,
            Err(PriceBatchFormError::EmptyVariant { index: 0 })
        ));
    }

    #[test]
    fn negative_amount_passes_through_to_the_service_layer() {
        let form = payload(r#"{"prices": [{"variant_id": "V1", "currency_code": "usd", "amount": -5}]}"#);

        let request = form.into_batch_request(1).expect("expected success");

        assert_eq!(request.prices[0].amount, -5);
    }

    #[test]
    fn form_errors_map_to_invalid_argument() {
        let err = ServiceError::from(PriceBatchFormError::EmptyVariant { index: 2 });

        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }
}
