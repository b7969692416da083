use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::price::{
    NewPrice as DomainNewPrice, Price as DomainPrice, UpdatePrice as DomainUpdatePrice,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(
    table_name = crate::schema::prices,
    belongs_to(super::price_list::PriceList, foreign_key = price_list_id)
)]
pub struct Price {
    pub id: i32,
    pub price_list_id: i32,
    pub variant_id: String,
    pub currency_code: Option<String>,
    pub region_id: Option<String>,
    pub amount: i64,
    pub min_quantity: Option<i32>,
    pub max_quantity: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::prices)]
pub struct NewPrice<'a> {
    pub price_list_id: i32,
    pub variant_id: &'a str,
    pub currency_code: Option<&'a str>,
    pub region_id: Option<&'a str>,
    pub amount: i64,
    pub min_quantity: Option<i32>,
    pub max_quantity: Option<i32>,
}

/// Insert payload that keeps the original id and timestamps of a price.
#[derive(Insertable)]
#[diesel(table_name = crate::schema::prices)]
pub struct RestoredPrice<'a> {
    pub id: i32,
    pub price_list_id: i32,
    pub variant_id: &'a str,
    pub currency_code: Option<&'a str>,
    pub region_id: Option<&'a str>,
    pub amount: i64,
    pub min_quantity: Option<i32>,
    pub max_quantity: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::prices)]
#[diesel(treat_none_as_null = true)]
pub struct UpdatePrice<'a> {
    pub variant_id: &'a str,
    pub currency_code: Option<&'a str>,
    pub region_id: Option<&'a str>,
    pub amount: i64,
    pub min_quantity: Option<i32>,
    pub max_quantity: Option<i32>,
    pub updated_at: NaiveDateTime,
}

impl From<Price> for DomainPrice {
    fn from(value: Price) -> Self {
        Self {
            id: value.id,
            price_list_id: value.price_list_id,
            variant_id: value.variant_id,
            currency_code: value.currency_code,
            region_id: value.region_id,
            amount: value.amount,
            min_quantity: value.min_quantity,
            max_quantity: value.max_quantity,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewPrice> for NewPrice<'a> {
    fn from(value: &'a DomainNewPrice) -> Self {
        Self {
            price_list_id: value.price_list_id,
            variant_id: value.variant_id.as_str(),
            currency_code: value.currency_code.as_deref(),
            region_id: value.region_id.as_deref(),
            amount: value.amount,
            min_quantity: value.min_quantity,
            max_quantity: value.max_quantity,
        }
    }
}

impl<'a> From<&'a DomainPrice> for RestoredPrice<'a> {
    fn from(value: &'a DomainPrice) -> Self {
        Self {
            id: value.id,
            price_list_id: value.price_list_id,
            variant_id: value.variant_id.as_str(),
            currency_code: value.currency_code.as_deref(),
            region_id: value.region_id.as_deref(),
            amount: value.amount,
            min_quantity: value.min_quantity,
            max_quantity: value.max_quantity,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdatePrice> for UpdatePrice<'a> {
    fn from(value: &'a DomainUpdatePrice) -> Self {
        Self {
            variant_id: value.variant_id.as_str(),
            currency_code: value.currency_code.as_deref(),
            region_id: value.region_id.as_deref(),
            amount: value.amount,
            min_quantity: value.min_quantity,
            max_quantity: value.max_quantity,
            updated_at: value.updated_at,
        }
    }
}
