use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::price_list::PriceList as DomainPriceList;
use crate::models::price::Price;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::price_lists)]
pub struct PriceList {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub list_type: String,
    pub status: String,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl PriceList {
    pub fn into_domain(self, prices: Vec<Price>) -> DomainPriceList {
        DomainPriceList {
            id: self.id,
            name: self.name,
            description: self.description,
            list_type: self.list_type.as_str().into(),
            status: self.status.as_str().into(),
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
            prices: prices.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<(PriceList, Vec<Price>)> for DomainPriceList {
    fn from(value: (PriceList, Vec<Price>)) -> Self {
        value.0.into_domain(value.1)
    }
}
