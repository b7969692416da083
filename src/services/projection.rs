use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::price::Price;
use crate::domain::price_list::{PriceList, PriceListStatus, PriceListType};
use crate::repository::PriceListReader;
use crate::services::{ServiceError, ServiceResult};

/// Scalar attributes of a price list that a projection may include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceListField {
    Id,
    Name,
    Description,
    Type,
    Status,
    StartsAt,
    EndsAt,
    CreatedAt,
    UpdatedAt,
}

/// Related collections that a projection may include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceListRelation {
    Prices,
}

/// Fields and relations to load when rendering a price list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceListSelection {
    pub fields: Vec<PriceListField>,
    pub relations: Vec<PriceListRelation>,
}

impl PriceListSelection {
    /// Selection returned by the direct (legacy) update path.
    pub fn admin_default() -> Self {
        Self {
            fields: vec![
                PriceListField::Id,
                PriceListField::Name,
                PriceListField::Description,
                PriceListField::Type,
                PriceListField::Status,
                PriceListField::StartsAt,
                PriceListField::EndsAt,
                PriceListField::CreatedAt,
                PriceListField::UpdatedAt,
            ],
            relations: vec![PriceListRelation::Prices],
        }
    }

    /// Selection returned by the workflow update path.
    pub fn workflow_default() -> Self {
        Self {
            fields: vec![
                PriceListField::Id,
                PriceListField::Name,
                PriceListField::Description,
                PriceListField::Type,
                PriceListField::Status,
                PriceListField::StartsAt,
                PriceListField::EndsAt,
                PriceListField::UpdatedAt,
            ],
            relations: vec![PriceListRelation::Prices],
        }
    }

    pub fn includes(&self, field: PriceListField) -> bool {
        self.fields.contains(&field)
    }

    pub fn includes_relation(&self, relation: PriceListRelation) -> bool {
        self.relations.contains(&relation)
    }
}

/// Read-only snapshot of a price list limited to a [`PriceListSelection`].
///
/// Unselected attributes are `None` and left out of the serialized output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceListView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub list_type: Option<PriceListType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PriceListStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<Option<NaiveDateTime>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<Option<NaiveDateTime>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prices: Option<Vec<Price>>,
}

impl PriceListView {
    pub fn project(price_list: PriceList, selection: &PriceListSelection) -> Self {
        let PriceList {
            id,
            name,
            description,
            list_type,
            status,
            starts_at,
            ends_at,
            created_at,
            updated_at,
            prices,
        } = price_list;

        let pick = |field: PriceListField| selection.includes(field);

        Self {
            id: pick(PriceListField::Id).then_some(id),
            name: pick(PriceListField::Name).then_some(name),
            description: pick(PriceListField::Description).then_some(description),
            list_type: pick(PriceListField::Type).then_some(list_type),
            status: pick(PriceListField::Status).then_some(status),
            starts_at: pick(PriceListField::StartsAt).then_some(starts_at),
            ends_at: pick(PriceListField::EndsAt).then_some(ends_at),
            created_at: pick(PriceListField::CreatedAt).then_some(created_at),
            updated_at: pick(PriceListField::UpdatedAt).then_some(updated_at),
            prices: selection
                .includes_relation(PriceListRelation::Prices)
                .then_some(prices),
        }
    }
}

/// Reload a price list after a batch has committed.
pub fn project_price_list<R>(
    repo: &R,
    price_list_id: i32,
    selection: &PriceListSelection,
) -> ServiceResult<PriceListView>
where
    R: PriceListReader + ?Sized,
{
    let with_prices = selection.includes_relation(PriceListRelation::Prices);

    let price_list = repo
        .get_price_list_by_id(price_list_id, with_prices)?
        .ok_or_else(|| ServiceError::not_found(format!("price list {price_list_id} not found")))?;

    Ok(PriceListView::project(price_list, selection))
}
