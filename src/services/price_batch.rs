//! Add, update and override the prices of one price list.
//!
//! The caller owns the transaction: every read and write here goes through the
//! [`PriceStore`] handed in, so an error anywhere rolls the whole batch back.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::price::{NewPrice, Price, PriceEntry, ScopingTuple, UpdatePrice};
use crate::repository::PriceStore;
use crate::services::{ServiceError, ServiceResult};

/// Counts of what a batch changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

/// Apply `entries` to the prices of `price_list_id`.
///
/// With `override_existing` every price not referenced by id in `entries` is
/// deleted before matching starts. Entries are then matched in input order:
/// by id when present (a miss is `NotFound`), otherwise by scoping tuple, and
/// unmatched entries become new prices. A later entry resolving to the same
/// scoping tuple as an earlier one updates the price the earlier one produced.
pub fn apply_price_batch(
    store: &mut dyn PriceStore,
    price_list_id: i32,
    entries: &[PriceEntry],
    override_existing: bool,
) -> ServiceResult<BatchSummary> {
    let tuples = entries
        .iter()
        .map(PriceEntry::validate)
        .collect::<Result<Vec<_>, _>>()?;

    if !store.price_list_exists(price_list_id)? {
        return Err(ServiceError::not_found(format!(
            "price list {price_list_id} not found"
        )));
    }

    let mut deleted = 0;
    if override_existing {
        let keep_ids: Vec<i32> = entries.iter().filter_map(|entry| entry.id).collect();
        deleted = store.delete_prices_except(price_list_id, &keep_ids)?;
    }

    let mut plan = BatchPlan::new(price_list_id, store.list_prices(price_list_id)?);
    for (entry, tuple) in entries.iter().zip(tuples) {
        plan.apply_entry(entry, tuple)?;
    }
    plan.ensure_unique_scopes()?;

    let (updates, creations) = plan.into_writes();

    for (price_id, update) in &updates {
        store.update_price(*price_id, price_list_id, update)?;
    }

    let created = if creations.is_empty() {
        0
    } else {
        store.create_prices(&creations)?.len()
    };

    let summary = BatchSummary {
        created,
        updated: updates.len(),
        deleted,
    };
    log::debug!("Applied price batch to price list {price_list_id}: {summary:?}");

    Ok(summary)
}

enum PlannedPrice {
    Existing { price: Price, touched: bool },
    New(NewPrice),
}

impl PlannedPrice {
    fn scoping_tuple(&self) -> Option<ScopingTuple> {
        match self {
            Self::Existing { price, .. } => price.scoping_tuple(),
            Self::New(new_price) => new_price.scoping_tuple(),
        }
    }

    fn is_touched(&self) -> bool {
        match self {
            Self::Existing { touched, .. } => *touched,
            Self::New(_) => true,
        }
    }

    fn assign(&mut self, entry: &PriceEntry) {
        match self {
            Self::Existing { price, touched } => {
                price.variant_id = entry.variant_id.clone();
                price.currency_code = entry.currency_code.as_deref().map(str::to_lowercase);
                price.region_id = entry.region_id.clone();
                price.amount = entry.amount;
                price.min_quantity = entry.min_quantity;
                price.max_quantity = entry.max_quantity;
                *touched = true;
            }
            Self::New(new_price) => {
                *new_price = NewPrice::from_entry(new_price.price_list_id, entry);
            }
        }
    }
}

/// In-memory view of the list's prices while a batch is being resolved.
struct BatchPlan {
    price_list_id: i32,
    slots: Vec<PlannedPrice>,
    by_id: HashMap<i32, usize>,
    by_scope: HashMap<ScopingTuple, usize>,
}

impl BatchPlan {
    fn new(price_list_id: i32, existing: Vec<Price>) -> Self {
        let mut plan = Self {
            price_list_id,
            slots: Vec::with_capacity(existing.len()),
            by_id: HashMap::with_capacity(existing.len()),
            by_scope: HashMap::with_capacity(existing.len()),
        };

        for price in existing {
            let slot = plan.slots.len();
            plan.by_id.insert(price.id, slot);
            if let Some(tuple) = price.scoping_tuple() {
                plan.by_scope.entry(tuple).or_insert(slot);
            }
            plan.slots.push(PlannedPrice::Existing {
                price,
                touched: false,
            });
        }

        plan
    }

    fn apply_entry(&mut self, entry: &PriceEntry, tuple: ScopingTuple) -> ServiceResult<()> {
        let slot = match entry.id {
            Some(price_id) => *self.by_id.get(&price_id).ok_or_else(|| {
                ServiceError::not_found(format!(
                    "price {price_id} not found in price list {}",
                    self.price_list_id
                ))
            })?,
            None => match self.by_scope.get(&tuple) {
                Some(slot) => *slot,
                None => {
                    self.by_scope.insert(tuple, self.slots.len());
                    self.slots.push(PlannedPrice::New(NewPrice::from_entry(
                        self.price_list_id,
                        entry,
                    )));
                    return Ok(());
                }
            },
        };

        let planned = self.slots.get_mut(slot).ok_or_else(|| {
            ServiceError::aborted(format!(
                "price slot {slot} missing while planning price list {}",
                self.price_list_id
            ))
        })?;

        let previous = planned.scoping_tuple();
        planned.assign(entry);

        if previous.as_ref() != Some(&tuple) {
            if let Some(previous) = previous {
                if self.by_scope.get(&previous) == Some(&slot) {
                    self.by_scope.remove(&previous);
                }
            }
            self.by_scope.insert(tuple, slot);
        }

        Ok(())
    }

    /// Reject plans where the batch leaves two prices with one scoping tuple.
    fn ensure_unique_scopes(&self) -> ServiceResult<()> {
        let mut seen: HashMap<ScopingTuple, bool> = HashMap::with_capacity(self.slots.len());

        for planned in &self.slots {
            let Some(tuple) = planned.scoping_tuple() else {
                continue;
            };
            let touched = planned.is_touched();
            match seen.get(&tuple) {
                Some(other_touched) if touched || *other_touched => {
                    return Err(ServiceError::invalid_argument(format!(
                        "more than one price for variant `{}` with the same scope and quantity bounds",
                        tuple.variant_id
                    )));
                }
                Some(_) => {}
                None => {
                    seen.insert(tuple, touched);
                }
            }
        }

        Ok(())
    }

    fn into_writes(self) -> (Vec<(i32, UpdatePrice)>, Vec<NewPrice>) {
        let mut updates = Vec::new();
        let mut creations = Vec::new();

        for planned in self.slots {
            match planned {
                PlannedPrice::Existing {
                    price,
                    touched: true,
                } => updates.push((price.id, UpdatePrice::from_price(&price))),
                PlannedPrice::Existing { .. } => {}
                PlannedPrice::New(new_price) => creations.push(new_price),
            }
        }

        (updates, creations)
    }
}
