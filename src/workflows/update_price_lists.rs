use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::price::{Price, PriceEntry};
use crate::domain::price_list::BatchRequest;
use crate::repository::TransactionProvider;
use crate::repository::errors::RepositoryError;
use crate::services::price_batch::{BatchSummary, apply_price_batch};
use crate::services::{ServiceError, ServiceResult};
use crate::workflows::{Workflow, WorkflowResult, WorkflowStep};

pub const UPDATE_PRICE_LISTS_WORKFLOW: &str = "update-price-lists";

/// Price changes for one price list inside an [`UpdatePriceListsInput`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceListPricesUpdate {
    pub id: i32,
    pub prices: Vec<PriceEntry>,
    #[serde(rename = "override", default)]
    pub override_existing: bool,
}

/// Update intent submitted to the workflow engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePriceListsInput {
    pub price_lists: Vec<PriceListPricesUpdate>,
}

impl From<&BatchRequest> for UpdatePriceListsInput {
    fn from(request: &BatchRequest) -> Self {
        Self {
            price_lists: vec![PriceListPricesUpdate {
                id: request.price_list_id,
                prices: request.prices.clone(),
                override_existing: request.override_existing,
            }],
        }
    }
}

/// Runs the update-price-lists workflow to completion or compensates it.
pub trait WorkflowEngine {
    fn run_update_price_lists(&self, input: &UpdatePriceListsInput) -> WorkflowResult<()>;
}

/// Workflow engine executing steps in-process against the price repository.
#[derive(Clone)]
pub struct LocalWorkflowEngine<R> {
    repo: R,
}

impl<R> LocalWorkflowEngine<R>
where
    R: TransactionProvider,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    fn update_price_lists_workflow(&self) -> Workflow<'_, UpdatePriceListsContext> {
        Workflow::new(UPDATE_PRICE_LISTS_WORKFLOW)
            .step(ValidatePriceListsStep { repo: &self.repo })
            .step(UpsertPriceListPricesStep { repo: &self.repo })
    }
}

impl<R> WorkflowEngine for LocalWorkflowEngine<R>
where
    R: TransactionProvider,
{
    fn run_update_price_lists(&self, input: &UpdatePriceListsInput) -> WorkflowResult<()> {
        let workflow = self.update_price_lists_workflow();
        let mut ctx = UpdatePriceListsContext::new(input.clone());

        workflow.run(&mut ctx)?;

        for (price_list_id, summary) in &ctx.summaries {
            log::info!(
                "Workflow `{}` updated price list {price_list_id}: {} created, {} updated, {} deleted",
                workflow.name(),
                summary.created,
                summary.updated,
                summary.deleted
            );
        }

        Ok(())
    }
}

/// State shared by the steps of one workflow run.
pub struct UpdatePriceListsContext {
    input: UpdatePriceListsInput,
    /// Row changes of every list already committed by this run.
    changes: Vec<PriceListChanges>,
    summaries: Vec<(i32, BatchSummary)>,
}

impl UpdatePriceListsContext {
    fn new(input: UpdatePriceListsInput) -> Self {
        Self {
            input,
            changes: Vec::new(),
            summaries: Vec::new(),
        }
    }
}

/// Rows one committed upsert changed, as before and after images.
#[derive(Debug, Clone, Default, PartialEq)]
struct PriceListChanges {
    price_list_id: i32,
    /// Rows inserted by the run, as written.
    created: Vec<Price>,
    /// `(before, as written)` pairs of rows the run updated.
    updated: Vec<(Price, Price)>,
    /// Rows the run deleted, as they were before.
    deleted: Vec<Price>,
}

/// Writes that undo a [`PriceListChanges`] against the current rows.
#[derive(Debug, Default, PartialEq)]
struct UndoPlan {
    delete_ids: Vec<i32>,
    restore: Vec<Price>,
    /// Rows left alone because another writer changed them since.
    skipped: usize,
}

impl PriceListChanges {
    fn diff(price_list_id: i32, before: Vec<Price>, after: Vec<Price>) -> Self {
        let mut before: HashMap<i32, Price> =
            before.into_iter().map(|price| (price.id, price)).collect();
        let mut changes = Self {
            price_list_id,
            ..Self::default()
        };

        for written in after {
            match before.remove(&written.id) {
                Some(previous) if previous != written => {
                    changes.updated.push((previous, written))
                }
                Some(_) => {}
                None => changes.created.push(written),
            }
        }

        changes.deleted = before.into_values().collect();
        changes.deleted.sort_by_key(|price| price.id);
        changes
    }

    fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }

    /// Undo only rows that still look exactly as this run left them.
    fn undo_plan(&self, current: &[Price]) -> UndoPlan {
        let current: HashMap<i32, &Price> = current.iter().map(|price| (price.id, price)).collect();
        let mut plan = UndoPlan::default();

        for written in &self.created {
            if current.get(&written.id) == Some(&written) {
                plan.delete_ids.push(written.id);
            } else {
                plan.skipped += 1;
            }
        }

        for (previous, written) in &self.updated {
            if current.get(&written.id) == Some(&written) {
                plan.delete_ids.push(written.id);
                plan.restore.push(previous.clone());
            } else {
                plan.skipped += 1;
            }
        }

        for previous in &self.deleted {
            if current.contains_key(&previous.id) {
                plan.skipped += 1;
            } else {
                plan.restore.push(previous.clone());
            }
        }

        plan
    }
}

/// Fails fast on malformed entries or missing price lists before anything commits.
struct ValidatePriceListsStep<'a, R> {
    repo: &'a R,
}

impl<R> WorkflowStep<UpdatePriceListsContext> for ValidatePriceListsStep<'_, R>
where
    R: TransactionProvider,
{
    fn name(&self) -> &'static str {
        "validate-price-lists"
    }

    fn invoke(&self, ctx: &mut UpdatePriceListsContext) -> ServiceResult<()> {
        for update in &ctx.input.price_lists {
            for entry in &update.prices {
                entry.validate()?;
            }
        }

        let ids: Vec<i32> = ctx.input.price_lists.iter().map(|update| update.id).collect();
        self.repo.transaction(|store| -> ServiceResult<()> {
            for id in ids {
                if !store.price_list_exists(id)? {
                    return Err(ServiceError::not_found(format!("price list {id} not found")));
                }
            }
            Ok(())
        })
    }
}

/// Applies each list's batch in its own transaction, recording the rows it changed.
struct UpsertPriceListPricesStep<'a, R> {
    repo: &'a R,
}

impl<R> WorkflowStep<UpdatePriceListsContext> for UpsertPriceListPricesStep<'_, R>
where
    R: TransactionProvider,
{
    fn name(&self) -> &'static str {
        "upsert-price-list-prices"
    }

    fn invoke(&self, ctx: &mut UpdatePriceListsContext) -> ServiceResult<()> {
        for update in &ctx.input.price_lists {
            let (changes, summary) = self.repo.transaction(|store| {
                let before = store.list_prices(update.id)?;
                let summary =
                    apply_price_batch(store, update.id, &update.prices, update.override_existing)?;
                let after = store.list_prices(update.id)?;
                Ok::<_, ServiceError>((PriceListChanges::diff(update.id, before, after), summary))
            })?;

            ctx.changes.push(changes);
            ctx.summaries.push((update.id, summary));
        }

        Ok(())
    }

    fn compensate(&self, ctx: &mut UpdatePriceListsContext) -> ServiceResult<()> {
        while let Some(changes) = ctx.changes.pop() {
            if changes.is_empty() {
                continue;
            }

            let price_list_id = changes.price_list_id;
            let plan = self
                .repo
                .transaction(|store| {
                    let plan = changes.undo_plan(&store.list_prices(price_list_id)?);
                    store.delete_prices(price_list_id, &plan.delete_ids)?;
                    store.restore_prices(price_list_id, &plan.restore)?;
                    Ok::<_, RepositoryError>(plan)
                })
                .map_err(ServiceError::from)?;

            if plan.skipped > 0 {
                log::warn!(
                    "Left {} price(s) of price list {price_list_id} as changed by another writer",
                    plan.skipped
                );
            }
            log::info!("Reverted prices of price list {price_list_id}");
        }
        ctx.summaries.clear();

        Ok(())
    }
}
