//! Entry point for batch price updates.
//!
//! A batch runs either directly inside one database transaction or through
//! the update-price-lists workflow. The feature flag
//! [`WORKFLOW_PRICE_UPDATES_FLAG`] picks the path once per request; both
//! paths end with the same price set and differ only in the projection they
//! return.

use crate::domain::price_list::BatchRequest;
use crate::repository::{PriceListReader, TransactionProvider};
use crate::services::feature_flags::{FeatureFlagRouter, WORKFLOW_PRICE_UPDATES_FLAG};
use crate::services::price_batch::apply_price_batch;
use crate::services::projection::{PriceListSelection, PriceListView, project_price_list};
use crate::services::{ServiceError, ServiceResult};
use crate::workflows::{UpdatePriceListsInput, WorkflowEngine};

/// One way of getting a batch into the store.
pub trait PriceBatchStrategy {
    fn name(&self) -> &'static str;

    /// Apply the batch atomically.
    fn apply(&self, request: &BatchRequest) -> ServiceResult<()>;

    /// Projection returned to the caller once `apply` succeeded.
    fn selection(&self) -> PriceListSelection;
}

/// Applies the batch inside a single transaction of the repository.
pub struct LegacyPriceBatch<'a, R> {
    repo: &'a R,
}

impl<'a, R> LegacyPriceBatch<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }
}

impl<R> PriceBatchStrategy for LegacyPriceBatch<'_, R>
where
    R: TransactionProvider,
{
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn apply(&self, request: &BatchRequest) -> ServiceResult<()> {
        let summary = self.repo.transaction(|store| {
            apply_price_batch(
                store,
                request.price_list_id,
                &request.prices,
                request.override_existing,
            )
        })?;

        log::info!(
            "Updated price list {}: {} created, {} updated, {} deleted",
            request.price_list_id,
            summary.created,
            summary.updated,
            summary.deleted
        );

        Ok(())
    }

    fn selection(&self) -> PriceListSelection {
        PriceListSelection::admin_default()
    }
}

/// Submits the batch to the workflow engine and waits for it to finish.
pub struct WorkflowPriceBatch<'a, W> {
    engine: &'a W,
}

impl<'a, W> WorkflowPriceBatch<'a, W> {
    pub fn new(engine: &'a W) -> Self {
        Self { engine }
    }
}

impl<W> PriceBatchStrategy for WorkflowPriceBatch<'_, W>
where
    W: WorkflowEngine,
{
    fn name(&self) -> &'static str {
        "workflow"
    }

    fn apply(&self, request: &BatchRequest) -> ServiceResult<()> {
        let input = UpdatePriceListsInput::from(request);
        self.engine
            .run_update_price_lists(&input)
            .map_err(ServiceError::from)
    }

    fn selection(&self) -> PriceListSelection {
        PriceListSelection::workflow_default()
    }
}

/// Applies batch price updates and returns the refreshed price list.
pub struct PriceListBatchHandler<R, W, F> {
    repo: R,
    workflows: W,
    flags: F,
}

impl<R, W, F> PriceListBatchHandler<R, W, F>
where
    R: TransactionProvider + PriceListReader,
    W: WorkflowEngine,
    F: FeatureFlagRouter,
{
    pub fn new(repo: R, workflows: W, flags: F) -> Self {
        Self {
            repo,
            workflows,
            flags,
        }
    }

    /// Apply `request` on the path selected by the feature flag.
    pub fn handle(&self, request: &BatchRequest) -> ServiceResult<PriceListView> {
        let use_workflow = self.flags.is_feature_enabled(WORKFLOW_PRICE_UPDATES_FLAG);
        self.handle_with(request, use_workflow)
    }

    /// Apply `request` on an explicitly chosen path.
    pub fn handle_with(
        &self,
        request: &BatchRequest,
        use_workflow: bool,
    ) -> ServiceResult<PriceListView> {
        if use_workflow {
            self.run(&WorkflowPriceBatch::new(&self.workflows), request)
        } else {
            self.run(&LegacyPriceBatch::new(&self.repo), request)
        }
    }

    fn run(
        &self,
        strategy: &dyn PriceBatchStrategy,
        request: &BatchRequest,
    ) -> ServiceResult<PriceListView> {
        log::info!(
            "Applying {} price(s) to price list {} via {} path (override: {})",
            request.prices.len(),
            request.price_list_id,
            strategy.name(),
            request.override_existing
        );

        if let Err(err) = strategy.apply(request) {
            log::warn!(
                "Batch update of price list {} failed on {} path: {err}",
                request.price_list_id,
                strategy.name()
            );
            return Err(err);
        }

        project_price_list(&self.repo, request.price_list_id, &strategy.selection())
    }
}
