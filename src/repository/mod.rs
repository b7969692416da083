use crate::db::{DbConnection, DbPool};
use crate::domain::price::{NewPrice, Price, UpdatePrice};
use crate::domain::price_list::PriceList;

use self::errors::{RepositoryError, RepositoryResult};

pub mod errors;
pub mod price;
pub mod price_list;

#[cfg(test)]
pub mod mock;

pub use price::DieselPriceStore;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only access to price lists.
pub trait PriceListReader {
    /// Load a price list by id, including its prices when `with_prices` is set.
    ///
    /// The list row and its prices are read from one consistent snapshot.
    fn get_price_list_by_id(
        &self,
        id: i32,
        with_prices: bool,
    ) -> RepositoryResult<Option<PriceList>>;
}

/// Price operations available inside an open transaction.
///
/// Every method is scoped by `price_list_id`; rows of other lists are never
/// read or touched.
pub trait PriceStore {
    fn price_list_exists(&mut self, price_list_id: i32) -> RepositoryResult<bool>;
    fn list_prices(&mut self, price_list_id: i32) -> RepositoryResult<Vec<Price>>;
    /// Delete every price of the list whose id is not in `keep_ids`.
    fn delete_prices_except(
        &mut self,
        price_list_id: i32,
        keep_ids: &[i32],
    ) -> RepositoryResult<usize>;
    fn update_price(
        &mut self,
        price_id: i32,
        price_list_id: i32,
        updates: &UpdatePrice,
    ) -> RepositoryResult<Price>;
    fn create_prices(&mut self, new_prices: &[NewPrice]) -> RepositoryResult<Vec<Price>>;
    /// Delete the given prices of the list. Ids of other lists are ignored.
    fn delete_prices(&mut self, price_list_id: i32, price_ids: &[i32]) -> RepositoryResult<usize>;
    /// Re-insert previously read prices with their original ids and timestamps.
    fn restore_prices(&mut self, price_list_id: i32, prices: &[Price]) -> RepositoryResult<()>;
}

/// Opens transactions over a [`PriceStore`].
///
/// The closure's writes commit when it returns `Ok` and roll back when it
/// returns `Err`.
pub trait TransactionProvider {
    fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn PriceStore) -> Result<T, E>,
        E: From<RepositoryError>;
}

/// Keeps a caller error apart from a failure of the transaction itself.
enum TransactionError<E> {
    Aborted(E),
    Database(diesel::result::Error),
}

impl<E> From<diesel::result::Error> for TransactionError<E> {
    fn from(value: diesel::result::Error) -> Self {
        Self::Database(value)
    }
}

impl TransactionProvider for DieselRepository {
    fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn PriceStore) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let mut conn = self.conn().map_err(E::from)?;

        // BEGIN IMMEDIATE takes the write lock before the first read, so
        // concurrent batches on the same database serialize.
        conn.immediate_transaction(|conn| {
            let mut store = DieselPriceStore::new(conn);
            f(&mut store).map_err(TransactionError::Aborted)
        })
        .map_err(|err| match err {
            TransactionError::Aborted(inner) => inner,
            TransactionError::Database(db_err) => E::from(RepositoryError::from(db_err)),
        })
    }
}
