use mockall::mock;

use super::errors::{RepositoryError, RepositoryResult};
use super::{PriceListReader, PriceStore, TransactionProvider};
use crate::domain::{
    price::{NewPrice, Price, UpdatePrice},
    price_list::PriceList,
};

mock! {
    pub PriceListReader {}

    impl PriceListReader for PriceListReader {
        fn get_price_list_by_id(&self, id: i32, with_prices: bool) -> RepositoryResult<Option<PriceList>>;
    }
}

mock! {
    pub PriceStore {}

    impl PriceStore for PriceStore {
        fn price_list_exists(&mut self, price_list_id: i32) -> RepositoryResult<bool>;
        fn list_prices(&mut self, price_list_id: i32) -> RepositoryResult<Vec<Price>>;
        fn delete_prices_except(&mut self, price_list_id: i32, keep_ids: &[i32]) -> RepositoryResult<usize>;
        fn update_price(&mut self, price_id: i32, price_list_id: i32, updates: &UpdatePrice) -> RepositoryResult<Price>;
        fn create_prices(&mut self, new_prices: &[NewPrice]) -> RepositoryResult<Vec<Price>>;
        fn delete_prices(&mut self, price_list_id: i32, price_ids: &[i32]) -> RepositoryResult<usize>;
        fn restore_prices(&mut self, price_list_id: i32, prices: &[Price]) -> RepositoryResult<()>;
    }
}

/// Transaction provider that hands out a single mocked store.
///
/// Mocks cannot roll back, so tests assert on the calls the store receives.
pub struct MockTransactions {
    pub store: std::sync::Mutex<MockPriceStore>,
    pub reader: MockPriceListReader,
}

impl MockTransactions {
    pub fn new(store: MockPriceStore, reader: MockPriceListReader) -> Self {
        Self {
            store: std::sync::Mutex::new(store),
            reader,
        }
    }
}

impl TransactionProvider for MockTransactions {
    fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn PriceStore) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let mut guard = self.store.lock().expect("store mutex poisoned");
        f(&mut *guard)
    }
}

impl PriceListReader for MockTransactions {
    fn get_price_list_by_id(
        &self,
        id: i32,
        with_prices: bool,
    ) -> RepositoryResult<Option<PriceList>> {
        self.reader.get_price_list_by_id(id, with_prices)
    }
}
