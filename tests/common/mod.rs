//! Helpers for integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use diesel::prelude::*;
use tempfile::TempDir;

use price_lists::db::{DbPool, establish_connection_pool, run_migrations};
use price_lists::domain::price::{NewPrice, Price, PriceEntry};
use price_lists::repository::errors::RepositoryError;
use price_lists::repository::{DieselRepository, PriceListReader, TransactionProvider};
use price_lists::schema::price_lists as price_lists_table;

/// Temporary database used in integration tests.
///
/// Fields drop in order, so the pool closes before the directory is removed.
pub struct TestDb {
    pool: DbPool,
    path: PathBuf,
    dir: TempDir,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir.");
        let path = dir.path().join(filename);

        let pool = establish_connection_pool(&path.to_string_lossy())
            .expect("Failed to establish SQLite connection.");
        run_migrations(&pool).expect("Migrations failed");

        TestDb { pool, path, dir }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Insert an empty price list and return its id.
pub fn insert_price_list(db: &TestDb, name: &str) -> i32 {
    let mut conn = db.pool().get().expect("Failed to get SQLite connection.");
    diesel::insert_into(price_lists_table::table)
        .values((
            price_lists_table::name.eq(name),
            price_lists_table::list_type.eq("sale"),
            price_lists_table::status.eq("active"),
        ))
        .returning(price_lists_table::id)
        .get_result(&mut conn)
        .expect("Failed to insert price list.")
}

/// Insert prices straight into a list, bypassing the batch logic.
pub fn seed_prices(db: &TestDb, price_list_id: i32, entries: &[PriceEntry]) -> Vec<Price> {
    let new_prices: Vec<NewPrice> = entries
        .iter()
        .map(|entry| NewPrice::from_entry(price_list_id, entry))
        .collect();

    db.repo()
        .transaction::<_, RepositoryError, _>(|store| store.create_prices(&new_prices))
        .expect("Failed to seed prices.")
}

pub fn prices_of(db: &TestDb, price_list_id: i32) -> Vec<Price> {
    db.repo()
        .get_price_list_by_id(price_list_id, true)
        .expect("Failed to load price list.")
        .expect("Price list missing.")
        .prices
}

/// Price attributes that survive an override, ignoring ids and timestamps.
pub type PriceContent = (
    String,
    Option<String>,
    Option<String>,
    i64,
    Option<i32>,
    Option<i32>,
);

pub fn content_of(prices: &[Price]) -> Vec<PriceContent> {
    let mut content: Vec<PriceContent> = prices
        .iter()
        .map(|price| {
            (
                price.variant_id.clone(),
                price.currency_code.clone(),
                price.region_id.clone(),
                price.amount,
                price.min_quantity,
                price.max_quantity,
            )
        })
        .collect();
    content.sort();
    content
}
