use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::{
    domain::price::{
        NewPrice as DomainNewPrice, Price as DomainPrice, UpdatePrice as DomainUpdatePrice,
    },
    models::price::{
        NewPrice as DbNewPrice, Price as DbPrice, RestoredPrice as DbRestoredPrice,
        UpdatePrice as DbUpdatePrice,
    },
    repository::PriceStore,
    repository::errors::{RepositoryError, RepositoryResult},
};

/// [`PriceStore`] bound to a connection that already runs inside a transaction.
pub struct DieselPriceStore<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> DieselPriceStore<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }
}

impl PriceStore for DieselPriceStore<'_> {
    fn price_list_exists(&mut self, price_list_id: i32) -> RepositoryResult<bool> {
        use crate::schema::price_lists;

        let exists: bool = select(exists(
            price_lists::table.filter(price_lists::id.eq(price_list_id)),
        ))
        .get_result(&mut *self.conn)?;

        Ok(exists)
    }

    fn list_prices(&mut self, price_list_id: i32) -> RepositoryResult<Vec<DomainPrice>> {
        use crate::schema::prices;

        let rows = prices::table
            .filter(prices::price_list_id.eq(price_list_id))
            .order(prices::id.asc())
            .load::<DbPrice>(&mut *self.conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn delete_prices_except(
        &mut self,
        price_list_id: i32,
        keep_ids: &[i32],
    ) -> RepositoryResult<usize> {
        use crate::schema::prices;

        let deleted = if keep_ids.is_empty() {
            diesel::delete(prices::table.filter(prices::price_list_id.eq(price_list_id)))
                .execute(&mut *self.conn)?
        } else {
            let target = prices::table
                .filter(prices::price_list_id.eq(price_list_id))
                .filter(prices::id.ne_all(keep_ids));
            diesel::delete(target).execute(&mut *self.conn)?
        };

        Ok(deleted)
    }

    fn update_price(
        &mut self,
        price_id: i32,
        price_list_id: i32,
        updates: &DomainUpdatePrice,
    ) -> RepositoryResult<DomainPrice> {
        use crate::schema::prices;

        let db_updates = DbUpdatePrice::from(updates);

        let target = prices::table
            .filter(prices::id.eq(price_id))
            .filter(prices::price_list_id.eq(price_list_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbPrice>(&mut *self.conn)?;

        Ok(updated.into())
    }

    fn create_prices(
        &mut self,
        new_prices: &[DomainNewPrice],
    ) -> RepositoryResult<Vec<DomainPrice>> {
        use crate::schema::prices;

        let mut created = Vec::with_capacity(new_prices.len());
        for new_price in new_prices {
            let row = diesel::insert_into(prices::table)
                .values(&DbNewPrice::from(new_price))
                .get_result::<DbPrice>(&mut *self.conn)?;
            created.push(row.into());
        }

        Ok(created)
    }

    fn delete_prices(&mut self, price_list_id: i32, price_ids: &[i32]) -> RepositoryResult<usize> {
        use crate::schema::prices;

        if price_ids.is_empty() {
            return Ok(0);
        }

        let target = prices::table
            .filter(prices::price_list_id.eq(price_list_id))
            .filter(prices::id.eq_any(price_ids));

        Ok(diesel::delete(target).execute(&mut *self.conn)?)
    }

    fn restore_prices(
        &mut self,
        price_list_id: i32,
        prices_to_restore: &[DomainPrice],
    ) -> RepositoryResult<()> {
        use crate::schema::prices;

        if prices_to_restore
            .iter()
            .any(|price| price.price_list_id != price_list_id)
        {
            return Err(RepositoryError::NotFound);
        }

        for price in prices_to_restore {
            diesel::insert_into(prices::table)
                .values(&DbRestoredPrice::from(price))
                .execute(&mut *self.conn)?;
        }

        Ok(())
    }
}
