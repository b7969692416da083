use diesel::prelude::*;

use crate::{
    domain::price_list::PriceList as DomainPriceList,
    models::{price::Price as DbPrice, price_list::PriceList as DbPriceList},
    repository::errors::{RepositoryError, RepositoryResult},
    repository::{DieselRepository, PriceListReader},
};

impl PriceListReader for DieselRepository {
    fn get_price_list_by_id(
        &self,
        id: i32,
        with_prices: bool,
    ) -> RepositoryResult<Option<DomainPriceList>> {
        use crate::schema::{price_lists, prices};

        let mut conn = self.conn()?;

        conn.transaction(|conn| {
            let price_list = price_lists::table
                .filter(price_lists::id.eq(id))
                .first::<DbPriceList>(conn)
                .optional()?;

            let Some(price_list) = price_list else {
                return Ok(None);
            };

            let rows = if with_prices {
                DbPrice::belonging_to(&price_list)
                    .order(prices::id.asc())
                    .load::<DbPrice>(conn)?
            } else {
                Vec::new()
            };

            Ok::<_, diesel::result::Error>(Some(DomainPriceList::from((price_list, rows))))
        })
        .map_err(RepositoryError::from)
    }
}
