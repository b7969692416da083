pub mod price_lists;
