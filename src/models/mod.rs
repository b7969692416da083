pub mod price;
pub mod price_list;
