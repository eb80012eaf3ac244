pub mod database;

pub use database::SqlitePriceSource;
