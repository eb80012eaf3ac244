pub mod csv_source;
pub mod factory;
pub mod mock;
pub mod persistence;

pub use csv_source::{CsvPriceSource, CsvSeriesSink};
pub use factory::ServiceFactory;
pub use mock::SyntheticPriceSource;
pub use persistence::SqlitePriceSource;
