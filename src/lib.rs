pub mod data_loader;
pub mod error;
pub mod fetch;
pub mod league_context;
pub mod report;
pub mod rows;
pub mod stats;
pub mod store;
pub mod util;
