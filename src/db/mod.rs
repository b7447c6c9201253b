pub mod log;
pub mod migrate;
pub mod pool;
pub mod schema;
pub mod stats;
