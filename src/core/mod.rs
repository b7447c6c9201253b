pub mod config;
pub mod dedup;
pub mod ingest;
pub mod loader;
pub mod log;
pub mod normalize;
pub mod pipeline;
pub mod report;
