pub mod application;
pub mod raw_table;
pub mod status;
pub mod value;

pub use application::{ApplicationRecord, ApplicationTable};
pub use raw_table::RawTable;
pub use status::{DeviceClass, JobpageStatus};
pub use value::Value;
