pub mod raw_records;

pub use raw_records::{load_raw_records, parse_raw_records};
