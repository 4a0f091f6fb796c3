pub mod config;
pub mod conversion;
pub mod observability;
pub mod parser;
pub mod sources;
pub mod store;
pub mod timezone;

pub use parser::{MetersParser, ParseError, RawRecord};
