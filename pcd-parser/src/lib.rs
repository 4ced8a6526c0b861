pub mod collector;
pub mod parsers;

pub use collector::{Collected, PointCollector};
pub use parsers::{parse_file, Format, Parser, ParserProvider};
