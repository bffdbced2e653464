//! Schema model and schema readers (PostgreSQL DDL via sqlparser-rs, JSON snapshots)

mod metadata;
mod reader;
mod schema_parser;

pub use metadata::*;
pub use reader::*;
pub use schema_parser::*;
