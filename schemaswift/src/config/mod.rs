//! Configuration for schemaswift

pub mod defaults;
mod settings;

pub use settings::*;
