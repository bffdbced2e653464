//! Code generation module

mod code_generator;
mod declarations;
mod naming;
mod swift_writer;
mod type_resolver;

pub use code_generator::*;
pub use declarations::*;
pub use naming::*;
pub use swift_writer::*;
pub use type_resolver::*;
