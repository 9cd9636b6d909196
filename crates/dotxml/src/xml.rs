//! XML parser, data model and serializer

pub mod model;
pub mod parser;
pub mod writer;

pub use model::{Content, Document, Element};
pub use parser::{Config, Parser, MAX_NESTING};
pub use writer::to_string;
