//! Lexer support shared by the XML parser

pub mod cursor;

pub use cursor::Cursor;
