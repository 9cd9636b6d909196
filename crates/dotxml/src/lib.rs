//! dotxml - dotted-path access to XML configuration files
//!
//! # Quick Start
//!
//! ```no_run
//! use dotxml::ConfigStore;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = ConfigStore::open("app.xml")?;
//! let port = store.get_option("Settings.network.port");
//! let mode = store.get_attribute("Settings", "mode");
//! if store.set_option("Settings.network.port", "8080") {
//!     // written to ./_app.xml
//!     store.close()?;
//! }
//! # let _ = (port, mode);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, LoadError, PersistError, Pos, Result, Span};

pub mod lexer;

pub mod xml;
pub use xml::{
    Config as XmlConfig, Content as XmlContent, Document as XmlDocument, Element as XmlElement,
    Parser as XmlParser,
};

pub mod path;
pub mod printer;

pub mod store;
pub use store::{ConfigStore, StoreOptions, UNAVAILABLE};

/// Parse XML from string
pub fn from_xml_str(s: &str) -> Result<XmlDocument> {
    let mut parser = XmlParser::new(s.as_bytes());
    parser.parse()
}

/// Parse XML from bytes
pub fn from_xml_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    let mut parser = XmlParser::new(bytes);
    parser.parse()
}

/// Serialize an XML document
pub fn to_xml_string(doc: &XmlDocument) -> String {
    xml::to_string(doc)
}
