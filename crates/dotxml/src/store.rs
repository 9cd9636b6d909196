//! Path-addressed configuration store backed by an XML file

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, instrument, warn};

use crate::error::{ErrorKind, LoadError, PersistError};
use crate::path;
use crate::printer;
use crate::xml::{self, Document};

/// Value returned by [`ConfigStore::get_option`] and
/// [`ConfigStore::get_attribute`] when nothing is found
pub const UNAVAILABLE: &str = "N/A";

/// Prefix of the file a modified configuration is written to
pub const DEFAULT_OUTPUT_PREFIX: &str = "_";

/// Options for a [`ConfigStore`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreOptions {
    /// Returned in place of a value that could not be found
    pub sentinel: String,
    /// Prepended to the source file name when writing back
    pub output_prefix: String,
    /// Directory to write back into (current directory when `None`)
    pub output_dir: Option<PathBuf>,
    /// Limits applied while parsing the source file
    pub parser: xml::Config,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            sentinel: UNAVAILABLE.to_string(),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            output_dir: None,
            parser: xml::Config::default(),
        }
    }
}

impl StoreOptions {
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    pub fn with_output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.output_prefix = prefix.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub const fn with_parser(mut self, parser: xml::Config) -> Self {
        self.parser = parser;
        self
    }
}

/// An XML configuration file opened for dotted-path reads and writes.
///
/// Paths are resolved from the document root, so `Settings.value` names the
/// `value` child of the root's first `Settings` child. Changes stay in memory
/// until [`close`](Self::close) writes them to `_<file name>`; a modified
/// store that is dropped without being closed writes on drop and only logs
/// failures.
#[derive(Debug)]
pub struct ConfigStore {
    options: StoreOptions,
    source: Option<PathBuf>,
    document: Option<Document>,
    dirty: bool,
    closed: bool,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    /// Create an empty store with default options
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    /// Create an empty store with custom options
    pub fn with_options(options: StoreOptions) -> Self {
        debug!("dotxml config store version {}", env!("CARGO_PKG_VERSION"));
        Self {
            options,
            source: None,
            document: None,
            dirty: false,
            closed: false,
        }
    }

    /// Create a store and load `path` into it
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let mut store = Self::new();
        store.load(path)?;
        Ok(store)
    }

    /// Create a store with custom options and load `path` into it
    pub fn open_with_options(
        path: impl AsRef<Path>,
        options: StoreOptions,
    ) -> Result<Self, LoadError> {
        let mut store = Self::with_options(options);
        store.load(path)?;
        Ok(store)
    }

    /// Read and parse `path`.
    ///
    /// The file is read before anything is parsed, so a missing or unreadable
    /// file is reported as [`LoadError::FileNotAccessible`]. A store holds one
    /// document for its whole life and rejects a second load.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        if let Some(current) = self.loaded_source() {
            return Err(LoadError::AlreadyLoaded {
                path: current.to_path_buf(),
            });
        }

        let bytes = fs::read(path).map_err(|source| {
            error!("could not open file '{}': {}", path.display(), source);
            LoadError::FileNotAccessible {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let mut parser = xml::Parser::with_config(&bytes, self.options.parser);
        let document = parser.parse().map_err(|source| {
            if source.kind() == &ErrorKind::MissingRoot {
                error!("XML file '{}' has no document root node", path.display());
                LoadError::NoRootElement {
                    path: path.to_path_buf(),
                }
            } else {
                error!("could not load XML file '{}': {}", path.display(), source);
                LoadError::Parse {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        info!(
            "configuration file '{}' loaded, root node '{}'",
            path.display(),
            document.root.name
        );
        self.source = Some(path.to_path_buf());
        self.document = Some(document);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    /// Whether any value has been changed since load
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Path the store was loaded from
    pub fn source_path(&self) -> Option<&Path> {
        self.loaded_source()
    }

    pub fn root_name(&self) -> Option<&str> {
        self.document.as_ref().map(|doc| doc.root.name.as_str())
    }

    /// Whether `path` names an element
    pub fn exists(&self, path: &str) -> bool {
        self.find(path).is_some()
    }

    /// Text of the element at `path`.
    ///
    /// `Some("")` for an element without text, `None` when there is no such
    /// element.
    pub fn option(&self, path: &str) -> Option<String> {
        self.find(path)
            .map(|element| element.text().unwrap_or_default().to_string())
    }

    /// Like [`option`](Self::option), with the sentinel in place of `None`
    pub fn get_option(&self, path: &str) -> String {
        self.option(path)
            .unwrap_or_else(|| self.options.sentinel.clone())
    }

    /// Value of attribute `name` on the element at `path`
    pub fn attribute(&self, path: &str, name: &str) -> Option<String> {
        self.find(path)
            .and_then(|element| element.attribute(name))
            .map(str::to_string)
    }

    /// Like [`attribute`](Self::attribute), with the sentinel in place of `None`
    pub fn get_attribute(&self, path: &str, name: &str) -> String {
        self.attribute(path, name)
            .unwrap_or_else(|| self.options.sentinel.clone())
    }

    /// Replace the text of the element at `path`.
    ///
    /// Returns `false` and changes nothing when the element does not exist.
    pub fn set_option(&mut self, path: &str, value: impl Into<String>) -> bool {
        let Some(element) = self.find_mut(path) else {
            return false;
        };
        element.set_text(value);
        self.dirty = true;
        true
    }

    /// Replace the value of an existing attribute.
    ///
    /// Attributes are never created; returns `false` and changes nothing when
    /// either the element or the attribute is missing.
    pub fn set_attribute(&mut self, path: &str, name: &str, value: impl Into<String>) -> bool {
        let Some(slot) = self
            .find_mut(path)
            .and_then(|element| element.attributes.get_mut(name))
        else {
            return false;
        };
        *slot = value.into();
        self.dirty = true;
        true
    }

    /// Rendered tree, see [`printer::render`]
    pub fn render(&self) -> Option<String> {
        self.document.as_ref().map(|doc| printer::render(&doc.root))
    }

    /// Log the rendered tree, one event per line
    pub fn print_config_file(&self) {
        match self.render() {
            Some(rendered) => {
                for line in rendered.lines() {
                    info!("{line}");
                }
            }
            None => error!("empty XML document"),
        }
    }

    /// File a modified configuration is written to: the source file name,
    /// without its directory, behind the output prefix.
    pub fn output_path(&self) -> Option<PathBuf> {
        let file_name = self.loaded_source()?.file_name()?.to_string_lossy();
        let name = format!("{}{}", self.options.output_prefix, file_name);
        Some(match &self.options.output_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        })
    }

    /// Finish with the store, writing the document back when it was
    /// modified.
    ///
    /// Returns the written path, or `None` when there was nothing to write.
    pub fn close(mut self) -> Result<Option<PathBuf>, PersistError> {
        self.closed = true;
        self.persist()
    }

    fn persist(&self) -> Result<Option<PathBuf>, PersistError> {
        let Some(document) = self.document.as_ref().filter(|_| self.dirty) else {
            return Ok(None);
        };

        let target = self.output_path().ok_or_else(|| {
            let path = self.source.clone().unwrap_or_default();
            error!("no file name to write '{}' back to", path.display());
            PersistError::NoFileName { path }
        })?;

        info!("writing XML document {} ...", target.display());
        fs::write(&target, xml::to_string(document)).map_err(|source| {
            error!("could not write XML file '{}': {}", target.display(), source);
            PersistError::Write {
                path: target.clone(),
                source,
            }
        })?;
        info!("XML document written successfully");
        Ok(Some(target))
    }

    fn loaded_source(&self) -> Option<&Path> {
        self.document.as_ref().and(self.source.as_deref())
    }

    fn find(&self, path: &str) -> Option<&xml::Element> {
        let Some(document) = &self.document else {
            warn!("lookup of '{path}' on an empty XML document");
            return None;
        };
        let found = path::resolve(&document.root, path);
        if found.is_none() {
            debug!("no element at '{path}'");
        }
        found
    }

    fn find_mut(&mut self, path: &str) -> Option<&mut xml::Element> {
        let Some(document) = &mut self.document else {
            warn!("update of '{path}' on an empty XML document");
            return None;
        };
        let found = path::resolve_mut(&mut document.root, path);
        if found.is_none() {
            debug!("no element at '{path}'");
        }
        found
    }
}

impl Drop for ConfigStore {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        // failures are already logged
        let _ = self.persist();
    }
}
