//! XML data model

use indexmap::IndexMap;

/// XML document
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// Raw XML declaration, e.g. `version="1.0" encoding="UTF-8"`
    pub declaration: Option<String>,
    /// Comments preceding the root element
    pub prolog: Vec<String>,
    pub root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            declaration: None,
            prolog: Vec::new(),
            root,
        }
    }
}

/// XML element
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Content>,
}

/// XML content node
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Element(Element),
    Text(String),
    Comment(String),
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Text of the element.
    ///
    /// Only a leading text node counts: `<a>x<b/></a>` has text `x`, while
    /// `<a><!--c-->x</a>` has none.
    pub fn text(&self) -> Option<&str> {
        match self.children.first() {
            Some(Content::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Replace the leading text node, or insert one in front of the other
    /// children.
    pub fn set_text(&mut self, value: impl Into<String>) {
        let value = value.into();
        match self.children.first_mut() {
            Some(Content::Text(text)) => *text = value,
            _ => self.children.insert(0, Content::Text(value)),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Child elements in document order, skipping text and comments
    pub fn elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|child| match child {
            Content::Element(element) => Some(element),
            Content::Text(_) | Content::Comment(_) => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Self> {
        self.children.iter_mut().filter_map(|child| match child {
            Content::Element(element) => Some(element),
            Content::Text(_) | Content::Comment(_) => None,
        })
    }

    /// First child element named exactly `name`
    pub fn first_child(&self, name: &str) -> Option<&Self> {
        self.elements().find(|element| element.name == name)
    }

    pub fn first_child_mut(&mut self, name: &str) -> Option<&mut Self> {
        self.elements_mut().find(|element| element.name == name)
    }
}
