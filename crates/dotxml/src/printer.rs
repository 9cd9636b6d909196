//! Human-readable rendering of a configuration tree
//!
//! ```text
//! config:
//!     Settings:
//!       optX = 5
//!         value: "10"
//! ```

use crate::xml::{Content, Element};

const CHILD_INDENT: &str = "    ";
const ATTRIBUTE_INDENT: &str = "  ";

/// Render `root` and everything below it, one line per element, attribute
/// and comment line.
pub fn render(root: &Element) -> String {
    let mut output = String::new();
    render_element(root, "", &mut output);
    output
}

fn render_element(element: &Element, indent: &str, output: &mut String) {
    output.push_str(indent);
    output.push_str(&element.name);
    output.push(':');
    if let Some(text) = element.text() {
        output.push_str(" \"");
        output.push_str(text.trim());
        output.push('"');
    }
    output.push('\n');

    for (name, value) in &element.attributes {
        output.push_str(indent);
        output.push_str(ATTRIBUTE_INDENT);
        output.push_str(name);
        output.push_str(" = ");
        output.push_str(value);
        output.push('\n');
    }

    let child_indent = format!("{indent}{CHILD_INDENT}");
    for child in &element.children {
        match child {
            Content::Comment(comment) => {
                let realigned = comment.replace('\n', &format!("\n{indent}#"));
                output.push_str(indent);
                output.push_str("# ");
                output.push_str(&realigned);
                output.push('\n');
            }
            Content::Element(child) => render_element(child, &child_indent, output),
            // printed with the element name
            Content::Text(_) => {}
        }
    }
}
