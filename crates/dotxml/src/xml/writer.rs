//! XML serializer
//!
//! Output is indented by four spaces per level. Elements holding only text
//! are written inline, and elements mixing text with other nodes are written
//! without added whitespace so their text survives a re-parse unchanged.

use crate::xml::model::{Content, Document, Element};

const INDENT: &str = "    ";

/// Serialize a document, including its declaration and prolog comments
pub fn to_string(doc: &Document) -> String {
    let mut output = String::new();

    if let Some(declaration) = &doc.declaration {
        output.push_str("<?xml ");
        output.push_str(declaration);
        output.push_str("?>\n");
    }

    for comment in &doc.prolog {
        write_comment(comment, &mut output);
        output.push('\n');
    }

    write_element(&doc.root, 0, &mut output);
    output.push('\n');
    output
}

/// Serialize a single element without surrounding whitespace
pub fn element_to_string(element: &Element) -> String {
    let mut output = String::new();
    write_compact(element, &mut output);
    output
}

fn write_element(element: &Element, depth: usize, output: &mut String) {
    write_start_tag(element, output);

    if element.children.is_empty() {
        output.push_str("/>");
        return;
    }
    output.push('>');

    let has_text = element
        .children
        .iter()
        .any(|child| matches!(child, Content::Text(_)));

    if has_text {
        for child in &element.children {
            write_content_compact(child, output);
        }
    } else {
        for child in &element.children {
            output.push('\n');
            push_indent(depth + 1, output);
            match child {
                Content::Element(child) => write_element(child, depth + 1, output),
                Content::Comment(comment) => write_comment(comment, output),
                Content::Text(text) => output.push_str(&escape_text(text)),
            }
        }
        output.push('\n');
        push_indent(depth, output);
    }

    write_end_tag(element, output);
}

fn write_compact(element: &Element, output: &mut String) {
    write_start_tag(element, output);

    if element.children.is_empty() {
        output.push_str("/>");
        return;
    }
    output.push('>');

    for child in &element.children {
        write_content_compact(child, output);
    }

    write_end_tag(element, output);
}

fn write_content_compact(content: &Content, output: &mut String) {
    match content {
        Content::Element(child) => write_compact(child, output),
        Content::Text(text) => output.push_str(&escape_text(text)),
        Content::Comment(comment) => write_comment(comment, output),
    }
}

fn write_start_tag(element: &Element, output: &mut String) {
    output.push('<');
    output.push_str(&element.name);

    for (key, value) in &element.attributes {
        output.push(' ');
        output.push_str(key);
        output.push_str("=\"");
        output.push_str(&escape_attribute(value));
        output.push('"');
    }
}

fn write_end_tag(element: &Element, output: &mut String) {
    output.push_str("</");
    output.push_str(&element.name);
    output.push('>');
}

fn write_comment(comment: &str, output: &mut String) {
    output.push_str("<!--");
    output.push_str(comment);
    output.push_str("-->");
}

fn push_indent(depth: usize, output: &mut String) {
    for _ in 0..depth {
        output.push_str(INDENT);
    }
}

fn escape_text(input: &str) -> String {
    // the parser drops blank text runs, so keep these as character references
    if input.trim().is_empty() {
        return input
            .chars()
            .map(|ch| format!("&#x{:X};", u32::from(ch)))
            .collect();
    }

    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn escape_attribute(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
