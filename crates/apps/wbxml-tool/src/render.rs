use wbxml_codec::{Body, Element, TagName};

/// Opaque payloads longer than this are elided in the tree dump.
pub const OPAQUE_PREVIEW_BYTES: usize = 32;

/// Renders elements as an indented XML-like tree, one element per line
/// except for leaves, which keep their value inline.
pub fn render_tree(elements: &[Element<TagName>]) -> String {
    let mut out = String::new();
    for element in elements {
        render_element(&mut out, element, 0);
    }
    out
}

fn render_element(out: &mut String, element: &Element<TagName>, depth: usize) {
    let indent = "  ".repeat(depth);
    let tag = &element.tag;
    match &element.body {
        Body::Empty => out.push_str(&format!("{indent}<{tag}/>\n")),
        Body::Text(text) => out.push_str(&format!("{indent}<{tag}>{}</{tag}>\n", escape(text))),
        Body::Opaque(data) => out.push_str(&format!(
            "{indent}<{tag}>[opaque {} bytes: {}]</{tag}>\n",
            data.len(),
            preview(data)
        )),
        Body::Children(children) if children.is_empty() => {
            out.push_str(&format!("{indent}<{tag}></{tag}>\n"));
        }
        Body::Children(children) => {
            out.push_str(&format!("{indent}<{tag}>\n"));
            for child in children {
                render_element(out, child, depth + 1);
            }
            out.push_str(&format!("{indent}</{tag}>\n"));
        }
    }
}

fn preview(data: &[u8]) -> String {
    if data.len() <= OPAQUE_PREVIEW_BYTES {
        hex::encode(data)
    } else {
        format!("{}...", hex::encode(&data[..OPAQUE_PREVIEW_BYTES]))
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
