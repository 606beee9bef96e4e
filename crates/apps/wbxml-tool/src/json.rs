//! JSON form of an element tree.
//!
//! ```json
//! {"tag": "ComposeMail:SendMail", "children": [
//!   {"tag": "ComposeMail:ClientId", "text": "ID"},
//!   {"tag": "ComposeMail:SaveInSentItems"},
//!   {"tag": "ComposeMail:Mime", "opaque_hex": "0102030405"}
//! ]}
//! ```
//!
//! A document is either one element or an array of top-level elements.
//! `"children": []` is an element with the content flag and nothing inside,
//! distinct from a bare `{"tag": ...}`.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use wbxml_codec::{Body, Element, TagName};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonElement {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opaque_hex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<JsonElement>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonDocument {
    One(JsonElement),
    Many(Vec<JsonElement>),
}

impl JsonElement {
    pub fn into_element(self) -> Result<Element<TagName>> {
        let tag = self.tag;
        match (self.text, self.opaque_hex, self.children) {
            (None, None, None) => Ok(Element::empty(tag.as_str())),
            (Some(text), None, None) => Ok(Element::text(tag.as_str(), text)),
            (None, Some(encoded), None) => {
                let data = hex::decode(encoded.trim())
                    .with_context(|| format!("opaque_hex of {tag} is not valid hex"))?;
                Ok(Element::opaque(tag.as_str(), data))
            }
            (None, None, Some(children)) => {
                let children = children
                    .into_iter()
                    .map(JsonElement::into_element)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Element::with_children(tag.as_str(), children))
            }
            _ => bail!("{tag}: at most one of text, opaque_hex, children may be set"),
        }
    }

    pub fn from_element(element: &Element<TagName>) -> Self {
        let mut json =
            Self { tag: element.tag.to_string(), text: None, opaque_hex: None, children: None };
        match &element.body {
            Body::Empty => {}
            Body::Text(text) => json.text = Some(text.clone()),
            Body::Opaque(data) => json.opaque_hex = Some(hex::encode(data)),
            Body::Children(children) => {
                json.children = Some(children.iter().map(Self::from_element).collect());
            }
        }
        json
    }
}

/// Parses a JSON document into top-level elements.
pub fn parse_document(input: &str) -> Result<Vec<Element<TagName>>> {
    let document: JsonDocument =
        serde_json::from_str(input).context("document is not a JSON element or array")?;
    let elements = match document {
        JsonDocument::One(element) => vec![element],
        JsonDocument::Many(elements) => elements,
    };
    elements.into_iter().map(JsonElement::into_element).collect()
}

pub fn to_json(elements: &[Element<TagName>]) -> Result<String> {
    let json: Vec<JsonElement> = elements.iter().map(JsonElement::from_element).collect();
    Ok(serde_json::to_string_pretty(&json)?)
}
