//! Element-tree view of a document.

use crate::config::CodecConfig;
use crate::decoder::{Decoder, Event};
use crate::encoder::Encoder;
use crate::error::{CodecError, Result};
use crate::registry::TagRegistry;

/// Element content. Mixed content is not modelled.
///
/// `Empty` is a tag written without the content flag. An element written
/// with the flag but holding nothing is `Children` with no entries, so both
/// forms keep their bytes through a decode and re-encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body<T> {
    Empty,
    Children(Vec<Element<T>>),
    Text(String),
    Opaque(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<T> {
    pub tag: T,
    pub body: Body<T>,
}

impl<T> Element<T> {
    pub fn empty(tag: impl Into<T>) -> Self {
        Self { tag: tag.into(), body: Body::Empty }
    }

    pub fn text(tag: impl Into<T>, value: impl Into<String>) -> Self {
        Self { tag: tag.into(), body: Body::Text(value.into()) }
    }

    pub fn opaque(tag: impl Into<T>, data: impl Into<Vec<u8>>) -> Self {
        Self { tag: tag.into(), body: Body::Opaque(data.into()) }
    }

    pub fn with_children(tag: impl Into<T>, children: Vec<Element<T>>) -> Self {
        Self { tag: tag.into(), body: Body::Children(children) }
    }

    pub fn children(&self) -> &[Element<T>] {
        match &self.body {
            Body::Children(children) => children,
            _ => &[],
        }
    }

    pub fn text_value(&self) -> Option<&str> {
        match &self.body {
            Body::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl<T: PartialEq> Element<T> {
    /// First direct child carrying `tag`.
    pub fn child(&self, tag: &T) -> Option<&Element<T>> {
        self.children().iter().find(|child| &child.tag == tag)
    }
}

impl<R: TagRegistry> Encoder<R> {
    /// Writes a whole element tree.
    ///
    /// An empty `Text` body is written with the content flag and no string,
    /// unlike [`Encoder::text`]; it decodes back as empty `Children`.
    pub fn write_element(&mut self, element: &Element<R::Tag>) -> Result<&mut Self> {
        match &element.body {
            Body::Empty => self.empty_tag(element.tag.clone()),
            Body::Text(text) if text.is_empty() => self.open(element.tag.clone())?.close(),
            Body::Text(text) => self.text(element.tag.clone(), text),
            Body::Opaque(data) => self.open(element.tag.clone())?.opaque(data)?.close(),
            Body::Children(children) => {
                self.open(element.tag.clone())?;
                for child in children {
                    self.write_element(child)?;
                }
                self.close()
            }
        }
    }
}

/// Encodes a forest of top-level elements into one document.
pub fn encode_document<R: TagRegistry>(
    registry: R,
    config: &CodecConfig,
    elements: &[Element<R::Tag>],
) -> Result<Vec<u8>> {
    let mut enc = Encoder::with_config(registry, config);
    for element in elements {
        enc.write_element(element)?;
    }
    enc.finish()
}

impl<R: TagRegistry> Decoder<R> {
    /// Decodes the body into top-level elements.
    pub fn decode_tree(&self, bytes: &[u8]) -> Result<Vec<Element<R::Tag>>> {
        let mut open: Vec<Element<R::Tag>> = Vec::new();
        let mut roots = Vec::new();

        for event in self.events(bytes)? {
            match event? {
                Event::Start { tag, has_content } => {
                    let body = if has_content { Body::Children(Vec::new()) } else { Body::Empty };
                    open.push(Element { tag, body });
                }
                Event::Text(text) => set_leaf(open.last_mut(), Body::Text(text))?,
                Event::Opaque(data) => set_leaf(open.last_mut(), Body::Opaque(data))?,
                Event::End(_) => {
                    let done = open
                        .pop()
                        .ok_or(CodecError::UnbalancedElement("END with no open element"))?;
                    match open.last_mut() {
                        Some(parent) => push_child(parent, done)?,
                        None => roots.push(done),
                    }
                }
            }
        }
        Ok(roots)
    }
}

fn set_leaf<T: std::fmt::Debug>(element: Option<&mut Element<T>>, body: Body<T>) -> Result<()> {
    let Some(element) = element else {
        return Err(CodecError::UnbalancedElement("content outside of an element"));
    };
    if is_vacant(&element.body) {
        element.body = body;
        return Ok(());
    }
    match (&mut element.body, body) {
        (Body::Text(existing), Body::Text(more)) => existing.push_str(&more),
        (Body::Opaque(existing), Body::Opaque(more)) => existing.extend_from_slice(&more),
        _ => return Err(CodecError::MixedContent(format!("{:?}", element.tag))),
    }
    Ok(())
}

fn is_vacant<T>(body: &Body<T>) -> bool {
    match body {
        Body::Empty => true,
        Body::Children(children) => children.is_empty(),
        Body::Text(_) | Body::Opaque(_) => false,
    }
}

fn push_child<T: std::fmt::Debug>(parent: &mut Element<T>, child: Element<T>) -> Result<()> {
    match &mut parent.body {
        Body::Children(children) => children.push(child),
        _ => return Err(CodecError::MixedContent(format!("{:?}", parent.tag))),
    }
    Ok(())
}
