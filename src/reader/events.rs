//! Structural events
//!
//! The only events the tree builder consumes: element open (with its
//! attributes in source order) and element close.

use crate::core::attributes::Attribute;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent<'a> {
    /// `<name attrs...>`, also emitted for the opening half of `<name/>`
    Open(StartElement<'a>),
    /// `</name>`, also emitted for the closing half of `<name/>`
    Close(EndElement<'a>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartElement<'a> {
    pub name: &'a str,
    pub attributes: Vec<Attribute<'a>>,
}

impl<'a> StartElement<'a> {
    pub fn new(name: &'a str, attributes: Vec<Attribute<'a>>) -> Self {
        StartElement { name, attributes }
    }

    /// Last value given for `name`, matching last-wins attribute semantics
    pub fn get_attribute_value(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .rev()
            .find(|a| a.name == name)
            .map(|a| a.value.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndElement<'a> {
    pub name: &'a str,
}

impl<'a> EndElement<'a> {
    pub fn new(name: &'a str) -> Self {
        EndElement { name }
    }
}

#[cfg(test)]
impl<'a> XmlEvent<'a> {
    pub fn is_open(&self) -> bool {
        matches!(self, XmlEvent::Open(_))
    }

    pub fn is_close(&self) -> bool {
        matches!(self, XmlEvent::Close(_))
    }

    pub fn name(&self) -> &'a str {
        match self {
            XmlEvent::Open(e) => e.name,
            XmlEvent::Close(e) => e.name,
        }
    }
}
