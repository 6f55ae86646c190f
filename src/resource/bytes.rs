//! Plain content resources: raw buffers, text and parsed JSON documents.

use std::cell::{Ref, RefCell};

use super::Resource;

/// A raw buffer as returned by a fetcher.
#[derive(Debug)]
pub struct Bytes {
    data: RefCell<Option<Box<[u8]>>>,
}

impl Bytes {
    pub fn new<T: Into<Box<[u8]>>>(data: T) -> Self {
        Bytes {
            data: RefCell::new(Some(data.into())),
        }
    }

    /// Returns the underlying buffer, or None if destroyed.
    pub fn data(&self) -> Option<Ref<[u8]>> {
        Ref::filter_map(self.data.borrow(), |v| v.as_deref()).ok()
    }

    pub fn len(&self) -> usize {
        self.data.borrow().as_ref().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Resource for Bytes {
    fn destroy(&self) {
        self.data.borrow_mut().take();
    }

    fn is_destroyed(&self) -> bool {
        self.data.borrow().is_none()
    }
}

/// A UTF-8 text document.
#[derive(Debug)]
pub struct Text {
    text: RefCell<Option<String>>,
}

impl Text {
    pub fn new<T: Into<String>>(text: T) -> Self {
        Text {
            text: RefCell::new(Some(text.into())),
        }
    }

    pub fn text(&self) -> Option<String> {
        self.text.borrow().clone()
    }

    pub fn as_str(&self) -> Option<Ref<str>> {
        Ref::filter_map(self.text.borrow(), |v| v.as_deref()).ok()
    }
}

impl Resource for Text {
    fn destroy(&self) {
        self.text.borrow_mut().take();
    }

    fn is_destroyed(&self) -> bool {
        self.text.borrow().is_none()
    }
}

/// A parsed JSON document.
#[derive(Debug)]
pub struct Json {
    value: RefCell<Option<serde_json::Value>>,
}

impl Json {
    pub fn new(value: serde_json::Value) -> Self {
        Json {
            value: RefCell::new(Some(value)),
        }
    }

    pub fn parse(bytes: &[u8]) -> crate::errors::Result<Self> {
        Ok(Json::new(serde_json::from_slice(bytes)?))
    }

    pub fn value(&self) -> Option<Ref<serde_json::Value>> {
        Ref::filter_map(self.value.borrow(), |v| v.as_ref()).ok()
    }

    /// Deserializes the document into `T`.
    pub fn to<T: serde::de::DeserializeOwned>(&self) -> crate::errors::Result<T> {
        match *self.value.borrow() {
            Some(ref v) => Ok(T::deserialize(v)?),
            None => Err(crate::errors::Error::Malformed(
                "JSON document has been destroyed.".into(),
            )),
        }
    }
}

impl Resource for Json {
    fn destroy(&self) {
        self.value.borrow_mut().take();
    }

    fn is_destroyed(&self) -> bool {
        self.value.borrow().is_none()
    }
}
