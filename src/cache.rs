//! The cache of loaded assets, keyed by asset id.
//!
//! The cache owns the lifetime of everything written into it. Values are
//! never silently dropped: overwriting an id destroys the previous value,
//! and deleting an id destroys its value, element by element for lists and
//! maps, before the entry is removed. Callers must not assume a value read
//! from the cache stays valid after its id is deleted or overwritten.

use std::borrow::Cow;

use crate::asset::Asset;
use crate::resource::{destroy_value, Value};
use crate::utils::hash::FastHashMap;

/// Anything that identifies a cache entry: an id or a descriptor with an id.
pub struct CacheKey<'a>(Option<Cow<'a, str>>);

impl<'a> CacheKey<'a> {
    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.0.as_ref().map(|v| v.as_ref())
    }
}

impl<'a> From<&'a str> for CacheKey<'a> {
    fn from(id: &'a str) -> Self {
        CacheKey(Some(Cow::Borrowed(id)))
    }
}

impl<'a> From<&'a String> for CacheKey<'a> {
    fn from(id: &'a String) -> Self {
        CacheKey(Some(Cow::Borrowed(id.as_str())))
    }
}

impl From<String> for CacheKey<'static> {
    fn from(id: String) -> Self {
        CacheKey(Some(Cow::Owned(id)))
    }
}

impl<'a> From<&'a Asset> for CacheKey<'a> {
    fn from(asset: &'a Asset) -> Self {
        CacheKey(asset.id().map(Cow::Borrowed))
    }
}

#[derive(Default)]
pub struct AssetCache {
    items: FastHashMap<String, Value>,
}

impl AssetCache {
    pub fn new() -> Self {
        AssetCache {
            items: FastHashMap::default(),
        }
    }

    /// Stores `value` under `id`. A value already stored under `id` is
    /// destroyed first.
    pub fn write<T: Into<String>>(&mut self, id: T, value: Value) {
        let id = id.into();
        if self.items.contains_key(&id) {
            warn!("Asset {} has been cached already, the previous one will be destroyed.", id);
            self.delete(id.as_str());
        }

        self.items.insert(id, value);
    }

    /// Gets the value stored under `id`.
    pub fn read(&self, id: &str) -> Option<&Value> {
        let v = self.items.get(id);
        if v.is_none() {
            warn!("Asset {} has not been cached.", id);
        }

        v
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Destroys and removes the entry identified by `key`. Returns false if
    /// there is no such entry.
    pub fn delete<'a, T: Into<CacheKey<'a>>>(&mut self, key: T) -> bool {
        let key = key.into();
        let id = match key.id() {
            Some(id) => id,
            None => return false,
        };

        match self.items.get(id) {
            Some(value) => destroy_value(value),
            None => return false,
        }

        debug!("Deletes cached asset {}.", id);
        self.items.remove(id);
        true
    }

    /// Destroys and removes every entry.
    pub fn empty(&mut self) {
        for (_, v) in self.items.drain() {
            destroy_value(&v);
        }
    }

    /// Empties the cache and releases it. A destroyed cache can not be used
    /// anymore.
    pub fn destroy(mut self) {
        self.empty();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(|v| v.as_str())
    }
}
