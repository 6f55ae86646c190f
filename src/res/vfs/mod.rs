//! Pluggable fetchers, looked up by the schema of the URL being fetched.

pub mod dir;
pub use self::dir::Dir;

pub mod memory;
pub use self::memory::Memory;

use std::rc::Rc;

use crate::errors::*;
use crate::sched::prelude::Dispatcher;
use crate::utils::hash::FastHashMap;

use super::request::{FetchCallback, FetchRequest};

/// The resource-fetch boundary of the pipeline.
///
/// A fetcher must call `done` exactly once per request, success or not. It
/// should never call it in place: completions are deferred through `sched`
/// so that they interleave with the rest of the pipeline only at frame
/// boundaries.
pub trait Fetcher: 'static {
    fn fetch(&self, sched: &Rc<Dispatcher>, request: FetchRequest, done: FetchCallback);
}

/// Fetchers keyed by URL schema.
#[derive(Default, Clone)]
pub struct SchemaResolver {
    schemas: FastHashMap<String, Rc<dyn Fetcher>>,
}

impl SchemaResolver {
    pub fn new() -> Self {
        SchemaResolver {
            schemas: FastHashMap::default(),
        }
    }

    /// Adds a fetcher for `schema`, replacing the previous one if exists.
    pub fn add<T, F>(&mut self, schema: T, fetcher: F)
    where
        T: Into<String>,
        F: Fetcher,
    {
        let schema = schema.into();
        info!("Attachs fetcher for schema {}://.", schema);
        self.schemas.insert(schema, Rc::new(fetcher));
    }

    #[inline]
    pub fn has<T: AsRef<str>>(&self, schema: T) -> bool {
        self.schemas.contains_key(schema.as_ref())
    }

    pub fn locate<T: AsRef<str>>(&self, schema: T) -> Result<Rc<dyn Fetcher>> {
        let schema = schema.as_ref();
        self.schemas
            .get(schema)
            .cloned()
            .ok_or_else(|| Error::UnsupportedSchema(schema.to_owned()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
