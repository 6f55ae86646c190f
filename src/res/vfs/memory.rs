use std::cell::RefCell;
use std::rc::Rc;

use crate::errors::*;
use crate::sched::prelude::Dispatcher;
use crate::utils::hash::FastHashMap;

use super::super::decode::decode;
use super::super::request::{FetchCallback, FetchRequest};
use super::Fetcher;

/// Serves in-memory blobs keyed by path. Handy for embedded content and tests.
///
/// Clones share the same table, so a handle kept by the host can still
/// insert blobs after the fetcher is attached.
#[derive(Debug, Default, Clone)]
pub struct Memory {
    blobs: Rc<RefCell<FastHashMap<String, Rc<[u8]>>>>,
}

impl Memory {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn insert<T1, T2>(&self, path: T1, bytes: T2)
    where
        T1: Into<String>,
        T2: Into<Vec<u8>>,
    {
        let bytes: Vec<u8> = bytes.into();
        self.blobs.borrow_mut().insert(path.into(), bytes.into());
    }

    pub fn remove(&self, path: &str) -> bool {
        self.blobs.borrow_mut().remove(path).is_some()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.blobs.borrow().contains_key(path)
    }
}

impl Fetcher for Memory {
    fn fetch(&self, sched: &Rc<Dispatcher>, request: FetchRequest, done: FetchCallback) {
        let blob = self.blobs.borrow().get(request.url.path()).cloned();
        let response = match blob {
            Some(bytes) => decode(&request.url, bytes.to_vec()),
            None => Err(Error::NotFound(request.url.to_string())),
        };

        sched.defer(move || {
            request.notify(1.0);
            done(response);
        });
    }
}
