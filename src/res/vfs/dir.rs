use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::errors::*;
use crate::sched::prelude::Dispatcher;

use super::super::decode::decode;
use super::super::request::{FetchCallback, FetchRequest, Response};
use super::Fetcher;

/// Fetches files from the local filesystem, optionally relative to `root`.
#[derive(Debug, Default, Clone)]
pub struct Dir {
    root: Option<PathBuf>,
}

impl Dir {
    pub fn new() -> Self {
        Dir { root: None }
    }

    pub fn with_root<T: Into<PathBuf>>(root: T) -> Self {
        Dir {
            root: Some(root.into()),
        }
    }

    fn location(&self, path: &str) -> PathBuf {
        match self.root {
            Some(ref root) => root.join(path),
            None => Path::new(path).to_owned(),
        }
    }

    fn load_from(&self, request: &FetchRequest) -> Response {
        let location = self.location(request.url.path());
        let mut file = fs::File::open(&location).map_err(|err| {
            if err.kind() == ::std::io::ErrorKind::NotFound {
                Error::NotFound(location.display().to_string())
            } else {
                Error::IO(err)
            }
        })?;

        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;
        decode(&request.url, buf)
    }
}

impl Fetcher for Dir {
    fn fetch(&self, sched: &Rc<Dispatcher>, request: FetchRequest, done: FetchCallback) {
        let response = self.load_from(&request);
        sched.defer(move || {
            request.notify(1.0);
            done(response);
        });
    }
}
