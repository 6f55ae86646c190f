#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use conveyor::prelude::*;
use conveyor::sched::prelude::Dispatcher;

/// A resource counting how often it has been destroyed.
#[derive(Debug)]
pub struct Probe {
    name: String,
    destroys: Cell<usize>,
}

impl Probe {
    pub fn new<T: Into<String>>(name: T) -> Self {
        Probe {
            name: name.into(),
            destroys: Cell::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn destroys(&self) -> usize {
        self.destroys.get()
    }
}

impl Resource for Probe {
    fn destroy(&self) {
        self.destroys.set(self.destroys.get() + 1);
    }

    fn is_destroyed(&self) -> bool {
        self.destroys.get() > 0
    }
}

pub fn name_of(v: &Value) -> Option<String> {
    v.resource::<Probe>().map(|v| v.name().to_owned())
}

pub fn destroys_of(v: &Value) -> usize {
    v.resource::<Probe>().map(|v| v.destroys()).unwrap_or(0)
}

/// A fetcher holding every request until the test releases it. Released
/// requests complete with a `Probe` named after the requested path.
#[derive(Clone, Default)]
pub struct Deferred {
    requests: Rc<RefCell<Vec<(String, FetchCallback)>>>,
}

impl Deferred {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|v| v.0.clone()).collect()
    }

    /// Completes the `index`-th pending request.
    pub fn release(&self, index: usize) {
        let (path, done) = self.requests.borrow_mut().remove(index);
        done(Ok(Value::new(Probe::new(path))));
    }

    /// Completes the pending request of `path`.
    pub fn release_path(&self, path: &str) {
        let index = self
            .paths()
            .iter()
            .position(|v| v == path)
            .expect("no such request");
        self.release(index);
    }

    /// Fails the `index`-th pending request.
    pub fn fail(&self, index: usize) {
        let (path, done) = self.requests.borrow_mut().remove(index);
        done(Err(Error::NotFound(path)));
    }

    /// Completes every pending request, including those issued meanwhile,
    /// in random order.
    pub fn release_randomly(&self) {
        loop {
            let len = self.len();
            if len == 0 {
                return;
            }

            self.release(rand::random::<usize>() % len);
        }
    }
}

impl Fetcher for Deferred {
    fn fetch(&self, _: &Rc<Dispatcher>, request: FetchRequest, done: FetchCallback) {
        self.requests
            .borrow_mut()
            .push((request.url.path().to_owned(), done));
    }
}

/// Creates a manager whose `res:` sources are served by the returned fetcher.
pub fn setup() -> (AssetManager, Deferred) {
    let _ = env_logger::try_init();

    let fetcher = Deferred::new();
    let mut params = LoaderParams::default();
    params.res.shortcuts.add("res:", "test://").unwrap();
    params.res.schemas.add("test", fetcher.clone());

    (AssetManager::new(params), fetcher)
}

/// Returns load options recording every completion.
pub fn recorder() -> (Rc<RefCell<Vec<Value>>>, LoadOptions) {
    let results = Rc::new(RefCell::new(Vec::new()));
    let rx = results.clone();
    let options = LoadOptions::new().on_complete(move |v| rx.borrow_mut().push(v));
    (results, options)
}
