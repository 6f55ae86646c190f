//! Tasks are the executable units of the loading pipeline.
//!
//! Every single asset descriptor is resolved into exactly one task by the
//! `TaskRegistry`. A task kind is a type implementing `TaskKind`: a static
//! predicate telling whether it understands a descriptor, and a constructor
//! taking the descriptor apart. Task kinds are registered with a priority,
//! more specific kinds should be registered with higher priorities so that
//! they are tested first.
//!
//! ```rust
//! use conveyor::prelude::*;
//!
//! struct Greeting(Option<String>);
//!
//! impl Task for Greeting {
//!     fn start(&mut self, _: &TaskContext, done: Done) {
//!         let text = self.0.take().unwrap_or_default();
//!         done(Value::new(Text::new(text)));
//!     }
//! }
//!
//! impl TaskKind for Greeting {
//!     const NAME: &'static str = "greeting";
//!
//!     fn test(params: &AssetParams) -> bool {
//!         params.has_field("greeting")
//!     }
//!
//!     fn create(params: AssetParams) -> Result<Self> {
//!         Ok(Greeting(params.field_str("greeting").map(|v| v.to_owned())))
//!     }
//! }
//!
//! let mut registry = TaskRegistry::with_defaults();
//! registry.register::<Greeting>(50);
//! ```
//!
//! A task must call its completion exactly once, even when the underlying
//! operation fails. Failures are delivered as `Value::Failed`.

pub mod atlas;
pub mod color_alpha;
pub mod function;
pub mod list;
pub mod load;
pub mod registry;

pub mod prelude {
    pub use super::atlas::AtlasTask;
    pub use super::color_alpha::ColorAlphaTask;
    pub use super::function::FunctionTask;
    pub use super::list::ListTask;
    pub use super::load::LoadTask;
    pub use super::registry::{TaskDef, TaskRegistry};
    pub use super::{Task, TaskContext, TaskInfo, TaskKind};
}

use std::fmt;
use std::rc::Rc;

use crate::asset::{Asset, AssetParams, CompleteFn, Done, ProgressFn};
use crate::errors::*;
use crate::manager::Shared;
use crate::resource::Value;
use crate::sched::prelude::Dispatcher;
use crate::session::{LoadHandle, LoadOptions, LoadSession};

/// The instance contract of a task.
pub trait Task {
    /// Begins the operation. `done` must be called exactly once, either
    /// in place or later.
    fn start(&mut self, ctx: &TaskContext, done: Done);

    /// Releases everything held by the task object itself. It is called once
    /// the task has finished, or when it will never be started, and must be
    /// safe to call more than once.
    fn destroy(&mut self) {}
}

/// The static side of a task: a compatibility predicate and a constructor.
pub trait TaskKind: Task + Sized + 'static {
    /// The name a descriptor can refer to this kind with.
    const NAME: &'static str;

    /// Returns true if this kind can handle `params`.
    fn test(params: &AssetParams) -> bool;

    /// Creates a task from `params`.
    fn create(params: AssetParams) -> Result<Self>;
}

/// What the session needs to know about a task besides the task itself.
pub struct TaskInfo {
    /// The name of the definition the task was created by.
    pub kind: String,
    pub id: Option<String>,
    pub cache: bool,
    pub complete: Option<CompleteFn>,
}

impl fmt::Debug for TaskInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TaskInfo")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("cache", &self.cache)
            .finish()
    }
}

impl fmt::Display for TaskInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.id {
            Some(ref id) => write!(f, "{}({})", self.kind, id),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// The services a running task has access to.
#[derive(Clone)]
pub struct TaskContext(pub(crate) Rc<Shared>);

impl TaskContext {
    /// Loads `asset` in a nested session.
    pub fn load(&self, asset: Asset, options: LoadOptions) -> Result<LoadHandle> {
        LoadSession::start(self, asset, options)
    }

    /// Fetches `src` through the fetch layer. Errors are logged and delivered
    /// as `Value::Failed`.
    pub fn fetch(
        &self,
        src: &str,
        priority: i32,
        data: Option<serde_json::Value>,
        progress: Option<ProgressFn>,
        done: Done,
    ) {
        match self.0.res.prepare(src, priority, data, progress) {
            Ok((fetcher, request)) => {
                debug!("Fetches {} from {}.", src, request.url);

                let src = src.to_owned();
                fetcher.fetch(
                    &self.0.sched,
                    request,
                    Box::new(move |rsp| match rsp {
                        Ok(value) => done(value),
                        Err(err) => {
                            warn!("Failed to fetch {}: {}", src, err);
                            done(Value::failed(err));
                        }
                    }),
                );
            }
            Err(err) => {
                warn!("Failed to fetch {}: {}", src, err);
                done(Value::failed(err));
            }
        }
    }

    /// The default concurrency of sessions.
    #[inline]
    pub fn parallel(&self) -> bool {
        self.0.parallel
    }

    #[inline]
    pub fn dispatcher(&self) -> &Rc<Dispatcher> {
        &self.0.sched
    }

    pub(crate) fn resolve(&self, params: AssetParams) -> Result<(TaskInfo, Box<dyn Task>)> {
        self.0.registry.borrow().resolve(params)
    }

    pub(crate) fn write_cache(&self, id: &str, value: Value) {
        match *self.0.cache.borrow_mut() {
            Some(ref mut cache) => cache.write(id, value),
            None => warn!("Could not cache {} since the cache has been destroyed.", id),
        }
    }
}
