//! # What is This?
//!
//! Conveyor is a declarative asset loading pipeline. Applications describe
//! _what_ to load, a single resource, an ordered list or a keyed map of
//! resources, and the pipeline turns those descriptions into typed load
//! operations, runs them, and hands back a result shaped exactly like the
//! description.
//!
//! The pipeline is built from four parts:
//!
//! * [`task`](task/index.html): the units of work. Task kinds are plugged in
//!   through the `TaskRegistry`, which picks exactly one kind per descriptor
//!   by priority.
//! * [`session`](session/index.html): a `LoadSession` resolves every leaf of
//!   a descriptor into a task, runs them in parallel or one by one, and
//!   reassembles the results.
//! * [`cache`](cache/index.html): the `AssetCache` stores results by id and
//!   owns their lifetime. Overwritten and deleted values are destroyed, not
//!   just dropped.
//! * [`res`](res/index.html): the fetch layer, which resolves sources like
//!   `res:hero.png` into URLs and fetches them through pluggable fetchers.
//!
//! Everything runs on a single thread. Fetchers deliver their completions
//! through a cooperative `Dispatcher`, which the host drives, usually once
//! per frame, with `AssetManager::advance`.
//!
//! ```rust
//! use conveyor::prelude::*;
//!
//! let memory = Memory::new();
//! memory.insert("a.txt", "a");
//! memory.insert("b.txt", "b");
//!
//! let mut params = LoaderParams::default();
//! params.res.shortcuts.add("res:", "mem://").unwrap();
//! params.res.schemas.add("mem", memory);
//!
//! let loader = AssetManager::new(params);
//! let assets = Asset::map(vec![("a", "res:a.txt"), ("b", "res:b.txt")]);
//!
//! loader
//!     .load(assets, LoadOptions::new().on_complete(|v| {
//!         let a = v.get("a").and_then(|v| v.resource::<Text>()).and_then(|v| v.text());
//!         assert_eq!(a, Some("a".to_owned()));
//!     }))
//!     .unwrap();
//!
//! loader.run_until_idle();
//! ```

#[macro_use]
extern crate log;

pub mod errors;
pub mod utils;

pub mod asset;
pub mod cache;
pub mod manager;
pub mod res;
pub mod resource;
pub mod sched;
pub mod session;
pub mod task;

pub mod prelude {
    pub use crate::asset::{Asset, AssetMap, AssetParams, Done, FollowUps};
    pub use crate::cache::{AssetCache, CacheKey};
    pub use crate::errors::{Error, Result};
    pub use crate::manager::{AssetManager, LoaderParams, LoaderSettings};
    pub use crate::res::prelude::*;
    pub use crate::resource::prelude::*;
    pub use crate::session::{LoadHandle, LoadOptions};
    pub use crate::task::prelude::*;
}
