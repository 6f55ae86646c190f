//! The fetch layer of the pipeline.
//!
//! Sources are written as readable locations like `res:sprites/hero.png`. The
//! `ResourceSystem` resolves their shortcuts (`res:` => `file://assets/`),
//! applies the default schema to sources without one, parses the result into
//! an `Url` and hands the request to the `Fetcher` attached for its schema.
//!
//! ```rust
//! use conveyor::res::prelude::*;
//!
//! let mut params = ResourceParams::default();
//! params.shortcuts.add("res:", "mem://assets/").unwrap();
//!
//! let memory = Memory::new();
//! memory.insert("assets/hello.txt", "hello");
//! params.schemas.add("mem", memory);
//! ```
//!
//! Fetched bytes are decoded by extension: images into `Image`, `.json` into
//! `Json`, text formats into `Text` and everything else into `Bytes`.

pub mod decode;
pub mod request;
pub mod shortcut;
pub mod url;
pub mod vfs;

pub mod prelude {
    pub use super::request::{FetchCallback, FetchRequest, Response};
    pub use super::shortcut::ShortcutResolver;
    pub use super::url::Url;
    pub use super::vfs::{Dir, Fetcher, Memory, SchemaResolver};
    pub use super::{ResourceParams, ResourceSystem};
}

use std::rc::Rc;

use crate::asset::ProgressFn;
use crate::errors::*;

use self::request::FetchRequest;
use self::shortcut::ShortcutResolver;
use self::url::Url;
use self::vfs::{Dir, Fetcher, SchemaResolver};

/// The setup parameters of the fetch layer.
#[derive(Clone)]
pub struct ResourceParams {
    pub shortcuts: ShortcutResolver,
    pub schemas: SchemaResolver,
    /// The schema applied to sources which have none after shortcut
    /// resolution.
    pub default_schema: String,
}

impl Default for ResourceParams {
    fn default() -> Self {
        let mut params = ResourceParams {
            shortcuts: ShortcutResolver::new(),
            schemas: SchemaResolver::new(),
            default_schema: "file".into(),
        };

        params.schemas.add("file", Dir::new());
        params
    }
}

pub struct ResourceSystem {
    shortcuts: ShortcutResolver,
    schemas: SchemaResolver,
    default_schema: String,
}

impl ResourceSystem {
    pub fn new(params: ResourceParams) -> Self {
        ResourceSystem {
            shortcuts: params.shortcuts,
            schemas: params.schemas,
            default_schema: params.default_schema,
        }
    }

    /// Resolves shortcuts and the default schema of `src`.
    pub fn resolve<T: AsRef<str>>(&self, src: T) -> Result<Url> {
        let src = src.as_ref();
        let resolved = self
            .shortcuts
            .resolve(src)
            .ok_or_else(|| Error::Shortcut(format!("Could not resolve filename: {}.", src)))?;

        if resolved.contains("://") {
            Url::new(resolved)
        } else {
            Url::new(format!("{}://{}", self.default_schema, resolved))
        }
    }

    /// Prepares a fetch of `src`, returning the fetcher that serves it and
    /// the request to hand over.
    pub fn prepare<T: AsRef<str>>(
        &self,
        src: T,
        priority: i32,
        data: Option<serde_json::Value>,
        progress: Option<ProgressFn>,
    ) -> Result<(Rc<dyn Fetcher>, FetchRequest)> {
        let url = self.resolve(src)?;
        let fetcher = self.schemas.locate(url.schema())?;

        let request = FetchRequest {
            url,
            priority,
            data,
            progress,
        };

        Ok((fetcher, request))
    }

    #[inline]
    pub fn shortcuts(&self) -> &ShortcutResolver {
        &self.shortcuts
    }

    #[inline]
    pub fn schemas(&self) -> &SchemaResolver {
        &self.schemas
    }
}
