//! Loaded resources and the values the pipeline assembles from them.
//!
//! A _resource_ is a single piece of loaded content, like a decoded image or a
//! raw buffer. Resources may hold native memory, so they are never simply
//! dropped by the pipeline: whoever owns a resource calls `destroy` on it,
//! and `destroy` must be idempotent.
//!
//! A `Value` is what a load produces. Its shape mirrors the shape of the
//! descriptor that was loaded: a scalar resource, an ordered list or a keyed
//! map of values.

pub mod atlas;
pub mod bytes;
pub mod image;

pub mod prelude {
    pub use super::atlas::{Atlas, AtlasManifest, Frame};
    pub use super::bytes::{Bytes, Json, Text};
    pub use super::image::Image;
    pub use super::{destroy_value, Resource, Value};
}

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::asset::AssetMap;

/// Upcasting helpers for downcasting resources to their concrete types.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<T: Any> AsAny for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

/// A loaded piece of content which owns releasable memory.
pub trait Resource: AsAny {
    /// Releases everything held by this resource. Calling it more than once
    /// is a no-op.
    fn destroy(&self);

    /// Returns true if `destroy` has been called.
    fn is_destroyed(&self) -> bool;
}

/// The result of a load, shaped like the descriptor that produced it.
#[derive(Clone)]
pub enum Value {
    /// Nothing was produced.
    Empty,
    /// The load failed. Failures still complete, carrying their message.
    Failed(String),
    Resource(Rc<dyn Resource>),
    List(Vec<Value>),
    Map(AssetMap<Value>),
}

impl Value {
    #[inline]
    pub fn new<T: Resource>(resource: T) -> Self {
        Value::Resource(Rc::new(resource))
    }

    #[inline]
    pub fn failed<T: fmt::Display>(reason: T) -> Self {
        Value::Failed(reason.to_string())
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        match *self {
            Value::Failed(_) => true,
            _ => false,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        match *self {
            Value::Empty => true,
            _ => false,
        }
    }

    /// Returns a reference to the underlying resource if it is a `T`.
    pub fn resource<T: Resource>(&self) -> Option<&T> {
        match *self {
            Value::Resource(ref rc) => {
                let v: &dyn Resource = &**rc;
                v.as_any().downcast_ref::<T>()
            }
            _ => None,
        }
    }

    /// Returns a shared pointer to the underlying resource if it is a `T`.
    pub fn downcast<T: Resource>(&self) -> Option<Rc<T>> {
        match *self {
            Value::Resource(ref rc) => rc.clone().into_any().downcast::<T>().ok(),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[Value]> {
        match *self {
            Value::List(ref v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map(&self) -> Option<&AssetMap<Value>> {
        match *self {
            Value::Map(ref v) => Some(v),
            _ => None,
        }
    }

    /// Gets the value with `key` of a map value.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|v| v.get(key))
    }

    /// Gets the value at `index` of a list value.
    #[inline]
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.as_list().and_then(|v| v.get(index))
    }

    /// Returns the number of elements of a composite value, 1 for a resource
    /// and 0 for empty and failed values.
    pub fn len(&self) -> usize {
        match *self {
            Value::Empty | Value::Failed(_) => 0,
            Value::Resource(_) => 1,
            Value::List(ref v) => v.len(),
            Value::Map(ref v) => v.len(),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Empty
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Empty => write!(f, "Empty"),
            Value::Failed(ref reason) => write!(f, "Failed({:?})", reason),
            Value::Resource(ref rc) => {
                if rc.is_destroyed() {
                    write!(f, "Resource(<destroyed>)")
                } else {
                    write!(f, "Resource")
                }
            }
            Value::List(ref v) => f.debug_list().entries(v.iter()).finish(),
            Value::Map(ref v) => f.debug_map().entries(v.iter()).finish(),
        }
    }
}

impl<T: Resource> From<T> for Value {
    fn from(resource: T) -> Self {
        Value::new(resource)
    }
}

/// Destroys every resource reachable from `value`. Lists and maps are
/// destroyed element by element; empty and failed values hold nothing.
pub fn destroy_value(value: &Value) {
    match *value {
        Value::Empty | Value::Failed(_) => {}
        Value::Resource(ref rc) => rc.destroy(),
        Value::List(ref v) => {
            for w in v {
                destroy_value(w);
            }
        }
        Value::Map(ref v) => {
            for w in v.values() {
                destroy_value(w);
            }
        }
    }
}
