//! A asynchronous fetch request.

use std::fmt;

use crate::asset::ProgressFn;
use crate::errors::*;
use crate::resource::Value;

use super::url::Url;

/// The outcome of a fetch, the decoded content or the reason it failed.
pub type Response = Result<Value>;

/// The completion of a fetch. Fetchers must call it exactly once.
pub type FetchCallback = Box<dyn FnOnce(Response)>;

/// Everything a fetcher needs to know about one request.
pub struct FetchRequest {
    pub url: Url,
    pub priority: i32,
    /// Opaque payload of the descriptor, passed through untouched.
    pub data: Option<serde_json::Value>,
    pub progress: Option<ProgressFn>,
}

impl FetchRequest {
    pub fn new(url: Url) -> Self {
        FetchRequest {
            url,
            priority: 0,
            data: None,
            progress: None,
        }
    }

    /// Reports the progress of this request.
    #[inline]
    pub fn notify(&self, fraction: f32) {
        if let Some(ref progress) = self.progress {
            progress(fraction);
        }
    }
}

impl fmt::Debug for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FetchRequest")
            .field("url", &self.url)
            .field("priority", &self.priority)
            .field("data", &self.data)
            .finish()
    }
}
