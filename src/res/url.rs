//! Uniqued resource location.

use std::fmt;
use std::ops::Range;

use crate::errors::*;

/// Every source is resolved into an URL before fetching, e.g.
/// `file://textures/crate.png?mip=0#main`. On creation, the URL is parsed and
/// ranges of its parts are stored internally. Queries and fragments are not
/// part of the path fetchers look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    url: String,
    schema: Range<usize>,
    path: Range<usize>,
}

impl Url {
    /// Parses a new URL.
    pub fn new<T: Into<String>>(url: T) -> Result<Self> {
        let url = url.into();

        let schema_end = match url.find("://") {
            Some(v) if v > 0 => v,
            _ => {
                return Err(Error::MalformedUrl(format!(
                    "{} must have a schema",
                    url
                )));
            }
        };

        let start = schema_end + 3;
        let mut path = start..url.len();
        if let Some(index) = url[start..].find(&['?', '#'][..]) {
            path.end = index + start;
        }

        if path.end <= path.start {
            return Err(Error::MalformedUrl(format!(
                "the path of {} could not be empty",
                url
            )));
        }

        Ok(Url {
            schema: 0..schema_end,
            path,
            url,
        })
    }

    #[inline]
    pub fn schema(&self) -> &str {
        &self.url[self.schema.clone()]
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.url[self.path.clone()]
    }

    /// Returns the lowercased extension of the path, if any.
    pub fn extension(&self) -> Option<String> {
        let path = self.path();
        let name = &path[path.rfind('/').map(|v| v + 1).unwrap_or(0)..];
        match name.rfind('.') {
            Some(index) if index + 1 < name.len() => Some(name[index + 1..].to_lowercase()),
            _ => None,
        }
    }
}

impl std::ops::Deref for Url {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.url
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}
