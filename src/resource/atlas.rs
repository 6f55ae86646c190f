use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::asset::AssetMap;
use crate::errors::*;

use super::image::Image;
use super::Resource;

/// A named sub-rectangle of an atlas image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// The manifest describing the frames of an atlas.
///
/// ```json
/// { "frames": { "idle_0": { "x": 0, "y": 0, "w": 32, "h": 32 } } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtlasManifest {
    pub frames: AssetMap<Frame>,
}

/// An image together with the named frames packed into it.
#[derive(Debug)]
pub struct Atlas {
    image: Rc<Image>,
    frames: AssetMap<Frame>,
    destroyed: Cell<bool>,
}

impl Atlas {
    pub fn new(image: Rc<Image>, manifest: AtlasManifest) -> Result<Self> {
        let (width, height) = image.dimensions();
        for (name, v) in &manifest.frames {
            let exceeds = |start: u32, len: u32, bound: u32| {
                start.checked_add(len).map_or(true, |end| end > bound)
            };

            if exceeds(v.x, v.w, width) || exceeds(v.y, v.h, height) {
                return Err(Error::Malformed(format!(
                    "Frame {} ({}, {}, {}x{}) exceeds the atlas image ({}x{}).",
                    name, v.x, v.y, v.w, v.h, width, height
                )));
            }
        }

        Ok(Atlas {
            image,
            frames: manifest.frames,
            destroyed: Cell::new(false),
        })
    }

    #[inline]
    pub fn image(&self) -> &Rc<Image> {
        &self.image
    }

    #[inline]
    pub fn frame(&self, name: &str) -> Option<Frame> {
        self.frames.get(name).cloned()
    }

    #[inline]
    pub fn frames(&self) -> impl Iterator<Item = (&str, &Frame)> {
        self.frames.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl Resource for Atlas {
    fn destroy(&self) {
        if !self.destroyed.replace(true) {
            self.image.destroy();
        }
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(json: &str) -> AtlasManifest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn frames() {
        let image = Rc::new(Image::new(4, 2, vec![0; 32]).unwrap());
        let m = manifest(
            r#"{"frames": {"b": {"x": 2, "y": 0, "w": 2, "h": 2}, "a": {"x": 0, "y": 0, "w": 2, "h": 2}}}"#,
        );

        let atlas = Atlas::new(image.clone(), m).unwrap();
        assert_eq!(atlas.len(), 2);
        assert_eq!(atlas.frame("a"), Some(Frame { x: 0, y: 0, w: 2, h: 2 }));
        assert_eq!(atlas.frames().map(|(k, _)| k).collect::<Vec<_>>(), vec!["b", "a"]);

        atlas.destroy();
        assert!(image.is_destroyed());
    }

    #[test]
    fn out_of_bounds() {
        let image = Rc::new(Image::new(2, 2, vec![0; 16]).unwrap());
        let m = manifest(r#"{"frames": {"a": {"x": 1, "y": 0, "w": 2, "h": 2}}}"#);
        assert!(Atlas::new(image, m).is_err());
    }

    #[test]
    fn out_of_range() {
        let image = Rc::new(Image::new(2, 2, vec![0; 16]).unwrap());
        let m = manifest(r#"{"frames": {"a": {"x": 4294967295, "y": 0, "w": 1, "h": 1}}}"#);
        assert!(Atlas::new(image.clone(), m).is_err());

        let m = manifest(r#"{"frames": {"a": {"x": 0, "y": 1, "w": 1, "h": 4294967295}}}"#);
        assert!(Atlas::new(image, m).is_err());
    }
}
