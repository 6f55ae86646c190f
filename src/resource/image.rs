use std::cell::{Cell, Ref, RefCell};

use crate::errors::*;

use super::Resource;

/// A decoded RGBA8 image.
///
/// Besides its pixels an image remembers the source it was loaded from.
/// Destroying the image releases the pixels and clears the source reference,
/// so a destroyed image can not be mistaken for a live one.
#[derive(Debug)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: RefCell<Vec<u8>>,
    src: RefCell<Option<String>>,
    destroyed: Cell<bool>,
}

impl Image {
    /// Creates an image from tightly packed RGBA8 pixels.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(Error::Malformed(format!(
                "Image of {}x{} expects {} bytes of RGBA8 pixels, but got {}.",
                width,
                height,
                expected,
                pixels.len()
            )));
        }

        Ok(Image {
            width,
            height,
            pixels: RefCell::new(pixels),
            src: RefCell::new(None),
            destroyed: Cell::new(false),
        })
    }

    /// Decodes an encoded image (PNG or JPEG).
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let image = ::image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = image.dimensions();
        Image::new(width, height, image.into_raw())
    }

    pub fn with_src<T: Into<String>>(self, src: T) -> Self {
        *self.src.borrow_mut() = Some(src.into());
        self
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the source this image was loaded from.
    #[inline]
    pub fn src(&self) -> Option<String> {
        self.src.borrow().clone()
    }

    #[inline]
    pub fn pixels(&self) -> Ref<[u8]> {
        Ref::map(self.pixels.borrow(), |v| v.as_slice())
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height || self.destroyed.get() {
            return None;
        }

        let i = (y as usize * self.width as usize + x as usize) * 4;
        let pixels = self.pixels.borrow();
        Some([pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]])
    }

    /// Composes a new image with the color channels of `self` and the alpha
    /// channel taken from the red channel of `alpha`.
    pub fn with_alpha_from(&self, alpha: &Image) -> Result<Image> {
        if self.destroyed.get() || alpha.destroyed.get() {
            return Err(Error::Malformed(
                "Can not merge alpha of destroyed images.".into(),
            ));
        }

        if self.dimensions() != alpha.dimensions() {
            return Err(Error::Malformed(format!(
                "Color image ({}x{}) and alpha image ({}x{}) have different sizes.",
                self.width, self.height, alpha.width, alpha.height
            )));
        }

        let mut pixels = self.pixels.borrow().clone();
        let mask = alpha.pixels.borrow();
        for (dst, src) in pixels.chunks_mut(4).zip(mask.chunks(4)) {
            dst[3] = src[0];
        }

        let image = Image::new(self.width, self.height, pixels)?;
        Ok(match self.src() {
            Some(src) => image.with_src(src),
            None => image,
        })
    }
}

impl Resource for Image {
    fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }

        self.src.borrow_mut().take();
        *self.pixels.borrow_mut() = Vec::new();
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }
}
