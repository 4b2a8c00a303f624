//! A single RGBA8888 pixel.

/// Represents a single straight-alpha RGBA8888 pixel.
///
/// This is the in-memory layout of the pixel buffers exchanged with the host,
/// i.e. bytes `[r, g, b, a]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct Color8888 {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
    /// Alpha component (0-255)
    pub a: u8,
}

impl Color8888 {
    /// Constructs a new [`Color8888`] from the specified red, green, blue, and alpha components.
    ///
    /// # Examples
    ///
    /// ```
    /// use ddsplus_common::color_8888::Color8888;
    ///
    /// let pixel = Color8888::new(255, 0, 0, 255);
    /// assert_eq!(pixel.r, 255);
    /// assert_eq!(pixel.a, 255);
    /// ```
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Reads a pixel from the first 4 bytes of `bytes` (`[r, g, b, a]`).
    ///
    /// # Panics
    ///
    /// If `bytes` is shorter than 4 bytes.
    #[inline]
    pub fn from_rgba_bytes(bytes: &[u8]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    /// Returns the pixel as `[r, g, b, a]` bytes.
    #[inline]
    pub const fn to_rgba_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Returns the colour channels in `[r, g, b]` order.
    #[inline]
    pub const fn rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Converts a premultiplied-alpha pixel back into straight alpha.
    ///
    /// Fully transparent pixels come out as transparent black.
    ///
    /// # Examples
    ///
    /// ```
    /// use ddsplus_common::color_8888::Color8888;
    ///
    /// let premultiplied = Color8888::new(64, 32, 0, 128);
    /// assert_eq!(premultiplied.unpremultiply(), Color8888::new(128, 64, 0, 128));
    /// ```
    #[inline]
    pub fn unpremultiply(self) -> Self {
        match self.a {
            0 => Self::new(0, 0, 0, 0),
            255 => self,
            a => {
                let a = a as u32;
                let channel = |c: u8| ((c as u32 * 255 + a / 2) / a).min(255) as u8;
                Self::new(channel(self.r), channel(self.g), channel(self.b), self.a)
            }
        }
    }
}
