//! RGB565 endpoint colours, as stored in BC1-BC3 colour blocks.

use ddsplus_common::color_8888::Color8888;

/// Represents a 16-bit RGB565 color (5 bits red, 6 bits green, 5 bits blue)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Color565 {
    /// The underlying 16-bit RGB565 value
    value: u16,
}

impl Color565 {
    /// Creates a new [`Color565`] from the raw 16-bit value
    #[inline]
    pub const fn from_raw(value: u16) -> Self {
        Self { value }
    }

    /// Creates a new [`Color565`] from 8-bit components, rounding each to the nearest
    /// representable value.
    ///
    /// # Examples
    ///
    /// ```
    /// use ddsplus_bcn::color_565::Color565;
    ///
    /// // 0x86 is closer to 0x84 (16 << 3 | 16 >> 2) than to 0x8C.
    /// let color = Color565::from_rgb_rounded(0x86, 0, 0);
    /// assert_eq!(color.red(), 0x84);
    /// ```
    #[inline]
    pub const fn from_rgb_rounded(r: u8, g: u8, b: u8) -> Self {
        let r = (r as u16 * 31 + 127) / 255;
        let g = (g as u16 * 63 + 127) / 255;
        let b = (b as u16 * 31 + 127) / 255;
        Self {
            value: (r << 11) | (g << 5) | b,
        }
    }

    /// Returns the raw 16-bit value
    #[inline]
    pub const fn raw_value(&self) -> u16 {
        self.value
    }

    /// Extracts the expanded 8-bit red component
    #[inline]
    pub const fn red(&self) -> u8 {
        let r = (self.value >> 11) & 0x1F;
        ((r << 3) | (r >> 2)) as u8
    }

    /// Extracts the expanded 8-bit green component
    #[inline]
    pub const fn green(&self) -> u8 {
        let g = (self.value >> 5) & 0x3F;
        ((g << 2) | (g >> 4)) as u8
    }

    /// Extracts the expanded 8-bit blue component
    #[inline]
    pub const fn blue(&self) -> u8 {
        let b = self.value & 0x1F;
        ((b << 3) | (b >> 2)) as u8
    }

    /// Returns the expanded components as `[r, g, b]`
    #[inline]
    pub const fn to_rgb(&self) -> [u8; 3] {
        [self.red(), self.green(), self.blue()]
    }

    /// Converts this [`Color565`] to a [`Color8888`] with full opacity (alpha=255)
    #[inline]
    pub const fn to_color_8888(&self) -> Color8888 {
        Color8888::new(self.red(), self.green(), self.blue(), 255)
    }
}
