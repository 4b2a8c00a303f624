//! The owned result of a load, and its release.

use safe_allocator_api::RawAlloc;

/// A decoded image: R8G8B8A8 pixels with straight alpha, in a 64 byte aligned buffer.
///
/// The buffer is owned by the result. It is freed by [`LoadResult::release`] (or
/// [`free_load_info`]), or when the result is dropped. Releasing is idempotent; a released
/// result reports zero dimensions and no pixels.
pub struct LoadResult {
    width: u32,
    height: u32,
    stride: u32,
    pixels: Option<RawAlloc>,
}

impl LoadResult {
    /// Takes ownership of `pixels`, which holds `height` rows of `stride` bytes.
    pub(crate) fn new(width: u32, height: u32, stride: u32, pixels: RawAlloc) -> Self {
        debug_assert!(pixels.len() >= stride as usize * height as usize);
        Self {
            width,
            height,
            stride,
            pixels: Some(pixels),
        }
    }

    /// Width in pixels, 0 after release.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels, 0 after release.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Distance between rows in bytes (always `width * 4`), 0 after release.
    #[inline]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// The pixels, or [`None`] after release.
    #[inline]
    pub fn pixels(&self) -> Option<&[u8]> {
        self.pixels.as_ref().map(|pixels| pixels.as_slice())
    }

    /// Mutable access to the pixels, or [`None`] after release.
    #[inline]
    pub fn pixels_mut(&mut self) -> Option<&mut [u8]> {
        self.pixels.as_mut().map(|pixels| pixels.as_mut_slice())
    }

    /// Whether the buffer has been released.
    #[inline]
    pub fn is_released(&self) -> bool {
        self.pixels.is_none()
    }

    /// Frees the pixel buffer and clears the dimensions. Safe to call more than once.
    pub fn release(&mut self) {
        self.pixels = None;
        self.width = 0;
        self.height = 0;
        self.stride = 0;
    }

    /// Moves the buffer out of the result, leaving it released.
    #[cfg(feature = "c-exports")]
    pub(crate) fn take(&mut self) -> Option<RawAlloc> {
        let pixels = self.pixels.take();
        self.release();
        pixels
    }
}

impl core::fmt::Debug for LoadResult {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoadResult")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("released", &self.is_released())
            .finish()
    }
}

/// Releases the buffer of `result`. Equivalent to [`LoadResult::release`].
pub fn free_load_info(result: &mut LoadResult) {
    result.release();
}
