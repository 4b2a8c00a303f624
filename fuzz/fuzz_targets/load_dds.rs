#![no_main]

// Loading arbitrary bytes must either fail cleanly or produce a well formed buffer.

use ddsplus_api::{load, SliceChannel};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut channel = SliceChannel::new(data);
    let Ok(mut result) = load(&mut channel) else {
        return;
    };

    assert_eq!(result.stride(), result.width() * 4);
    let pixels = result.pixels().expect("a fresh result owns its pixels");
    assert_eq!(pixels.len(), result.stride() as usize * result.height() as usize);
    assert!(channel.remaining().len() <= data.len());

    result.release();
    result.release();
    assert!(result.pixels().is_none());
});
