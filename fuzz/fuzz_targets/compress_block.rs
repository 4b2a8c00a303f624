#![no_main]

// Compresses arbitrary blocks with every setting, decoding the result with `bcdec_rs`.
// Uniform opaque blocks must come back close to their original colour.

use ddsplus_bcn::{
    BcFormat, BlockCompressor, BlockDecompressor, BlockSettings, CompressionSpeed, ErrorMetric,
    NativeBlockCodec,
};
use ddsplus_common::block_4x4::Block4x4;
use ddsplus_common::color_8888::Color8888;
use libfuzzer_sys::{arbitrary, fuzz_target};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Input {
    pub pixels: [[u8; 4]; 16],
    pub format: u8,
    pub uniform: bool,
}

fuzz_target!(|input: Input| {
    let formats = BcFormat::all_values();
    let format = formats[input.format as usize % formats.len()];

    let block = if input.uniform {
        let [r, g, b, _] = input.pixels[0];
        Block4x4::new(Color8888::new(r, g, b, 255))
    } else {
        Block4x4 {
            pixels: input.pixels.map(|pixel| Color8888::from_rgba_bytes(&pixel)),
        }
    };

    let mut output = [0u8; 16];
    for &error_metric in ErrorMetric::all_values() {
        for &speed in CompressionSpeed::all_values() {
            let settings = BlockSettings::new(error_metric, speed);
            let output = &mut output[..format.bytes_per_block()];
            NativeBlockCodec.compress_block(&block, format, settings, output);
            let decoded = NativeBlockCodec.decompress_block(output, format);

            if input.uniform {
                assert_uniform_close(&block, &decoded, format, settings);
            }
        }
    }
});

fn assert_uniform_close(
    block: &Block4x4,
    decoded: &Block4x4,
    format: BcFormat,
    settings: BlockSettings,
) {
    let (channels, tolerance) = match format {
        BcFormat::Bc4 => (1, 16),
        BcFormat::Bc5 => (2, 16),
        BcFormat::Bc6h => (3, 32),
        _ => (4, 16),
    };
    let expected = block.pixels[0].to_rgba_bytes();
    for pixel in &decoded.pixels {
        let actual = pixel.to_rgba_bytes();
        for channel in 0..channels {
            assert!(
                expected[channel].abs_diff(actual[channel]) <= tolerance,
                "{format:?} {settings:?}: {expected:?} decoded as {actual:?}"
            );
        }
    }
}
