#![no_main]

// Saves small arbitrary images and loads them back.
// Uncompressed 32 bit formats must round trip exactly; every file must match its header.

use ddsplus_api::{load, save, DdsFileFormat, NoProgress, PixelBuffer, SaveOptions, SaveRequest};
use ddsplus_api::{MipmapFilter, SaveOutcome, SliceChannel, VecChannel};
use ddsplus_dds::parse_header;
use libfuzzer_sys::{arbitrary, fuzz_target};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Input {
    pub width: u8,
    pub height: u8,
    pub format: u8,
    pub filter: u8,
    pub generate_mipmaps: bool,
    pub linear_light: bool,
    pub dithering: bool,
    pub pixels: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let width = (input.width % 24) as usize + 1;
    let height = (input.height % 24) as usize + 1;
    let len = width * height * 4;
    if input.pixels.len() < len {
        return;
    }
    let pixels = &input.pixels[..len];

    let formats = DdsFileFormat::all_values();
    let format = formats[input.format as usize % formats.len()];
    let filters = MipmapFilter::all_values();
    let options = SaveOptions::new(format)
        .generate_mipmaps(input.generate_mipmaps)
        .mipmap_filter(filters[input.filter as usize % filters.len()])
        .linear_light_mipmaps(input.linear_light)
        .error_diffusion_dithering(input.dithering);
    let request = SaveRequest::new(
        PixelBuffer::new(width as i32, height as i32, width as i32 * 4, pixels),
        options,
    );

    let mut channel = VecChannel::new();
    let outcome = save(&request, &mut channel, &mut NoProgress).expect("valid requests save");
    assert_eq!(outcome, SaveOutcome::Completed);
    let file = channel.into_inner();

    let parsed = parse_header(&file).expect("saved headers parse");
    assert_eq!(parsed.header.format, format);
    assert_eq!(file.len(), parsed.data_offset + parsed.header.data_size().unwrap());

    let result = load(&mut SliceChannel::new(&file)).expect("saved files load");
    assert_eq!((result.width() as usize, result.height() as usize), (width, height));
    if matches!(format, DdsFileFormat::R8G8B8A8 | DdsFileFormat::B8G8R8A8) {
        assert_eq!(result.pixels().unwrap(), pixels);
    }
});
