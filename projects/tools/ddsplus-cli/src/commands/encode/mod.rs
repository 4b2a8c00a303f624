use super::{convert, FORMAT_NAMES};
use crate::error::CliError;
use crate::util::create_parent_dir;
use argh::FromArgs;
use ddsplus_api::{
    save, CompressionSpeed, DdsFileFormat, ErrorMetric, MipmapFilter, PixelBuffer, SaveOptions,
    SaveOutcome, SaveRequest, StreamChannel,
};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(FromArgs, Debug)]
/// Encode PNG images as DDS textures
#[argh(subcommand, name = "encode")]
pub struct EncodeCmd {
    /// input PNG file, or a directory to convert recursively
    #[argh(option)]
    pub input: PathBuf,

    /// output DDS file, or a directory when the input is a directory
    #[argh(option)]
    pub output: PathBuf,

    /// output format: bc1, bc1-srgb, bc2, bc2-srgb, bc3, bc3-srgb, bc4, bc5, bc6h, bc7,
    /// bc7-srgb, b8g8r8a8, b8g8r8x8, r8g8b8a8, b5g5r5a1, b4g4r4a4, b5g6r5 [default: bc1]
    #[argh(option, default = "DdsFileFormat::Bc1", from_str_fn(parse_format))]
    pub format: DdsFileFormat,

    /// block error metric: perceptual, uniform [default: perceptual]
    #[argh(option, default = "ErrorMetric::Perceptual", from_str_fn(parse_error_metric))]
    pub error_metric: ErrorMetric,

    /// block compression speed: fast, normal, slow [default: normal]
    #[argh(option, default = "CompressionSpeed::Normal", from_str_fn(parse_speed))]
    pub speed: CompressionSpeed,

    /// generate a full mip chain
    #[argh(switch)]
    pub mipmaps: bool,

    /// mip level filter: nearest, bilinear, bicubic, fant [default: bicubic]
    #[argh(option, default = "MipmapFilter::Bicubic", from_str_fn(parse_filter))]
    pub filter: MipmapFilter,

    /// resample mip levels in sRGB space instead of linear light
    #[argh(switch)]
    pub no_linear_light: bool,

    /// dither when writing b5g5r5a1, b4g4r4a4 or b5g6r5
    #[argh(switch)]
    pub dither: bool,
}

impl EncodeCmd {
    fn options(&self) -> SaveOptions {
        SaveOptions::new(self.format)
            .error_metric(self.error_metric)
            .compression_speed(self.speed)
            .generate_mipmaps(self.mipmaps)
            .mipmap_filter(self.filter)
            .linear_light_mipmaps(!self.no_linear_light)
            .error_diffusion_dithering(self.dither)
    }
}

fn parse_format(value: &str) -> Result<DdsFileFormat, String> {
    let value = value.to_lowercase();
    FORMAT_NAMES
        .iter()
        .find(|(name, _)| *name == value)
        .map(|(_, format)| *format)
        .ok_or_else(|| {
            let names: Vec<_> = FORMAT_NAMES.iter().map(|(name, _)| *name).collect();
            format!("Unknown format: {value}. Valid options: {}", names.join(", "))
        })
}

fn parse_error_metric(value: &str) -> Result<ErrorMetric, String> {
    match value.to_lowercase().as_str() {
        "perceptual" => Ok(ErrorMetric::Perceptual),
        "uniform" => Ok(ErrorMetric::Uniform),
        _ => Err(format!(
            "Unknown error metric: {value}. Valid options: perceptual, uniform"
        )),
    }
}

fn parse_speed(value: &str) -> Result<CompressionSpeed, String> {
    match value.to_lowercase().as_str() {
        "fast" => Ok(CompressionSpeed::Fast),
        "normal" => Ok(CompressionSpeed::Normal),
        "slow" => Ok(CompressionSpeed::Slow),
        _ => Err(format!(
            "Unknown speed: {value}. Valid options: fast, normal, slow"
        )),
    }
}

fn parse_filter(value: &str) -> Result<MipmapFilter, String> {
    match value.to_lowercase().as_str() {
        "nearest" => Ok(MipmapFilter::Nearest),
        "bilinear" => Ok(MipmapFilter::Bilinear),
        "bicubic" => Ok(MipmapFilter::Bicubic),
        "fant" => Ok(MipmapFilter::Fant),
        _ => Err(format!(
            "Unknown filter: {value}. Valid options: nearest, bilinear, bicubic, fant"
        )),
    }
}

pub fn handle_encode_command(cmd: EncodeCmd) -> Result<(), CliError> {
    let options = cmd.options();
    debug!(?options, "encode options");
    convert(&cmd.input, &cmd.output, "png", "dds", |source, target| {
        encode_file(source, target, options)
    })
}

/// Encodes the PNG at `source` into a DDS file at `target`, returning the size of `source`.
pub fn encode_file(source: &Path, target: &Path, options: SaveOptions) -> Result<u64, CliError> {
    let image = image::open(source)?.into_rgba8();
    let (width, height) = image.dimensions();
    let too_large = || CliError::ImageTooLarge {
        path: source.to_path_buf(),
        width,
        height,
    };
    let pixel_width = i32::try_from(width).map_err(|_| too_large())?;
    let pixel_height = i32::try_from(height).map_err(|_| too_large())?;
    let stride = pixel_width.checked_mul(4).ok_or_else(too_large)?;
    let request = SaveRequest::new(
        PixelBuffer::new(pixel_width, pixel_height, stride, image.as_raw()),
        options,
    );

    create_parent_dir(target)?;
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(target)?;
    let mut channel = StreamChannel::new(file);
    let mut progress = |percent: f64| {
        debug!(file = %target.display(), "{percent:.1}%");
        true
    };

    match save(&request, &mut channel, &mut progress)? {
        SaveOutcome::Completed => {}
        SaveOutcome::Cancelled => return Err(CliError::Cancelled(target.to_path_buf())),
    }
    info!(
        "{} -> {} ({width}x{height})",
        source.display(),
        target.display()
    );
    Ok(fs::metadata(source)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddsplus_dds::parse_header;
    use image::{Rgba, RgbaImage};

    #[test]
    fn format_names_parse_case_insensitively() {
        assert_eq!(parse_format("BC7-sRGB"), Ok(DdsFileFormat::Bc7Srgb));
        assert_eq!(parse_format("b5g6r5"), Ok(DdsFileFormat::B5G6R5));
        assert!(parse_format("dxt1").is_err());
    }

    #[test]
    fn option_values_parse() {
        assert_eq!(parse_error_metric("Uniform"), Ok(ErrorMetric::Uniform));
        assert_eq!(parse_speed("SLOW"), Ok(CompressionSpeed::Slow));
        assert_eq!(parse_filter("fant"), Ok(MipmapFilter::Fant));
        assert!(parse_filter("lanczos").is_err());
    }

    #[test]
    fn dither_switch_reaches_the_options() {
        let args = ["--input", "a.png", "--output", "a.dds", "--format", "b5g6r5"];
        let cmd = EncodeCmd::from_args(&["encode"], &args).unwrap();
        assert!(!cmd.options().error_diffusion_dithering);

        let dithered = [&args[..], &["--dither"][..]].concat();
        let cmd = EncodeCmd::from_args(&["encode"], &dithered).unwrap();
        assert!(cmd.options().error_diffusion_dithering);
    }

    #[test]
    fn encodes_png_files() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("gradient.png");
        let target = dir.path().join("out/gradient.dds");
        RgbaImage::from_fn(12, 8, |x, y| Rgba([x as u8 * 20, y as u8 * 30, 0, 255]))
            .save(&source)
            .unwrap();

        let options = SaveOptions::new(DdsFileFormat::Bc1).generate_mipmaps(true);
        encode_file(&source, &target, options).unwrap();

        let bytes = fs::read(&target).unwrap();
        let parsed = parse_header(&bytes).unwrap();
        assert_eq!((parsed.header.width, parsed.header.height), (12, 8));
        assert_eq!(parsed.header.mip_count, 4);
        assert_eq!(bytes.len(), parsed.data_offset + parsed.header.data_size().unwrap());
    }
}
