use super::convert;
use crate::error::CliError;
use crate::util::{create_parent_dir, open_read_handle, open_readonly_mmap};
use argh::FromArgs;
use ddsplus_api::{load, SliceChannel};
use image::{ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(FromArgs, Debug)]
/// Decode the first level of DDS textures into PNG images
#[argh(subcommand, name = "decode")]
pub struct DecodeCmd {
    /// input DDS file, or a directory to convert recursively
    #[argh(option)]
    pub input: PathBuf,

    /// output PNG file, or a directory when the input is a directory
    #[argh(option)]
    pub output: PathBuf,
}

pub fn handle_decode_command(cmd: DecodeCmd) -> Result<(), CliError> {
    convert(&cmd.input, &cmd.output, "dds", "png", decode_file)
}

/// Decodes the DDS file at `source` into a PNG at `target`, returning the size of `source`.
pub fn decode_file(source: &Path, target: &Path) -> Result<u64, CliError> {
    let handle = open_read_handle(source)?;
    let mapping = open_readonly_mmap(&handle)?;
    let mut result = load(&mut SliceChannel::new(mapping.as_slice()))?;

    let (width, height) = (result.width(), result.height());
    let pixels = result.pixels().map(<[u8]>::to_vec).unwrap_or_default();
    result.release();
    let image = RgbaImage::from_raw(width, height, pixels).ok_or_else(|| {
        CliError::ImageTooLarge {
            path: source.to_path_buf(),
            width,
            height,
        }
    })?;

    create_parent_dir(target)?;
    image.save_with_format(target, ImageFormat::Png)?;
    info!(
        "{} -> {} ({width}x{height})",
        source.display(),
        target.display()
    );
    Ok(mapping.len() as u64)
}
