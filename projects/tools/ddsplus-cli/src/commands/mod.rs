use crate::error::CliError;
use crate::util::{find_files_with_extension, output_path_for, process_batch};
use ddsplus_dds::DdsFileFormat;
use std::path::Path;
use tracing::info;

pub mod decode;
pub mod encode;
pub mod info;

/// Command line names of every [`DdsFileFormat`].
pub const FORMAT_NAMES: [(&str, DdsFileFormat); 17] = [
    ("bc1", DdsFileFormat::Bc1),
    ("bc1-srgb", DdsFileFormat::Bc1Srgb),
    ("bc2", DdsFileFormat::Bc2),
    ("bc2-srgb", DdsFileFormat::Bc2Srgb),
    ("bc3", DdsFileFormat::Bc3),
    ("bc3-srgb", DdsFileFormat::Bc3Srgb),
    ("bc4", DdsFileFormat::Bc4),
    ("bc5", DdsFileFormat::Bc5),
    ("bc6h", DdsFileFormat::Bc6h),
    ("bc7", DdsFileFormat::Bc7),
    ("bc7-srgb", DdsFileFormat::Bc7Srgb),
    ("b8g8r8a8", DdsFileFormat::B8G8R8A8),
    ("b8g8r8x8", DdsFileFormat::B8G8R8X8),
    ("r8g8b8a8", DdsFileFormat::R8G8B8A8),
    ("b5g5r5a1", DdsFileFormat::B5G5R5A1),
    ("b4g4r4a4", DdsFileFormat::B4G4R4A4),
    ("b5g6r5", DdsFileFormat::B5G6R5),
];

/// The command line name of `format`.
pub fn format_name(format: DdsFileFormat) -> &'static str {
    FORMAT_NAMES
        .iter()
        .find(|(_, candidate)| *candidate == format)
        .map_or("unknown", |(name, _)| name)
}

/// Converts `input` to `output` with `convert_file`.
///
/// When `input` is a directory, every file with `input_extension` below it is converted into
/// the same relative location under `output`, with `output_extension`.
pub fn convert<F>(
    input: &Path,
    output: &Path,
    input_extension: &str,
    output_extension: &str,
    convert_file: F,
) -> Result<(), CliError>
where
    F: Fn(&Path, &Path) -> Result<u64, CliError> + Sync,
{
    if !input.is_dir() {
        return convert_file(input, output).map(|_| ());
    }

    let mut files = Vec::new();
    find_files_with_extension(input, input_extension, &mut files);
    if files.is_empty() {
        info!("No .{input_extension} files found in {}", input.display());
        return Ok(());
    }

    info!("Found {} files to process", files.len());
    let failed = process_batch(&files, |source| {
        convert_file(
            source,
            &output_path_for(source, input, output, output_extension),
        )
    });
    if failed > 0 {
        return Err(CliError::BatchFailed {
            failed,
            total: files.len(),
        });
    }
    Ok(())
}
