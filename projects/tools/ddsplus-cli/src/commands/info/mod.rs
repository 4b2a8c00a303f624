use super::format_name;
use crate::error::CliError;
use crate::util::{open_read_handle, open_readonly_mmap};
use argh::FromArgs;
use bytesize::ByteSize;
use ddsplus_dds::{level_dimension, level_size, parse_header};
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// Print the header of a DDS file
#[argh(subcommand, name = "info")]
pub struct InfoCmd {
    /// input DDS file
    #[argh(option)]
    pub input: PathBuf,
}

pub fn handle_info_command(cmd: InfoCmd) -> Result<(), CliError> {
    let handle = open_read_handle(&cmd.input)?;
    let mapping = open_readonly_mmap(&handle)?;
    let parsed = parse_header(mapping.as_slice())?;
    let header = parsed.header;

    println!("File:          {}", cmd.input.display());
    println!("Format:        {}", format_name(header.format));
    println!("Dimensions:    {}x{}", header.width, header.height);
    println!("Mip levels:    {}", header.mip_count);
    println!("sRGB:          {}", header.format.is_srgb());
    println!("Alpha:         {}", header.format.has_alpha());
    println!("Premultiplied: {}", parsed.premultiplied);
    println!("Header size:   {} bytes", parsed.data_offset);
    if let Some(size) = header.data_size() {
        println!("Data size:     {}", ByteSize(size as u64));
    }
    println!("File size:     {}", ByteSize(mapping.len() as u64));

    for level in 0..header.mip_count {
        let width = level_dimension(header.width, level);
        let height = level_dimension(header.height, level);
        let size = level_size(header.format, width, height).unwrap_or(0);
        println!("  Level {level:>2}: {width}x{height} ({})", ByteSize(size as u64));
    }

    Ok(())
}
