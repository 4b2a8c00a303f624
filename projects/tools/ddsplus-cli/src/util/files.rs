use crate::error::CliError;
use lightweight_mmap::handles::*;
use lightweight_mmap::mmap::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Recursively collects the files under `dir` whose extension is `extension`
/// (case insensitive).
///
/// Directories and entries that cannot be read are skipped.
pub fn find_files_with_extension(dir: &Path, extension: &str, files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            find_files_with_extension(&path, extension, files);
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        {
            files.push(path);
        }
    }
}

/// Maps `source` into the output tree: `output_dir` joined with the path of `source` relative
/// to `input_dir`, with its extension replaced by `extension`.
pub fn output_path_for(
    source: &Path,
    input_dir: &Path,
    output_dir: &Path,
    extension: &str,
) -> PathBuf {
    let relative = source.strip_prefix(input_dir).unwrap_or(source);
    output_dir.join(relative).with_extension(extension)
}

/// Creates the parent directory of `path` if it does not exist.
pub fn create_parent_dir(path: &Path) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Opens a file for reading through a memory mapping.
pub fn open_read_handle(path: &Path) -> Result<ReadOnlyFileHandle, CliError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| CliError::Mmap(format!("{}: path is not valid UTF-8", path.display())))?;
    ReadOnlyFileHandle::open(path_str).map_err(|e| CliError::Mmap(e.to_string()))
}

/// Maps the whole file behind `handle`.
pub fn open_readonly_mmap(handle: &ReadOnlyFileHandle) -> Result<ReadOnlyMmap<'_>, CliError> {
    let len = handle.size().map_err(|e| CliError::Mmap(e.to_string()))?;
    ReadOnlyMmap::new(handle, 0, len as usize).map_err(|e| CliError::Mmap(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_paths_mirror_the_input_tree() {
        let path = output_path_for(
            Path::new("/in/textures/wood.png"),
            Path::new("/in"),
            Path::new("/out"),
            "dds",
        );
        assert_eq!(path, Path::new("/out/textures/wood.dds"));
    }

    #[test]
    fn only_matching_extensions_are_collected() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("a.png"), []).unwrap();
        fs::write(dir.path().join("nested/b.PNG"), []).unwrap();
        fs::write(dir.path().join("c.dds"), []).unwrap();

        let mut files = Vec::new();
        find_files_with_extension(dir.path(), "png", &mut files);
        files.sort();
        assert_eq!(
            files,
            [dir.path().join("a.png"), dir.path().join("nested/b.PNG")]
        );
    }
}
