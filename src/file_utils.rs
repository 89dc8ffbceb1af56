use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and path utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @generates: Output path for the narrated track
    // Same directory and base filename as the input, mp3 extension
    pub fn narration_output_path<P: AsRef<Path>>(input_file: P) -> PathBuf {
        input_file.as_ref().with_extension("mp3")
    }

    /// Read a file to a string
    #[allow(dead_code)] // used by tests
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }
}
