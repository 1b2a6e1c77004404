use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and path utilities

// @const: Suffix appended to the full original file name for drafts
pub const DRAFT_SUFFIX: &str = ".draft.json";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file, creating the parent directory if needed
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// File stem of a path as an owned string (empty if there is none)
    fn stem_of(path: &Path) -> String {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    // @generates: <stem>_status.json next to the original
    pub fn status_path_for<P: AsRef<Path>>(original: P) -> PathBuf {
        let original = original.as_ref();
        original.with_file_name(format!("{}_status.json", Self::stem_of(original)))
    }

    // @generates: <stem>_<suffix>.srt next to the original
    pub fn translation_path_for<P: AsRef<Path>>(original: P, suffix: &str) -> PathBuf {
        let original = original.as_ref();
        original.with_file_name(format!("{}_{}.srt", Self::stem_of(original), suffix))
    }

    // @generates: <original-name>.draft.json next to the original
    pub fn draft_path_for<P: AsRef<Path>>(original: P) -> PathBuf {
        let original = original.as_ref();
        let name = original
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        original.with_file_name(format!("{}{}", name, DRAFT_SUFFIX))
    }

    /// Base name used for exports: the draft name without `.draft.json`,
    /// then without the subtitle extension ("movie.srt.draft.json" -> "movie").
    pub fn export_base_name<P: AsRef<Path>>(draft: P) -> String {
        let name = draft
            .as_ref()
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let original_name = name.strip_suffix(DRAFT_SUFFIX).unwrap_or(&name);
        Self::stem_of(Path::new(original_name))
    }

    // @generates: <base>_<lang>.srt next to the draft
    pub fn export_path_for<P: AsRef<Path>>(draft: P, lang_code: &str) -> PathBuf {
        let draft = draft.as_ref();
        draft.with_file_name(format!("{}_{}.srt", Self::export_base_name(draft), lang_code))
    }
}
