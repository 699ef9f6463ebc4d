//! Upload/output directory layout and file-name resolution.

use std::path::{Component, Path, PathBuf};

use unitsplit_io_xlsx::TUP_EXT_UPLOAD_ACCEPTED;

use crate::error::WebError;
use crate::spec::SpecStorageDirs;
use crate::util::sanitize_filename;

/// Whether `filename` carries an accepted spreadsheet extension (case-insensitive).
pub fn has_accepted_extension(filename: &str) -> bool {
    let c_lower = filename.to_lowercase();
    TUP_EXT_UPLOAD_ACCEPTED
        .iter()
        .any(|c_ext| c_lower.ends_with(c_ext))
}

/// Reduce a client-supplied name to a single plain file-name component.
pub fn derive_plain_filename(name: &str) -> Option<String> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(c_name)), None) => c_name.to_str().map(ToString::to_string),
        _ => None,
    }
}

/// Output path for `stem`: `<stem>.xlsx`, else `<stem>_1.xlsx`, `<stem>_2.xlsx`, ...
pub fn derive_unique_output_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let c_stem = sanitize_filename(stem);
    let mut path = dir.join(format!("{c_stem}{ext}"));
    let mut n_counter = 1usize;
    while path.exists() {
        path = dir.join(format!("{c_stem}_{n_counter}{ext}"));
        n_counter += 1;
    }
    path
}

impl SpecStorageDirs {
    /// Path an upload named `filename` is stored at: its base name inside the upload
    /// directory (last writer wins).
    pub fn upload_path(&self, filename: &str) -> Result<PathBuf, WebError> {
        Path::new(filename)
            .file_name()
            .map(|c_name| self.dir_uploads.join(c_name))
            .ok_or_else(|| WebError::BadRequest(format!("invalid file name: {filename}")))
    }

    /// Locate a previously uploaded file from the path or name a client sent back.
    ///
    /// Only the final file-name component is honoured, so requests cannot reach outside the
    /// upload directory.
    pub fn resolve_uploaded(&self, path_client: &str) -> Result<PathBuf, WebError> {
        let path = Path::new(path_client)
            .file_name()
            .and_then(|c_name| c_name.to_str())
            .map(|c_name| self.dir_uploads.join(c_name))
            .ok_or_else(|| WebError::BadRequest(format!("invalid file path: {path_client}")))?;
        if !path.is_file() {
            return Err(WebError::BadRequest(format!(
                "uploaded file not found: {path_client}"
            )));
        }
        Ok(path)
    }

    /// Existing output file named `filename`; `None` for absent files and non-plain names.
    pub fn resolve_output(&self, filename: &str) -> Option<PathBuf> {
        let c_name = derive_plain_filename(filename)?;
        let path = self.dir_outputs.join(c_name);
        path.is_file().then_some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::TestDir;

    fn build_dirs(dir: &TestDir) -> SpecStorageDirs {
        let dirs = SpecStorageDirs {
            dir_uploads: dir.path().join("uploads"),
            dir_outputs: dir.path().join("outputs"),
        };
        dirs.ensure().expect("create dirs");
        dirs
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(has_accepted_extension("data.xlsx"));
        assert!(has_accepted_extension("DATA.XLS"));
        assert!(!has_accepted_extension("data.csv"));
        assert!(!has_accepted_extension("xlsx"));
    }

    #[test]
    fn plain_filename_rejects_path_components() {
        assert_eq!(derive_plain_filename("a.xlsx"), Some("a.xlsx".to_string()));
        assert_eq!(derive_plain_filename("../a.xlsx"), None);
        assert_eq!(derive_plain_filename("dir/a.xlsx"), None);
        assert_eq!(derive_plain_filename(".."), None);
        assert_eq!(derive_plain_filename(""), None);
    }

    #[test]
    fn unique_output_path_counts_up() {
        let dir = TestDir::new("unique");
        let dirs = build_dirs(&dir);

        let path = derive_unique_output_path(&dirs.dir_outputs, "计算机/学院", ".xlsx");
        assert_eq!(path, dirs.dir_outputs.join("计算机_学院.xlsx"));
        std::fs::write(&path, b"x").expect("write");

        let path = derive_unique_output_path(&dirs.dir_outputs, "计算机/学院", ".xlsx");
        assert_eq!(path, dirs.dir_outputs.join("计算机_学院_1.xlsx"));
        std::fs::write(&path, b"x").expect("write");

        let path = derive_unique_output_path(&dirs.dir_outputs, "计算机/学院", ".xlsx");
        assert_eq!(path, dirs.dir_outputs.join("计算机_学院_2.xlsx"));
    }

    #[test]
    fn resolution_stays_inside_storage_dirs() {
        let dir = TestDir::new("resolve");
        let dirs = build_dirs(&dir);
        std::fs::write(dirs.dir_uploads.join("main.xlsx"), b"x").expect("write");
        std::fs::write(dirs.dir_outputs.join("A.xlsx"), b"x").expect("write");
        std::fs::write(dir.path().join("secret.xlsx"), b"x").expect("write");

        let c_client = dirs.dir_uploads.join("main.xlsx").to_string_lossy().to_string();
        assert_eq!(
            dirs.resolve_uploaded(&c_client).expect("resolve"),
            dirs.dir_uploads.join("main.xlsx")
        );
        assert!(dirs.resolve_uploaded("main.xlsx").is_ok());
        assert!(dirs.resolve_uploaded("../secret.xlsx").is_err());

        assert!(dirs.resolve_output("A.xlsx").is_some());
        assert!(dirs.resolve_output("B.xlsx").is_none());
        assert!(dirs.resolve_output("../secret.xlsx").is_none());
        assert_eq!(
            dirs.upload_path("../x.xlsx").expect("base name"),
            dirs.dir_uploads.join("x.xlsx")
        );
        assert!(dirs.upload_path("..").is_err());
    }
}
