//! Service constants and configuration defaults.

/// Environment variable: bind host.
pub const C_ENV_HOST: &str = "UNITSPLIT_HOST";
/// Environment variable: bind port.
pub const C_ENV_PORT: &str = "UNITSPLIT_PORT";
/// Environment variable: upload directory.
pub const C_ENV_UPLOAD_DIR: &str = "UNITSPLIT_UPLOAD_DIR";
/// Environment variable: output directory.
pub const C_ENV_OUTPUT_DIR: &str = "UNITSPLIT_OUTPUT_DIR";
/// Environment variable: request body limit in bytes.
pub const C_ENV_MAX_UPLOAD_BYTES: &str = "UNITSPLIT_MAX_UPLOAD_BYTES";

pub const C_HOST_DEFAULT: &str = "0.0.0.0";
pub const N_PORT_DEFAULT: u16 = 5011;
pub const C_UPLOAD_DIR_DEFAULT: &str = "uploads";
pub const C_OUTPUT_DIR_DEFAULT: &str = "outputs";
pub const N_MAX_UPLOAD_BYTES_DEFAULT: usize = 64 * 1024 * 1024;

/// Log filter used when `RUST_LOG` is unset.
pub const C_LOG_FILTER_DEFAULT: &str = "info";

/// Default `file_type` form value of an upload.
pub const C_FILE_TYPE_DEFAULT: &str = "mainFile";
/// File stem of the non-matching subset.
pub const C_STEM_REMAINING: &str = "剩余数据";
/// Characters replaced in generated file names.
pub const TUP_FILENAME_UNSAFE: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
/// Maximum length of a generated file stem, in characters.
pub const N_LEN_FILE_STEM_MAX: usize = 100;
