use percent_encoding::percent_decode_str;
use std::path::Path;

/// Filename used when the request path ends without one (e.g. `/` or `/dir/`)
pub const DEFAULT_FILENAME: &str = "savedFile";

/// Longest filename accepted from a request path, in bytes
pub const MAX_FILENAME_LEN: usize = 255;

/// Error type for filename validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilenameValidationError {
    Empty,
    TooLong,
    ContainsNullByte,
    ContainsPathSeparator,
    IsSpecialDirectory,
    InvalidFileName,
}

impl FilenameValidationError {
    pub fn message(&self) -> &'static str {
        match self {
            FilenameValidationError::Empty => "Filename cannot be empty",
            FilenameValidationError::TooLong => "Filename is longer than 255 bytes",
            FilenameValidationError::ContainsNullByte => "Filename cannot contain null bytes",
            FilenameValidationError::ContainsPathSeparator => {
                "Filename cannot contain path separators (/ or \\)"
            }
            FilenameValidationError::IsSpecialDirectory => "Filename cannot be '.' or '..'",
            FilenameValidationError::InvalidFileName => {
                "Invalid filename: must be a plain file name"
            }
        }
    }
}

impl std::fmt::Display for FilenameValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for FilenameValidationError {}

/// Validate a filename so that joining it onto the save directory cannot
/// leave that directory.
/// Checks if:
/// - Filename is not empty and at most `MAX_FILENAME_LEN` bytes
/// - Filename contains no null byte and no path separators (/, \)
/// - Filename is not "." or ".."
/// - Path::new(filename).file_name() is the filename itself
pub fn validate_filename(filename: &str) -> Result<(), FilenameValidationError> {
    if filename.is_empty() {
        return Err(FilenameValidationError::Empty);
    }

    if filename.len() > MAX_FILENAME_LEN {
        return Err(FilenameValidationError::TooLong);
    }

    if filename.contains('\0') {
        return Err(FilenameValidationError::ContainsNullByte);
    }

    if filename.contains('/') || filename.contains('\\') {
        return Err(FilenameValidationError::ContainsPathSeparator);
    }

    if filename == "." || filename == ".." {
        return Err(FilenameValidationError::IsSpecialDirectory);
    }

    // Catches prefixes such as "C:" that would still re-root a join on Windows
    if Path::new(filename).file_name().and_then(|n| n.to_str()) != Some(filename) {
        return Err(FilenameValidationError::InvalidFileName);
    }

    Ok(())
}

/// Derive the upload filename from a request path (query string excluded).
///
/// The last `/`-separated segment is percent-decoded and validated. An empty
/// segment yields [`DEFAULT_FILENAME`]. A segment that decodes to a separator,
/// `..` or similar is an error rather than being silently rewritten.
pub fn filename_from_path(path: &str) -> Result<String, FilenameValidationError> {
    let segment = path.rsplit('/').next().unwrap_or_default();
    let decoded = percent_decode_str(segment).decode_utf8_lossy();

    let filename = if decoded.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        decoded.into_owned()
    };

    validate_filename(&filename)?;
    Ok(filename)
}

/// Name tried on the given collision attempt: `name`, then `name_1`, `name_2`, ...
///
/// The suffix goes after the whole filename, extension included, so a second
/// `report.txt` becomes `report.txt_1`. Only suffixes added here are counted:
/// a requested name that already ends in `_N` is taken as-is, so a second
/// `file_1` becomes `file_1_1` rather than `file_2`.
pub fn candidate_name(filename: &str, attempt: usize) -> String {
    if attempt == 0 {
        filename.to_string()
    } else {
        format!("{}_{}", filename, attempt)
    }
}
