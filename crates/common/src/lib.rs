//! Request-side helpers shared by the upload server and client

pub mod file_utils;
pub mod query;

pub use file_utils::{
    candidate_name, filename_from_path, validate_filename, FilenameValidationError,
    DEFAULT_FILENAME,
};
pub use query::SecretGate;
