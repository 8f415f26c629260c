#![doc = include_str!("../README.md")]

mod location;
pub use location::Location;

mod scalar;
pub use scalar::{Scalar, ScalarKind};

mod datetime;
pub use datetime::is_valid_datetime;

mod translate;
pub use translate::TranslateError;

mod validate;
pub use validate::{BASE64_PREFIX, NULL_MARKER, is_base64_string, is_null_string, is_valid_bare_string};
