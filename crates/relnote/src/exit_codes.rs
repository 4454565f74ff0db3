//! Exit codes for the CLI

use relnote_core::RelnoteError;

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// Fragment or filesystem error
pub const FRAGMENT_ERROR: i32 = 3;

/// Markup conversion error
pub const CONVERT_ERROR: i32 = 4;

/// Map an error to the process exit code for its category
pub fn for_error(err: &anyhow::Error) -> i32 {
    let Some(err) = err.chain().find_map(|e| e.downcast_ref::<RelnoteError>()) else {
        return ERROR;
    };

    match err {
        RelnoteError::Config(_) => CONFIG_ERROR,
        RelnoteError::Fragment(_) | RelnoteError::Io(_) | RelnoteError::Yaml(_) => FRAGMENT_ERROR,
        RelnoteError::Convert(_) => CONVERT_ERROR,
    }
}
