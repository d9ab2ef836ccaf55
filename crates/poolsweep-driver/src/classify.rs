//! Classification of remote errors for cleanup and acceptance checks.
//!
//! Sweeps are best effort: an account or partition that simply does not offer
//! the API (GovCloud, opt-in regions, restricted CI credentials) must not turn
//! a cleanup run red. The tables below list the code/message pairs that mean
//! "not available here".

use poolsweep_domain::ErrorClass;

use crate::error::ClientError;

/// `(code, message fragment)`; an empty fragment matches any message.
const SKIP_ERRORS: &[(&str, &str)] = &[
    ("UnsupportedOperation", ""),
    ("InvalidParameterValue", "not permitted in this API version for your account"),
    ("InvalidParameterValue", "Access Denied to API Version"),
    ("AccessDeniedException", ""),
    ("BadRequestException", "not supported"),
    ("InvalidAction", "is not valid"),
    ("InvalidAction", "Unavailable Operation"),
    ("UnrecognizedClientException", ""),
];

const NOT_FOUND_CODES: &[&str] = &["ResourceNotFoundException"];

/// Decide how a remote error should be handled.
pub fn classify(err: &ClientError) -> ErrorClass {
    match err {
        // Missing API endpoint for this region.
        ClientError::Transport { connect: true, .. } => ErrorClass::Skip,
        ClientError::Transport { .. } => ErrorClass::Fatal,
        ClientError::Api { code, message, .. } => classify_code(code, message),
        ClientError::Credentials(_) | ClientError::Decode(_) | ClientError::Setup(_) => {
            ErrorClass::Fatal
        }
    }
}

fn classify_code(code: &str, message: &str) -> ErrorClass {
    if NOT_FOUND_CODES.contains(&code) {
        return ErrorClass::NotFound;
    }
    let skip = SKIP_ERRORS
        .iter()
        .any(|(c, fragment)| *c == code && (fragment.is_empty() || message.contains(fragment)));
    if skip {
        ErrorClass::Skip
    } else {
        ErrorClass::Fatal
    }
}
