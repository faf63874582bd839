//! The fixed HTTP method set
//!
//! A path item field is a method if and only if its key is one of these
//! seven lower-case verbs. Everything else on a path item (descriptions,
//! shared parameters, vendor markers) is an ordinary field.

/// The recognized HTTP verbs, lower-case, as they appear as path item keys
pub const HTTP_METHODS: [&str; 7] = [
    "get", "post", "put", "patch", "delete", "head", "options",
];

/// Whether a path item key names an HTTP method
///
/// Matching is exact: upper-case or mixed-case keys are not methods.
pub fn is_http_method(key: &str) -> bool {
    HTTP_METHODS.contains(&key)
}
