//! Procedure signature helpers
//!
//! Canonical signature format: `declaring.Type#methodName`, e.g.
//! `com.app.Main#check` or `java.util.Date#<init>`. The declaring type is
//! everything before the `#`, the method name everything after.

/// Separator between declaring type and method name
pub const SIG_SEPARATOR: char = '#';

/// Instance constructor method name
pub const CONSTRUCTOR: &str = "<init>";

/// Static class initializer method name
pub const CLASS_CONSTRUCTOR: &str = "<clinit>";

/// Declaring type of a signature (`com.app.Main#check` -> `com.app.Main`).
/// Returns the whole string when no separator is present.
pub fn declaring_type(signature: &str) -> &str {
    match signature.find(SIG_SEPARATOR) {
        Some(idx) => &signature[..idx],
        None => signature,
    }
}

/// Method name of a signature (`com.app.Main#check` -> `check`).
/// Returns the empty string when no separator is present.
pub fn method_name(signature: &str) -> &str {
    match signature.find(SIG_SEPARATOR) {
        Some(idx) => &signature[idx + 1..],
        None => "",
    }
}

/// Whether a signature names an instance or static constructor
pub fn is_constructor(signature: &str) -> bool {
    let name = method_name(signature);
    name == CONSTRUCTOR || name == CLASS_CONSTRUCTOR
}
