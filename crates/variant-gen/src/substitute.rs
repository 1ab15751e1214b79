//! Placeholder substitution over template text for a single datatype.

use crate::catalog::Datatype;

/// Replace every placeholder token in `text` with the values derived from
/// `dtype`. The four replacements are literal and independent of each other;
/// no token is a substring of another, so application order does not matter.
pub fn expand(text: &str, dtype: &Datatype) -> String {
    text.replace("<DATATYPE>", dtype.name)
        .replace("<DATATYPE_UPPER>", &dtype.upper_token())
        .replace("<DATATYPE_SIZE>", &dtype.bit_size.to_string())
        .replace("<DATATYPE_SIZE_BYTE>", &dtype.byte_size.to_string())
}
