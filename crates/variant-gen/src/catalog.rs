//! Fixed table of the numeric datatypes the generator can specialize for.

/// One canonical numeric datatype together with its derived attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Datatype {
    pub name: &'static str,
    pub bit_size: u32,
    pub byte_size: u32,
}

impl Datatype {
    /// Placeholder form used by `<DATATYPE_UPPER>`: the name upper-cased with
    /// a trailing `_T` removed (`int8_t` -> `INT8`, `float` -> `FLOAT`).
    pub fn upper_token(&self) -> String {
        let upper = self.name.to_uppercase();
        match upper.strip_suffix("_T") {
            Some(stripped) => stripped.to_string(),
            None => upper,
        }
    }
}

/// The full catalog, in the order the downstream dispatch table indexes it.
/// This order must never change across runs.
pub const CATALOG: [Datatype; 6] = [
    Datatype {
        name: "float",
        bit_size: 32,
        byte_size: 4,
    },
    Datatype {
        name: "double",
        bit_size: 64,
        byte_size: 8,
    },
    Datatype {
        name: "int8_t",
        bit_size: 8,
        byte_size: 1,
    },
    Datatype {
        name: "int16_t",
        bit_size: 16,
        byte_size: 2,
    },
    Datatype {
        name: "int32_t",
        bit_size: 32,
        byte_size: 4,
    },
    Datatype {
        name: "int64_t",
        bit_size: 64,
        byte_size: 8,
    },
];

/// Look up a datatype by canonical name. Any name outside the six catalog
/// entries is a lookup failure; callers must drop or report such names
/// rather than guess a size.
pub fn lookup(name: &str) -> Option<&'static Datatype> {
    CATALOG.iter().find(|d| d.name == name)
}

/// Catalog position of a canonical name, if present.
pub fn position(name: &str) -> Option<usize> {
    CATALOG.iter().position(|d| d.name == name)
}
