//! Builds the fixed-order function-pointer name list emitted for
//! `CREATE_INITIALIZER` directives.

use crate::catalog::{self, CATALOG, Datatype};

/// Placeholder emitted for datatypes with no generated functions.
pub const NULL_SLOT: &str = "NULL";

const OPS_PER_DATATYPE: usize = 2;

/// Number of entries in the slot table: compress + decompress per catalog
/// entry. The consuming build indexes this table positionally by a
/// datatype-tag enum whose values match catalog order.
pub const SLOT_COUNT: usize = CATALOG.len() * OPS_PER_DATATYPE;

/// Build the slot table for one `CREATE_INITIALIZER(name)` directive.
///
/// Every slot starts as [`NULL_SLOT`]. Each accumulated datatype at catalog
/// position `i` fills slot `2i` with `<name>_compress_<datatype>` and slot
/// `2i+1` with `<name>_decompress_<datatype>`. Duplicate datatypes overwrite
/// the same two slots with identical values, so accumulation order and
/// repetition never affect the result.
pub fn slot_table(name: &str, accumulated: &[&'static Datatype]) -> Vec<String> {
    let mut slots = vec![NULL_SLOT.to_string(); SLOT_COUNT];
    for dtype in accumulated {
        let pos = catalog::position(dtype.name)
            .expect("accumulated support set only holds catalog entries");
        slots[pos * OPS_PER_DATATYPE] = format!("{}_compress_{}", name, dtype.name);
        slots[pos * OPS_PER_DATATYPE + 1] = format!("{}_decompress_{}", name, dtype.name);
    }
    slots
}

/// Render the slot table as the text emitted in place of the directive line.
/// Continuation lines are indented to sit inside the designated-initializer
/// block the directive appears in.
pub fn render(name: &str, accumulated: &[&'static Datatype]) -> String {
    slot_table(name, accumulated).join(",\n      ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::lookup;

    fn dtypes(names: &[&str]) -> Vec<&'static Datatype> {
        names
            .iter()
            .map(|n| lookup(n).expect("test datatype must be canonical"))
            .collect()
    }

    #[test]
    fn fills_slots_in_catalog_order_regardless_of_declaration_order() {
        let declared_forward = slot_table("foo", &dtypes(&["float", "int8_t"]));
        let declared_reverse = slot_table("foo", &dtypes(&["int8_t", "float"]));
        assert_eq!(declared_forward, declared_reverse);

        assert_eq!(declared_forward.len(), SLOT_COUNT);
        assert_eq!(declared_forward[0], "foo_compress_float");
        assert_eq!(declared_forward[1], "foo_decompress_float");
        assert_eq!(declared_forward[2], NULL_SLOT);
        assert_eq!(declared_forward[3], NULL_SLOT);
        assert_eq!(declared_forward[4], "foo_compress_int8_t");
        assert_eq!(declared_forward[5], "foo_decompress_int8_t");
        for slot in &declared_forward[6..] {
            assert_eq!(slot, NULL_SLOT, "undeclared datatypes stay NULL");
        }
    }

    #[test]
    fn duplicate_datatypes_are_idempotent() {
        let once = slot_table("algo", &dtypes(&["double"]));
        let thrice = slot_table("algo", &dtypes(&["double", "double", "double"]));
        assert_eq!(once, thrice);
    }

    #[test]
    fn empty_support_set_yields_all_null_slots() {
        let slots = slot_table("algo", &[]);
        assert!(slots.iter().all(|s| s == NULL_SLOT));
    }

    #[test]
    fn render_joins_with_comma_and_indented_newline() {
        let text = render("z", &dtypes(&["float"]));
        assert!(text.starts_with("z_compress_float,\n      z_decompress_float,\n      NULL"));
        assert_eq!(text.matches('\n').count(), SLOT_COUNT - 1);
    }
}
