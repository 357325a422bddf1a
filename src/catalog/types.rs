//! Type-convertibility checks.

use super::Catalog;

pub fn is_convertible_to_int(s: &str) -> bool {
    s.trim().parse::<i64>().is_ok()
}

pub fn is_convertible_to_float(s: &str) -> bool {
    s.trim().parse::<f64>().is_ok()
}

pub fn is_convertible_to_uuid(s: &str) -> bool {
    uuid::Uuid::try_parse(s.trim()).is_ok()
}

/// Numbers are truthy when non-zero; any other string when non-empty.
pub fn is_truthy(s: &str) -> bool {
    match s.trim().parse::<f64>() {
        Ok(n) => n != 0.0,
        Err(_) => !s.is_empty(),
    }
}

pub(super) fn register(catalog: &mut Catalog) {
    catalog.register_check(
        "is_convertible_to_int",
        is_convertible_to_int,
        "Value cannot be converted to int",
        "Values cannot be converted to int",
    );
    catalog.register_check(
        "is_convertible_to_float",
        is_convertible_to_float,
        "Value cannot be converted to float",
        "Values cannot be converted to float",
    );
    catalog.register_check(
        "is_convertible_to_uuid",
        is_convertible_to_uuid,
        "Value cannot be converted to UUID",
        "Values cannot be converted to UUID",
    );
    catalog.register_check("is_truthy", is_truthy, "Value is not truthy", "Values are not truthy");
    catalog.register_check(
        "is_falsy",
        |s| !is_truthy(s),
        "Value is not falsy",
        "Values are not falsy",
    );
}
