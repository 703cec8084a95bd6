//! Purpose: Type-tagged JSON dialect for payloads plain JSON cannot round-trip.
//! Exports: `envelope`, `open_envelope`, and the `ser`/`de` value converters.
//! Role: Embeds type identity so enum slots and maps keyed by structured values
//! decode back into the right concrete shape.
//! Invariants: The root is always `{"$type": <identity>, "$value": <payload>}`.
//! Invariants: Every object inside the payload carries `$type`; reading an object
//! without it is an error, never a best-effort guess.
//! Notes: Struct and enum tags are serde type names (no module path); only the
//! root tag carries the full `TypeIdentity`.
pub(crate) mod de;
pub(crate) mod ser;

use serde::de::{DeserializeOwned, Error as _};
use serde_json::{Error, Map, Value};

use crate::core::identity::TypeIdentity;
use crate::core::policy::AssemblyStyle;

pub const TYPE_KEY: &str = "$type";
pub const VALUE_KEY: &str = "$value";
pub const VALUES_KEY: &str = "$values";
pub const VARIANT_KEY: &str = "$variant";
pub const MAP_TAG: &str = "map";

/// Wraps an already tagged payload with the root identity of `T`.
pub(crate) fn envelope<T: ?Sized>(payload: Value, style: AssemblyStyle) -> Value {
    let mut root = Map::new();
    root.insert(
        TYPE_KEY.to_string(),
        Value::String(TypeIdentity::of::<T>().render(style)),
    );
    root.insert(VALUE_KEY.to_string(), payload);
    Value::Object(root)
}

/// Checks the root identity against `T` and decodes the payload.
pub(crate) fn open_envelope<T: DeserializeOwned>(document: Value) -> Result<T, Error> {
    let Value::Object(mut root) = document else {
        return Err(Error::custom(format_args!(
            "missing {TYPE_KEY} metadata on document root"
        )));
    };
    let tag = de::take_tag(&mut root)?;
    let identity = TypeIdentity::of::<T>();
    if !identity.matches(&tag) {
        return Err(Error::custom(format_args!(
            "{TYPE_KEY} mismatch on document root: expected `{}`, found `{tag}`",
            identity.render(AssemblyStyle::Simple)
        )));
    }
    let payload = root.remove(VALUE_KEY).ok_or_else(|| {
        Error::custom(format_args!("document root is missing its {VALUE_KEY}"))
    })?;
    de::from_value(payload)
}
