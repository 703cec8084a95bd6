// Deserializer over a tagged `Value`; checks `$type` wherever the target names a type.
use std::vec;

use serde::de::value::StringDeserializer;
use serde::de::{
    self, DeserializeOwned, DeserializeSeed, Deserializer, EnumAccess, IntoDeserializer, MapAccess,
    SeqAccess, Unexpected, VariantAccess, Visitor,
};
use serde::forward_to_deserialize_any;
use serde_json::{Error, Map, Number, Value, map};

use super::{MAP_TAG, TYPE_KEY, VALUE_KEY, VALUES_KEY, VARIANT_KEY};

pub(crate) fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    T::deserialize(TaggedDeserializer::new(value))
}

fn custom(message: impl std::fmt::Display) -> Error {
    <Error as de::Error>::custom(message)
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(v) => Unexpected::Bool(*v),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(v) => Unexpected::Str(v),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}

pub(super) fn take_tag(map: &mut Map<String, Value>) -> Result<String, Error> {
    match map.remove(TYPE_KEY) {
        Some(Value::String(tag)) => Ok(tag),
        Some(other) => Err(custom(format_args!(
            "{TYPE_KEY} must be a string, found {}",
            unexpected(&other)
        ))),
        None => Err(custom(format_args!("missing {TYPE_KEY} metadata on object"))),
    }
}

fn expect_tag(found: &str, expected: &str) -> Result<(), Error> {
    if found == expected {
        return Ok(());
    }
    Err(custom(format_args!(
        "{TYPE_KEY} mismatch: expected `{expected}`, found `{found}`"
    )))
}

fn take_values(map: &mut Map<String, Value>) -> Result<Vec<Value>, Error> {
    match map.remove(VALUES_KEY) {
        Some(Value::Array(items)) => Ok(items),
        _ => Err(custom(format_args!("object is missing its {VALUES_KEY} array"))),
    }
}

fn visit_number<'de, V: Visitor<'de>>(number: Number, visitor: V) -> Result<V::Value, Error> {
    if let Some(v) = number.as_u64() {
        visitor.visit_u64(v)
    } else if let Some(v) = number.as_i64() {
        visitor.visit_i64(v)
    } else if let Some(v) = number.as_f64() {
        visitor.visit_f64(v)
    } else {
        Err(custom(format_args!("unrepresentable number {number}")))
    }
}

fn visit_array<'de, V: Visitor<'de>>(items: Vec<Value>, visitor: V) -> Result<V::Value, Error> {
    let len = items.len();
    let mut access = Elements {
        iter: items.into_iter(),
    };
    let value = visitor.visit_seq(&mut access)?;
    if access.iter.len() == 0 {
        Ok(value)
    } else {
        Err(de::Error::invalid_length(len, &"fewer elements in array"))
    }
}

fn visit_pairs<'de, V: Visitor<'de>>(
    mut map: Map<String, Value>,
    visitor: V,
) -> Result<V::Value, Error> {
    let mut access = Pairs {
        iter: take_values(&mut map)?.into_iter(),
        value: None,
    };
    visitor.visit_map(&mut access)
}

fn visit_fields<'de, V: Visitor<'de>>(
    map: Map<String, Value>,
    visitor: V,
) -> Result<V::Value, Error> {
    let mut access = Fields {
        iter: map.into_iter(),
        value: None,
    };
    visitor.visit_map(&mut access)
}

// Enums reached without a target type read as serde's external form: a unit
// variant is its name, anything else the single-entry map `{variant: payload}`.
fn visit_variant_map<'de, V: Visitor<'de>>(
    map: Map<String, Value>,
    visitor: V,
) -> Result<V::Value, Error> {
    let Variant { name, rest } = Variant::new(map)?;
    if rest.is_empty() {
        return visitor.visit_string(name);
    }
    visitor.visit_map(VariantEntry {
        name: Some(name),
        body: Some(rest),
    })
}

pub(crate) struct TaggedDeserializer {
    value: Value,
}

impl TaggedDeserializer {
    pub(crate) fn new(value: Value) -> Self {
        Self { value }
    }
}

impl<'de> Deserializer<'de> for TaggedDeserializer {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(v) => visitor.visit_bool(v),
            Value::Number(v) => visit_number(v, visitor),
            Value::String(v) => visitor.visit_string(v),
            Value::Array(items) => visit_array(items, visitor),
            Value::Object(mut map) => {
                let tag = take_tag(&mut map)?;
                if map.contains_key(VARIANT_KEY) {
                    visit_variant_map(map, visitor)
                } else if tag == MAP_TAG {
                    visit_pairs(map, visitor)
                } else if map.len() == 1 && map.contains_key(VALUES_KEY) {
                    visit_array(take_values(&mut map)?, visitor)
                } else {
                    visit_fields(map, visitor)
                }
            }
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.value {
            Value::Null => visitor.visit_none(),
            value => visitor.visit_some(TaggedDeserializer::new(value)),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        match self.value {
            Value::Object(mut map) => {
                let tag = take_tag(&mut map)?;
                expect_tag(&tag, name)?;
                visit_fields(map, visitor)
            }
            other => TaggedDeserializer::new(other).deserialize_any(visitor),
        }
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, Error> {
        match self.value {
            Value::Object(mut map) => {
                let tag = take_tag(&mut map)?;
                expect_tag(&tag, name)?;
                visit_array(take_values(&mut map)?, visitor)
            }
            other => TaggedDeserializer::new(other).deserialize_any(visitor),
        }
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.value {
            Value::Object(mut map) => {
                let tag = take_tag(&mut map)?;
                expect_tag(&tag, MAP_TAG)?;
                visit_pairs(map, visitor)
            }
            other => TaggedDeserializer::new(other).deserialize_any(visitor),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        match self.value {
            Value::Object(mut map) => {
                let tag = take_tag(&mut map)?;
                expect_tag(&tag, name)?;
                visitor.visit_enum(Variant::new(map)?)
            }
            other => Err(de::Error::invalid_type(
                unexpected(&other),
                &"object with $type and $variant",
            )),
        }
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple identifier
    }
}

struct Elements {
    iter: vec::IntoIter<Value>,
}

impl<'de> SeqAccess<'de> for Elements {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, Error> {
        self.iter
            .next()
            .map(|value| seed.deserialize(TaggedDeserializer::new(value)))
            .transpose()
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

// `[key, value]` pairs written for maps; keys go through the full deserializer.
struct Pairs {
    iter: vec::IntoIter<Value>,
    value: Option<Value>,
}

impl<'de> MapAccess<'de> for Pairs {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, Error> {
        let Some(entry) = self.iter.next() else {
            return Ok(None);
        };
        match entry {
            Value::Array(mut pair) if pair.len() == 2 => {
                let value = pair.pop();
                let key = pair.pop();
                match (key, value) {
                    (Some(key), Some(value)) => {
                        self.value = Some(value);
                        seed.deserialize(TaggedDeserializer::new(key)).map(Some)
                    }
                    _ => Err(custom("map entry must be a [key, value] pair")),
                }
            }
            other => Err(de::Error::invalid_type(
                unexpected(&other),
                &"a [key, value] pair",
            )),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, Error> {
        let value = self
            .value
            .take()
            .ok_or_else(|| custom("map value requested before its key"))?;
        seed.deserialize(TaggedDeserializer::new(value))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct Fields {
    iter: map::IntoIter,
    value: Option<Value>,
}

impl<'de> MapAccess<'de> for Fields {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, Error> {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(key.into_deserializer()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, Error> {
        let value = self
            .value
            .take()
            .ok_or_else(|| custom("field value requested before its name"))?;
        seed.deserialize(TaggedDeserializer::new(value))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct Variant {
    name: String,
    rest: Map<String, Value>,
}

impl Variant {
    fn new(mut rest: Map<String, Value>) -> Result<Self, Error> {
        match rest.remove(VARIANT_KEY) {
            Some(Value::String(name)) => Ok(Self { name, rest }),
            _ => Err(custom(format_args!(
                "enum object is missing its {VARIANT_KEY} name"
            ))),
        }
    }
}

impl<'de> EnumAccess<'de> for Variant {
    type Error = Error;
    type Variant = VariantFields;

    fn variant_seed<V: DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, VariantFields), Error> {
        let name: StringDeserializer<Error> = self.name.into_deserializer();
        let variant = seed.deserialize(name)?;
        Ok((variant, VariantFields { rest: self.rest }))
    }
}

struct VariantEntry {
    name: Option<String>,
    body: Option<Map<String, Value>>,
}

impl<'de> MapAccess<'de> for VariantEntry {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, Error> {
        match self.name.take() {
            Some(name) => {
                let name: StringDeserializer<Error> = name.into_deserializer();
                seed.deserialize(name).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, Error> {
        let rest = self
            .body
            .take()
            .ok_or_else(|| custom("variant payload requested before its name"))?;
        seed.deserialize(VariantBody { rest })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(usize::from(self.name.is_some()))
    }
}

// Payload of a variant with its `$type` and `$variant` already removed.
struct VariantBody {
    rest: Map<String, Value>,
}

impl<'de> Deserializer<'de> for VariantBody {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(mut self, visitor: V) -> Result<V::Value, Error> {
        if self.rest.len() == 1 {
            if let Some(value) = self.rest.remove(VALUE_KEY) {
                return TaggedDeserializer::new(value).deserialize_any(visitor);
            }
            if self.rest.contains_key(VALUES_KEY) {
                return visit_array(take_values(&mut self.rest)?, visitor);
            }
        }
        visit_fields(self.rest, visitor)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

struct VariantFields {
    rest: Map<String, Value>,
}

impl<'de> VariantAccess<'de> for VariantFields {
    type Error = Error;

    fn unit_variant(self) -> Result<(), Error> {
        Ok(())
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(
        mut self,
        seed: T,
    ) -> Result<T::Value, Error> {
        match self.rest.remove(VALUE_KEY) {
            Some(value) => seed.deserialize(TaggedDeserializer::new(value)),
            None => Err(custom(format_args!(
                "newtype variant is missing its {VALUE_KEY}"
            ))),
        }
    }

    fn tuple_variant<V: Visitor<'de>>(mut self, _len: usize, visitor: V) -> Result<V::Value, Error> {
        visit_array(take_values(&mut self.rest)?, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        visit_fields(self.rest, visitor)
    }
}
