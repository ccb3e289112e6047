// SPDX-License-Identifier: MIT OR Apache-2.0

//! Binding sections onto `serde` types.
//!
//! A section deserializes as a map from child key to child value. Parsed
//! scalars are interpolated first, values written through `set` are taken as
//! they are, and either is then coerced to whatever the target field asks for,
//! so `<id>1</id>` binds to a `String`, an `i32` or a `bool` field alike.
//! Repeated keys and delimited scalars bind to sequences.

use crate::domain::{ConfigError, ConfigValue, Entry, Result, Section};
use crate::service::Interpolator;
use serde::de::value::StrDeserializer;
use serde::de::{self, DeserializeSeed, Deserializer, IntoDeserializer, Unexpected, Visitor};
use serde::forward_to_deserialize_any;

/// Settings shared by every deserializer in one binding pass.
#[derive(Clone, Copy)]
pub(crate) struct Binding<'a> {
    pub(crate) interpolator: &'a Interpolator,
    pub(crate) delimiter: char,
}

/// Deserializes a whole section as a map.
pub(crate) struct SectionDeserializer<'a> {
    section: &'a Section,
    binding: Binding<'a>,
}

impl<'a> SectionDeserializer<'a> {
    pub(crate) fn new(section: &'a Section, binding: Binding<'a>) -> Self {
        Self { section, binding }
    }
}

impl<'de, 'a> Deserializer<'de> for SectionDeserializer<'a> {
    type Error = ConfigError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_map(SectionMap {
            entries: self.section.entries(),
            pending: None,
            binding: self.binding,
        })
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let binding = self.binding;
        let items = self
            .section
            .entries()
            .map(move |(key, entry)| EntryDeserializer::new(key, entry, binding));
        visitor.visit_seq(de::value::SeqDeserializer::new(items))
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct tuple tuple_struct map struct enum identifier
    }
}

struct SectionMap<'a, I> {
    entries: I,
    pending: Option<(&'a str, &'a Entry)>,
    binding: Binding<'a>,
}

impl<'de, 'a, I> de::MapAccess<'de> for SectionMap<'a, I>
where
    I: Iterator<Item = (&'a str, &'a Entry)>,
{
    type Error = ConfigError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        let Some((key, entry)) = self.entries.next() else {
            return Ok(None);
        };
        self.pending = Some((key, entry));
        let key_de: StrDeserializer<'_, ConfigError> = key.into_deserializer();
        seed.deserialize(key_de).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        let (key, entry) = self
            .pending
            .take()
            .ok_or_else(|| <ConfigError as de::Error>::custom("value requested before key"))?;
        seed.deserialize(EntryDeserializer::new(key, entry, self.binding))
            .map_err(|err| err.at_field(key))
    }
}

/// Deserializes the value stored under one key.
#[derive(Clone, Copy)]
struct EntryDeserializer<'a> {
    key: &'a str,
    entry: &'a Entry,
    binding: Binding<'a>,
}

impl<'a> EntryDeserializer<'a> {
    fn new(key: &'a str, entry: &'a Entry, binding: Binding<'a>) -> Self {
        Self {
            key,
            entry,
            binding,
        }
    }

    fn scalar(self, raw: &str) -> ScalarDeserializer<'a> {
        self.text(self.binding.interpolator.expand(raw).into_owned())
    }

    fn text(self, value: String) -> ScalarDeserializer<'a> {
        ScalarDeserializer {
            key: self.key,
            value,
            delimiter: self.binding.delimiter,
        }
    }

    fn section(self, section: &'a Section) -> SectionDeserializer<'a> {
        SectionDeserializer::new(section, self.binding)
    }

    fn last(self, items: &'a [Entry]) -> Result<EntryDeserializer<'a>> {
        items
            .last()
            .map(|entry| EntryDeserializer::new(self.key, entry, self.binding))
            .ok_or_else(|| de::Error::custom("empty repeated entry"))
    }

    fn visit_items<'de, V: Visitor<'de>>(self, items: &'a [Entry], visitor: V) -> Result<V::Value> {
        let key = self.key;
        let binding = self.binding;
        let items = items
            .iter()
            .map(move |entry| EntryDeserializer::new(key, entry, binding));
        visitor.visit_seq(de::value::SeqDeserializer::new(items))
    }
}

impl<'de, 'a> IntoDeserializer<'de, ConfigError> for EntryDeserializer<'a> {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

// Dispatches a deserializer method on the kind of entry: scalars and sections
// have their own deserializers, repeated keys read their last occurrence.
macro_rules! delegate_entry {
    ($($method:ident($($arg:ident: $ty:ty),*))*) => {
        $(
            fn $method<V: Visitor<'de>>(self, $($arg: $ty,)* visitor: V) -> Result<V::Value> {
                match self.entry {
                    Entry::Scalar(raw) => self.scalar(raw).$method($($arg,)* visitor),
                    Entry::Literal(text) => self.text(text.clone()).$method($($arg,)* visitor),
                    Entry::Section(section) => self.section(section).$method($($arg,)* visitor),
                    Entry::List(items) => self.last(items)?.$method($($arg,)* visitor),
                }
            }
        )*
    };
}

// Like `delegate_entry`, but a repeated key binds as a sequence of all its
// occurrences.
macro_rules! delegate_entry_seq {
    ($($method:ident($($arg:ident: $ty:ty),*))*) => {
        $(
            fn $method<V: Visitor<'de>>(self, $($arg: $ty,)* visitor: V) -> Result<V::Value> {
                match self.entry {
                    Entry::Scalar(raw) => self.scalar(raw).$method($($arg,)* visitor),
                    Entry::Literal(text) => self.text(text.clone()).$method($($arg,)* visitor),
                    Entry::Section(section) => self.section(section).$method($($arg,)* visitor),
                    Entry::List(items) => self.visit_items(items, visitor),
                }
            }
        )*
    };
}

impl<'de, 'a> Deserializer<'de> for EntryDeserializer<'a> {
    type Error = ConfigError;

    delegate_entry_seq! {
        deserialize_any()
        deserialize_seq()
        deserialize_tuple(len: usize)
        deserialize_tuple_struct(name: &'static str, len: usize)
    }

    delegate_entry! {
        deserialize_bool()
        deserialize_i8()
        deserialize_i16()
        deserialize_i32()
        deserialize_i64()
        deserialize_u8()
        deserialize_u16()
        deserialize_u32()
        deserialize_u64()
        deserialize_f32()
        deserialize_f64()
        deserialize_char()
        deserialize_str()
        deserialize_string()
        deserialize_bytes()
        deserialize_byte_buf()
        deserialize_option()
        deserialize_unit()
        deserialize_unit_struct(name: &'static str)
        deserialize_newtype_struct(name: &'static str)
        deserialize_map()
        deserialize_struct(name: &'static str, fields: &'static [&'static str])
        deserialize_enum(name: &'static str, variants: &'static [&'static str])
        deserialize_identifier()
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }
}

/// Deserializes one interpolated scalar, coercing it to the requested type.
struct ScalarDeserializer<'a> {
    key: &'a str,
    value: String,
    delimiter: char,
}

impl<'a> ScalarDeserializer<'a> {
    fn config_value(&self) -> ConfigValue {
        ConfigValue::from(self.value.as_str())
    }
}

impl<'de, 'a> IntoDeserializer<'de, ConfigError> for ScalarDeserializer<'a> {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
                visitor.$visit(self.config_value().parse::<$ty>(self.key)?)
            }
        )*
    };
}

impl<'de, 'a> Deserializer<'de> for ScalarDeserializer<'a> {
    type Error = ConfigError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_string(self.value)
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_bool(self.config_value().as_bool(self.key)?)
    }

    deserialize_parsed! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
        deserialize_char => visit_char: char,
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.value.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let key = self.key;
        let delimiter = self.delimiter;
        let parts = self
            .config_value()
            .as_list(delimiter)
            .into_iter()
            .map(move |value| ScalarDeserializer {
                key,
                value,
                delimiter,
            });
        visitor.visit_seq(de::value::SeqDeserializer::new(parts))
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        Err(de::Error::invalid_type(Unexpected::Str(&self.value), &visitor))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        let variant: de::value::StringDeserializer<ConfigError> = self.value.into_deserializer();
        visitor.visit_enum(variant)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        str string bytes byte_buf identifier
    }
}

/// Binds `section` onto `T`.
pub(crate) fn bind<T>(section: &Section, binding: Binding<'_>) -> Result<T>
where
    T: de::DeserializeOwned,
{
    T::deserialize(SectionDeserializer::new(section, binding))
}
