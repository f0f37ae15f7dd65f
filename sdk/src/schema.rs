//! Schema-driven binary encoding
//!
//! A [`Schema`] is a static, ordered list of named fields. The encoder walks
//! the descriptor and writes each value in borsh layout:
//! - `string`: u32 little-endian byte length, then UTF-8 bytes
//! - `u8` / `u64`: fixed-width little-endian
//! - `pubkey`: 32 raw bytes
//! - `sequence<T>`: u32 little-endian element count, then each element
//!
//! Opcode tagging is not part of this module; see [`crate::instruction`].

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::pubkey::Pubkey;
use std::fmt;
use std::io::{Cursor, ErrorKind, Read};
use thiserror::Error;

/// Declared type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    U8,
    U64,
    PublicKey,
    Sequence(&'static FieldType),
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::U8 => write!(f, "u8"),
            FieldType::U64 => write!(f, "u64"),
            FieldType::PublicKey => write!(f, "pubkey"),
            FieldType::Sequence(inner) => write!(f, "sequence<{inner}>"),
        }
    }
}

/// One named field of a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
}

impl Field {
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty }
    }
}

/// Ordered field layout of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Runtime value of a record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    U8(u8),
    U64(u64),
    PublicKey(Pubkey),
    Sequence(Vec<Value>),
}

impl Value {
    /// Short name of the value's kind, used in mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::U8(_) => "u8",
            Value::U64(_) => "u64",
            Value::PublicKey(_) => "pubkey",
            Value::Sequence(_) => "sequence",
        }
    }

    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Sequence(items.into_iter().map(|s| Value::String(s.into())).collect())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::U8(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::U64(value)
    }
}

impl From<Pubkey> for Value {
    fn from(value: Pubkey) -> Self {
        Value::PublicKey(value)
    }
}

/// Field values keyed by name, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value under the same name
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Remove and return a field's value
    pub fn take(&mut self, name: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(existing, _)| existing == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn take_string(&mut self, name: &str) -> Result<String, DecodeError> {
        match self.take_required(name)? {
            Value::String(value) => Ok(value),
            other => Err(DecodeError::unexpected(name, FieldType::String, &other)),
        }
    }

    pub fn take_u8(&mut self, name: &str) -> Result<u8, DecodeError> {
        match self.take_required(name)? {
            Value::U8(value) => Ok(value),
            other => Err(DecodeError::unexpected(name, FieldType::U8, &other)),
        }
    }

    pub fn take_pubkey(&mut self, name: &str) -> Result<Pubkey, DecodeError> {
        match self.take_required(name)? {
            Value::PublicKey(value) => Ok(value),
            other => Err(DecodeError::unexpected(name, FieldType::PublicKey, &other)),
        }
    }

    pub fn take_strings(&mut self, name: &str) -> Result<Vec<String>, DecodeError> {
        self.take_sequence(name, FieldType::String, |value| match value {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    pub fn take_u64s(&mut self, name: &str) -> Result<Vec<u64>, DecodeError> {
        self.take_sequence(name, FieldType::U64, |value| match value {
            Value::U64(n) => Some(n),
            _ => None,
        })
    }

    pub fn take_pubkeys(&mut self, name: &str) -> Result<Vec<Pubkey>, DecodeError> {
        self.take_sequence(name, FieldType::PublicKey, |value| match value {
            Value::PublicKey(key) => Some(key),
            _ => None,
        })
    }

    fn take_required(&mut self, name: &str) -> Result<Value, DecodeError> {
        self.take(name)
            .ok_or_else(|| DecodeError::MissingField(name.to_string()))
    }

    fn take_sequence<T>(
        &mut self,
        name: &str,
        element: FieldType,
        extract: impl Fn(Value) -> Option<T>,
    ) -> Result<Vec<T>, DecodeError> {
        let items = match self.take_required(name)? {
            Value::Sequence(items) => items,
            other => {
                return Err(DecodeError::UnexpectedValue {
                    field: name.to_string(),
                    expected: format!("sequence<{element}>"),
                    found: other.kind(),
                })
            }
        };
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let kind = item.kind();
                extract(item).ok_or_else(|| DecodeError::UnexpectedValue {
                    field: format!("{name}[{index}]"),
                    expected: element.to_string(),
                    found: kind,
                })
            })
            .collect()
    }
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("field `{field}` of {schema} expects {expected}, found {found}")]
    TypeMismatch {
        schema: &'static str,
        field: String,
        expected: FieldType,
        found: &'static str,
    },

    #[error("field `{field}` of {schema} is missing")]
    MissingField { schema: &'static str, field: String },

    #[error("field `{field}` is not declared by {schema}")]
    UndeclaredField { schema: &'static str, field: String },

    #[error("field `{field}` is too long to encode ({len} items)")]
    LengthOverflow { field: String, len: usize },

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("input ended while reading field `{field}`: {source}")]
    Truncated {
        field: String,
        #[source]
        source: std::io::Error,
    },

    #[error("field `{field}` is not valid UTF-8")]
    InvalidUtf8 { field: String },

    #[error("{0} trailing bytes after record")]
    TrailingBytes(usize),

    #[error("missing field `{0}`")]
    MissingField(String),

    #[error("field `{field}` expects {expected}, found {found}")]
    UnexpectedValue {
        field: String,
        expected: String,
        found: &'static str,
    },

    #[error("empty instruction data")]
    EmptyInput,

    #[error("unknown opcode {0}")]
    UnknownOpcode(u8),
}

impl DecodeError {
    fn unexpected(field: &str, expected: FieldType, found: &Value) -> Self {
        DecodeError::UnexpectedValue {
            field: field.to_string(),
            expected: expected.to_string(),
            found: found.kind(),
        }
    }
}

/// A typed record with a static schema
pub trait SchemaRecord: Sized {
    const SCHEMA: Schema;

    fn to_record(&self) -> Record;

    fn from_record(record: Record) -> Result<Self, DecodeError>;
}

/// Serialize `record` following `schema`'s field order
pub fn encode(record: &Record, schema: &Schema) -> Result<Vec<u8>, EncodeError> {
    if let Some(extra) = record.names().find(|name| schema.field(name).is_none()) {
        return Err(EncodeError::UndeclaredField {
            schema: schema.name,
            field: extra.to_string(),
        });
    }

    let mut out = Vec::new();
    for field in schema.fields {
        let value = record.get(field.name).ok_or_else(|| EncodeError::MissingField {
            schema: schema.name,
            field: field.name.to_string(),
        })?;
        write_value(&mut out, schema.name, field.name, field.ty, value)?;
    }
    Ok(out)
}

fn write_value(
    out: &mut Vec<u8>,
    schema: &'static str,
    field: &str,
    ty: FieldType,
    value: &Value,
) -> Result<(), EncodeError> {
    match (ty, value) {
        (FieldType::String, Value::String(s)) => s.serialize(out)?,
        (FieldType::U8, Value::U8(n)) => n.serialize(out)?,
        (FieldType::U64, Value::U64(n)) => n.serialize(out)?,
        (FieldType::PublicKey, Value::PublicKey(key)) => out.extend_from_slice(&key.to_bytes()),
        (FieldType::Sequence(inner), Value::Sequence(items)) => {
            let len = u32::try_from(items.len()).map_err(|_| EncodeError::LengthOverflow {
                field: field.to_string(),
                len: items.len(),
            })?;
            len.serialize(out)?;
            for (index, item) in items.iter().enumerate() {
                write_value(out, schema, &format!("{field}[{index}]"), *inner, item)?;
            }
        }
        (expected, found) => {
            return Err(EncodeError::TypeMismatch {
                schema,
                field: field.to_string(),
                expected,
                found: found.kind(),
            })
        }
    }
    Ok(())
}

/// Decode a record, rejecting trailing bytes
pub fn decode(bytes: &[u8], schema: &Schema) -> Result<Record, DecodeError> {
    let (record, consumed) = decode_prefix(bytes, schema)?;
    if consumed != bytes.len() {
        return Err(DecodeError::TrailingBytes(bytes.len() - consumed));
    }
    Ok(record)
}

/// Decode a record from the start of `bytes`, returning it with the number
/// of bytes consumed
pub fn decode_prefix(bytes: &[u8], schema: &Schema) -> Result<(Record, usize), DecodeError> {
    let mut reader = Cursor::new(bytes);
    let mut record = Record::new();
    for field in schema.fields {
        let value = read_value(&mut reader, field.name, field.ty)?;
        record.insert(field.name, value);
    }
    let consumed = usize::try_from(reader.position()).unwrap_or(bytes.len());
    Ok((record, consumed))
}

fn read_value<R: Read>(reader: &mut R, field: &str, ty: FieldType) -> Result<Value, DecodeError> {
    let truncated = |source| DecodeError::Truncated {
        field: field.to_string(),
        source,
    };
    let value = match ty {
        FieldType::String => Value::String(String::deserialize_reader(reader).map_err(|source| {
            match source.kind() {
                ErrorKind::InvalidData => DecodeError::InvalidUtf8 {
                    field: field.to_string(),
                },
                _ => truncated(source),
            }
        })?),
        FieldType::U8 => Value::U8(u8::deserialize_reader(reader).map_err(truncated)?),
        FieldType::U64 => Value::U64(u64::deserialize_reader(reader).map_err(truncated)?),
        FieldType::PublicKey => {
            let bytes = <[u8; 32]>::deserialize_reader(reader).map_err(truncated)?;
            Value::PublicKey(Pubkey::new_from_array(bytes))
        }
        FieldType::Sequence(inner) => {
            let len = u32::deserialize_reader(reader).map_err(truncated)?;
            // Capacity is not trusted from input
            let mut items = Vec::new();
            for index in 0..len {
                items.push(read_value(reader, &format!("{field}[{index}]"), *inner)?);
            }
            Value::Sequence(items)
        }
    };
    Ok(value)
}

pub fn encode_record<T: SchemaRecord>(value: &T) -> Result<Vec<u8>, EncodeError> {
    encode(&value.to_record(), &T::SCHEMA)
}

pub fn decode_record<T: SchemaRecord>(bytes: &[u8]) -> Result<T, DecodeError> {
    T::from_record(decode(bytes, &T::SCHEMA)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIR: Schema = Schema {
        name: "Pair",
        fields: &[
            Field::new("label", FieldType::String),
            Field::new("weights", FieldType::Sequence(&FieldType::U64)),
        ],
    };

    #[test]
    fn test_field_type_display() {
        assert_eq!(FieldType::String.to_string(), "string");
        assert_eq!(
            FieldType::Sequence(&FieldType::PublicKey).to_string(),
            "sequence<pubkey>"
        );
    }

    #[test]
    fn test_encode_layout() {
        let record = Record::new()
            .with("label", "ab")
            .with("weights", Value::Sequence(vec![Value::U64(1)]));

        let bytes = encode(&record, &PAIR).unwrap();

        assert_eq!(
            bytes,
            vec![2, 0, 0, 0, b'a', b'b', 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_encode_follows_schema_order_not_insertion_order() {
        let forward = Record::new()
            .with("label", "x")
            .with("weights", Value::Sequence(vec![]));
        let reversed = Record::new()
            .with("weights", Value::Sequence(vec![]))
            .with("label", "x");

        assert_eq!(encode(&forward, &PAIR).unwrap(), encode(&reversed, &PAIR).unwrap());
    }

    #[test]
    fn test_missing_and_undeclared_fields() {
        let missing = Record::new().with("label", "x");
        assert!(matches!(
            encode(&missing, &PAIR),
            Err(EncodeError::MissingField { field, .. }) if field == "weights"
        ));

        let extra = Record::new()
            .with("label", "x")
            .with("weights", Value::Sequence(vec![]))
            .with("bonus", 1u8);
        assert!(matches!(
            encode(&extra, &PAIR),
            Err(EncodeError::UndeclaredField { field, .. }) if field == "bonus"
        ));
    }

    #[test]
    fn test_nested_mismatch_names_element() {
        let record = Record::new()
            .with("label", "x")
            .with("weights", Value::Sequence(vec![Value::U64(1), Value::from("two")]));

        let err = encode(&record, &PAIR).unwrap_err();
        match err {
            EncodeError::TypeMismatch {
                field,
                expected,
                found,
                ..
            } => {
                assert_eq!(field, "weights[1]");
                assert_eq!(expected, FieldType::U64);
                assert_eq!(found, "string");
            }
            other => panic!("Expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let record = Record::new()
            .with("label", "x")
            .with("weights", Value::Sequence(vec![]));
        let mut bytes = encode(&record, &PAIR).unwrap();
        bytes.extend_from_slice(&[0, 0, 0]);

        assert!(matches!(decode(&bytes, &PAIR), Err(DecodeError::TrailingBytes(3))));

        let (decoded, consumed) = decode_prefix(&bytes, &PAIR).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(consumed, bytes.len() - 3);
    }

    #[test]
    fn test_decode_truncated_input() {
        // Declares a 10 byte label but only carries 2
        let bytes = [10, 0, 0, 0, b'a', b'b'];
        assert!(matches!(
            decode(&bytes, &PAIR),
            Err(DecodeError::Truncated { field, .. }) if field == "label"
        ));
    }

    #[test]
    fn test_decode_invalid_utf8_label() {
        let bytes = [2, 0, 0, 0, 0xff, 0xfe, 0, 0, 0, 0];
        assert!(matches!(
            decode(&bytes, &PAIR),
            Err(DecodeError::InvalidUtf8 { field }) if field == "label"
        ));
    }

    #[test]
    fn test_record_insert_replaces() {
        let mut record = Record::new().with("label", "old");
        record.insert("label", "new");

        assert_eq!(record.len(), 1);
        assert_eq!(record.get("label"), Some(&Value::from("new")));
    }

    #[test]
    fn test_take_strings_reports_element_index() {
        let mut record =
            Record::new().with("names", Value::Sequence(vec![Value::from("a"), Value::U8(3)]));

        let err = record.take_strings("names").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnexpectedValue { field, found: "u8", .. } if field == "names[1]"
        ));
    }
}
