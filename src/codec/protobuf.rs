// SPDX-License-Identifier: MIT
//! Protobuf codec
//!
//! The wire types are `prost` messages mirroring `proto/employee.proto`.
//! At construction the codec checks the loaded schema against them, and
//! every encode verifies the dataset against the schema before anything is
//! written, so a record the schema cannot represent fails the encode instead
//! of producing truncated or wrapped-around output.
//!
//! Only this codec wraps the record list in a root message (`Employees`);
//! the other codecs serialize the list as-is.

use prost::Message;
use prost_reflect::{Cardinality, FieldDescriptor, Kind, MessageDescriptor};
use tracing::debug;

use super::{Codec, CodecError};
use crate::record::{Dataset, Record};
use crate::schema::{Schema, SchemaError};

/// Root message name in the schema
pub const ROOT_MESSAGE: &str = "Employees";

/// Record message name in the schema
pub const RECORD_MESSAGE: &str = "Employee";

/// Field of the root message holding the records
const LIST_FIELD: (&str, u32) = ("employee", 1);

/// Record fields as compiled into [`EmployeeMessage`]: name, number, type
const RECORD_FIELDS: [(&str, u32, &str); 3] = [
    ("id", 1, "int32"),
    ("name", 2, "string"),
    ("salary", 3, "double"),
];

/// Wire form of one record
#[derive(Clone, PartialEq, Message)]
pub struct EmployeeMessage {
    #[prost(int32, tag = "1")]
    pub id: i32,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(double, tag = "3")]
    pub salary: f64,
}

/// Wire form of the dataset
#[derive(Clone, PartialEq, Message)]
pub struct EmployeesMessage {
    #[prost(message, repeated, tag = "1")]
    pub employee: Vec<EmployeeMessage>,
}

impl EmployeesMessage {
    fn from_dataset(dataset: &Dataset) -> Result<Self, String> {
        let employee = dataset
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let id = i32::try_from(record.id()).map_err(|_| {
                    format!("{}[{}].id: integer out of int32 range", LIST_FIELD.0, index)
                })?;
                Ok(EmployeeMessage {
                    id,
                    name: record.name().to_string(),
                    salary: record.salary(),
                })
            })
            .collect::<Result<Vec<_>, String>>()?;

        Ok(Self { employee })
    }

    fn into_dataset(self) -> Dataset {
        self.employee
            .into_iter()
            .map(|e| Record::new(i64::from(e.id), e.name, e.salary))
            .collect()
    }
}

/// Schema-driven binary codec
#[derive(Debug, Clone)]
pub struct ProtobufCodec {
    root: MessageDescriptor,
    record: MessageDescriptor,
}

impl ProtobufCodec {
    /// Bind the codec to a loaded schema
    ///
    /// Fails unless the schema declares exactly the `Employees`/`Employee`
    /// shape the wire types are compiled for.
    pub fn new(schema: &Schema) -> Result<Self, SchemaError> {
        let root = schema.lookup_type(ROOT_MESSAGE)?;
        let record = schema.lookup_type(RECORD_MESSAGE)?;

        let (list_name, list_number) = LIST_FIELD;
        let list = check_field(&root, list_name, list_number, RECORD_MESSAGE)?;
        if !list.is_list() {
            return Err(SchemaError::mismatch(
                root.name(),
                format!("field `{}` must be repeated", describe(&list)),
            ));
        }
        check_no_extra_fields(&root, &[list_name])?;

        for (name, number, expected) in RECORD_FIELDS {
            let field = check_field(&record, name, number, expected)?;
            if !matches!(field.cardinality(), Cardinality::Optional) || field.supports_presence() {
                return Err(SchemaError::mismatch(
                    record.name(),
                    format!("field `{}` must be a plain singular field", describe(&field)),
                ));
            }
        }
        let record_names: Vec<&str> = RECORD_FIELDS.iter().map(|(name, _, _)| *name).collect();
        check_no_extra_fields(&record, &record_names)?;

        debug!(
            root = root.full_name(),
            record = record.full_name(),
            "Protobuf schema bound"
        );
        Ok(Self { root, record })
    }

    /// Check every record against the schema's field types
    ///
    /// Returns the first violation, naming the record index and field.
    pub fn verify(&self, dataset: &Dataset) -> Result<(), String> {
        for (index, record) in dataset.iter().enumerate() {
            for field in self.record.fields() {
                let problem = match (field.name(), field.kind()) {
                    ("id", Kind::Int32) if i32::try_from(record.id()).is_err() => {
                        Some(format!("integer {} out of int32 range", record.id()))
                    }
                    ("salary", Kind::Double) if !record.salary().is_finite() => {
                        Some(format!("number expected, got {}", record.salary()))
                    }
                    _ => None,
                };

                if let Some(problem) = problem {
                    return Err(format!(
                        "{}.{}[{}].{}: {}",
                        self.root.name(),
                        LIST_FIELD.0,
                        index,
                        field.name(),
                        problem
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Protobuf keyword for scalar kinds, the message or enum name otherwise
fn type_name(kind: &Kind) -> String {
    let name = match kind {
        Kind::Double => "double",
        Kind::Float => "float",
        Kind::Int32 => "int32",
        Kind::Int64 => "int64",
        Kind::Uint32 => "uint32",
        Kind::Uint64 => "uint64",
        Kind::Sint32 => "sint32",
        Kind::Sint64 => "sint64",
        Kind::Fixed32 => "fixed32",
        Kind::Fixed64 => "fixed64",
        Kind::Sfixed32 => "sfixed32",
        Kind::Sfixed64 => "sfixed64",
        Kind::Bool => "bool",
        Kind::String => "string",
        Kind::Bytes => "bytes",
        Kind::Message(message) => return message.name().to_string(),
        Kind::Enum(enumeration) => return enumeration.name().to_string(),
    };
    name.to_string()
}

/// Field as it would read in a `.proto` file
fn describe(field: &FieldDescriptor) -> String {
    let label = if field.is_list() {
        "repeated "
    } else if field.supports_presence() && !matches!(field.kind(), Kind::Message(_)) {
        "optional "
    } else {
        ""
    };
    format!(
        "{}{} {} = {}",
        label,
        type_name(&field.kind()),
        field.name(),
        field.number()
    )
}

fn check_field(
    message: &MessageDescriptor,
    name: &str,
    number: u32,
    expected_type: &str,
) -> Result<FieldDescriptor, SchemaError> {
    let field = message
        .get_field_by_name(name)
        .ok_or_else(|| SchemaError::mismatch(message.name(), format!("missing field `{}`", name)))?;

    if field.number() != number || type_name(&field.kind()) != expected_type {
        return Err(SchemaError::mismatch(
            message.name(),
            format!(
                "field `{}` does not match the compiled wire type (expected {} {} = {})",
                describe(&field),
                expected_type,
                name,
                number
            ),
        ));
    }
    Ok(field)
}

fn check_no_extra_fields(message: &MessageDescriptor, known: &[&str]) -> Result<(), SchemaError> {
    match message.fields().find(|f| !known.contains(&f.name())) {
        Some(extra) => Err(SchemaError::mismatch(
            message.name(),
            format!("field `{}` has no counterpart in the wire type", describe(&extra)),
        )),
        None => Ok(()),
    }
}

impl Codec for ProtobufCodec {
    fn name(&self) -> &str {
        "Protobuf"
    }

    fn extension(&self) -> &str {
        "proto"
    }

    fn encode(&self, dataset: &Dataset) -> Result<Vec<u8>, CodecError> {
        self.verify(dataset)
            .map_err(|reason| CodecError::encode(self.name(), reason))?;

        let message = EmployeesMessage::from_dataset(dataset)
            .map_err(|reason| CodecError::encode(self.name(), reason))?;
        Ok(message.encode_to_vec())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Dataset, CodecError> {
        EmployeesMessage::decode(bytes)
            .map(EmployeesMessage::into_dataset)
            .map_err(|e| CodecError::decode(self.name(), e))
    }
}
