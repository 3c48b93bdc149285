//! Serde model of an Anchor-style IDL document.
//!
//! Only what the coders need is modelled. Unknown keys (`docs`, `errors`,
//! `constants`, PDA seeds, ...) are ignored by serde.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use solana_pubkey::Pubkey;

use crate::error::{CoderError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub metadata: IdlMetadata,
    #[serde(default)]
    pub instructions: Vec<IdlInstruction>,
    #[serde(default)]
    pub accounts: Vec<IdlAccount>,
    #[serde(default)]
    pub events: Vec<IdlEvent>,
    #[serde(default)]
    pub types: Vec<IdlTypeDef>,
}

impl Idl {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Declared program id, if the document carries one.
    pub fn program_id(&self) -> Result<Option<Pubkey>> {
        self.address
            .as_deref()
            .map(|address| {
                Pubkey::from_str(address).map_err(|err| {
                    CoderError::InvalidSchema(format!("invalid program address `{address}`: {err}"))
                })
            })
            .transpose()
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn has_types(&self) -> bool {
        !self.types.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdlMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdlInstruction {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Vec<u8>>,
    #[serde(default)]
    pub accounts: Vec<IdlInstructionAccount>,
    #[serde(default, alias = "fields")]
    pub args: Vec<IdlField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdlInstructionAccount {
    pub name: String,
    #[serde(default)]
    pub writable: bool,
    #[serde(default)]
    pub signer: bool,
    #[serde(default)]
    pub optional: bool,
}

/// Account entry. Without `fields`, the layout is the struct type of the same
/// name in the `types` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdlAccount {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<IdlField>>,
}

/// Event entry, resolved the same way as [`IdlAccount`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdlEvent {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<IdlField>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdlField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: IdlType,
}

impl IdlField {
    pub fn new(name: impl Into<String>, ty: IdlType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdlTypeDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: IdlTypeDefTy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IdlTypeDefTy {
    Struct {
        #[serde(default)]
        fields: Vec<IdlField>,
    },
    Enum { variants: Vec<IdlEnumVariant> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdlEnumVariant {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<IdlEnumFields>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdlEnumFields {
    Named(Vec<IdlField>),
    Tuple(Vec<IdlType>),
}

/// Type descriptor consumed by the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdlType {
    Bool,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    F32,
    U64,
    I64,
    F64,
    U128,
    I128,
    Bytes,
    String,
    #[serde(alias = "publicKey")]
    Pubkey,
    Option(Box<IdlType>),
    Vec(Box<IdlType>),
    Array(Box<IdlType>, usize),
    Defined(IdlDefined),
}

impl IdlType {
    pub fn option(inner: IdlType) -> Self {
        IdlType::Option(Box::new(inner))
    }

    pub fn vec(inner: IdlType) -> Self {
        IdlType::Vec(Box::new(inner))
    }

    pub fn array(inner: IdlType, len: usize) -> Self {
        IdlType::Array(Box::new(inner), len)
    }

    pub fn defined(name: impl Into<String>) -> Self {
        IdlType::Defined(IdlDefined::Name(name.into()))
    }
}

/// `{"defined": "Name"}` (legacy) or `{"defined": {"name": "Name"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdlDefined {
    Name(String),
    Ref { name: String },
}

impl IdlDefined {
    pub fn name(&self) -> &str {
        match self {
            IdlDefined::Name(name) => name,
            IdlDefined::Ref { name } => name,
        }
    }
}
