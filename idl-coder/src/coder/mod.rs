//! Program coders and the sub-coder contracts they are assembled from.
//!
//! A [`ProgramCoder`] owns one sub-coder per capability. Accounts and
//! instructions are always IDL-backed; events and types fall back to a
//! [`NotApplicable`] variant when the IDL declares none, so every program
//! exposes the same four-part surface and misuse fails immediately.

mod accounts;
mod events;
mod index;
mod instruction;
mod types;
mod unsupported;

use std::sync::Arc;

use heck::ToUpperCamelCase;
use serde::Serialize;
use solana_instruction::AccountMeta;
use solana_pubkey::Pubkey;

pub use accounts::IdlAccountsCoder;
pub use events::{Events, IdlEventsCoder, PROGRAM_DATA_PREFIX};
pub use instruction::IdlInstructionCoder;
pub use types::{IdlTypesCoder, Types};
pub use unsupported::NotApplicable;

use crate::{
    config::CoderConfig,
    error::{Capability, CoderError, Result},
    formatter::DecodedInstruction,
    idl::Idl,
    layout::TypeRegistry,
    value::Value,
};

/// A decoded payload and the schema entry it matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decoded {
    pub name: String,
    pub value: Value,
}

/// RPC `memcmp` filter selecting accounts of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemcmpFilter {
    pub offset: usize,
    /// Base58 encoded bytes to compare.
    pub bytes: String,
}

pub trait AccountsCoder: Send + Sync {
    /// Discriminator followed by the account's fields.
    fn encode(&self, name: &str, value: &Value) -> Result<Vec<u8>>;

    /// Resolve the account type from the leading discriminator and decode it.
    fn decode(&self, data: &[u8]) -> Result<Decoded>;

    /// Decode as `name`, failing if the discriminator belongs to another type.
    fn decode_named(&self, name: &str, data: &[u8]) -> Result<Value>;

    /// Decode as `name` without checking the discriminator bytes.
    fn decode_unchecked(&self, name: &str, data: &[u8]) -> Result<Value>;

    fn discriminator(&self, name: &str) -> Result<&[u8]>;

    /// Total encoded size, or `None` when the layout has variable-length fields.
    fn size(&self, name: &str) -> Result<Option<usize>>;

    fn memcmp(&self, name: &str) -> Result<MemcmpFilter> {
        Ok(MemcmpFilter {
            offset: 0,
            bytes: bs58::encode(self.discriminator(name)?).into_string(),
        })
    }
}

pub trait InstructionCoder: Send + Sync {
    fn encode(&self, name: &str, value: &Value) -> Result<Vec<u8>>;

    fn decode(&self, data: &[u8]) -> Result<Decoded>;

    /// Decode base58 instruction data, as returned by RPC transaction queries.
    fn decode_base58(&self, data: &str) -> Result<Decoded> {
        let bytes = bs58::decode(data)
            .into_vec()
            .map_err(|err| CoderError::Encoding {
                capability: Capability::Instructions,
                reason: format!("instruction data is not base58: {err}"),
            })?;
        self.decode(&bytes)
    }

    /// Decode and render every argument, pairing `accounts` with the
    /// instruction's declared account names.
    fn format(&self, data: &[u8], accounts: &[AccountMeta]) -> Result<DecodedInstruction>;
}

pub trait EventCoder: Send + Sync {
    /// Decode a `Program data: <base64>` log line or its bare base64 payload.
    fn decode(&self, log: &str) -> Result<Decoded>;

    fn decode_bytes(&self, data: &[u8]) -> Result<Decoded>;

    fn encode(&self, name: &str, value: &Value) -> Result<Vec<u8>>;
}

/// User-defined types carry no tag, so the caller names the type.
pub trait TypesCoder: Send + Sync {
    fn encode(&self, name: &str, value: &Value) -> Result<Vec<u8>>;

    fn decode(&self, name: &str, data: &[u8]) -> Result<Value>;

    fn size(&self, name: &str) -> Result<Option<usize>>;
}

/// The uniform surface every program coder exposes.
pub trait Coder: Send + Sync {
    fn name(&self) -> &str;

    fn accounts(&self) -> &dyn AccountsCoder;

    fn instruction(&self) -> &dyn InstructionCoder;

    fn events(&self) -> &dyn EventCoder;

    fn types(&self) -> &dyn TypesCoder;
}

/// State shared by the sub-coders of one program.
#[derive(Debug, Clone)]
pub(crate) struct CoderContext {
    /// Display name, e.g. `SplRecord`.
    pub program: String,
    pub types: Arc<TypeRegistry>,
    pub config: CoderConfig,
}

impl CoderContext {
    /// Pass `result` through, logging failures when configured to.
    pub fn observe<T>(&self, capability: Capability, op: &str, result: Result<T>) -> Result<T> {
        if self.config.log_failures {
            if let Err(err) = &result {
                tracing::debug!(
                    program = %self.program,
                    %capability,
                    op,
                    kind = ?err.kind(),
                    error = %err,
                    "coder operation failed"
                );
            }
        }
        result
    }
}

/// Coder built from one IDL document.
///
/// Immutable once built; safe to share across threads.
#[derive(Debug)]
pub struct ProgramCoder {
    name: String,
    address: Option<Pubkey>,
    accounts: IdlAccountsCoder,
    instruction: IdlInstructionCoder,
    events: Events,
    types: Types,
}

impl ProgramCoder {
    pub fn new(idl: &Idl) -> Result<Self> {
        Self::with_config(idl, CoderConfig::default())
    }

    /// Build all four sub-coders. Any schema inconsistency fails the whole
    /// build with `InvalidSchema`.
    pub fn with_config(idl: &Idl, config: CoderConfig) -> Result<Self> {
        let address = idl.program_id()?;
        let ctx = CoderContext {
            program: idl.name().to_upper_camel_case(),
            types: Arc::new(TypeRegistry::new(&idl.types)?),
            config,
        };

        let accounts = IdlAccountsCoder::new(idl, ctx.clone())?;
        let instruction = IdlInstructionCoder::new(idl, ctx.clone())?;
        let events = Events::new(idl, ctx.clone())?;
        let types = Types::new(idl, ctx)?;

        tracing::debug!(
            program = idl.name(),
            accounts = idl.accounts.len(),
            instructions = idl.instructions.len(),
            events = events.is_supported(),
            types = types.is_supported(),
            "built program coder"
        );

        Ok(Self {
            name: idl.name().to_string(),
            address,
            accounts,
            instruction,
            events,
            types,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(&Idl::from_json(json)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> Option<Pubkey> {
        self.address
    }

    pub fn accounts(&self) -> &IdlAccountsCoder {
        &self.accounts
    }

    pub fn instruction(&self) -> &IdlInstructionCoder {
        &self.instruction
    }

    pub fn events(&self) -> &Events {
        &self.events
    }

    pub fn types(&self) -> &Types {
        &self.types
    }

    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Accounts | Capability::Instructions => true,
            Capability::Events => self.events.is_supported(),
            Capability::Types => self.types.is_supported(),
        }
    }
}

impl Coder for ProgramCoder {
    fn name(&self) -> &str {
        &self.name
    }

    fn accounts(&self) -> &dyn AccountsCoder {
        &self.accounts
    }

    fn instruction(&self) -> &dyn InstructionCoder {
        &self.instruction
    }

    fn events(&self) -> &dyn EventCoder {
        &self.events
    }

    fn types(&self) -> &dyn TypesCoder {
        &self.types
    }
}
