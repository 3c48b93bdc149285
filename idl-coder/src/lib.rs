//! IDL-driven coders for Solana programs.
//!
//! A [`ProgramCoder`] is assembled from an IDL document and exposes four
//! sub-coders: accounts, instructions, events and user-defined types. Events
//! and types are optional IDL sections; a program that declares none still
//! gets a sub-coder, one that fails every call with
//! [`CoderError::CapabilityNotSupported`].
//!
//! ```no_run
//! use idl_coder::{programs::spl_record, AccountsCoder, ProgramCoder};
//!
//! let coder = ProgramCoder::new(&spl_record::idl()?)?;
//! let decoded = coder.accounts().decode(&[1; 33])?;
//! assert_eq!(decoded.name, "RecordData");
//! # Ok::<(), idl_coder::CoderError>(())
//! ```
//!
//! Coders for several programs are looked up by program id through a
//! [`CoderRegistry`].

pub mod coder;
pub mod config;
pub mod discriminator;
pub mod error;
pub mod formatter;
pub mod idl;
pub mod layout;
pub mod programs;
pub mod registry;
pub mod value;

pub use coder::{
    AccountsCoder, Coder, Decoded, EventCoder, Events, IdlAccountsCoder, IdlEventsCoder,
    IdlInstructionCoder, IdlTypesCoder, InstructionCoder, MemcmpFilter, NotApplicable,
    ProgramCoder, Types, TypesCoder, PROGRAM_DATA_PREFIX,
};
pub use config::{CoderConfig, TrailingBytes};
pub use error::{Capability, CoderError, ErrorKind, LayoutError, Result};
pub use formatter::{DecodedAccount, DecodedField, DecodedInstruction};
pub use idl::{Idl, IdlField, IdlType};
pub use layout::TypeRegistry;
pub use registry::{idl_coder, CoderBuilder, CoderRegistry};
pub use value::Value;
