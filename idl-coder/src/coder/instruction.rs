use std::collections::HashMap;

use heck::ToUpperCamelCase;
use solana_instruction::AccountMeta;

use crate::{
    discriminator::instruction_discriminator,
    error::{Capability, Result},
    formatter::{DecodedAccount, DecodedField, DecodedInstruction},
    idl::Idl,
    value::Value,
};

use super::{
    index::{Entry, EntryIndex},
    CoderContext, Decoded, InstructionCoder,
};

/// Instruction coder backed by the IDL `instructions` section.
#[derive(Debug)]
pub struct IdlInstructionCoder {
    ctx: CoderContext,
    index: EntryIndex,
    /// Declared account names per instruction.
    accounts: HashMap<String, Vec<String>>,
}

impl IdlInstructionCoder {
    pub(crate) fn new(idl: &Idl, ctx: CoderContext) -> Result<Self> {
        let entries = idl
            .instructions
            .iter()
            .map(|ix| {
                let discriminator = ix
                    .discriminator
                    .clone()
                    .unwrap_or_else(|| instruction_discriminator(&ix.name).to_vec());
                Entry::new(&ix.name, discriminator, ix.args.clone())
            })
            .collect();
        let index = EntryIndex::new(Capability::Instructions, entries, &ctx.types)?;

        let accounts = idl
            .instructions
            .iter()
            .map(|ix| {
                let names = ix.accounts.iter().map(|a| a.name.clone()).collect();
                (ix.name.clone(), names)
            })
            .collect();

        Ok(Self {
            ctx,
            index,
            accounts,
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.index.entries().iter().map(|e| e.name.as_str())
    }

    pub fn discriminator(&self, name: &str) -> Result<&[u8]> {
        Ok(self.index.get(name)?.discriminator.as_slice())
    }
}

impl InstructionCoder for IdlInstructionCoder {
    fn encode(&self, name: &str, value: &Value) -> Result<Vec<u8>> {
        let result = self.index.encode(&self.ctx.types, name, value);
        self.ctx.observe(Capability::Instructions, "encode", result)
    }

    fn decode(&self, data: &[u8]) -> Result<Decoded> {
        let result = self.index.resolve(data).and_then(|entry| {
            let value = self.index.decode_body(
                &self.ctx.types,
                self.ctx.config.trailing_bytes,
                entry,
                data,
            )?;
            Ok(Decoded {
                name: entry.name.clone(),
                value,
            })
        });
        self.ctx.observe(Capability::Instructions, "decode", result)
    }

    fn format(&self, data: &[u8], metas: &[AccountMeta]) -> Result<DecodedInstruction> {
        let decoded = self.decode(data)?;

        let fields = match decoded.value {
            Value::Struct(fields) => fields
                .into_iter()
                .map(|(name, value)| DecodedField {
                    name,
                    value: value.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        };

        let names = self
            .accounts
            .get(&decoded.name)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let accounts = metas
            .iter()
            .enumerate()
            .map(|(i, meta)| DecodedAccount {
                name: names
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("remaining_{}", i - names.len())),
                pubkey: meta.pubkey.to_string(),
                signer: meta.is_signer,
                writable: meta.is_writable,
            })
            .collect();

        Ok(DecodedInstruction {
            program_name: self.ctx.program.clone(),
            instruction_name: decoded.name.to_upper_camel_case(),
            fields,
            accounts,
        })
    }
}
