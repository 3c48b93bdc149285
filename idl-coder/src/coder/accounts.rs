use crate::{
    discriminator::account_discriminator,
    error::{Capability, CoderError, LayoutError, Result},
    idl::{Idl, IdlField, IdlTypeDefTy},
    layout::TypeRegistry,
    value::Value,
};

use super::{
    index::{Entry, EntryIndex},
    AccountsCoder, CoderContext, Decoded,
};

/// Account coder backed by the IDL `accounts` section.
#[derive(Debug)]
pub struct IdlAccountsCoder {
    ctx: CoderContext,
    index: EntryIndex,
}

impl IdlAccountsCoder {
    pub(crate) fn new(idl: &Idl, ctx: CoderContext) -> Result<Self> {
        let entries = idl
            .accounts
            .iter()
            .map(|account| {
                let fields = entry_fields(
                    &ctx.types,
                    Capability::Accounts,
                    &account.name,
                    account.fields.as_deref(),
                )?;
                let discriminator = account
                    .discriminator
                    .clone()
                    .unwrap_or_else(|| account_discriminator(&account.name).to_vec());
                Ok(Entry::new(&account.name, discriminator, fields))
            })
            .collect::<Result<Vec<_>>>()?;

        let index = EntryIndex::new(Capability::Accounts, entries, &ctx.types)?;
        Ok(Self { ctx, index })
    }

    /// Declared account type names, in IDL order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.index.entries().iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.len() == 0
    }
}

impl AccountsCoder for IdlAccountsCoder {
    fn encode(&self, name: &str, value: &Value) -> Result<Vec<u8>> {
        let result = self.index.encode(&self.ctx.types, name, value);
        self.ctx.observe(Capability::Accounts, "encode", result)
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
        self.ctx.observe(Capability::Accounts, "decode", result)
    }

    fn decode_named(&self, name: &str, data: &[u8]) -> Result<Value> {
        let result = self.index.get(name).and_then(|entry| {
            let disc = entry.discriminator.as_slice();
            match data.get(..disc.len()) {
                None => Err(CoderError::layout(
                    Capability::Accounts,
                    name,
                    LayoutError::truncated(disc.len(), data.len()),
                )),
                Some(given) if given != disc => Err(CoderError::UnknownDiscriminant {
                    capability: Capability::Accounts,
                    discriminator: given.to_vec(),
                }),
                Some(_) => self.index.decode_body(
                    &self.ctx.types,
                    self.ctx.config.trailing_bytes,
                    entry,
                    data,
                ),
            }
        });
        self.ctx.observe(Capability::Accounts, "decode_named", result)
    }

    fn decode_unchecked(&self, name: &str, data: &[u8]) -> Result<Value> {
        let result = self.index.get(name).and_then(|entry| {
            self.index
                .decode_body(&self.ctx.types, self.ctx.config.trailing_bytes, entry, data)
        });
        self.ctx.observe(Capability::Accounts, "decode_unchecked", result)
    }

    fn discriminator(&self, name: &str) -> Result<&[u8]> {
        let result = self
            .index
            .get(name)
            .map(|entry| entry.discriminator.as_slice());
        self.ctx.observe(Capability::Accounts, "discriminator", result)
    }

    fn size(&self, name: &str) -> Result<Option<usize>> {
        let result = self.index.get(name).map(|entry| {
            self.ctx
                .types
                .fields_fixed_size(&entry.fields)
                .and_then(|body| body.checked_add(entry.discriminator.len()))
        });
        self.ctx.observe(Capability::Accounts, "size", result)
    }
}

/// Inline fields, or the struct type sharing the entry's name.
pub(super) fn entry_fields(
    types: &TypeRegistry,
    capability: Capability,
    name: &str,
    inline: Option<&[IdlField]>,
) -> Result<Vec<IdlField>> {
    if let Some(fields) = inline {
        return Ok(fields.to_vec());
    }
    match types.get(name) {
        Some(IdlTypeDefTy::Struct { fields }) => Ok(fields.clone()),
        Some(IdlTypeDefTy::Enum { .. }) => Err(CoderError::InvalidSchema(format!(
            "{capability} entry `{name}` resolves to an enum type; expected a struct"
        ))),
        None => Err(CoderError::InvalidSchema(format!(
            "{capability} entry `{name}` declares no fields and no type named `{name}` exists"
        ))),
    }
}
