use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::{
    discriminator::event_discriminator,
    error::{Capability, CoderError, Result},
    idl::Idl,
    value::Value,
};

use super::{
    accounts::entry_fields,
    index::{Entry, EntryIndex},
    CoderContext, Decoded, EventCoder, NotApplicable,
};

/// Log prefix under which programs emit serialized events.
pub const PROGRAM_DATA_PREFIX: &str = "Program data: ";

/// Event coder backed by the IDL `events` section.
#[derive(Debug)]
pub struct IdlEventsCoder {
    ctx: CoderContext,
    index: EntryIndex,
}

impl IdlEventsCoder {
    pub(crate) fn new(idl: &Idl, ctx: CoderContext) -> Result<Self> {
        let entries = idl
            .events
            .iter()
            .map(|event| {
                let fields = entry_fields(
                    &ctx.types,
                    Capability::Events,
                    &event.name,
                    event.fields.as_deref(),
                )?;
                let discriminator = event
                    .discriminator
                    .clone()
                    .unwrap_or_else(|| event_discriminator(&event.name).to_vec());
                Ok(Entry::new(&event.name, discriminator, fields))
            })
            .collect::<Result<Vec<_>>>()?;

        let index = EntryIndex::new(Capability::Events, entries, &ctx.types)?;
        Ok(Self { ctx, index })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.index.entries().iter().map(|e| e.name.as_str())
    }

    fn decode_payload(&self, data: &[u8]) -> Result<Decoded> {
        let entry = self.index.resolve(data)?;
        let value =
            self.index
                .decode_body(&self.ctx.types, self.ctx.config.trailing_bytes, entry, data)?;
        Ok(Decoded {
            name: entry.name.clone(),
            value,
        })
    }
}

impl EventCoder for IdlEventsCoder {
    fn decode(&self, log: &str) -> Result<Decoded> {
        let payload = log.strip_prefix(PROGRAM_DATA_PREFIX).unwrap_or(log).trim();
        let result = STANDARD
            .decode(payload)
            .map_err(|err| CoderError::Encoding {
                capability: Capability::Events,
                reason: format!("event payload is not base64: {err}"),
            })
            .and_then(|bytes| self.decode_payload(&bytes));
        self.ctx.observe(Capability::Events, "decode", result)
    }

    fn decode_bytes(&self, data: &[u8]) -> Result<Decoded> {
        let result = self.decode_payload(data);
        self.ctx.observe(Capability::Events, "decode_bytes", result)
    }

    fn encode(&self, name: &str, value: &Value) -> Result<Vec<u8>> {
        let result = self.index.encode(&self.ctx.types, name, value);
        self.ctx.observe(Capability::Events, "encode", result)
    }
}

/// Event coder of a program, or the not-applicable stand-in when the IDL
/// declares no events.
#[derive(Debug)]
pub enum Events {
    Idl(IdlEventsCoder),
    NotApplicable(NotApplicable),
}

impl Events {
    pub(crate) fn new(idl: &Idl, ctx: CoderContext) -> Result<Self> {
        if idl.has_events() {
            Ok(Events::Idl(IdlEventsCoder::new(idl, ctx)?))
        } else {
            Ok(Events::NotApplicable(NotApplicable::new(
                &ctx.program,
                Capability::Events,
            )))
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, Events::Idl(_))
    }

    /// Base64 payload of an encoded event, as it appears after
    /// [`PROGRAM_DATA_PREFIX`] in program logs.
    pub fn encode_log(&self, name: &str, value: &Value) -> Result<String> {
        let bytes = self.encode(name, value)?;
        Ok(format!("{PROGRAM_DATA_PREFIX}{}", STANDARD.encode(bytes)))
    }
}

impl EventCoder for Events {
    fn decode(&self, log: &str) -> Result<Decoded> {
        match self {
            Events::Idl(coder) => coder.decode(log),
            Events::NotApplicable(na) => na.decode(log),
        }
    }

    fn decode_bytes(&self, data: &[u8]) -> Result<Decoded> {
        match self {
            Events::Idl(coder) => coder.decode_bytes(data),
            Events::NotApplicable(na) => na.decode_bytes(data),
        }
    }

    fn encode(&self, name: &str, value: &Value) -> Result<Vec<u8>> {
        match self {
            Events::Idl(coder) => coder.encode(name, value),
            Events::NotApplicable(na) => na.encode(name, value),
        }
    }
}
