use crate::{
    config::TrailingBytes,
    error::{Capability, CoderError, Result},
    idl::{Idl, IdlType},
    value::Value,
};

use super::{CoderContext, NotApplicable, TypesCoder};

/// Coder for the IDL's user-defined types, addressed by name.
#[derive(Debug)]
pub struct IdlTypesCoder {
    ctx: CoderContext,
}

impl IdlTypesCoder {
    pub(crate) fn new(ctx: CoderContext) -> Self {
        Self { ctx }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ctx.types.names()
    }

    fn resolve(&self, name: &str) -> Result<IdlType> {
        match self.ctx.types.get(name) {
            Some(_) => Ok(IdlType::defined(name)),
            None => Err(CoderError::unknown_name(Capability::Types, name)),
        }
    }

    fn decode_inner(&self, name: &str, data: &[u8]) -> Result<Value> {
        let ty = self.resolve(name)?;
        let mut buf = data;
        let value = self
            .ctx
            .types
            .decode(&ty, &mut buf)
            .map_err(|err| CoderError::layout(Capability::Types, name, err))?;
        if !buf.is_empty() && self.ctx.config.trailing_bytes == TrailingBytes::Reject {
            return Err(CoderError::TrailingBytes {
                capability: Capability::Types,
                name: name.to_string(),
                consumed: data.len() - buf.len(),
                remaining: buf.len(),
            });
        }
        Ok(value)
    }
}

impl TypesCoder for IdlTypesCoder {
    fn encode(&self, name: &str, value: &Value) -> Result<Vec<u8>> {
        let result = self.resolve(name).and_then(|ty| {
            self.ctx
                .types
                .encode(&ty, value)
                .map_err(|err| CoderError::layout(Capability::Types, name, err))
        });
        self.ctx.observe(Capability::Types, "encode", result)
    }

    fn decode(&self, name: &str, data: &[u8]) -> Result<Value> {
        let result = self.decode_inner(name, data);
        self.ctx.observe(Capability::Types, "decode", result)
    }

    fn size(&self, name: &str) -> Result<Option<usize>> {
        let result = self
            .resolve(name)
            .map(|ty| self.ctx.types.fixed_size(&ty));
        self.ctx.observe(Capability::Types, "size", result)
    }
}

/// Types coder of a program, or the not-applicable stand-in when the IDL
/// declares no user-defined types.
#[derive(Debug)]
pub enum Types {
    Idl(IdlTypesCoder),
    NotApplicable(NotApplicable),
}

impl Types {
    pub(crate) fn new(idl: &Idl, ctx: CoderContext) -> Result<Self> {
        if idl.has_types() {
            Ok(Types::Idl(IdlTypesCoder::new(ctx)))
        } else {
            Ok(Types::NotApplicable(NotApplicable::new(
                &ctx.program,
                Capability::Types,
            )))
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, Types::Idl(_))
    }
}

impl TypesCoder for Types {
    fn encode(&self, name: &str, value: &Value) -> Result<Vec<u8>> {
        match self {
            Types::Idl(coder) => coder.encode(name, value),
            Types::NotApplicable(na) => na.encode(name, value),
        }
    }

    fn decode(&self, name: &str, data: &[u8]) -> Result<Value> {
        match self {
            Types::Idl(coder) => coder.decode(name, data),
            Types::NotApplicable(na) => na.decode(name, data),
        }
    }

    fn size(&self, name: &str) -> Result<Option<usize>> {
        match self {
            Types::Idl(coder) => coder.size(name),
            Types::NotApplicable(na) => na.size(name),
        }
    }
}
