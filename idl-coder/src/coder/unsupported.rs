use crate::{
    error::{Capability, CoderError, Result},
    value::Value,
};

use super::{Decoded, EventCoder, TypesCoder};

/// Stand-in for a capability the IDL does not declare.
///
/// Every operation fails with `CapabilityNotSupported` regardless of input.
#[derive(Debug, Clone)]
pub struct NotApplicable {
    program: String,
    capability: Capability,
}

impl NotApplicable {
    pub(crate) fn new(program: &str, capability: Capability) -> Self {
        Self {
            program: program.to_string(),
            capability,
        }
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    fn fail<T>(&self, op: &str) -> Result<T> {
        tracing::debug!(
            program = %self.program,
            capability = %self.capability,
            op,
            "capability not supported"
        );
        Err(CoderError::CapabilityNotSupported {
            program: self.program.clone(),
            capability: self.capability,
        })
    }
}

impl EventCoder for NotApplicable {
    fn decode(&self, _log: &str) -> Result<Decoded> {
        self.fail("decode")
    }

    fn decode_bytes(&self, _data: &[u8]) -> Result<Decoded> {
        self.fail("decode_bytes")
    }

    fn encode(&self, _name: &str, _value: &Value) -> Result<Vec<u8>> {
        self.fail("encode")
    }
}

impl TypesCoder for NotApplicable {
    fn encode(&self, _name: &str, _value: &Value) -> Result<Vec<u8>> {
        self.fail("encode")
    }

    fn decode(&self, _name: &str, _data: &[u8]) -> Result<Value> {
        self.fail("decode")
    }

    fn size(&self, _name: &str) -> Result<Option<usize>> {
        self.fail("size")
    }
}
