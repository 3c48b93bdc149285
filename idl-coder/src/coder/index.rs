//! Discriminator-tagged entry index shared by the account, instruction and
//! event coders.

use std::collections::HashMap;

use crate::{
    config::TrailingBytes,
    error::{Capability, CoderError, LayoutError, Result},
    idl::IdlField,
    layout::TypeRegistry,
    value::Value,
};

#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub name: String,
    pub discriminator: Vec<u8>,
    pub fields: Vec<IdlField>,
    /// Smallest encoded body, discriminator excluded.
    pub min_size: usize,
}

impl Entry {
    pub fn new(name: &str, discriminator: Vec<u8>, fields: Vec<IdlField>) -> Self {
        Self {
            name: name.to_string(),
            discriminator,
            fields,
            min_size: 0,
        }
    }
}

/// Entries of one IDL section, reachable by name and by discriminator.
///
/// No discriminator equals or prefixes another, so at most one entry
/// matches any input.
#[derive(Debug)]
pub(crate) struct EntryIndex {
    capability: Capability,
    entries: Vec<Entry>,
    by_name: HashMap<String, usize>,
    by_discriminator: HashMap<Vec<u8>, usize>,
    /// Distinct discriminator lengths, ascending.
    lengths: Vec<usize>,
}

impl EntryIndex {
    pub fn new(capability: Capability, mut entries: Vec<Entry>, types: &TypeRegistry) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(entries.len());
        let mut by_discriminator = HashMap::with_capacity(entries.len());

        for (i, entry) in entries.iter_mut().enumerate() {
            let owner = format!("{capability} entry `{}`", entry.name);
            types.check_fields(&entry.fields, &owner)?;
            entry.min_size = types.fields_min_size(&entry.fields);

            if by_name.insert(entry.name.clone(), i).is_some() {
                return Err(CoderError::InvalidSchema(format!(
                    "duplicate {capability} entry `{}`",
                    entry.name
                )));
            }
            if let Some(&other) = by_discriminator.get(&entry.discriminator) {
                return Err(CoderError::InvalidSchema(format!(
                    "{capability} entries `{}` and `{}` share discriminator {:?}",
                    entries_name(&by_name, other),
                    entry.name,
                    entry.discriminator
                )));
            }
            by_discriminator.insert(entry.discriminator.clone(), i);
        }

        for a in &entries {
            for b in &entries {
                if a.discriminator.len() < b.discriminator.len()
                    && b.discriminator.starts_with(&a.discriminator)
                {
                    return Err(CoderError::InvalidSchema(format!(
                        "{capability} discriminator of `{}` is a prefix of `{}`'s",
                        a.name, b.name
                    )));
                }
            }
        }

        let mut lengths: Vec<usize> = entries.iter().map(|e| e.discriminator.len()).collect();
        lengths.sort_unstable();
        lengths.dedup();

        Ok(Self {
            capability,
            entries,
            by_name,
            by_discriminator,
            lengths,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Result<&Entry> {
        self.by_name
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| CoderError::unknown_name(self.capability, name))
    }

    /// Match the leading bytes of `data` against every known discriminator.
    pub fn resolve(&self, data: &[u8]) -> Result<&Entry> {
        if let Some(&shortest) = self.lengths.first() {
            if data.len() < shortest {
                return Err(CoderError::layout(
                    self.capability,
                    "discriminator",
                    LayoutError::truncated(shortest, data.len()),
                ));
            }
        }
        for &len in &self.lengths {
            let Some(prefix) = data.get(..len) else {
                break;
            };
            if let Some(&i) = self.by_discriminator.get(prefix) {
                return Ok(&self.entries[i]);
            }
        }
        let longest = self.lengths.last().copied().unwrap_or(0);
        Err(CoderError::UnknownDiscriminant {
            capability: self.capability,
            discriminator: data[..longest.min(data.len())].to_vec(),
        })
    }

    pub fn encode(&self, types: &TypeRegistry, name: &str, value: &Value) -> Result<Vec<u8>> {
        let entry = self.get(name)?;
        let mut out = Vec::with_capacity(entry.discriminator.len() + entry.min_size);
        out.extend_from_slice(&entry.discriminator);
        types
            .encode_fields(&entry.fields, value, &mut out)
            .map_err(|err| CoderError::layout(self.capability, name, err))?;
        Ok(out)
    }

    /// Decode the body following `entry`'s discriminator.
    pub fn decode_body(
        &self,
        types: &TypeRegistry,
        policy: TrailingBytes,
        entry: &Entry,
        data: &[u8],
    ) -> Result<Value> {
        let disc_len = entry.discriminator.len();
        let Some(body) = data.get(disc_len..) else {
            return Err(CoderError::layout(
                self.capability,
                &entry.name,
                LayoutError::truncated(disc_len, data.len()),
            ));
        };
        if body.len() < entry.min_size {
            return Err(CoderError::layout(
                self.capability,
                &entry.name,
                LayoutError::truncated(disc_len + entry.min_size, data.len()),
            ));
        }

        let mut buf = body;
        let value = types
            .decode_fields(&entry.fields, &mut buf)
            .map_err(|err| CoderError::layout(self.capability, &entry.name, err))?;

        if !buf.is_empty() && policy == TrailingBytes::Reject {
            return Err(CoderError::TrailingBytes {
                capability: self.capability,
                name: entry.name.clone(),
                consumed: data.len() - buf.len(),
                remaining: buf.len(),
            });
        }
        Ok(value)
    }
}

fn entries_name(by_name: &HashMap<String, usize>, index: usize) -> &str {
    by_name
        .iter()
        .find(|(_, i)| **i == index)
        .map(|(name, _)| name.as_str())
        .unwrap_or_default()
}
