//! Program id → coder builder lookup.

use std::{collections::HashMap, fmt};

use solana_pubkey::Pubkey;

use crate::{
    coder::{Coder, ProgramCoder},
    config::CoderConfig,
    error::{CoderError, Result},
    idl::Idl,
    programs,
};

/// Builds a program's coder from its IDL.
pub type CoderBuilder = fn(&Idl, &CoderConfig) -> Result<Box<dyn Coder>>;

/// Builder that assembles a plain [`ProgramCoder`] from any IDL.
pub fn idl_coder(idl: &Idl, config: &CoderConfig) -> Result<Box<dyn Coder>> {
    Ok(Box::new(ProgramCoder::with_config(idl, config.clone())?))
}

/// Maps program ids to the builders that produce their coders.
///
/// Registration happens up front; lookups never mutate, so a built registry
/// can be shared freely.
#[derive(Default)]
pub struct CoderRegistry {
    builders: HashMap<Pubkey, CoderBuilder>,
    config: CoderConfig,
}

impl fmt::Debug for CoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoderRegistry")
            .field("program_ids", &self.program_ids())
            .field("config", &self.config)
            .finish()
    }
}

impl CoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the bundled program coders.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(programs::spl_record::ID, programs::spl_record::coder);
        registry.register(
            programs::spl_feature_proposal::ID,
            programs::spl_feature_proposal::coder,
        );
        registry
    }

    /// Config handed to every builder.
    pub fn with_config(mut self, config: CoderConfig) -> Self {
        self.config = config;
        self
    }

    /// Register `builder` for `program_id`. Returns the builder it replaced.
    pub fn register(&mut self, program_id: Pubkey, builder: CoderBuilder) -> Option<CoderBuilder> {
        let previous = self.builders.insert(program_id, builder);
        if previous.is_some() {
            tracing::debug!(%program_id, "replaced coder builder");
        }
        previous
    }

    pub fn has_coder(&self, program_id: &Pubkey) -> bool {
        self.builders.contains_key(program_id)
    }

    /// Build the coder registered for `program_id` from `idl`.
    pub fn build(&self, program_id: &Pubkey, idl: &Idl) -> Result<Box<dyn Coder>> {
        let builder = self
            .builders
            .get(program_id)
            .ok_or(CoderError::UnknownProgram(*program_id))?;
        builder(idl, &self.config)
    }

    /// Build from an IDL carrying its own `address`.
    pub fn build_for_idl(&self, idl: &Idl) -> Result<Box<dyn Coder>> {
        let program_id = idl.program_id()?.ok_or_else(|| {
            CoderError::InvalidSchema(format!("IDL `{}` declares no address", idl.name()))
        })?;
        self.build(&program_id, idl)
    }

    /// Registered program ids, sorted.
    pub fn program_ids(&self) -> Vec<Pubkey> {
        let mut ids: Vec<Pubkey> = self.builders.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}
