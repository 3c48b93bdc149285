//! Anchor discriminators: `sha256("<namespace>:<name>")[..8]`.

use heck::ToSnakeCase;
use sha2::{Digest, Sha256};

pub const DISCRIMINATOR_LEN: usize = 8;

pub const INSTRUCTION_NAMESPACE: &str = "global";
pub const ACCOUNT_NAMESPACE: &str = "account";
pub const EVENT_NAMESPACE: &str = "event";

pub fn sighash(namespace: &str, name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(format!("{namespace}:{name}").as_bytes());
    let hash = hasher.finalize();
    let mut disc = [0u8; DISCRIMINATOR_LEN];
    disc.copy_from_slice(&hash[..DISCRIMINATOR_LEN]);
    disc
}

/// Instruction names are hashed in snake case, whatever case the IDL uses.
pub fn instruction_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    sighash(INSTRUCTION_NAMESPACE, &name.to_snake_case())
}

pub fn account_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    sighash(ACCOUNT_NAMESPACE, name)
}

pub fn event_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    sighash(EVENT_NAMESPACE, name)
}
