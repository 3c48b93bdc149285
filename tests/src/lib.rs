//! Fixtures shared by the integration tests.
//!
//! The counter IDL mirrors a small Anchor program: one account with an
//! explicit tag, instructions whose discriminators are derived from their
//! names, and one event.

use idl_coder::{Idl, ProgramCoder};
use serde_json::json;
use sha2::{Digest, Sha256};
use solana_instruction::AccountMeta;
use solana_pubkey::Pubkey;

pub const COUNTER_PROGRAM_ID: Pubkey =
    solana_pubkey::pubkey!("Counter111111111111111111111111111111111111");

/// Tag of the `Counter` account.
pub const COUNTER_TAG: [u8; 8] = [1, 0, 0, 0, 0, 0, 0, 0];

/// `sha256("global:<name>")[..8]`, computed independently of the library.
pub fn anchor_discriminator(name: &str) -> [u8; 8] {
    sighash("global", name)
}

pub fn event_discriminator(name: &str) -> [u8; 8] {
    sighash("event", name)
}

fn sighash(namespace: &str, name: &str) -> [u8; 8] {
    let mut hasher = Sha256::new();
    hasher.update(format!("{namespace}:{name}").as_bytes());
    let hash = hasher.finalize();
    let mut disc = [0u8; 8];
    disc.copy_from_slice(&hash[..8]);
    disc
}

pub fn counter_idl_json() -> serde_json::Value {
    json!({
        "address": COUNTER_PROGRAM_ID.to_string(),
        "metadata": {"name": "counter", "version": "0.1.0"},
        "instructions": [
            {
                "name": "initialize",
                "accounts": [
                    {"name": "counter", "writable": true},
                    {"name": "authority", "writable": true, "signer": true},
                    {"name": "system_program"}
                ],
                "args": []
            },
            {
                "name": "increment",
                "accounts": [
                    {"name": "counter", "writable": true},
                    {"name": "authority", "signer": true}
                ],
                "args": []
            },
            {
                "name": "set",
                "accounts": [
                    {"name": "counter", "writable": true},
                    {"name": "authority", "signer": true}
                ],
                "args": [{"name": "value", "type": "u64"}]
            },
            {
                "name": "configure",
                "accounts": [
                    {"name": "counter", "writable": true},
                    {"name": "authority", "signer": true}
                ],
                "args": [
                    {"name": "label", "type": "string"},
                    {"name": "limit", "type": {"option": "u64"}},
                    {"name": "mode", "type": {"defined": {"name": "Mode"}}}
                ]
            }
        ],
        "accounts": [
            {
                "name": "Counter",
                "discriminator": COUNTER_TAG,
                "fields": [{"name": "count", "type": "u64"}]
            }
        ],
        "events": [
            {
                "name": "CounterChanged",
                "fields": [
                    {"name": "counter", "type": "pubkey"},
                    {"name": "count", "type": "u64"}
                ]
            }
        ],
        "types": [
            {
                "name": "Mode",
                "type": {
                    "kind": "enum",
                    "variants": [
                        {"name": "Free"},
                        {"name": "Capped", "fields": [{"name": "max", "type": "u64"}]},
                        {"name": "Fixed", "fields": ["u8"]}
                    ]
                }
            }
        ]
    })
}

pub fn counter_idl() -> Idl {
    Idl::from_value(counter_idl_json()).unwrap()
}

pub fn counter_coder() -> ProgramCoder {
    ProgramCoder::new(&counter_idl()).unwrap()
}

/// IDL with only accounts and instructions, as SPL programs without events ship.
pub fn accounts_only_idl() -> Idl {
    Idl::from_value(json!({
        "metadata": {"name": "spl_token_lending"},
        "instructions": [
            {"name": "refreshReserve", "discriminator": [3], "args": []}
        ],
        "accounts": [
            {
                "name": "Reserve",
                "discriminator": [1],
                "fields": [{"name": "liquidity", "type": "u64"}]
            }
        ]
    }))
    .unwrap()
}

/// Deterministic, distinct metas for account-pairing tests.
pub fn make_accounts(count: u8) -> Vec<AccountMeta> {
    (0..count)
        .map(|i| AccountMeta::new(Pubkey::new_from_array([i + 1; 32]), i == 0))
        .collect()
}
