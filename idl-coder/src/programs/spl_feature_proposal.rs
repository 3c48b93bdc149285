//! SPL Feature Proposal: token-weighted votes on feature activation.
//!
//! The on-chain `FeatureProposal` is a borsh enum. Each variant is modelled
//! as its own account type whose one-byte discriminator is the variant
//! index, so `accounts().decode` reports the proposal's state by name.

use solana_pubkey::Pubkey;

use crate::{error::Result, idl::Idl};

/// Bundled programs need no coder beyond the plain IDL-backed one.
pub use crate::registry::idl_coder as coder;

pub const ID: Pubkey = solana_pubkey::pubkey!("Feat1YXHhH6t1juaWF74WLcfv4XoNocjXA6sPWHNgAse");

pub const IDL_JSON: &str = r#"{
  "address": "Feat1YXHhH6t1juaWF74WLcfv4XoNocjXA6sPWHNgAse",
  "metadata": {"name": "spl_feature_proposal", "version": "1.0.0"},
  "instructions": [
    {
      "name": "propose",
      "discriminator": [0],
      "accounts": [
        {"name": "fundingAddress", "writable": true, "signer": true},
        {"name": "featureProposalAddress", "writable": true, "signer": true},
        {"name": "mintAddress", "writable": true},
        {"name": "distributorTokenAddress", "writable": true},
        {"name": "acceptanceTokenAddress", "writable": true},
        {"name": "featureId", "writable": true},
        {"name": "systemProgram"},
        {"name": "tokenProgram"},
        {"name": "rent"}
      ],
      "args": [
        {"name": "tokensToMint", "type": "u64"},
        {"name": "acceptanceCriteria", "type": {"defined": {"name": "AcceptanceCriteria"}}}
      ]
    },
    {
      "name": "tally",
      "discriminator": [1],
      "accounts": [
        {"name": "featureProposalAddress", "writable": true},
        {"name": "acceptanceTokenAddress"},
        {"name": "featureId", "writable": true},
        {"name": "systemProgram"},
        {"name": "clock"}
      ],
      "args": []
    }
  ],
  "accounts": [
    {"name": "uninitialized", "discriminator": [0], "fields": []},
    {
      "name": "pending",
      "discriminator": [1],
      "fields": [
        {"name": "acceptanceCriteria", "type": {"defined": {"name": "AcceptanceCriteria"}}}
      ]
    },
    {
      "name": "accepted",
      "discriminator": [2],
      "fields": [
        {"name": "tokensUponAcceptance", "type": "u64"}
      ]
    },
    {"name": "expired", "discriminator": [3], "fields": []}
  ],
  "types": [
    {
      "name": "AcceptanceCriteria",
      "type": {
        "kind": "struct",
        "fields": [
          {"name": "tokensRequired", "type": "u64"},
          {"name": "deadline", "type": "i64"}
        ]
      }
    }
  ]
}"#;

pub fn idl() -> Result<Idl> {
    Idl::from_json(IDL_JSON)
}
