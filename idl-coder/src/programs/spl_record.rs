//! SPL Record: arbitrary data stored behind an authority.

use solana_pubkey::Pubkey;

use crate::{error::Result, idl::Idl};

/// Bundled programs need no coder beyond the plain IDL-backed one.
pub use crate::registry::idl_coder as coder;

pub const ID: Pubkey = solana_pubkey::pubkey!("recr1L3PCGKLbckBqMNcJhuuyU1zgo8nBhfLVsJNwr5");

/// Record layout version written by `initialize`.
pub const RECORD_VERSION: u8 = 1;

/// Size of the `RecordData` header preceding the stored bytes.
pub const RECORD_HEADER_LEN: usize = 33;

/// `RecordData` declares only the header. A live record account carries its
/// stored bytes after it, so decode those with a coder built from
/// [`CoderConfig::lenient`](crate::CoderConfig::lenient), or pass
/// `&data[..RECORD_HEADER_LEN]` to `decode_named`.
pub const IDL_JSON: &str = r#"{
  "address": "recr1L3PCGKLbckBqMNcJhuuyU1zgo8nBhfLVsJNwr5",
  "metadata": {"name": "spl_record", "version": "0.1.0"},
  "instructions": [
    {
      "name": "initialize",
      "discriminator": [0],
      "accounts": [
        {"name": "recordAccount", "writable": true},
        {"name": "authority"}
      ],
      "args": []
    },
    {
      "name": "write",
      "discriminator": [1],
      "accounts": [
        {"name": "recordAccount", "writable": true},
        {"name": "signer", "signer": true}
      ],
      "args": [
        {"name": "offset", "type": "u64"},
        {"name": "data", "type": "bytes"}
      ]
    },
    {
      "name": "setAuthority",
      "discriminator": [2],
      "accounts": [
        {"name": "recordAccount", "writable": true},
        {"name": "signer", "signer": true},
        {"name": "newAuthority"}
      ],
      "args": []
    },
    {
      "name": "closeAccount",
      "discriminator": [3],
      "accounts": [
        {"name": "recordAccount", "writable": true},
        {"name": "signer", "signer": true},
        {"name": "receiver", "writable": true}
      ],
      "args": []
    },
    {
      "name": "reallocate",
      "discriminator": [4],
      "accounts": [
        {"name": "recordAccount", "writable": true},
        {"name": "signer", "signer": true}
      ],
      "args": [
        {"name": "dataLength", "type": "u64"}
      ]
    }
  ],
  "accounts": [
    {
      "name": "RecordData",
      "discriminator": [1],
      "fields": [
        {"name": "authority", "type": "pubkey"}
      ]
    }
  ]
}"#;

pub fn idl() -> Result<Idl> {
    Idl::from_json(IDL_JSON)
}
