//! Human-readable rendering of decoded instructions.

use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

/// One argument, rendered with [`Value`](crate::Value)'s `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedField {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedAccount {
    pub name: String,
    /// Base58 address.
    pub pubkey: String,
    pub signer: bool,
    pub writable: bool,
}

/// Instruction data decoded against an IDL, paired with its account metas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedInstruction {
    pub program_name: String,
    pub instruction_name: String,
    pub fields: Vec<DecodedField>,
    pub accounts: Vec<DecodedAccount>,
}

impl DecodedInstruction {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Header line followed by argument and account tables.
    pub fn render(&self) -> String {
        let mut out = format!("{}: {}\n", self.program_name, self.instruction_name);

        if !self.fields.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["field", "value"]);
            for field in &self.fields {
                builder.push_record([field.name.as_str(), field.value.as_str()]);
            }
            out.push_str(&builder.build().with(Style::rounded()).to_string());
            out.push('\n');
        }

        if !self.accounts.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["#", "account", "pubkey", "flags"]);
            for (i, account) in self.accounts.iter().enumerate() {
                builder.push_record([
                    i.to_string(),
                    account.name.clone(),
                    account.pubkey.clone(),
                    flags(account.signer, account.writable),
                ]);
            }
            out.push_str(&builder.build().with(Style::rounded()).to_string());
            out.push('\n');
        }
        out
    }
}

fn flags(signer: bool, writable: bool) -> String {
    match (signer, writable) {
        (true, true) => "signer, writable".to_string(),
        (true, false) => "signer".to_string(),
        (false, true) => "writable".to_string(),
        (false, false) => "readonly".to_string(),
    }
}
