use idl_coder::{
    programs::{spl_feature_proposal, spl_record},
    AccountsCoder, Capability, CoderError, ErrorKind, EventCoder, InstructionCoder, ProgramCoder,
    TypesCoder, Value,
};
use idl_coder_tests::make_accounts;
use solana_pubkey::Pubkey;

fn record() -> ProgramCoder {
    ProgramCoder::new(&spl_record::idl().unwrap()).unwrap()
}

fn feature_proposal() -> ProgramCoder {
    ProgramCoder::new(&spl_feature_proposal::idl().unwrap()).unwrap()
}

fn criteria(tokens_required: u64, deadline: i64) -> Value {
    Value::structure([
        ("tokensRequired", Value::from(tokens_required)),
        ("deadline", Value::from(deadline)),
    ])
}

#[test]
fn test_record_write_instruction() {
    let coder = record();
    let args = Value::structure([
        ("offset", Value::from(4u64)),
        ("data", Value::Bytes(b"hello".to_vec())),
    ]);

    let data = coder.instruction().encode("write", &args).unwrap();
    let mut expected = vec![1];
    expected.extend_from_slice(&4u64.to_le_bytes());
    expected.extend_from_slice(&5u32.to_le_bytes());
    expected.extend_from_slice(b"hello");
    assert_eq!(data, expected);

    let formatted = coder.instruction().format(&data, &make_accounts(2)).unwrap();
    assert_eq!(formatted.program_name, "SplRecord");
    assert_eq!(formatted.instruction_name, "Write");
    assert_eq!(formatted.field("offset"), Some("4"));
    assert_eq!(formatted.accounts[0].name, "recordAccount");
    assert_eq!(formatted.accounts[1].name, "signer");
}

#[test]
fn test_record_instruction_tags() {
    let coder = record();
    for (tag, name) in [
        (0u8, "initialize"),
        (2, "setAuthority"),
        (3, "closeAccount"),
    ] {
        assert_eq!(coder.instruction().decode(&[tag]).unwrap().name, name);
    }
    let mut realloc = vec![4];
    realloc.extend_from_slice(&1024u64.to_le_bytes());
    let decoded = coder.instruction().decode(&realloc).unwrap();
    assert_eq!(decoded.name, "reallocate");
    assert_eq!(decoded.value.get("dataLength").and_then(Value::as_u64), Some(1024));
}

#[test]
fn test_record_account_header() {
    let coder = record();
    let authority = Pubkey::new_from_array([5; 32]);
    let value = Value::structure([("authority", Value::Pubkey(authority))]);

    let bytes = coder.accounts().encode("RecordData", &value).unwrap();
    assert_eq!(bytes.len(), spl_record::RECORD_HEADER_LEN);
    assert_eq!(bytes[0], spl_record::RECORD_VERSION);

    // Record accounts carry their payload after the header.
    let mut account = bytes.clone();
    account.extend_from_slice(b"payload");
    let err = coder.accounts().decode(&account).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TrailingBytes);

    let header = coder
        .accounts()
        .decode_named("RecordData", &account[..spl_record::RECORD_HEADER_LEN])
        .unwrap();
    assert_eq!(header, value);
}

#[test]
fn test_record_has_no_events_or_types() {
    let coder = record();
    assert_eq!(
        coder.events().decode("Program data: AQ==").unwrap_err(),
        CoderError::CapabilityNotSupported {
            program: "SplRecord".into(),
            capability: Capability::Events,
        }
    );
    assert_eq!(
        coder.types().size("RecordData").unwrap_err().to_string(),
        "SplRecord program does not have user-defined types"
    );
}

#[test]
fn test_feature_proposal_propose() {
    let coder = feature_proposal();
    let args = Value::structure([
        ("tokensToMint", Value::from(1_000_000u64)),
        ("acceptanceCriteria", criteria(700_000, 1_700_000_000)),
    ]);

    let data = coder.instruction().encode("propose", &args).unwrap();
    assert_eq!(data.len(), 1 + 8 + 8 + 8);
    assert_eq!(data[0], 0);

    let decoded = coder.instruction().decode(&data).unwrap();
    assert_eq!(decoded.name, "propose");
    assert_eq!(decoded.value, args);

    let formatted = coder.instruction().format(&data, &make_accounts(9)).unwrap();
    assert_eq!(
        formatted.field("acceptanceCriteria"),
        Some("{ tokensRequired: 700000, deadline: 1700000000 }")
    );
    assert_eq!(formatted.accounts[8].name, "rent");
}

#[test]
fn test_feature_proposal_states() {
    let coder = feature_proposal();

    let pending = Value::structure([("acceptanceCriteria", criteria(10, -1))]);
    let bytes = coder.accounts().encode("pending", &pending).unwrap();
    let decoded = coder.accounts().decode(&bytes).unwrap();
    assert_eq!(decoded.name, "pending");
    assert_eq!(decoded.value, pending);

    assert_eq!(coder.accounts().decode(&[3]).unwrap().name, "expired");
    assert_eq!(coder.accounts().decode(&[0]).unwrap().name, "uninitialized");

    let err = coder.accounts().decode(&[9]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownDiscriminant);
}

#[test]
fn test_feature_proposal_types() {
    let coder = feature_proposal();
    let bytes = coder
        .types()
        .encode("AcceptanceCriteria", &criteria(1, 2))
        .unwrap();
    assert_eq!(bytes.len(), 16);
    assert_eq!(
        coder.types().decode("AcceptanceCriteria", &bytes).unwrap(),
        criteria(1, 2)
    );
    assert!(coder.supports(Capability::Types));
    assert!(!coder.supports(Capability::Events));
}
