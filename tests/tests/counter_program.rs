use idl_coder::{
    AccountsCoder, CoderError, ErrorKind, EventCoder, InstructionCoder, TypesCoder, Value,
    PROGRAM_DATA_PREFIX,
};
use idl_coder_tests::{
    anchor_discriminator, counter_coder, event_discriminator, make_accounts, COUNTER_PROGRAM_ID,
    COUNTER_TAG,
};
use solana_pubkey::Pubkey;

fn counter(count: u64) -> Value {
    Value::structure([("count", Value::from(count))])
}

#[test]
fn test_counter_account_round_trip() {
    let coder = counter_coder();

    let bytes = coder.accounts().encode("Counter", &counter(5)).unwrap();
    let mut expected = COUNTER_TAG.to_vec();
    expected.extend_from_slice(&5u64.to_le_bytes());
    assert_eq!(bytes, expected);

    let decoded = coder.accounts().decode(&bytes).unwrap();
    assert_eq!(decoded.name, "Counter");
    assert_eq!(decoded.value, counter(5));
}

#[test]
fn test_counter_account_rejects_short_and_long_input() {
    let coder = counter_coder();
    let bytes = coder.accounts().encode("Counter", &counter(5)).unwrap();

    for len in [0, 4, 8, 15] {
        let err = coder.accounts().decode(&bytes[..len]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput, "len {len}");
    }

    let mut long = bytes.clone();
    long.push(0);
    let err = coder.accounts().decode(&long).unwrap_err();
    assert_eq!(
        err,
        CoderError::TrailingBytes {
            capability: idl_coder::Capability::Accounts,
            name: "Counter".into(),
            consumed: 16,
            remaining: 1,
        }
    );
}

#[test]
fn test_unknown_names_are_rejected() {
    let coder = counter_coder();
    let err = coder.accounts().encode("Vault", &counter(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownName);
    let err = coder.instruction().encode("reset", &Value::structure::<&str, _>([])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownName);
    let err = coder.types().decode("Config", &[0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownName);
}

#[test]
fn test_instruction_discriminators_match_anchor() {
    let coder = counter_coder();
    for name in ["initialize", "increment", "set", "configure"] {
        assert_eq!(
            coder.instruction().discriminator(name).unwrap(),
            anchor_discriminator(name),
            "discriminator mismatch for '{name}'"
        );
    }
}

#[test]
fn test_set_instruction_round_trip() {
    let coder = counter_coder();
    let args = Value::structure([("value", Value::from(42u64))]);

    let data = coder.instruction().encode("set", &args).unwrap();
    assert_eq!(&data[..8], &anchor_discriminator("set"));
    assert_eq!(&data[8..], &42u64.to_le_bytes());

    let decoded = coder.instruction().decode(&data).unwrap();
    assert_eq!(decoded.name, "set");
    assert_eq!(decoded.value, args);
}

#[test]
fn test_configure_instruction_with_nested_types() {
    let coder = counter_coder();
    let args = Value::structure([
        ("label", Value::from("daily")),
        ("limit", Value::some(Value::from(100u64))),
        (
            "mode",
            Value::variant("Capped", Value::structure([("max", Value::from(7u64))])),
        ),
    ]);

    let data = coder.instruction().encode("configure", &args).unwrap();
    let decoded = coder.instruction().decode(&data).unwrap();
    assert_eq!(decoded.value, args);

    let fixed = Value::structure([
        ("label", Value::from("")),
        ("limit", Value::none()),
        ("mode", Value::variant("Fixed", Value::Array(vec![Value::from(3u8)]))),
    ]);
    let data = coder.instruction().encode("configure", &fixed).unwrap();
    // tag, empty string, none, variant 2, u8
    assert_eq!(data.len(), 8 + 4 + 1 + 1 + 1);
    assert_eq!(coder.instruction().decode(&data).unwrap().value, fixed);
}

#[test]
fn test_shape_mismatch_names_field() {
    let coder = counter_coder();
    let err = coder
        .instruction()
        .encode(
            "configure",
            &Value::structure([
                ("label", Value::from("x")),
                ("limit", Value::from(5u64)),
                ("mode", Value::unit_variant("Free")),
            ]),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    assert!(err.to_string().contains("`limit`"), "{err}");
}

#[test]
fn test_format_set_instruction() {
    let coder = counter_coder();
    let data = coder
        .instruction()
        .encode("set", &Value::structure([("value", Value::from(42u64))]))
        .unwrap();

    let formatted = coder.instruction().format(&data, &make_accounts(2)).unwrap();
    insta::assert_json_snapshot!(formatted, @r###"
    {
      "program_name": "Counter",
      "instruction_name": "Set",
      "fields": [
        {
          "name": "value",
          "value": "42"
        }
      ],
      "accounts": [
        {
          "name": "counter",
          "pubkey": "4vJ9JU1bJJE96FWSJKvHsmmFADCg4gpZQff4P3bkLKi",
          "signer": true,
          "writable": true
        },
        {
          "name": "authority",
          "pubkey": "8qbHbw2BbbTHBW1sbeqakYXVKRQM8Ne7pLK7m6CVfeR",
          "signer": false,
          "writable": true
        }
      ]
    }
    "###);

    let rendered = formatted.render();
    eprintln!("{rendered}");
    assert!(rendered.starts_with("Counter: Set\n"));
}

#[test]
fn test_format_initialize_with_extra_accounts() {
    let coder = counter_coder();
    let data = anchor_discriminator("initialize");

    let formatted = coder.instruction().format(&data, &make_accounts(4)).unwrap();
    assert_eq!(formatted.instruction_name, "Initialize");
    assert!(formatted.fields.is_empty());
    let names: Vec<&str> = formatted.accounts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["counter", "authority", "system_program", "remaining_0"]
    );
}

#[test]
fn test_unknown_instruction_discriminator() {
    let coder = counter_coder();
    let err = coder.instruction().decode(&[0xFF; 8]).unwrap_err();
    assert_eq!(
        err,
        CoderError::UnknownDiscriminant {
            capability: idl_coder::Capability::Instructions,
            discriminator: vec![0xFF; 8],
        }
    );
}

#[test]
fn test_counter_event_from_log_line() {
    let coder = counter_coder();
    let event = Value::structure([
        ("counter", Value::Pubkey(COUNTER_PROGRAM_ID)),
        ("count", Value::from(6u64)),
    ]);

    let bytes = coder.events().encode("CounterChanged", &event).unwrap();
    assert_eq!(&bytes[..8], &event_discriminator("CounterChanged"));

    let log = coder.events().encode_log("CounterChanged", &event).unwrap();
    assert!(log.starts_with(PROGRAM_DATA_PREFIX));
    let decoded = coder.events().decode(&log).unwrap();
    assert_eq!(decoded.name, "CounterChanged");
    assert_eq!(decoded.value, event);
}

#[test]
fn test_json_view_of_decoded_account() {
    let coder = counter_coder();
    let mut data = COUNTER_TAG.to_vec();
    data.extend_from_slice(&9u64.to_le_bytes());
    let decoded = coder.accounts().decode(&data).unwrap();
    insta::assert_json_snapshot!(decoded, @r###"
    {
      "name": "Counter",
      "value": {
        "count": 9
      }
    }
    "###);
}

#[test]
fn test_pubkey_field_accepts_base58_string() {
    let coder = counter_coder();
    let owner = Pubkey::new_from_array([3; 32]);
    let event = Value::structure([
        ("counter", Value::from(owner.to_string())),
        ("count", Value::from(1u64)),
    ]);
    let bytes = coder.events().encode("CounterChanged", &event).unwrap();
    let decoded = coder.events().decode_bytes(&bytes).unwrap();
    assert_eq!(decoded.value.get("counter"), Some(&Value::Pubkey(owner)));
}
