use idl_coder::{
    idl_coder, programs, Coder, CoderConfig, CoderError, CoderRegistry, ErrorKind, Idl,
    ProgramCoder, Result, TrailingBytes,
};
use idl_coder_tests::{counter_idl, COUNTER_PROGRAM_ID, COUNTER_TAG};

/// Hand-written builder: always decodes with trailing bytes ignored.
fn lenient_counter(idl: &Idl, config: &CoderConfig) -> Result<Box<dyn Coder>> {
    let config = config.clone().with_trailing_bytes(TrailingBytes::Ignore);
    Ok(Box::new(ProgramCoder::with_config(idl, config)?))
}

#[test]
fn test_counter_can_be_registered() {
    let mut registry = CoderRegistry::new();
    assert!(!registry.has_coder(&COUNTER_PROGRAM_ID));
    registry.register(COUNTER_PROGRAM_ID, idl_coder);
    assert!(registry.has_coder(&COUNTER_PROGRAM_ID));

    let coder = registry.build(&COUNTER_PROGRAM_ID, &counter_idl()).unwrap();
    assert_eq!(coder.name(), "counter");
}

#[test]
fn test_custom_builder_replaces_default() {
    let mut registry = CoderRegistry::new();
    registry.register(COUNTER_PROGRAM_ID, idl_coder);
    let previous = registry.register(COUNTER_PROGRAM_ID, lenient_counter);
    assert!(previous.is_some());
    assert_eq!(registry.len(), 1);

    let mut data = COUNTER_TAG.to_vec();
    data.extend_from_slice(&5u64.to_le_bytes());
    data.extend_from_slice(&[0; 16]);

    let coder = registry.build_for_idl(&counter_idl()).unwrap();
    assert_eq!(coder.accounts().decode(&data).unwrap().name, "Counter");
}

#[test]
fn test_registry_config_reaches_builders() {
    let mut registry = CoderRegistry::new()
        .with_config(CoderConfig::strict().with_trailing_bytes(TrailingBytes::Ignore));
    registry.register(COUNTER_PROGRAM_ID, idl_coder);

    let mut data = COUNTER_TAG.to_vec();
    data.extend_from_slice(&5u64.to_le_bytes());
    data.push(0);

    let coder = registry.build(&COUNTER_PROGRAM_ID, &counter_idl()).unwrap();
    assert!(coder.accounts().decode(&data).is_ok());
}

#[test]
fn test_unknown_program() {
    let registry = CoderRegistry::with_builtin();
    let err = registry
        .build(&COUNTER_PROGRAM_ID, &counter_idl())
        .err()
        .unwrap();
    assert_eq!(err, CoderError::UnknownProgram(COUNTER_PROGRAM_ID));
    assert_eq!(err.kind(), ErrorKind::UnknownProgram);
    assert!(err.to_string().contains(&COUNTER_PROGRAM_ID.to_string()));
}

#[test]
fn test_builtin_program_ids() {
    let registry = CoderRegistry::with_builtin();
    let mut expected = vec![programs::spl_record::ID, programs::spl_feature_proposal::ID];
    expected.sort();
    assert_eq!(registry.program_ids(), expected);

    let idl = programs::spl_record::idl().unwrap();
    let coder = registry.build_for_idl(&idl).unwrap();
    assert_eq!(coder.name(), "spl_record");
}
