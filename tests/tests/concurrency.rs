use std::sync::Arc;

use idl_coder::{AccountsCoder, Coder, CoderRegistry, InstructionCoder, ProgramCoder, Value};
use idl_coder_tests::{counter_idl, COUNTER_PROGRAM_ID, COUNTER_TAG};

#[test]
fn test_shared_coder_across_threads() {
    let coder = Arc::new(ProgramCoder::new(&counter_idl()).unwrap());

    std::thread::scope(|s| {
        for i in 0..8u64 {
            let coder = Arc::clone(&coder);
            s.spawn(move || {
                for n in 0..100u64 {
                    let count = i * 1000 + n;
                    let value = Value::structure([("count", Value::from(count))]);
                    let bytes = coder.accounts().encode("Counter", &value).unwrap();
                    assert_eq!(&bytes[..8], &COUNTER_TAG);
                    assert_eq!(coder.accounts().decode(&bytes).unwrap().value, value);

                    let args = Value::structure([("value", Value::from(count))]);
                    let data = coder.instruction().encode("set", &args).unwrap();
                    assert_eq!(coder.instruction().decode(&data).unwrap().value, args);
                }
            });
        }
    });
}

#[test]
fn test_registry_builds_independent_coders() {
    let mut registry = CoderRegistry::new();
    registry.register(COUNTER_PROGRAM_ID, idl_coder::idl_coder);
    let idl = counter_idl();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(|| {
                    registry
                        .build(&COUNTER_PROGRAM_ID, &idl)
                        .map(|coder| coder.name().to_string())
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), "counter");
        }
    });
}
