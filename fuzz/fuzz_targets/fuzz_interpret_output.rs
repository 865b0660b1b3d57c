#![no_main]
use libfuzzer_sys::fuzz_target;
use sequent_provers::backends::{EproverBackend, Prover9Backend};
use sequent_provers::RawProverResult;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Output interpretation must never panic, whatever a prover prints.
        let raw = RawProverResult {
            exit_code: Some(0),
            stdout: s.to_string(),
            stderr: String::new(),
            timed_out: false,
            duration: std::time::Duration::from_millis(1),
        };
        let _ = Prover9Backend::interpret(&raw);
        let _ = EproverBackend::interpret(&raw);
    }
});
