#![no_main]
use libfuzzer_sys::fuzz_target;

use rv_asm::{AssemblerSession, CollectingSink, SessionConfig};

fuzz_target!(|data: &str| {
    // Both widths, with and without compressed forms.
    for arch in ["rv32imac", "rv64gc", "rv32e"] {
        let _ = rv_asm::assemble(data, arch);
    }

    let Ok(mut session) = AssemblerSession::new(&SessionConfig::new("rv64gc")) else {
        return;
    };
    let mut sink = CollectingSink::new();
    if session.assemble(data, &mut sink).is_err() {
        return;
    }
    let _ = session.finish();
});
