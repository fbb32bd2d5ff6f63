#![no_main]
use libfuzzer_sys::fuzz_target;

use rv_asm::SubsetList;

fuzz_target!(|data: &str| {
    let Ok((xlen, list)) = SubsetList::parse_default(data) else {
        return;
    };
    // A canonical string must parse back to the same list.
    let canon = list.arch_string(xlen);
    let (xlen2, again) = SubsetList::parse_default(&canon).expect("canonical string rejected");
    assert_eq!(xlen, xlen2);
    assert_eq!(list, again);
});
