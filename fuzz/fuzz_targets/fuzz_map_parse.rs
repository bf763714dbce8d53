#![no_main]

//! Map text fuzzer.
//!
//! Any input either fails to parse or parses into a map that prints
//! back to text parsing to the same map.

use anthill::MapText;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(map) = MapText::parse(text) else {
        return;
    };
    let printed = map.to_string();
    let again = MapText::parse(&printed).expect("printed map must parse");
    assert_eq!(map, again);
});
