#![no_main]

use guardiq_store::VerificationLogEntry;
use libfuzzer_sys::fuzz_target;

// Stored log values are bincode; corrupt bytes must decode to an error,
// and anything that decodes must survive another encode/decode pass.
fuzz_target!(|data: &[u8]| {
    let Ok(entry) = bincode::deserialize::<VerificationLogEntry>(data) else {
        return;
    };
    let encoded = bincode::serialize(&entry).expect("decoded entry re-encodes");
    let again: VerificationLogEntry =
        bincode::deserialize(&encoded).expect("re-encoded entry decodes");
    assert_eq!(again, entry);
});
