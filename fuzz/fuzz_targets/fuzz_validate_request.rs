#![no_main]

use guardiq_verification::{Classifier, RequestValidator, TierClassifier};
use libfuzzer_sys::fuzz_target;

// Arbitrary request bodies must never panic the validator, and anything it
// accepts must be fully normalized.
fuzz_target!(|data: &[u8]| {
    let raw = serde_json::from_slice(data).unwrap_or(serde_json::Value::Null);
    let Ok(request) = RequestValidator::validate(&raw) else {
        return;
    };

    assert!(RequestValidator::is_valid_email(&request.email));
    assert_eq!(request.email, request.email.trim().to_lowercase());

    let verdict = TierClassifier.classify(request.role, request.platform, request.followers);
    assert_eq!(verdict, request.followers >= TierClassifier::threshold(request.role));
});
