#![no_main]

use libfuzzer_sys::fuzz_target;
use plusmaze::column::resolve_column_identity;

fuzz_target!(|data: &[u8]| {
    if let Ok(name) = std::str::from_utf8(data) {
        // Must not panic; a resolved identity always has a subject
        if let Some(id) = resolve_column_identity(name) {
            assert!(!id.subject.is_empty());
        }
    }
});
