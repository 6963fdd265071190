#![no_main]

use libfuzzer_sys::fuzz_target;
use plusmaze::paired::build_paired_samples;
use plusmaze::records::build_long_records;
use plusmaze::table::WideTable;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parse errors are fine, panics are not
        if let Ok(table) = WideTable::from_csv_str(input) {
            if let Ok(records) = build_long_records(&table) {
                let _ = build_paired_samples(&records.measurements);
            }
        }
    }
});
