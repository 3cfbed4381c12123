#![no_main]
use flipper::chess::position::Position;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(position) = Position::try_from(s) {
            let printed = position.to_string();
            assert_eq!(Position::try_from(printed.as_str()).unwrap(), position);
        }
    }
});
