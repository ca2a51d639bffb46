#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let grips: Result<Vec<_>, _> = gpg_hwsign::iter_keygrips(data).collect();

    // in a well formed export every keygrip can be loaded again
    if let Ok(grips) = grips {
        for grip in grips {
            let found = gpg_hwsign::load_by_keygrip(data, grip.as_bytes());
            assert!(found.is_ok());
        }
    }
});
