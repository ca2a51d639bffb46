#![no_main]

use gpg_hwsign::packet::PacketParser;
use gpg_hwsign::ser::Serialize;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    for packet in PacketParser::new(data.to_vec()) {
        match packet {
            Err(_) => return,
            Ok(packet) => {
                // anything that parses must serialize again
                let _ = packet.to_bytes();
                if let Some(key) = packet.as_key() {
                    let _ = key.fingerprint();
                }
            }
        }
    }
});
