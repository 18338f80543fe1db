#![no_main]

use libfuzzer_sys::fuzz_target;
use nskv::{NskvError, TokenConfig, TokenManager};

fuzz_target!(|data: &[u8]| {
    // Presented tokens are attacker-controlled. Anything that is not a token
    // we signed ourselves must be rejected as missing or invalid.
    let manager = TokenManager::new(TokenConfig::new(vec![0x5a; 32])).unwrap();
    if let Ok(text) = std::str::from_utf8(data) {
        match manager.verify_token(Some(text)) {
            Ok(_) | Err(NskvError::MissingToken) | Err(NskvError::InvalidToken) => {}
            Err(other) => panic!("unexpected error kind: {other}"),
        }
    }
});
