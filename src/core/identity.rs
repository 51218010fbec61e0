//! Generation of opaque identifiers: room codes and player tokens
//!
//! Both identifiers are capabilities (knowing one is what authorizes
//! acting on it), so they are drawn from the OS CSPRNG.

use rand::rngs::OsRng;
use rand::{Rng, RngCore};

use crate::constants::{PLAYER_TOKEN_BYTES, ROOM_CODE_LEN};

const ROOM_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Mints room codes and player tokens
pub struct IdentityGenerator;

impl IdentityGenerator {
    /// Generate a 6-character room code using 0-9 and A-Z
    pub fn room_code() -> String {
        let mut rng = OsRng;
        (0..ROOM_CODE_LEN)
            .map(|_| ROOM_CODE_CHARSET[rng.gen_range(0..ROOM_CODE_CHARSET.len())] as char)
            .collect()
    }

    /// Generate an unguessable player token (lowercase hex)
    pub fn player_token() -> String {
        let mut bytes = [0u8; PLAYER_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_room_code_shape() {
        let code = IdentityGenerator::room_code();
        assert_eq!(code.len(), ROOM_CODE_LEN);
        assert!(code
            .bytes()
            .all(|b| ROOM_CODE_CHARSET.contains(&b)));
    }

    #[test]
    fn test_player_token_shape() {
        let token = IdentityGenerator::player_token();
        assert_eq!(token.len(), PLAYER_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_player_tokens_unique() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(IdentityGenerator::player_token()));
        }
    }

    #[test]
    fn test_room_codes_spread() {
        // 36^6 codes: 10k draws colliding more than a handful of times
        // would indicate a broken generator
        let mut seen = HashSet::new();
        let mut collisions = 0;
        for _ in 0..10_000 {
            if !seen.insert(IdentityGenerator::room_code()) {
                collisions += 1;
            }
        }
        assert!(collisions < 5, "too many collisions: {}", collisions);
    }
}
