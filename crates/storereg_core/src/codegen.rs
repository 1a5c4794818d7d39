use rand::Rng;

/// 26 uppercase letters + 10 digits, matching what staff read out over the
/// phone without ambiguity complaints so far.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const DEFAULT_CODE_LENGTH: usize = 8;

/// Uniqueness-collision retry budget for code issuance. At length 8 over a
/// 36-symbol alphabet collisions are negligible; the cap exists so a nearly
/// saturated short-code space fails loudly instead of spinning.
pub const MAX_ISSUE_ATTEMPTS: u32 = 32;

/// Produces a candidate code of `length` symbols drawn uniformly from the
/// alphabet. Uniqueness against already-issued codes is the caller's job.
pub fn generate(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generates_requested_length() {
        for length in [1, 8, 24, 64] {
            assert_eq!(generate(length).len(), length);
        }
    }

    #[test]
    fn stays_within_alphabet() {
        let code = generate(256);
        assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn long_candidates_do_not_collide() {
        // 36^24 candidate space; 100 draws colliding would indicate a
        // broken RNG, not bad luck.
        let codes: HashSet<String> = (0..100).map(|_| generate(24)).collect();
        assert_eq!(codes.len(), 100);
    }

    #[test]
    fn zero_length_yields_empty_string() {
        assert_eq!(generate(0), "");
    }
}
