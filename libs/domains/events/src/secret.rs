//! Deletion secrets: 4 bytes from the thread-local CSPRNG as 8 lowercase hex chars.

pub const SECRET_BYTES: usize = 4;

pub fn generate_secret() -> String {
    (0..SECRET_BYTES)
        .map(|_| format!("{:02x}", rand::random::<u8>()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_eight_lowercase_hex() {
        let secret = generate_secret();
        assert_eq!(secret.len(), SECRET_BYTES * 2);
        assert!(
            secret
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn test_secrets_differ() {
        let secrets: std::collections::HashSet<_> = (0..32).map(|_| generate_secret()).collect();
        assert!(secrets.len() > 1);
    }
}
