//! Small helpers shared across handlers and services

use uuid::Uuid;

/// Builds a human-facing reference code: prefix + 8 uppercase hex chars
/// drawn from a fresh UUIDv4. Codes are unique-indexed in the schema,
/// so a (vanishingly unlikely) collision surfaces as a database error
/// rather than a silent overwrite.
///
/// Prefixes in use: `BK` booking, `TK` ticket, `PAY` payment,
/// `REF` refund, `INV` invoice, `FO` food order.
pub fn generate_code(prefix: &str) -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("{}{}", prefix, raw[..8].to_uppercase())
}

/// Clamps a requested page size to the configured maximum, substituting
/// the default when the caller asks for zero.
pub fn clamp_page_size(requested: u64, default: u64, max: u64) -> u64 {
    if requested == 0 {
        default
    } else {
        requested.min(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_shape() {
        let code = generate_code("BK");
        assert!(code.starts_with("BK"));
        assert_eq!(code.len(), 10);
        assert!(code[2..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn codes_are_not_repeated_in_practice() {
        let a = generate_code("PAY");
        let b = generate_code("PAY");
        assert_ne!(a, b);
    }

    #[test]
    fn page_size_clamping() {
        assert_eq!(clamp_page_size(0, 20, 100), 20);
        assert_eq!(clamp_page_size(50, 20, 100), 50);
        assert_eq!(clamp_page_size(500, 20, 100), 100);
    }
}
