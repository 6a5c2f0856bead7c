//! Record identifier generation

use uuid::Uuid;

/// Length of a generated record identifier
pub const ID_LEN: usize = 8;

/// Generate a short record identifier: the first 8 characters of a random
/// v4 UUID in its hyphenated form.
///
/// Truncation leaves 32 bits of entropy, so collisions become likely around
/// tens of thousands of records per collection. A colliding insert fails on
/// the primary key rather than overwriting.
pub fn generate_id() -> String {
    let mut id = Uuid::new_v4().hyphenated().to_string();
    id.truncate(ID_LEN);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_shape() {
        let id = generate_id();
        assert_eq!(id.len(), ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_ids_are_distinct() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
