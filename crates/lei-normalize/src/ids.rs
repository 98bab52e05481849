//! Derived entity identifiers.

use lei_common::optional_string_values;
use lei_model::ENTITY_ID_COLUMN;
use polars::prelude::{DataFrame, NamedFrom, Series};
use sha2::{Digest, Sha256};

use crate::error::Result;

const ENTITY_ID_LEN: usize = 16;

/// First 16 lowercase hex characters of the SHA-256 digest of `lei`.
pub fn entity_id(lei: &str) -> String {
    let digest = Sha256::digest(lei.as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(ENTITY_ID_LEN);
    id
}

/// Appends the `entity_id` column derived from `lei`.
pub fn append_entity_ids(df: &DataFrame) -> Result<DataFrame> {
    let ids: Vec<Option<String>> = optional_string_values(df, "lei")
        .unwrap_or_else(|| vec![None; df.height()])
        .iter()
        .map(|lei| lei.as_deref().map(entity_id))
        .collect();
    let mut out = df.clone();
    out.with_column(Series::new(ENTITY_ID_COLUMN.into(), ids))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_is_stable_prefix() {
        let id = entity_id("5493001KJTIIGC8Y1R12");
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(id, entity_id("5493001KJTIIGC8Y1R12"));
        assert_ne!(id, entity_id("213800D1EI4B9WTWWD28"));
    }

    #[test]
    fn test_entity_id_known_digest() {
        // sha256("abc") = ba7816bf8f01cfea...
        assert_eq!(entity_id("abc"), "ba7816bf8f01cfea");
    }
}
