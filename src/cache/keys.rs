//! Cache key scheme.
//!
//! Keys are derived from store-assigned ids so a mutation can invalidate
//! its entry without consulting the cache's contents.

/// Key for a single item snapshot.
pub fn item_key(id: i64) -> String {
    format!("item_{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_keys_embed_the_id() {
        assert_eq!(item_key(1), "item_1");
        assert_eq!(item_key(999), "item_999");
    }

    #[test]
    fn distinct_ids_never_collide() {
        assert_ne!(item_key(1), item_key(11));
    }
}
