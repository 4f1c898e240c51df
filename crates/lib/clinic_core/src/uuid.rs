// Record identifiers are UUIDv7 so primary keys sort by creation time.
// Postgres cannot generate v7 itself, so every insert binds one from here.

use uuid::Uuid;

/// Generate a new UUIDv7.
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuidv7_is_valid() {
        let id = uuidv7();
        assert_eq!(id.get_version(), Some(uuid::Version::SortRand));
    }

    #[test]
    fn later_ids_sort_after_earlier_ones() {
        let a = uuidv7();
        let b = uuidv7();
        assert!(b >= a);
    }
}
