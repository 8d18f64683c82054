//! Property tests for the object store and codecs.
//!
//! These pin the invariants the rest of the crate leans on: storage is
//! content-addressed and idempotent, and the tree/commit codecs are exact
//! inverses over their valid input space.

use proptest::prelude::*;
use tempfile::TempDir;

use vellum::codec::commit::{decode_commit, encode_commit, Commit};
use vellum::codec::tree::{decode_tree, encode_tree, TreeEntry};
use vellum::core::types::{ObjectType, Oid};
use vellum::store::ObjectStore;

fn oid_strategy() -> impl Strategy<Value = Oid> {
    "[0-9a-f]{40}".prop_map(|s| Oid::new(s).unwrap())
}

/// Entry names: no '/', no leading '.', no newline.
fn name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_][a-zA-Z0-9._-]{0,15}"
}

proptest! {
    #[test]
    fn object_store_roundtrips_any_payload(payload in prop::collection::vec(any::<u8>(), 0..1024)) {
        let dir = TempDir::new().unwrap();
        let store = ObjectStore::new(dir.path().to_path_buf());

        let oid = store.put(&payload, ObjectType::Blob).unwrap();
        prop_assert_eq!(store.get(&oid, Some(ObjectType::Blob)).unwrap(), payload.clone());

        // Storing the same payload again is a no-op with the same id.
        let again = store.put(&payload, ObjectType::Blob).unwrap();
        prop_assert_eq!(oid, again);
    }

    #[test]
    fn object_id_tracks_payload_only(payload in prop::collection::vec(any::<u8>(), 0..256)) {
        // The id is independent of the type tag in the stored record.
        prop_assert_eq!(
            Oid::for_bytes(&payload).as_str().len(),
            Oid::HEX_LEN
        );
        let dir = TempDir::new().unwrap();
        let store = ObjectStore::new(dir.path().to_path_buf());
        let stored = store.put(&payload, ObjectType::Blob).unwrap();
        prop_assert_eq!(stored, Oid::for_bytes(&payload));
    }

    #[test]
    fn tree_codec_roundtrips(
        entries in prop::collection::btree_map(name_strategy(), oid_strategy(), 0..16)
    ) {
        let input: Vec<TreeEntry> = entries
            .iter()
            .map(|(name, oid)| TreeEntry::new(name.clone(), oid.clone(), ObjectType::Blob))
            .collect();

        let decoded = decode_tree(&encode_tree(&input)).unwrap();
        prop_assert_eq!(decoded.len(), input.len());
        // Encoding sorts by name; a BTreeMap input is already sorted, so the
        // decode is position-for-position identical.
        for (entry, (name, oid)) in decoded.iter().zip(entries.iter()) {
            prop_assert_eq!(&entry.name, name);
            prop_assert_eq!(&entry.oid, oid);
        }
    }

    #[test]
    fn tree_encoding_is_order_independent(
        entries in prop::collection::btree_map(name_strategy(), oid_strategy(), 1..8)
    ) {
        let sorted: Vec<TreeEntry> = entries
            .iter()
            .map(|(name, oid)| TreeEntry::new(name.clone(), oid.clone(), ObjectType::Blob))
            .collect();
        let mut reversed = sorted.clone();
        reversed.reverse();
        prop_assert_eq!(encode_tree(&sorted), encode_tree(&reversed));
    }

    #[test]
    fn commit_codec_roundtrips(
        tree in oid_strategy(),
        parents in prop::collection::vec(oid_strategy(), 0..3),
        message in any::<String>()
    ) {
        let commit = Commit { tree, parents, message };
        let decoded = decode_commit(&encode_commit(&commit)).unwrap();
        prop_assert_eq!(decoded, commit);
    }
}
