//! A single-file, block-structured B+tree storage engine for a
//! semantic (tag-based) filesystem: a fixed-size-block container with
//! a superblock, a free-block list, and B+trees keyed by short
//! fixed-width strings whose leaves point at data blocks that in turn
//! anchor nested B+trees of subkeys.

pub mod block;
mod btree;
mod cache;
mod data;
mod engine;
mod error;
mod free;
mod key;
mod node;
mod superblock;

pub use block::{Block, BlockIndex, BLOCK_SIZE, DEFAULT_BLOCKS};
pub use cache::{CACHE_MAX_BYTES, CACHE_MAX_WRITES};
pub use data::{DataBlock, DATA_FLAGS_SYNONYM, INODECOUNT};
pub use engine::{Engine, EngineOptions};
pub use error::{Error, Result};
pub use key::{Key, KEY_SIZE};
pub use node::{TreeNode, ORDER};

/** Block index denoting "the top-level tree" when passed as a tree root to [`Engine`] operations */
pub const TOP_LEVEL: BlockIndex = 0;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn fresh() -> Engine<Cursor<Vec<u8>>> {
        let device = Cursor::new(Vec::new());
        Engine::format(device, EngineOptions::default()).unwrap()
    }

    #[test]
    fn fresh_container_has_no_keys() {
        let mut engine = fresh();
        assert_eq!(engine.root(), 1);
        assert_eq!(engine.max_size(), DEFAULT_BLOCKS - 1);
        assert!(matches!(
            engine.search(TOP_LEVEL, &Key::new("anything")),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn insert_then_search_roundtrips() {
        let mut engine = fresh();
        let key = Key::new("hello");
        let idx = engine.insert(TOP_LEVEL, &key, DataBlock::default()).unwrap();
        assert_eq!(engine.search(TOP_LEVEL, &key).unwrap(), idx);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut engine = fresh();
        let key = Key::new("dup");
        engine.insert(TOP_LEVEL, &key, DataBlock::default()).unwrap();
        assert!(matches!(
            engine.insert(TOP_LEVEL, &key, DataBlock::default()),
            Err(Error::AlreadyExists)
        ));
    }

    #[test]
    fn insert_remove_then_not_found() {
        let mut engine = fresh();
        let key = Key::new("transient");
        engine.insert(TOP_LEVEL, &key, DataBlock::default()).unwrap();
        engine.remove(TOP_LEVEL, &key).unwrap();
        assert!(matches!(
            engine.search(TOP_LEVEL, &key),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn removing_absent_key_is_not_found() {
        let mut engine = fresh();
        assert!(matches!(
            engine.remove(TOP_LEVEL, &Key::new("nope")),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn split_at_branching_factor() {
        let mut engine = fresh();
        for i in 0..ORDER {
            let key = Key::new(&format!("k{i:03}"));
            engine.insert(TOP_LEVEL, &key, DataBlock::default()).unwrap();
        }
        let root = engine.root();
        assert_ne!(root, 1, "root should have split into a new internal node");
        assert_eq!(engine.count_keys(TOP_LEVEL).unwrap(), ORDER as u64);
    }

    #[test]
    fn ordered_traversal_matches_insert_order_permutation() {
        let mut engine = fresh();
        let inserted = ["delta", "alpha", "charlie", "bravo", "echo"];
        for k in inserted {
            engine.insert(TOP_LEVEL, &Key::new(k), DataBlock::default()).unwrap();
        }
        let mut sorted = inserted.to_vec();
        sorted.sort();

        let (mut index, leaf) = engine.min(TOP_LEVEL).unwrap().unwrap();
        let mut seen = Vec::new();
        let mut leaf = leaf;
        loop {
            for i in 0..leaf.keycount as usize {
                seen.push(leaf.keys[i].as_str().into_owned());
            }
            if leaf.ptrs[0] == 0 {
                break;
            }
            index = leaf.ptrs[0];
            leaf = engine.read_node(index).unwrap();
        }
        let _ = index;
        assert_eq!(seen, sorted);
    }

    #[test]
    fn merge_on_underflow_collapses_root() {
        let mut engine = fresh();
        let keys: Vec<Key> = (0..ORDER).map(|i| Key::new(&format!("k{i:03}"))).collect();
        for k in &keys {
            engine.insert(TOP_LEVEL, k, DataBlock::default()).unwrap();
        }
        assert_ne!(engine.root(), 1);
        // Remove all but one key; tree should collapse back to a single leaf.
        for k in &keys[1..] {
            engine.remove(TOP_LEVEL, k).unwrap();
        }
        let root = engine.read_node(engine.root()).unwrap();
        assert!(root.leaf);
        assert_eq!(root.keycount, 1);
    }

    #[test]
    fn nested_subkey_tree_is_isolated_from_top_level() {
        let mut engine = fresh();
        let parent = Key::new("tag");
        let parent_idx = engine.insert(TOP_LEVEL, &parent, DataBlock::default()).unwrap();

        let child = Key::new("child");
        engine.insert(parent_idx, &child, DataBlock::default()).unwrap();

        assert!(engine.search(parent_idx, &child).is_ok());
        assert!(matches!(
            engine.search(TOP_LEVEL, &child),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn free_list_head_restored_after_insert_remove() {
        let mut engine = fresh();
        let before = engine.sb.free_head;
        let key = Key::new("roundtrip");
        engine.insert(TOP_LEVEL, &key, DataBlock::default()).unwrap();
        engine.remove(TOP_LEVEL, &key).unwrap();
        assert_eq!(engine.sb.free_head, before);
    }

    #[test]
    fn grow_refuses_to_shrink() {
        let mut engine = fresh();
        let max = engine.max_size();
        assert!(matches!(
            engine.grow(max - 1),
            Err(Error::InvalidArgument(_))
        ));
        engine.grow(max).unwrap();
        assert_eq!(engine.max_size(), max);
    }

    #[test]
    fn grow_extends_free_list() {
        let mut engine = fresh();
        let max = engine.max_size();
        engine.grow(max + 64).unwrap();
        assert_eq!(engine.max_size(), max + 64);
        // The newly grown blocks must be usable by the allocator.
        for i in 0..64 {
            engine
                .insert(TOP_LEVEL, &Key::new(&format!("grown{i}")), DataBlock::default())
                .unwrap();
        }
    }
}
