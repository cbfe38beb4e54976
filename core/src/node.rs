use crate::block::{Block, BlockIndex, BLOCK_SIZE, MAGIC_TREENODE, read_u16, read_u32, write_u16, write_u32};
use crate::error::Error;
use crate::key::{Key, KEY_SIZE};

/** Order of the tree: number of child pointers an internal node may hold */
pub const ORDER: usize = (BLOCK_SIZE - 2 * 2) / (4 + KEY_SIZE) + 1;

const HEADER_SIZE: usize = 4 + 2 + 2;
const PTRS_OFFSET: usize = HEADER_SIZE;
const KEYS_OFFSET: usize = PTRS_OFFSET + ORDER * 4;

/**
 * An internal or leaf node of a B+tree.
 *
 * A leaf's `ptrs[0]` is the forward-sibling link used for ordered
 * traversal; its `ptrs[1..=keycount]` point at data blocks. An
 * internal node's `ptrs[0..=keycount]` point at child tree nodes.
 */
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub leaf: bool,
    pub keycount: u16,
    pub ptrs: [BlockIndex; ORDER],
    pub keys: [Key; ORDER - 1],
}

impl Default for TreeNode {
    fn default() -> Self {
        TreeNode {
            leaf: true,
            keycount: 0,
            ptrs: [0; ORDER],
            keys: std::array::from_fn(|_| Key::default()),
        }
    }
}

impl TreeNode {
    pub fn new_leaf() -> Self {
        TreeNode::default()
    }

    pub fn new_internal() -> Self {
        TreeNode {
            leaf: false,
            ..Default::default()
        }
    }

    /** Smallest index `i` such that `keys[i] > key`, scanning only the first `keycount` keys */
    pub fn upper_bound(&self, key: &Key) -> usize {
        let keys = &self.keys[..self.keycount as usize];
        keys.partition_point(|k| k <= key)
    }
}

impl Block for TreeNode {
    const MAGIC: u32 = MAGIC_TREENODE;

    fn load(bytes: &[u8; BLOCK_SIZE]) -> Result<Self, Error> {
        let magic = read_u32(bytes, 0);
        if magic != Self::MAGIC {
            return Err(Error::Corruption(format!("bad tree node magic: {magic:#x}")));
        }
        let leaf = read_u16(bytes, 4) != 0;
        let keycount = read_u16(bytes, 6);
        let mut ptrs = [0 as BlockIndex; ORDER];
        for (i, p) in ptrs.iter_mut().enumerate() {
            *p = read_u32(bytes, PTRS_OFFSET + i * 4);
        }
        let mut keys: [Key; ORDER - 1] = std::array::from_fn(|_| Key::default());
        for (i, k) in keys.iter_mut().enumerate() {
            let off = KEYS_OFFSET + i * KEY_SIZE;
            let mut kb = [0u8; KEY_SIZE];
            kb.copy_from_slice(&bytes[off..off + KEY_SIZE]);
            *k = Key::from_bytes(kb);
        }
        Ok(TreeNode {
            leaf,
            keycount,
            ptrs,
            keys,
        })
    }

    fn dump(&self) -> [u8; BLOCK_SIZE] {
        let mut buf = [0u8; BLOCK_SIZE];
        write_u32(&mut buf, 0, Self::MAGIC);
        write_u16(&mut buf, 4, self.leaf as u16);
        write_u16(&mut buf, 6, self.keycount);
        for (i, p) in self.ptrs.iter().enumerate() {
            write_u32(&mut buf, PTRS_OFFSET + i * 4, *p);
        }
        for (i, k) in self.keys.iter().enumerate() {
            let off = KEYS_OFFSET + i * KEY_SIZE;
            buf[off..off + KEY_SIZE].copy_from_slice(&k.0);
        }
        buf
    }
}
