use crate::block::{Block, BlockIndex, BLOCK_SIZE, MAGIC_DATANODE, read_i16, read_u32, write_i16, write_u32};
use crate::error::Error;

/** Maximum number of inode references held directly in one data block */
pub const INODECOUNT: usize = (BLOCK_SIZE - HEADER_SIZE - 4) / 4;

const HEADER_SIZE: usize = 4 + 2 + 2 + 4;
const PAYLOAD_OFFSET: usize = HEADER_SIZE;
const NEXT_INODES_OFFSET: usize = PAYLOAD_OFFSET + INODECOUNT * 4;

/** If set, `subkeys` names a synonym target rather than a subtree root */
pub const DATA_FLAGS_SYNONYM: i16 = 0x01;

/**
 * A data block anchors the per-key payload: the inode references
 * associated with a key, and the root of that key's nested subkey
 * tree (or, for a synonym, the target it aliases).
 */
#[derive(Debug, Clone)]
pub struct DataBlock {
    /** Number of inodes related to this key, not necessarily all in this block */
    pub inodecount: i16,
    pub flags: i16,
    /** Root of the subkeys tree, or synonym target address if `flags & DATA_FLAGS_SYNONYM` */
    pub subkeys: BlockIndex,
    pub inodes: [BlockIndex; INODECOUNT],
    /** Address of the next block of inodes, or 0 if none */
    pub next_inodes: BlockIndex,
}

impl Default for DataBlock {
    fn default() -> Self {
        DataBlock {
            inodecount: 0,
            flags: 0,
            subkeys: 0,
            inodes: [0; INODECOUNT],
            next_inodes: 0,
        }
    }
}

impl DataBlock {
    pub fn is_synonym(&self) -> bool {
        self.flags & DATA_FLAGS_SYNONYM != 0
    }
}

impl Block for DataBlock {
    const MAGIC: u32 = MAGIC_DATANODE;

    fn load(bytes: &[u8; BLOCK_SIZE]) -> Result<Self, Error> {
        let magic = read_u32(bytes, 0);
        if magic != Self::MAGIC {
            return Err(Error::Corruption(format!("bad data block magic: {magic:#x}")));
        }
        let inodecount = read_i16(bytes, 4);
        let flags = read_i16(bytes, 6);
        let subkeys = read_u32(bytes, 8);
        let mut inodes = [0 as BlockIndex; INODECOUNT];
        for (i, v) in inodes.iter_mut().enumerate() {
            *v = read_u32(bytes, PAYLOAD_OFFSET + i * 4);
        }
        let next_inodes = read_u32(bytes, NEXT_INODES_OFFSET);
        Ok(DataBlock {
            inodecount,
            flags,
            subkeys,
            inodes,
            next_inodes,
        })
    }

    fn dump(&self) -> [u8; BLOCK_SIZE] {
        let mut buf = [0u8; BLOCK_SIZE];
        write_u32(&mut buf, 0, Self::MAGIC);
        write_i16(&mut buf, 4, self.inodecount);
        write_i16(&mut buf, 6, self.flags);
        write_u32(&mut buf, 8, self.subkeys);
        for (i, v) in self.inodes.iter().enumerate() {
            write_u32(&mut buf, PAYLOAD_OFFSET + i * 4, *v);
        }
        write_u32(&mut buf, NEXT_INODES_OFFSET, self.next_inodes);
        buf
    }
}
