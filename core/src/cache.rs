use crate::block::{BlockIndex, BLOCK_SIZE, load_raw, save_raw};
use std::io::{Read, Seek, Write};

/** Forces a cache slot to flush after this many dirty writes */
pub const CACHE_MAX_WRITES: u32 = 5;
/** Total cache capacity in bytes */
pub const CACHE_MAX_BYTES: usize = 1024 * 1024;

fn slot_count() -> usize {
    CACHE_MAX_BYTES / BLOCK_SIZE
}

struct Slot {
    address: BlockIndex,
    data: [u8; BLOCK_SIZE],
    dirty_writes: u32,
    valid: bool,
}

impl Default for Slot {
    fn default() -> Self {
        Slot {
            address: 0,
            data: [0u8; BLOCK_SIZE],
            dirty_writes: 0,
            valid: false,
        }
    }
}

/** Direct-mapped write-back cache for blocks 1..=max_size (block 0, the superblock, is never cached) */
pub struct BlockCache {
    slots: Vec<Slot>,
}

impl BlockCache {
    pub fn new() -> Self {
        BlockCache {
            slots: (0..slot_count()).map(|_| Slot::default()).collect(),
        }
    }

    fn slot_for(&self, address: BlockIndex) -> usize {
        (address as usize - 1) % self.slots.len()
    }

    pub fn get<D>(&mut self, device: &mut D, address: BlockIndex) -> std::io::Result<[u8; BLOCK_SIZE]>
    where
        D: Read + Write + Seek,
    {
        let idx = self.slot_for(address);
        if self.slots[idx].valid && self.slots[idx].address == address {
            return Ok(self.slots[idx].data);
        }
        if self.slots[idx].valid {
            self.writethrough(device, idx)?;
        }
        let data = load_raw(device, address)?;
        self.slots[idx] = Slot {
            address,
            data,
            dirty_writes: 0,
            valid: true,
        };
        Ok(data)
    }

    pub fn put<D>(
        &mut self,
        device: &mut D,
        address: BlockIndex,
        data: [u8; BLOCK_SIZE],
    ) -> std::io::Result<()>
    where
        D: Read + Write + Seek,
    {
        let idx = self.slot_for(address);
        if self.slots[idx].valid && self.slots[idx].address != address {
            self.writethrough(device, idx)?;
        }
        let writes = if self.slots[idx].valid && self.slots[idx].address == address {
            self.slots[idx].dirty_writes + 1
        } else {
            1
        };
        self.slots[idx] = Slot {
            address,
            data,
            dirty_writes: writes,
            valid: true,
        };
        if writes >= CACHE_MAX_WRITES {
            self.writethrough(device, idx)?;
        }
        Ok(())
    }

    fn writethrough<D>(&mut self, device: &mut D, idx: usize) -> std::io::Result<()>
    where
        D: Read + Write + Seek,
    {
        let slot = &mut self.slots[idx];
        if slot.valid {
            save_raw(device, slot.address, &slot.data)?;
            slot.dirty_writes = 0;
        }
        Ok(())
    }

    /** Write every dirty slot back; `clear` additionally invalidates the cache */
    pub fn flush<D>(&mut self, device: &mut D, clear: bool) -> std::io::Result<()>
    where
        D: Read + Write + Seek,
    {
        for idx in 0..self.slots.len() {
            self.writethrough(device, idx)?;
            if clear {
                self.slots[idx].valid = false;
            }
        }
        Ok(())
    }
}

impl Default for BlockCache {
    fn default() -> Self {
        Self::new()
    }
}
