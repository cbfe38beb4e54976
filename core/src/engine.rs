use crate::block::{Block, BlockIndex, BLOCK_SIZE, DEFAULT_BLOCKS};
use crate::cache::BlockCache;
use crate::data::DataBlock;
use crate::error::{Error, Result};
use crate::free::FreeBlock;
use crate::node::TreeNode;
use crate::superblock::SuperBlock;
use std::io::{Read, Seek, Write};
use std::path::Path;

/** Run-time options controlling how an [`Engine`] uses its backing device */
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    /** Enable the write-back block cache */
    pub cache: bool,
}

/**
 * The storage engine: owns the backing device, the in-memory
 * superblock, and (optionally) a write-back block cache.
 */
pub struct Engine<D> {
    device: D,
    pub(crate) sb: SuperBlock,
    cache: Option<BlockCache>,
}

impl<D> Engine<D>
where
    D: Read + Write + Seek,
{
    /** Format a fresh container on `device`, discarding any existing content */
    pub fn format(mut device: D, options: EngineOptions) -> Result<Self> {
        let max_size = DEFAULT_BLOCKS - 1;
        let root = TreeNode::new_leaf();
        root.sync(&mut device, 1)?;

        // Thread blocks 2..=max_size into the free list, terminating at 0.
        let mut next = 0;
        for index in (2..=max_size).rev() {
            let block = FreeBlock { next };
            block.sync(&mut device, index)?;
            next = index;
        }

        let sb = SuperBlock {
            version: crate::superblock::TREE_FILE_VERSION,
            root_index: 1,
            max_size,
            free_head: if max_size >= 2 { 2 } else { 0 },
        };
        sb.sync(&mut device, 0)?;

        Ok(Engine {
            device,
            sb,
            cache: options.cache.then(BlockCache::new),
        })
    }

    /** Open a device that already holds a valid container */
    pub fn open(mut device: D, options: EngineOptions) -> Result<Self> {
        let sb = SuperBlock::load_block(&mut device, 0)?;
        Ok(Engine {
            device,
            sb,
            cache: options.cache.then(BlockCache::new),
        })
    }

    pub fn close(mut self) -> Result<D> {
        if let Some(cache) = &mut self.cache {
            cache.flush(&mut self.device, true)?;
        }
        Ok(self.device)
    }

    pub fn root(&self) -> BlockIndex {
        self.sb.root_index
    }

    pub fn max_size(&self) -> BlockIndex {
        self.sb.max_size
    }

    pub fn version(&self) -> u16 {
        self.sb.version
    }

    pub fn free_head(&self) -> BlockIndex {
        self.sb.free_head
    }

    /** Walk the free list and count its blocks */
    pub fn free_list_len(&mut self) -> Result<u64> {
        let mut count = 0;
        let mut next = self.sb.free_head;
        while next != 0 {
            let block = FreeBlock::load(&self.read_block_raw(next)?)?;
            count += 1;
            next = block.next;
        }
        Ok(count)
    }

    /** Grow the container to `new_max` blocks. A no-op if `new_max == max_size`. */
    pub fn grow(&mut self, new_max: BlockIndex) -> Result<()> {
        if new_max < self.sb.max_size {
            return Err(Error::InvalidArgument(
                "cannot shrink the container".into(),
            ));
        }
        if new_max == self.sb.max_size {
            return Ok(());
        }
        let mut next = self.sb.free_head;
        for index in ((self.sb.max_size + 1)..=new_max).rev() {
            let block = FreeBlock { next };
            self.write_block_raw(index, &block.dump())?;
            next = index;
        }
        self.sb.max_size = new_max;
        self.sb.free_head = next;
        self.write_super()?;
        Ok(())
    }

    pub(crate) fn write_super(&mut self) -> Result<()> {
        self.sb.clone().sync(&mut self.device, 0)?;
        Ok(())
    }

    pub(crate) fn alloc(&mut self) -> Result<BlockIndex> {
        if self.sb.free_head == 0 {
            return Err(Error::OutOfSpace);
        }
        let index = self.sb.free_head;
        let free = FreeBlock::load(&self.read_block_raw(index)?)?;
        self.sb.free_head = free.next;
        self.write_super()?;
        Ok(index)
    }

    pub(crate) fn free_block(&mut self, index: BlockIndex) -> Result<()> {
        if index == 0 {
            return Err(Error::InvalidArgument("cannot free block 0".into()));
        }
        let block = FreeBlock {
            next: self.sb.free_head,
        };
        self.write_block_raw(index, &block.dump())?;
        self.sb.free_head = index;
        self.write_super()?;
        Ok(())
    }

    fn read_block_raw(&mut self, index: BlockIndex) -> Result<[u8; BLOCK_SIZE]> {
        if let Some(cache) = &mut self.cache {
            Ok(cache.get(&mut self.device, index)?)
        } else {
            Ok(crate::block::load_raw(&mut self.device, index)?)
        }
    }

    fn write_block_raw(&mut self, index: BlockIndex, buf: &[u8; BLOCK_SIZE]) -> Result<()> {
        if let Some(cache) = &mut self.cache {
            cache.put(&mut self.device, index, *buf)?;
            Ok(())
        } else {
            crate::block::save_raw(&mut self.device, index, buf)?;
            Ok(())
        }
    }

    /** Read and decode block `index` as `B`, for cooperating subsystems that speak a [`Block`] type directly */
    pub fn read<B: Block>(&mut self, index: BlockIndex) -> Result<B> {
        B::load(&self.read_block_raw(index)?)
    }

    /** Encode and write `block` at `index`, for cooperating subsystems that speak a [`Block`] type directly */
    pub fn write<B: Block>(&mut self, index: BlockIndex, block: &B) -> Result<()> {
        self.write_block_raw(index, &block.dump())
    }

    pub(crate) fn read_node(&mut self, index: BlockIndex) -> Result<TreeNode> {
        self.read(index)
    }

    pub(crate) fn write_node(&mut self, index: BlockIndex, node: &TreeNode) -> Result<()> {
        self.write(index, node)
    }

    pub(crate) fn read_data(&mut self, index: BlockIndex) -> Result<DataBlock> {
        self.read(index)
    }

    pub(crate) fn write_data(&mut self, index: BlockIndex, data: &DataBlock) -> Result<()> {
        self.write(index, data)
    }
}

impl Engine<std::fs::File> {
    /** Open `path`, creating and formatting it if it does not exist */
    pub fn open_path(path: impl AsRef<Path>, options: EngineOptions) -> Result<Self> {
        let path = path.as_ref();
        let existed = path.exists();
        let device = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        if existed {
            Engine::open(device, options)
        } else {
            Engine::format(device, options)
        }
    }
}
