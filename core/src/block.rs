use crate::Error;
use std::io::{Read, Seek, SeekFrom, Write};

/** Size of every block in the container, including the superblock */
pub const BLOCK_SIZE: usize = 512;
/** Number of blocks (excluding the superblock) a fresh container starts with */
pub const DEFAULT_BLOCKS: u32 = 512;

pub const MAGIC_SUPERBLOCK: u32 = 0x00ba_b10c;
pub const MAGIC_TREENODE: u32 = 0xce11_b10c;
pub const MAGIC_DATANODE: u32 = 0xda7a_b10c;
pub const MAGIC_FREEBLOCK: u32 = 0xf1ee_b10c;

/** Address of a block within the container; 0 means "none" except for the superblock itself */
pub type BlockIndex = u32;

pub(crate) fn load_raw<D>(device: &mut D, block_index: BlockIndex) -> std::io::Result<[u8; BLOCK_SIZE]>
where
    D: Read + Write + Seek,
{
    let mut buf = [0u8; BLOCK_SIZE];
    device.seek(SeekFrom::Start(block_index as u64 * BLOCK_SIZE as u64))?;
    device.read_exact(&mut buf)?;
    Ok(buf)
}

pub(crate) fn save_raw<D>(
    device: &mut D,
    block_index: BlockIndex,
    buf: &[u8; BLOCK_SIZE],
) -> std::io::Result<()>
where
    D: Read + Write + Seek,
{
    device.seek(SeekFrom::Start(block_index as u64 * BLOCK_SIZE as u64))?;
    device.write_all(buf)
}

/** A fixed-size on-disk block, tagged with a magic number identifying its kind */
pub trait Block: Default + std::fmt::Debug {
    const MAGIC: u32;

    /** Decode from a raw block buffer, rejecting a mismatched magic */
    fn load(bytes: &[u8; BLOCK_SIZE]) -> Result<Self, Error>
    where
        Self: Sized;
    /** Encode into a raw block buffer */
    fn dump(&self) -> [u8; BLOCK_SIZE];

    fn load_block<D>(device: &mut D, block_index: BlockIndex) -> Result<Self, Error>
    where
        D: Read + Write + Seek,
        Self: Sized,
    {
        Self::load(&load_raw(device, block_index)?)
    }

    fn sync<D>(&self, device: &mut D, block_index: BlockIndex) -> Result<(), Error>
    where
        D: Read + Write + Seek,
    {
        if block_index == 0 && Self::MAGIC != MAGIC_SUPERBLOCK {
            return Err(Error::InvalidArgument(
                "block 0 may only hold the superblock".into(),
            ));
        }
        save_raw(device, block_index, &self.dump())?;
        Ok(())
    }
}

pub(crate) fn read_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(buf[offset..offset + 4].try_into().unwrap())
}
pub(crate) fn write_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
pub(crate) fn read_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes(buf[offset..offset + 2].try_into().unwrap())
}
pub(crate) fn write_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}
pub(crate) fn read_i16(buf: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes(buf[offset..offset + 2].try_into().unwrap())
}
pub(crate) fn write_i16(buf: &mut [u8], offset: usize, value: i16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}
