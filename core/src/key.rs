use std::fmt;

/** Maximum key length including terminating null */
pub const KEY_SIZE: usize = 33;

/**
 * A fixed-width, null-padded key.
 *
 * Two keys compare equal if their content up to the first null byte
 * matches, mirroring null-terminated string comparison rather than a
 * raw byte-array comparison.
 */
#[derive(Clone, Copy)]
pub struct Key(pub [u8; KEY_SIZE]);

impl Key {
    pub fn new(s: &str) -> Self {
        let mut buf = [0u8; KEY_SIZE];
        let bytes = s.as_bytes();
        let len = bytes.len().min(KEY_SIZE - 1);
        buf[..len].copy_from_slice(&bytes[..len]);
        Key(buf)
    }

    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Key(bytes)
    }

    /** The content up to (not including) the first null byte */
    pub fn effective(&self) -> &[u8] {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(KEY_SIZE);
        &self.0[..end]
    }

    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(self.effective())
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.effective() == other.effective()
    }
}
impl Eq for Key {}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Key {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.effective().cmp(other.effective())
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({:?})", self.as_str())
    }
}

impl Default for Key {
    fn default() -> Self {
        Key([0u8; KEY_SIZE])
    }
}
