//! The append-only output buffer.

/// Growable, append-only byte storage that encoders write into.
///
/// The buffer has no upper size bound. Bytes are only ever appended; the one
/// exception is the crate-internal rollback of a failed encode call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
}

impl OutputBuffer {
    /// Creates an empty buffer.
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Creates an empty buffer with room for at least `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Appends `bytes` to the end of the buffer.
    pub fn append(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Appends a single byte.
    pub fn push(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    /// Gets the bytes written so far without consuming the buffer.
    pub fn snapshot(&self) -> &[u8] {
        &self.bytes
    }

    /// The number of bytes written so far.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Unwraps the buffer into its bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    /// Drops everything past `len`. Only used to undo a failed encode call.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.bytes.truncate(len);
    }
}

impl From<OutputBuffer> for Vec<u8> {
    fn from(value: OutputBuffer) -> Self {
        value.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_keeps_order() {
        let mut buf = OutputBuffer::new();
        buf.append(&[1, 2]);
        buf.push(3);
        buf.append(&[]);
        buf.append(&[4]);
        assert_eq!(buf.snapshot(), &[1, 2, 3, 4], "bytes must be appended in order");
        assert_eq!(buf.len(), 4, "length must track appended bytes");
    }

    #[test]
    fn snapshot_does_not_consume() {
        let mut buf = OutputBuffer::with_capacity(8);
        assert!(buf.is_empty(), "new buffer must be empty");
        buf.append(b"ab");
        assert_eq!(buf.snapshot(), b"ab", "first snapshot");
        buf.append(b"c");
        assert_eq!(buf.snapshot(), b"abc", "snapshot must not truncate");
        assert_eq!(Vec::from(buf), b"abc".to_vec(), "into vec keeps everything");
    }
}
