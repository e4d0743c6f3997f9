// Licensed under the Apache-2.0 license

//! Fixed-capacity byte ring buffer over caller-supplied storage.
//!
//! The producer never blocks: when the buffer is full, `put` overwrites the
//! oldest unread byte. All operations are O(1) and allocation free.

use crate::i2c::common::Error;

pub struct RingBuffer<'a> {
    storage: &'a mut [u8],
    /// Index of the oldest unread byte.
    read: usize,
    /// Index the next byte is stored at.
    write: usize,
    count: usize,
}

impl<'a> RingBuffer<'a> {
    /// Bind a ring buffer to `storage`.
    ///
    /// # Errors
    /// Returns `Error::InvalidArgument` if `storage` is empty.
    pub fn new(storage: &'a mut [u8]) -> Result<Self, Error> {
        if storage.is_empty() {
            return Err(Error::InvalidArgument);
        }
        Ok(Self {
            storage,
            read: 0,
            write: 0,
            count: 0,
        })
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    /// Append a byte, overwriting the oldest unread byte when full.
    pub fn put(&mut self, byte: u8) {
        if let Some(slot) = self.storage.get_mut(self.write) {
            *slot = byte;
        }
        self.write = self.advance(self.write);
        if self.is_full() {
            self.read = self.advance(self.read);
        } else {
            self.count += 1;
        }
    }

    /// Remove and return the oldest unread byte.
    ///
    /// # Errors
    /// Returns `Error::Empty` if nothing is queued.
    pub fn get(&mut self) -> Result<u8, Error> {
        if self.is_empty() {
            return Err(Error::Empty);
        }
        let byte = self.storage.get(self.read).copied().ok_or(Error::Empty)?;
        self.read = self.advance(self.read);
        self.count -= 1;
        Ok(byte)
    }

    /// Discard all unread bytes.
    pub fn flush(&mut self) {
        self.read = 0;
        self.write = 0;
        self.count = 0;
    }

    fn advance(&self, index: usize) -> usize {
        let next = index + 1;
        if next == self.capacity() {
            0
        } else {
            next
        }
    }
}
