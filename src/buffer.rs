/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

/*!
Module containing a cursor type for reading MQTT packet data that arrived split across
multiple non-contiguous byte buffers.
 */

/// Opaque snapshot of a cursor's position.  Restoring a snapshot rewinds the cursor to the
/// exact read state it had when the snapshot was taken.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CursorPosition {
    segment: usize,
    offset: usize,
    consumed: usize,
}

/// A forward-reading cursor over an ordered sequence of byte buffer fragments.
///
/// Multi-byte reads transparently span fragment boundaries.  Reads that would run past the
/// end of the sequence fail without consuming anything, which lets callers retry the same
/// read later once more data has arrived.
#[derive(Debug)]
pub struct SequenceCursor<'a> {
    segments: &'a [&'a [u8]],
    segment: usize,
    offset: usize,
    consumed: usize,
    total: usize,
}

impl<'a> SequenceCursor<'a> {

    /// Creates a new cursor positioned at the first byte of the first non-empty segment
    pub fn new(segments: &'a [&'a [u8]]) -> Self {
        let total = segments.iter().map(|segment| segment.len()).sum();
        let mut cursor = SequenceCursor {
            segments,
            segment: 0,
            offset: 0,
            consumed: 0,
            total,
        };

        cursor.normalize();
        cursor
    }

    // Skips past empty segments and exhausted segments so that (segment, offset) always
    // points at a readable byte unless the cursor is at the end of the sequence.
    fn normalize(&mut self) {
        while self.segment < self.segments.len() && self.offset >= self.segments[self.segment].len() {
            self.segment += 1;
            self.offset = 0;
        }
    }

    /// Returns the number of unread bytes left in the sequence
    pub fn remaining(&self) -> usize {
        self.total - self.consumed
    }

    /// Returns the number of bytes read so far
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Takes a snapshot of the current read position
    pub fn position(&self) -> CursorPosition {
        CursorPosition {
            segment: self.segment,
            offset: self.offset,
            consumed: self.consumed,
        }
    }

    /// Rewinds (or advances) the cursor to a previously-taken snapshot
    pub fn seek(&mut self, position: CursorPosition) {
        self.segment = position.segment;
        self.offset = position.offset;
        self.consumed = position.consumed;
    }

    /// Reads a single byte, or returns None (without consuming anything) if the sequence
    /// is exhausted
    pub fn try_read_u8(&mut self) -> Option<u8> {
        if self.segment >= self.segments.len() {
            return None;
        }

        let byte = self.segments[self.segment][self.offset];
        self.offset += 1;
        self.consumed += 1;
        self.normalize();

        Some(byte)
    }

    /// Reads a big-endian u16, possibly spanning a fragment boundary.  Fails without
    /// consuming anything if fewer than two bytes remain.
    pub fn try_read_u16(&mut self) -> Option<u16> {
        if self.remaining() < 2 {
            return None;
        }

        // both reads are infallible after the remaining() check
        let high = self.try_read_u8()?;
        let low = self.try_read_u8()?;

        Some(((high as u16) << 8) | (low as u16))
    }

    /// Attempts to borrow the next `count` bytes directly out of the underlying storage.
    /// Succeeds (and consumes) only when those bytes are contiguous within a single
    /// fragment; returns None otherwise, consuming nothing.
    pub fn try_borrow(&mut self, count: usize) -> Option<&'a [u8]> {
        if count == 0 {
            return Some(&[]);
        }

        if self.segment >= self.segments.len() {
            return None;
        }

        let segment = self.segments[self.segment];
        if self.offset + count > segment.len() {
            return None;
        }

        let borrowed = &segment[self.offset..(self.offset + count)];
        self.offset += count;
        self.consumed += count;
        self.normalize();

        Some(borrowed)
    }

    /// Copies the next `count` bytes into `dest`, spanning fragment boundaries as needed.
    /// Fails without consuming anything (and without touching `dest`) if fewer than
    /// `count` bytes remain.
    pub fn try_copy_to(&mut self, count: usize, dest: &mut Vec<u8>) -> bool {
        if self.remaining() < count {
            return false;
        }

        let mut bytes_needed = count;
        while bytes_needed > 0 {
            let segment = self.segments[self.segment];
            let available = segment.len() - self.offset;
            let copy_count = usize::min(available, bytes_needed);

            dest.extend_from_slice(&segment[self.offset..(self.offset + copy_count)]);

            self.offset += copy_count;
            self.consumed += copy_count;
            bytes_needed -= copy_count;
            self.normalize();
        }

        true
    }

    /// Advances the cursor by `count` bytes.  Fails without consuming anything if fewer
    /// than `count` bytes remain.
    pub fn skip(&mut self, count: usize) -> bool {
        if self.remaining() < count {
            return false;
        }

        let mut bytes_needed = count;
        while bytes_needed > 0 {
            let segment = self.segments[self.segment];
            let available = segment.len() - self.offset;
            let skip_count = usize::min(available, bytes_needed);

            self.offset += skip_count;
            self.consumed += skip_count;
            bytes_needed -= skip_count;
            self.normalize();
        }

        true
    }
}
