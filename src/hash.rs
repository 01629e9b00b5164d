// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// Hashes a key.
#[must_use]
pub fn hash64(bytes: &[u8]) -> u64 {
    xxhash_rust::xxh3::xxh3_64(bytes)
}

/// Maps a key to its slot index for the given slot count.
#[must_use]
pub fn slot_position(key: &[u8], slot_count: usize) -> usize {
    debug_assert!(slot_count > 0, "table has no slots");

    #[expect(
        clippy::cast_possible_truncation,
        reason = "the result is smaller than slot_count, which is a usize"
    )]
    let pos = (hash64(key) % slot_count as u64) as usize;

    pos
}
