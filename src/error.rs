// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use std::collections::TryReserveError;

/// Represents errors that can occur in a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Allocating slot or record storage failed
    OutOfMemory,

    /// An argument was outside of its allowed range
    InvalidArgument(&'static str),

    /// A handle was issued before the table relocated its records
    StaleHandle,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AhTableError: {self:?}")
    }
}

impl std::error::Error for Error {}

impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Self {
        Self::OutOfMemory
    }
}

/// Table result
pub type Result<T> = std::result::Result<T, Error>;
