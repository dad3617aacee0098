// Copyright (C) 2022-present The NetGauze Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Wire (de)serialization of flow specification NLRI.
//!
//! ```text
//! +------------------------------+
//! |    length (0xnn or 0xfn nn)  |
//! +------------------------------+
//! |    NLRI value   (variable)   |
//! +------------------------------+
//! ```
//!
//! Lengths below 240 take a single byte. Longer ones take two bytes with the
//! high nibble of the first byte set to `0xf`, leaving 12 bits for lengths up
//! to 4095.

pub mod deserializer;
pub mod serializer;

/// Operator byte: last pair of the component
pub(crate) const END_OF_LIST: u8 = 0x80;

/// Operator byte: the pair is AND'ed with the one that follows it
pub(crate) const AND_BIT: u8 = 0x40;

/// Operator byte: value length selector, `1 << ((op & mask) >> 4)` bytes
pub(crate) const VALUE_LEN_MASK: u8 = 0x30;
pub(crate) const VALUE_LEN_SHIFT: u8 = 4;

/// First NLRI length that needs the two bytes encoding
pub const EXTENDED_LENGTH_THRESHOLD: usize = 240;

/// Marker of the two bytes length encoding in the first byte
pub(crate) const EXTENDED_LENGTH_MARKER: u8 = 0xf0;

/// Longest components section an NLRI can carry
pub const MAX_NLRI_LENGTH: usize = 0x0fff;

#[cfg(test)]
mod tests;
