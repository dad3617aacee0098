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

//! Serializer for flow specification NLRI

use std::io::Write;

use byteorder::{NetworkEndian, WriteBytesExt};
use ipnet::IpNet;
use netgauze_parse_utils::WritablePdu;
use netgauze_serde_macros::WritingError;

use crate::{
    component::{FlowComponent, NumericMatch},
    wire::{
        AND_BIT, END_OF_LIST, EXTENDED_LENGTH_MARKER, EXTENDED_LENGTH_THRESHOLD,
        MAX_NLRI_LENGTH, VALUE_LEN_SHIFT,
    },
    Flow,
};

/// Number of bytes needed to carry the first `prefix_len` bits of an address
#[inline]
const fn prefix_bytes(prefix_len: u8) -> usize {
    (prefix_len as usize).div_ceil(8)
}

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum FlowComponentWritingError {
    StdIOError(#[from_std_io_error] String),
}

fn write_numeric_match<T: Write>(
    writer: &mut T,
    numeric_match: &NumericMatch,
    end_of_list: bool,
) -> Result<(), FlowComponentWritingError> {
    let value_len = numeric_match.value_len();
    // 1, 2, 4 and 8 bytes are encoded as 0b00, 0b01, 0b10 and 0b11
    let len_selector = value_len.trailing_zeros() as u8;
    let mut operator = numeric_match.operator().bits() | (len_selector << VALUE_LEN_SHIFT);
    operator |= if end_of_list { END_OF_LIST } else { AND_BIT };
    writer.write_u8(operator)?;
    let value = numeric_match.value();
    match value_len {
        1 => writer.write_u8(value as u8)?,
        2 => writer.write_u16::<NetworkEndian>(value as u16)?,
        4 => writer.write_u32::<NetworkEndian>(value as u32)?,
        _ => writer.write_u64::<NetworkEndian>(value)?,
    }
    Ok(())
}

impl WritablePdu<FlowComponentWritingError> for FlowComponent {
    // 1-octet component type
    const BASE_LENGTH: usize = 1;

    fn len(&self) -> usize {
        let value_len = match self.prefix() {
            // 1-octet prefix length followed by the significant bytes only
            Some(net) => 1 + prefix_bytes(net.prefix_len()),
            None => self
                .numeric_values()
                .unwrap_or_default()
                .iter()
                .map(|value| 1 + value.value_len() as usize)
                .sum(),
        };
        Self::BASE_LENGTH + value_len
    }

    fn write<T: Write>(&self, writer: &mut T) -> Result<(), FlowComponentWritingError> {
        writer.write_u8(self.get_type().into())?;
        match self.prefix() {
            Some(net) => {
                let len = prefix_bytes(net.prefix_len());
                writer.write_u8(net.prefix_len())?;
                // network() clears the host bits
                match net {
                    IpNet::V4(net) => writer.write_all(&net.network().octets()[..len])?,
                    IpNet::V6(net) => writer.write_all(&net.network().octets()[..len])?,
                }
            }
            None => {
                let values = self.numeric_values().unwrap_or_default();
                for (index, value) in values.iter().enumerate() {
                    write_numeric_match(writer, value, index + 1 == values.len())?;
                }
            }
        }
        Ok(())
    }
}

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum FlowWritingError {
    StdIOError(#[from_std_io_error] String),
    /// Components length doesn't fit in the 12 bits of the length prefix
    NlriTooLong(usize),
    ComponentError(#[from] FlowComponentWritingError),
}

impl WritablePdu<FlowWritingError> for Flow {
    // 1-octet length prefix, a second octet is needed for longer NLRI
    const BASE_LENGTH: usize = 1;

    fn len(&self) -> usize {
        let components_len = self.components_len();
        let extended_len = if components_len < EXTENDED_LENGTH_THRESHOLD {
            0
        } else {
            1
        };
        Self::BASE_LENGTH + extended_len + components_len
    }

    fn write<T: Write>(&self, writer: &mut T) -> Result<(), FlowWritingError> {
        let components_len = self.components_len();
        if components_len > MAX_NLRI_LENGTH {
            return Err(FlowWritingError::NlriTooLong(components_len));
        }
        if components_len < EXTENDED_LENGTH_THRESHOLD {
            writer.write_u8(components_len as u8)?;
        } else {
            writer.write_u16::<NetworkEndian>(
                (u16::from(EXTENDED_LENGTH_MARKER) << 8) | components_len as u16,
            )?;
        }
        for component in self.components() {
            component.write(writer)?;
        }
        Ok(())
    }
}
