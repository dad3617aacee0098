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

//! Tokio codec framing a stream of back to back flow specification NLRI, as
//! found in the `MP_REACH_NLRI` and `MP_UNREACH_NLRI` attributes.

use bytes::{Buf, BufMut, BytesMut};
use netgauze_iana::address_family::AddressFamily;
use netgauze_parse_utils::{LocatedParsingError, ReadablePduWithOneInput, Span, WritablePdu};
use netgauze_serde_macros::WritingError;
use nom::Needed;
use serde::{Deserialize, Serialize};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, instrument};

use crate::{
    wire::{
        deserializer::{FlowNlriParsingError, LocatedFlowNlriParsingError},
        serializer::FlowWritingError,
        EXTENDED_LENGTH_MARKER,
    },
    Flow,
};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum FlowSpecNlriCodecDecoderError {
    IoError(String),
    Incomplete(Option<usize>),
    FlowNlriParsingError(FlowNlriParsingError),
}

impl From<std::io::Error> for FlowSpecNlriCodecDecoderError {
    fn from(error: std::io::Error) -> Self {
        Self::IoError(error.to_string())
    }
}

#[derive(WritingError, Eq, PartialEq, Clone, Debug)]
pub enum FlowSpecNlriCodecEncoderError {
    StdIOError(#[from_std_io_error] String),
    /// The flow's prefixes belong to another address family than the codec's,
    /// the peer would read them as a different network
    AddressFamilyMismatch {
        expected: AddressFamily,
        found: AddressFamily,
    },
    FlowError(#[from] FlowWritingError),
}

/// Encode and decode [`Flow`] NLRI of a single address family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowSpecNlriCodec {
    address_family: AddressFamily,
}

impl Default for FlowSpecNlriCodec {
    fn default() -> Self {
        Self::new(AddressFamily::IPv4)
    }
}

impl FlowSpecNlriCodec {
    pub const fn new(address_family: AddressFamily) -> Self {
        Self { address_family }
    }

    /// Address family the prefix components are decoded as
    pub const fn address_family(&self) -> AddressFamily {
        self.address_family
    }
}

/// Total NLRI size, length prefix included, once enough of it is buffered to
/// tell
fn nlri_size(buf: &[u8]) -> Option<usize> {
    let first = *buf.first()?;
    if first & EXTENDED_LENGTH_MARKER == EXTENDED_LENGTH_MARKER {
        let second = *buf.get(1)?;
        Some(2 + ((usize::from(first & !EXTENDED_LENGTH_MARKER) << 8) | usize::from(second)))
    } else {
        Some(1 + usize::from(first))
    }
}

#[instrument(skip_all)]
fn parse_flow(
    buf: &mut BytesMut,
    size: usize,
    address_family: AddressFamily,
) -> Result<Option<Flow>, FlowSpecNlriCodecDecoderError> {
    let result = match <Flow as ReadablePduWithOneInput<
        '_,
        AddressFamily,
        LocatedFlowNlriParsingError<'_>,
    >>::from_wire(Span::new(&buf[..size]), address_family)
    {
        Ok((_, flow)) => Ok(Some(flow)),
        Err(nom::Err::Incomplete(needed)) => {
            let needed = match needed {
                Needed::Unknown => None,
                Needed::Size(size) => Some(size.get()),
            };
            Err(FlowSpecNlriCodecDecoderError::Incomplete(needed))
        }
        Err(nom::Err::Error(error) | nom::Err::Failure(error)) => {
            debug!(
                "Malformed flow specification NLRI at offset {}: {:?}",
                error.span().location_offset(),
                error.error()
            );
            Err(FlowSpecNlriCodecDecoderError::FlowNlriParsingError(
                error.error().clone(),
            ))
        }
    };
    // The length prefix tells where the next NLRI starts, skip a bad one
    // entirely so the stream doesn't get stuck on it
    buf.advance(size);
    result
}

impl Decoder for FlowSpecNlriCodec {
    type Item = Flow;
    type Error = FlowSpecNlriCodecDecoderError;

    #[instrument(skip_all)]
    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(size) = nlri_size(buf) else {
            // We don't have enough data yet to read the length prefix
            return Ok(None);
        };
        if buf.len() < size {
            // We still didn't read all the bytes for the NLRI yet
            buf.reserve(size - buf.len());
            return Ok(None);
        }
        parse_flow(buf, size, self.address_family)
    }
}

impl Encoder<Flow> for FlowSpecNlriCodec {
    type Error = FlowSpecNlriCodecEncoderError;

    fn encode(&mut self, flow: Flow, dst: &mut BytesMut) -> Result<(), Self::Error> {
        // A flow without prefixes fits either address family
        if let Some(found) = flow
            .address_family()
            .filter(|found| *found != self.address_family)
        {
            debug!(
                "Refusing to encode an {found} flow with an {} codec",
                self.address_family
            );
            return Err(FlowSpecNlriCodecEncoderError::AddressFamilyMismatch {
                expected: self.address_family,
                found,
            });
        }
        dst.reserve(flow.len());
        let mut writer = dst.writer();
        flow.write(&mut writer)?;
        Ok(())
    }
}
