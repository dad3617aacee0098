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

//! Deserializer for flow specification NLRI

use std::net::{Ipv4Addr, Ipv6Addr};

use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use netgauze_iana::address_family::AddressFamily;
use netgauze_parse_utils::{
    parse_into_located, parse_into_located_one_input, ErrorKindSerdeDeref, ReadablePdu,
    ReadablePduWithOneInput, Span,
};
use netgauze_serde_macros::LocatedError;
use nom::{
    combinator::{map, map_res},
    error::ErrorKind,
    number::complete::{be_u16, be_u32, be_u64, be_u8},
    IResult,
};
use serde::{Deserialize, Serialize};

use crate::{
    component::{FlowComponent, NumericMatch, NumericOperator},
    iana::{FlowSpecComponentType, UndefinedFlowSpecComponentType},
    wire::{AND_BIT, END_OF_LIST, EXTENDED_LENGTH_MARKER, VALUE_LEN_MASK, VALUE_LEN_SHIFT},
    Flow,
};

#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum NumericMatchParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),

    /// The operator byte sets both the end-of-list and the and bits, or
    /// fewer bytes than its length selector announces are left. The
    /// offending operator byte is carried.
    MalformedOperator(u8),
}

/// Operator/value pair as decoded from the wire, with the list flags of the
/// operator byte
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
struct EncodedNumericMatch {
    end_of_list: bool,
    and: bool,
    numeric_match: NumericMatch,
}

impl<'a> ReadablePdu<'a, LocatedNumericMatchParsingError<'a>> for EncodedNumericMatch {
    fn from_wire(buf: Span<'a>) -> IResult<Span<'a>, Self, LocatedNumericMatchParsingError<'a>> {
        let input = buf;
        let (buf, operator) = be_u8(buf)?;
        let end_of_list = operator & END_OF_LIST == END_OF_LIST;
        let and = operator & AND_BIT == AND_BIT;
        if end_of_list && and {
            return Err(nom::Err::Error(LocatedNumericMatchParsingError::new(
                input,
                NumericMatchParsingError::MalformedOperator(operator),
            )));
        }
        let value_len = 1usize << ((operator & VALUE_LEN_MASK) >> VALUE_LEN_SHIFT);
        if buf.len() < value_len {
            return Err(nom::Err::Error(LocatedNumericMatchParsingError::new(
                input,
                NumericMatchParsingError::MalformedOperator(operator),
            )));
        }
        // Non-minimal value lengths are accepted, they're normalized on write
        let (buf, value) = match value_len {
            1 => {
                let (buf, value) = be_u8(buf)?;
                (buf, u64::from(value))
            }
            2 => {
                let (buf, value) = be_u16(buf)?;
                (buf, u64::from(value))
            }
            4 => {
                let (buf, value) = be_u32(buf)?;
                (buf, u64::from(value))
            }
            _ => be_u64(buf)?,
        };
        Ok((
            buf,
            Self {
                end_of_list,
                and,
                numeric_match: NumericMatch::new(NumericOperator::from_bits(operator), value),
            },
        ))
    }
}

#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum FlowSpecPrefixParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),

    /// The prefix length is longer than the address family allows, or the
    /// prefix bytes run past the end of the NLRI
    TruncatedPrefix(u8),
}

impl<'a> ReadablePduWithOneInput<'a, AddressFamily, LocatedFlowSpecPrefixParsingError<'a>>
    for IpNet
{
    fn from_wire(
        buf: Span<'a>,
        address_family: AddressFamily,
    ) -> IResult<Span<'a>, Self, LocatedFlowSpecPrefixParsingError<'a>> {
        let input = buf;
        let (buf, prefix_len) = be_u8(buf)?;
        // The prefix value must fall into the octet boundary, even if the prefix_len
        // doesn't. For example,
        // prefix_len=24 => prefix_size=3 while prefix_len=19 => prefix_size=3
        let prefix_size = (prefix_len as usize).div_ceil(8);
        if prefix_len > address_family.max_prefix_len() || buf.len() < prefix_size {
            return Err(nom::Err::Error(LocatedFlowSpecPrefixParsingError::new(
                input,
                FlowSpecPrefixParsingError::TruncatedPrefix(prefix_len),
            )));
        }
        let (buf, prefix) = nom::bytes::complete::take(prefix_size)(buf)?;
        let net = match address_family {
            AddressFamily::IPv4 => {
                let mut network = [0; 4];
                network[..prefix_size].copy_from_slice(prefix.fragment());
                Ipv4Net::new(Ipv4Addr::from(network), prefix_len).map(IpNet::V4)
            }
            AddressFamily::IPv6 => {
                let mut network = [0; 16];
                network[..prefix_size].copy_from_slice(prefix.fragment());
                Ipv6Net::new(Ipv6Addr::from(network), prefix_len).map(IpNet::V6)
            }
        };
        match net {
            // Stray bits past the prefix length are tolerated and cleared
            Ok(net) => Ok((buf, net.trunc())),
            Err(_) => Err(nom::Err::Error(LocatedFlowSpecPrefixParsingError::new(
                input,
                FlowSpecPrefixParsingError::TruncatedPrefix(prefix_len),
            ))),
        }
    }
}

#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum FlowComponentParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),

    UnknownComponentType(#[from_external] UndefinedFlowSpecComponentType),

    /// The NLRI ended before a pair with the end-of-list bit
    UnterminatedList(FlowSpecComponentType),

    /// A pair other than the last one doesn't set the and bit. RFC 5575
    /// allows OR between the pairs of a component, but a [`FlowComponent`]
    /// only holds AND chains: decoding OR chains would need a grouped
    /// representation of the value list, and this variant is where it
    /// would plug in.
    UnsupportedOrChain(FlowSpecComponentType),

    NumericMatchError(#[from_located(module = "self")] NumericMatchParsingError),

    PrefixError(#[from_located(module = "self")] FlowSpecPrefixParsingError),
}

fn parse_numeric_matches(
    buf: Span<'_>,
    component_type: FlowSpecComponentType,
) -> IResult<Span<'_>, Vec<NumericMatch>, LocatedFlowComponentParsingError<'_>> {
    let mut buf = buf;
    let mut values = Vec::new();
    loop {
        if buf.is_empty() {
            return Err(nom::Err::Error(LocatedFlowComponentParsingError::new(
                buf,
                FlowComponentParsingError::UnterminatedList(component_type),
            )));
        }
        let pair_input = buf;
        let (tmp, encoded): (_, EncodedNumericMatch) = parse_into_located(buf)?;
        buf = tmp;
        values.push(encoded.numeric_match);
        if encoded.end_of_list {
            return Ok((buf, values));
        }
        if !encoded.and {
            return Err(nom::Err::Error(LocatedFlowComponentParsingError::new(
                pair_input,
                FlowComponentParsingError::UnsupportedOrChain(component_type),
            )));
        }
    }
}

impl<'a> ReadablePduWithOneInput<'a, AddressFamily, LocatedFlowComponentParsingError<'a>>
    for FlowComponent
{
    fn from_wire(
        buf: Span<'a>,
        address_family: AddressFamily,
    ) -> IResult<Span<'a>, Self, LocatedFlowComponentParsingError<'a>> {
        let (buf, component_type) = map_res(be_u8, FlowSpecComponentType::try_from)(buf)?;
        let prefix = |buf| {
            parse_into_located_one_input::<_, LocatedFlowSpecPrefixParsingError<'a>, _, IpNet>(
                buf,
                address_family,
            )
        };
        let numeric = |buf| parse_numeric_matches(buf, component_type);
        match component_type {
            FlowSpecComponentType::DestinationPrefix => map(prefix, Self::DestinationPrefix)(buf),
            FlowSpecComponentType::SourcePrefix => map(prefix, Self::SourcePrefix)(buf),
            FlowSpecComponentType::IpProtocol => map(numeric, Self::IpProtocol)(buf),
            FlowSpecComponentType::Port => map(numeric, Self::Port)(buf),
            FlowSpecComponentType::DestinationPort => map(numeric, Self::DestinationPort)(buf),
            FlowSpecComponentType::SourcePort => map(numeric, Self::SourcePort)(buf),
            FlowSpecComponentType::IcmpType => map(numeric, Self::IcmpType)(buf),
            FlowSpecComponentType::IcmpCode => map(numeric, Self::IcmpCode)(buf),
            FlowSpecComponentType::TcpFlags => map(numeric, Self::TcpFlags)(buf),
            FlowSpecComponentType::PacketLength => map(numeric, Self::PacketLength)(buf),
            FlowSpecComponentType::Dscp => map(numeric, Self::Dscp)(buf),
            FlowSpecComponentType::Fragment => map(numeric, Self::Fragment)(buf),
        }
    }
}

#[derive(LocatedError, Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum FlowNlriParsingError {
    /// Errors triggered by the nom parser, see [ErrorKind] for
    /// additional information.
    #[serde(with = "ErrorKindSerdeDeref")]
    NomError(#[from_nom] ErrorKind),

    /// The length prefix announces more bytes than are available. A length
    /// prefix that is itself cut short reports the part of the length it
    /// carries, with nothing available.
    TruncatedNlri { declared: u16, available: usize },

    /// Components must appear in strictly ascending type order, each type at
    /// most once
    ComponentOutOfOrder {
        previous: FlowSpecComponentType,
        found: FlowSpecComponentType,
    },

    ComponentError(#[from_located(module = "self")] FlowComponentParsingError),
}

/// Read the one or two bytes length prefix of the NLRI
fn parse_nlri_length(buf: Span<'_>) -> IResult<Span<'_>, u16, LocatedFlowNlriParsingError<'_>> {
    let input = buf;
    let truncated = |declared: u16| {
        nom::Err::Error(LocatedFlowNlriParsingError::new(
            input,
            FlowNlriParsingError::TruncatedNlri {
                declared,
                available: 0,
            },
        ))
    };
    let (buf, first) =
        be_u8::<_, LocatedFlowNlriParsingError<'_>>(buf).map_err(|_| truncated(0))?;
    if first & EXTENDED_LENGTH_MARKER == EXTENDED_LENGTH_MARKER {
        let high = u16::from(first & !EXTENDED_LENGTH_MARKER) << 8;
        let (buf, second) =
            be_u8::<_, LocatedFlowNlriParsingError<'_>>(buf).map_err(|_| truncated(high))?;
        Ok((buf, high | u16::from(second)))
    } else {
        Ok((buf, u16::from(first)))
    }
}

impl<'a> ReadablePduWithOneInput<'a, AddressFamily, LocatedFlowNlriParsingError<'a>> for Flow {
    fn from_wire(
        buf: Span<'a>,
        address_family: AddressFamily,
    ) -> IResult<Span<'a>, Self, LocatedFlowNlriParsingError<'a>> {
        let input = buf;
        let (buf, declared) = parse_nlri_length(buf)?;
        if buf.len() < declared as usize {
            return Err(nom::Err::Error(LocatedFlowNlriParsingError::new(
                input,
                FlowNlriParsingError::TruncatedNlri {
                    declared,
                    available: buf.len(),
                },
            )));
        }
        let (rest, mut components_buf) = nom::bytes::complete::take(declared)(buf)?;
        let mut flow = Flow::new();
        let mut previous: Option<FlowSpecComponentType> = None;
        while !components_buf.is_empty() {
            let component_input = components_buf;
            let (tmp, component): (_, FlowComponent) =
                parse_into_located_one_input(components_buf, address_family)?;
            let found = component.get_type();
            if let Some(previous) = previous.filter(|previous| *previous >= found) {
                return Err(nom::Err::Error(LocatedFlowNlriParsingError::new(
                    component_input,
                    FlowNlriParsingError::ComponentOutOfOrder { previous, found },
                )));
            }
            previous = Some(found);
            flow.insert_unchecked(component);
            components_buf = tmp;
        }
        Ok((rest, flow))
    }
}
