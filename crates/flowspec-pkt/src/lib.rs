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

//! BGP Dissemination of Flow Specification Rules NLRI
//! [RFC5575](https://datatracker.ietf.org/doc/html/rfc5575).
//!
//! A [`Flow`] is an ordered set of [`FlowComponent`]s, each matching one
//! packet field. The flow keeps its components sorted by
//! [`iana::FlowSpecComponentType`] code, so the wire form is the same
//! regardless of the order they were added in.
//!
//! ```rust
//! use ipnet::Ipv4Net;
//! use netgauze_flowspec_pkt::{
//!     component::{FlowComponent, NumericMatch, NumericOperator},
//!     Flow,
//! };
//! use std::str::FromStr;
//!
//! let mut flow = Flow::new();
//! flow.add(FlowComponent::Port(vec![
//!     NumericMatch::new(NumericOperator::GREATER | NumericOperator::EQUAL, 25),
//!     NumericMatch::new(NumericOperator::LESS | NumericOperator::EQUAL, 80),
//! ]))
//! .unwrap();
//! flow.add(FlowComponent::destination_prefix(
//!     Ipv4Net::from_str("192.0.2.0/24").unwrap(),
//! ))
//! .unwrap();
//!
//! let wire = flow.pack();
//! assert_eq!(
//!     wire,
//!     vec![0x0a, 0x01, 0x18, 0xc0, 0x00, 0x02, 0x04, 0x43, 0x19, 0x85, 0x50]
//! );
//! assert_eq!(Flow::unpack(&wire).unwrap(), flow);
//! assert_eq!(flow.to_string(), "destination 192.0.2.0/24 port >=25&<=80");
//! ```

use std::{
    collections::{btree_map::Entry, BTreeMap},
    fmt,
    hash::{Hash, Hasher},
};

use netgauze_iana::address_family::{AddressFamily, AddressType, SubsequentAddressFamily};
use netgauze_parse_utils::{LocatedParsingError, ReadablePduWithOneInput, Span, WritablePdu};
use serde::{Deserialize, Serialize};

use crate::{
    component::FlowComponent,
    iana::FlowSpecComponentType,
    wire::{
        deserializer::{FlowNlriParsingError, LocatedFlowNlriParsingError},
        serializer::FlowComponentWritingError,
        MAX_NLRI_LENGTH,
    },
};

pub mod component;
pub mod iana;
pub mod wire;

#[cfg(feature = "codec")]
pub mod codec;

/// Errors raised while building a [`Flow`]
#[derive(thiserror::Error, Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum FlowSpecError {
    #[error("a flow carries at most one {0} component")]
    DuplicatePrefixComponent(FlowSpecComponentType),

    #[error("{0} component must carry at least one operator/value pair")]
    EmptyNumericList(FlowSpecComponentType),

    #[error("{found} prefix can't be added to a flow matching {expected} prefixes")]
    AddressFamilyMismatch {
        expected: AddressFamily,
        found: AddressFamily,
    },

    #[error("flow components would take {0} bytes, more than the {max} bytes an NLRI can carry", max = MAX_NLRI_LENGTH)]
    NlriTooLong(usize),
}

/// Errors raised while decoding a complete NLRI out of a byte buffer
#[derive(thiserror::Error, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum FlowSpecUnpackError {
    #[error("malformed flow specification NLRI at offset {offset}: {error:?}")]
    Parsing {
        offset: usize,
        error: FlowNlriParsingError,
    },

    #[error("flow specification NLRI is incomplete, needed: {0:?}")]
    Incomplete(Option<usize>),

    #[error("{remaining} unexpected bytes after the flow specification NLRI at offset {offset}")]
    TrailingGarbage { offset: usize, remaining: usize },
}

impl<'a> From<nom::Err<LocatedFlowNlriParsingError<'a>>> for FlowSpecUnpackError {
    fn from(err: nom::Err<LocatedFlowNlriParsingError<'a>>) -> Self {
        match err {
            nom::Err::Incomplete(needed) => Self::Incomplete(match needed {
                nom::Needed::Unknown => None,
                nom::Needed::Size(size) => Some(size.get()),
            }),
            nom::Err::Error(error) | nom::Err::Failure(error) => Self::Parsing {
                offset: error.span().location_offset(),
                error: error.error().clone(),
            },
        }
    }
}

/// Flow specification rule, the set of components a packet must match.
///
/// Two flows are equal when they produce the same NLRI bytes.
#[derive(Clone, Default, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<FlowComponent>", into = "Vec<FlowComponent>")]
pub struct Flow {
    components: BTreeMap<FlowSpecComponentType, FlowComponent>,
}

impl Flow {
    pub const fn new() -> Self {
        Self {
            components: BTreeMap::new(),
        }
    }

    /// Add a component to the flow.
    ///
    /// A numeric component of a type already present appends its
    /// operator/value pairs to the existing list, while a second prefix of the
    /// same type is rejected. On error the flow is left unchanged.
    pub fn add(&mut self, component: FlowComponent) -> Result<(), FlowSpecError> {
        let component = component.normalized();
        let component_type = component.get_type();
        let existing = self.components.get(&component_type);
        if component_type.is_prefix() && existing.is_some() {
            return Err(FlowSpecError::DuplicatePrefixComponent(component_type));
        }
        if component
            .numeric_values()
            .is_some_and(|values| values.is_empty())
        {
            return Err(FlowSpecError::EmptyNumericList(component_type));
        }
        if let (Some(expected), Some(found)) =
            (self.address_family(), component.address_family())
        {
            if expected != found {
                return Err(FlowSpecError::AddressFamilyMismatch { expected, found });
            }
        }
        // Appended pairs don't repeat the component type byte
        let added_len = match existing {
            Some(_) => {
                component.len()
                    - <FlowComponent as WritablePdu<FlowComponentWritingError>>::BASE_LENGTH
            }
            None => component.len(),
        };
        let new_len = self.components_len() + added_len;
        if new_len > MAX_NLRI_LENGTH {
            return Err(FlowSpecError::NlriTooLong(new_len));
        }

        match self.components.entry(component_type) {
            Entry::Vacant(entry) => {
                entry.insert(component);
            }
            Entry::Occupied(mut entry) => {
                if let (Some(values), Some(appended)) = (
                    entry.get_mut().numeric_values_mut(),
                    component.numeric_values(),
                ) {
                    values.extend_from_slice(appended);
                }
            }
        }
        Ok(())
    }

    /// Components in ascending type order, the order they're written in
    pub fn components(&self) -> impl Iterator<Item = &FlowComponent> {
        self.components.values()
    }

    pub fn get(&self, component_type: FlowSpecComponentType) -> Option<&FlowComponent> {
        self.components.get(&component_type)
    }

    /// Number of distinct component types in the flow
    pub fn count(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Address family fixed by the prefix components, `None` when the flow
    /// has no prefix component
    pub fn address_family(&self) -> Option<AddressFamily> {
        self.components()
            .filter_map(FlowComponent::address_family)
            .next()
    }

    /// AFI/SAFI the flow is announced under. A flow without a prefix
    /// component defaults to IPv4.
    pub fn address_type(&self) -> AddressType {
        match self.address_family().unwrap_or(AddressFamily::IPv4) {
            AddressFamily::IPv4 => AddressType::Ipv4FlowSpec,
            AddressFamily::IPv6 => AddressType::Ipv6FlowSpec,
        }
    }

    pub fn subsequent_address_family(&self) -> SubsequentAddressFamily {
        self.address_type().subsequent_address_family()
    }

    /// Number of bytes the components take on the wire, the length prefix
    /// excluded
    pub fn components_len(&self) -> usize {
        self.components().map(|component| component.len()).sum()
    }

    /// Serialize the flow to a complete NLRI: the length prefix followed by
    /// the components in ascending type order
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.len());
        if let Err(err) = self.write(&mut buf) {
            unreachable!(
                "Flow components are bounded to {MAX_NLRI_LENGTH} bytes (enforced by add and the decoder) and writing into a Vec can't fail: {err:?}"
            );
        }
        buf
    }

    /// Decode a single IPv4 NLRI that spans the whole of `buf`
    pub fn unpack(buf: &[u8]) -> Result<Self, FlowSpecUnpackError> {
        Self::unpack_with_address_family(buf, AddressFamily::IPv4)
    }

    /// Decode a single NLRI that spans the whole of `buf`, prefixes are read
    /// as `address_family` addresses
    pub fn unpack_with_address_family(
        buf: &[u8],
        address_family: AddressFamily,
    ) -> Result<Self, FlowSpecUnpackError> {
        let (rest, flow) = <Self as ReadablePduWithOneInput<
            '_,
            AddressFamily,
            LocatedFlowNlriParsingError<'_>,
        >>::from_wire(Span::new(buf), address_family)
        .map_err(FlowSpecUnpackError::from)?;
        if !rest.is_empty() {
            return Err(FlowSpecUnpackError::TrailingGarbage {
                offset: rest.location_offset(),
                remaining: rest.len(),
            });
        }
        Ok(flow)
    }

    /// Decode back to back NLRIs, as carried in the `MP_REACH_NLRI` and
    /// `MP_UNREACH_NLRI` attributes
    pub fn unpack_all(
        buf: &[u8],
        address_family: AddressFamily,
    ) -> Result<Vec<Self>, FlowSpecUnpackError> {
        let mut span = Span::new(buf);
        let mut flows = Vec::new();
        while !span.is_empty() {
            let (rest, flow) = <Self as ReadablePduWithOneInput<
                '_,
                AddressFamily,
                LocatedFlowNlriParsingError<'_>,
            >>::from_wire(span, address_family)
            .map_err(FlowSpecUnpackError::from)?;
            flows.push(flow);
            span = rest;
        }
        Ok(flows)
    }

    /// Insert components that are already checked, used by the decoder that
    /// enforces the ordering and the NLRI length on its own
    pub(crate) fn insert_unchecked(&mut self, component: FlowComponent) {
        self.components.insert(component.get_type(), component);
    }
}

impl PartialEq for Flow {
    fn eq(&self, other: &Self) -> bool {
        self.pack() == other.pack()
    }
}

impl Eq for Flow {}

impl Hash for Flow {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pack().hash(state);
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, component) in self.components().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{component}")?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<FlowComponent>> for Flow {
    type Error = FlowSpecError;

    fn try_from(components: Vec<FlowComponent>) -> Result<Self, Self::Error> {
        let mut flow = Self::new();
        for component in components {
            flow.add(component)?;
        }
        Ok(flow)
    }
}

impl From<Flow> for Vec<FlowComponent> {
    fn from(flow: Flow) -> Self {
        flow.components.into_values().collect()
    }
}

#[cfg(feature = "fuzz")]
impl<'a> arbitrary::Arbitrary<'a> for Flow {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let mut flow = Self::new();
        for component in u.arbitrary_iter::<FlowComponent>()? {
            // Components the flow can't hold are skipped
            let _ = flow.add(component?);
        }
        Ok(flow)
    }
}

// Custom function to generate arbitrary IPv4 and IPv6 prefixes
#[cfg(feature = "fuzz")]
fn arbitrary_ipnet(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<ipnet::IpNet> {
    if u.arbitrary::<bool>()? {
        let addr = std::net::Ipv4Addr::from(u.int_in_range(0..=u32::MAX)?);
        let prefix_len = u.int_in_range(0..=32)?;
        ipnet::Ipv4Net::new(addr, prefix_len)
            .map(ipnet::IpNet::V4)
            .map_err(|_| arbitrary::Error::IncorrectFormat)
    } else {
        let addr = std::net::Ipv6Addr::from(u.int_in_range(0..=u128::MAX)?);
        let prefix_len = u.int_in_range(0..=128)?;
        ipnet::Ipv6Net::new(addr, prefix_len)
            .map(ipnet::IpNet::V6)
            .map_err(|_| arbitrary::Error::IncorrectFormat)
    }
}
