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

//! Flow specification components: the two prefix matches and the numeric
//! operator/value lists of [RFC5575](https://datatracker.ietf.org/doc/html/rfc5575).

use std::{fmt, ops::BitOr};

use ipnet::IpNet;
use netgauze_iana::address_family::AddressFamily;
use serde::{Deserialize, Serialize};

use crate::iana::FlowSpecComponentType;

/// Comparison part of a numeric operator byte, the `lt`, `gt` and `eq` bits.
///
/// Predicates combine with `|`, for instance `NumericOperator::GREATER |
/// NumericOperator::EQUAL` is `>=`.
///
/// ```text
///    0   1   2   3   4   5   6   7
///  +---+---+---+---+---+---+---+---+
///  | e | a |  len  | 0 |lt |gt |eq |
///  +---+---+---+---+---+---+---+---+
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct NumericOperator {
    less: bool,
    greater: bool,
    equal: bool,
}

impl NumericOperator {
    pub const EQUAL: Self = Self::new(false, false, true);
    pub const GREATER: Self = Self::new(false, true, false);
    pub const LESS: Self = Self::new(true, false, false);

    pub(crate) const LESS_BIT: u8 = 0x04;
    pub(crate) const GREATER_BIT: u8 = 0x02;
    pub(crate) const EQUAL_BIT: u8 = 0x01;

    pub const fn new(less: bool, greater: bool, equal: bool) -> Self {
        Self {
            less,
            greater,
            equal,
        }
    }

    pub const fn less(&self) -> bool {
        self.less
    }

    pub const fn greater(&self) -> bool {
        self.greater
    }

    pub const fn equal(&self) -> bool {
        self.equal
    }

    /// The `lt`, `gt`, `eq` bits as they appear in the operator byte
    pub const fn bits(&self) -> u8 {
        let mut bits = 0;
        if self.less {
            bits |= Self::LESS_BIT;
        }
        if self.greater {
            bits |= Self::GREATER_BIT;
        }
        if self.equal {
            bits |= Self::EQUAL_BIT;
        }
        bits
    }

    /// Build the predicate out of an operator byte, bits other than `lt`,
    /// `gt` and `eq` are ignored
    pub const fn from_bits(bits: u8) -> Self {
        Self::new(
            bits & Self::LESS_BIT != 0,
            bits & Self::GREATER_BIT != 0,
            bits & Self::EQUAL_BIT != 0,
        )
    }

    /// Evaluate the predicate for a packet field value against the bound
    /// carried in the component
    pub const fn matches(&self, field: u64, bound: u64) -> bool {
        (self.less && field < bound)
            || (self.greater && field > bound)
            || (self.equal && field == bound)
    }
}

impl BitOr for NumericOperator {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::new(
            self.less || rhs.less,
            self.greater || rhs.greater,
            self.equal || rhs.equal,
        )
    }
}

impl fmt::Display for NumericOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match (self.less, self.greater, self.equal) {
            (false, false, false) => "false",
            (false, false, true) => "=",
            (false, true, false) => ">",
            (false, true, true) => ">=",
            (true, false, false) => "<",
            (true, false, true) => "<=",
            (true, true, false) => "!=",
            (true, true, true) => "true",
        };
        f.write_str(symbol)
    }
}

/// One operator/value pair of a numeric component. Pairs of the same
/// component are combined with a logical AND.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct NumericMatch {
    operator: NumericOperator,
    value: u64,
}

impl NumericMatch {
    pub const fn new(operator: NumericOperator, value: u64) -> Self {
        Self { operator, value }
    }

    pub const fn operator(&self) -> NumericOperator {
        self.operator
    }

    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Smallest of 1, 2, 4 or 8 bytes that holds the value
    pub const fn value_len(&self) -> u8 {
        if self.value <= u8::MAX as u64 {
            1
        } else if self.value <= u16::MAX as u64 {
            2
        } else if self.value <= u32::MAX as u64 {
            4
        } else {
            8
        }
    }

    pub const fn matches(&self, field: u64) -> bool {
        self.operator.matches(field, self.value)
    }
}

impl fmt::Display for NumericMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.value)
    }
}

/// A single match criterion of a flow.
///
/// Prefix variants are normalized (host bits cleared) when added to a
/// [`crate::Flow`] and always written masked to the wire.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum FlowComponent {
    DestinationPrefix(#[cfg_attr(feature = "fuzz", arbitrary(with = crate::arbitrary_ipnet))] IpNet),
    SourcePrefix(#[cfg_attr(feature = "fuzz", arbitrary(with = crate::arbitrary_ipnet))] IpNet),
    IpProtocol(Vec<NumericMatch>),
    Port(Vec<NumericMatch>),
    DestinationPort(Vec<NumericMatch>),
    SourcePort(Vec<NumericMatch>),
    IcmpType(Vec<NumericMatch>),
    IcmpCode(Vec<NumericMatch>),
    TcpFlags(Vec<NumericMatch>),
    PacketLength(Vec<NumericMatch>),
    Dscp(Vec<NumericMatch>),
    Fragment(Vec<NumericMatch>),
}

impl FlowComponent {
    pub fn destination_prefix(net: impl Into<IpNet>) -> Self {
        Self::DestinationPrefix(net.into().trunc())
    }

    pub fn source_prefix(net: impl Into<IpNet>) -> Self {
        Self::SourcePrefix(net.into().trunc())
    }

    pub fn ip_protocol(operator: NumericOperator, value: u64) -> Self {
        Self::IpProtocol(vec![NumericMatch::new(operator, value)])
    }

    pub fn port(operator: NumericOperator, value: u64) -> Self {
        Self::Port(vec![NumericMatch::new(operator, value)])
    }

    pub fn destination_port(operator: NumericOperator, value: u64) -> Self {
        Self::DestinationPort(vec![NumericMatch::new(operator, value)])
    }

    pub fn source_port(operator: NumericOperator, value: u64) -> Self {
        Self::SourcePort(vec![NumericMatch::new(operator, value)])
    }

    pub fn icmp_type(operator: NumericOperator, value: u64) -> Self {
        Self::IcmpType(vec![NumericMatch::new(operator, value)])
    }

    pub fn icmp_code(operator: NumericOperator, value: u64) -> Self {
        Self::IcmpCode(vec![NumericMatch::new(operator, value)])
    }

    pub fn tcp_flags(operator: NumericOperator, value: u64) -> Self {
        Self::TcpFlags(vec![NumericMatch::new(operator, value)])
    }

    pub fn packet_length(operator: NumericOperator, value: u64) -> Self {
        Self::PacketLength(vec![NumericMatch::new(operator, value)])
    }

    pub fn dscp(operator: NumericOperator, value: u64) -> Self {
        Self::Dscp(vec![NumericMatch::new(operator, value)])
    }

    pub fn fragment(operator: NumericOperator, value: u64) -> Self {
        Self::Fragment(vec![NumericMatch::new(operator, value)])
    }

    /// Build a prefix component, `None` if `component_type` isn't a prefix
    /// type
    pub fn with_prefix(component_type: FlowSpecComponentType, net: IpNet) -> Option<Self> {
        match component_type {
            FlowSpecComponentType::DestinationPrefix => Some(Self::destination_prefix(net)),
            FlowSpecComponentType::SourcePrefix => Some(Self::source_prefix(net)),
            _ => None,
        }
    }

    /// Build a numeric component, `None` if `component_type` is a prefix type
    pub fn with_numeric_values(
        component_type: FlowSpecComponentType,
        values: Vec<NumericMatch>,
    ) -> Option<Self> {
        let component = match component_type {
            FlowSpecComponentType::DestinationPrefix | FlowSpecComponentType::SourcePrefix => {
                return None
            }
            FlowSpecComponentType::IpProtocol => Self::IpProtocol(values),
            FlowSpecComponentType::Port => Self::Port(values),
            FlowSpecComponentType::DestinationPort => Self::DestinationPort(values),
            FlowSpecComponentType::SourcePort => Self::SourcePort(values),
            FlowSpecComponentType::IcmpType => Self::IcmpType(values),
            FlowSpecComponentType::IcmpCode => Self::IcmpCode(values),
            FlowSpecComponentType::TcpFlags => Self::TcpFlags(values),
            FlowSpecComponentType::PacketLength => Self::PacketLength(values),
            FlowSpecComponentType::Dscp => Self::Dscp(values),
            FlowSpecComponentType::Fragment => Self::Fragment(values),
        };
        Some(component)
    }

    /// Get the IANA type of the component
    pub const fn get_type(&self) -> FlowSpecComponentType {
        match self {
            Self::DestinationPrefix(_) => FlowSpecComponentType::DestinationPrefix,
            Self::SourcePrefix(_) => FlowSpecComponentType::SourcePrefix,
            Self::IpProtocol(_) => FlowSpecComponentType::IpProtocol,
            Self::Port(_) => FlowSpecComponentType::Port,
            Self::DestinationPort(_) => FlowSpecComponentType::DestinationPort,
            Self::SourcePort(_) => FlowSpecComponentType::SourcePort,
            Self::IcmpType(_) => FlowSpecComponentType::IcmpType,
            Self::IcmpCode(_) => FlowSpecComponentType::IcmpCode,
            Self::TcpFlags(_) => FlowSpecComponentType::TcpFlags,
            Self::PacketLength(_) => FlowSpecComponentType::PacketLength,
            Self::Dscp(_) => FlowSpecComponentType::Dscp,
            Self::Fragment(_) => FlowSpecComponentType::Fragment,
        }
    }

    pub const fn prefix(&self) -> Option<&IpNet> {
        match self {
            Self::DestinationPrefix(net) | Self::SourcePrefix(net) => Some(net),
            _ => None,
        }
    }

    pub fn numeric_values(&self) -> Option<&[NumericMatch]> {
        match self {
            Self::DestinationPrefix(_) | Self::SourcePrefix(_) => None,
            Self::IpProtocol(values)
            | Self::Port(values)
            | Self::DestinationPort(values)
            | Self::SourcePort(values)
            | Self::IcmpType(values)
            | Self::IcmpCode(values)
            | Self::TcpFlags(values)
            | Self::PacketLength(values)
            | Self::Dscp(values)
            | Self::Fragment(values) => Some(values.as_slice()),
        }
    }

    pub(crate) fn numeric_values_mut(&mut self) -> Option<&mut Vec<NumericMatch>> {
        match self {
            Self::DestinationPrefix(_) | Self::SourcePrefix(_) => None,
            Self::IpProtocol(values)
            | Self::Port(values)
            | Self::DestinationPort(values)
            | Self::SourcePort(values)
            | Self::IcmpType(values)
            | Self::IcmpCode(values)
            | Self::TcpFlags(values)
            | Self::PacketLength(values)
            | Self::Dscp(values)
            | Self::Fragment(values) => Some(values),
        }
    }

    /// Address family of a prefix component, `None` for numeric components
    pub const fn address_family(&self) -> Option<AddressFamily> {
        match self.prefix() {
            Some(IpNet::V4(_)) => Some(AddressFamily::IPv4),
            Some(IpNet::V6(_)) => Some(AddressFamily::IPv6),
            None => None,
        }
    }

    /// Clear the host bits of prefix components
    pub(crate) fn normalized(self) -> Self {
        match self {
            Self::DestinationPrefix(net) => Self::DestinationPrefix(net.trunc()),
            Self::SourcePrefix(net) => Self::SourcePrefix(net.trunc()),
            other => other,
        }
    }
}

impl fmt::Display for FlowComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.get_type().keyword())?;
        match (self.prefix(), self.numeric_values()) {
            (Some(net), _) => write!(f, "{net}"),
            (None, Some(values)) => {
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str("&")?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
            (None, None) => Ok(()),
        }
    }
}
