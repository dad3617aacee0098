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

//! Contains the FlowSpec codes that are registered at IANA [Flow Spec Component Types](https://www.iana.org/assignments/flow-spec/flow-spec.xhtml)

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, FromRepr};

/// Flow Specification Component Types as registered in IANA
/// [Flow Spec Component Types](https://www.iana.org/assignments/flow-spec/flow-spec.xhtml#flow-spec-1).
///
/// The numeric order of the codes is the order components must follow on the
/// wire, hence the derived [`Ord`].
#[repr(u8)]
#[derive(
    Display,
    FromRepr,
    EnumIter,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Serialize,
    Deserialize,
)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum FlowSpecComponentType {
    /// [RFC5575](https://datatracker.ietf.org/doc/html/rfc5575)
    DestinationPrefix = 1,

    /// [RFC5575](https://datatracker.ietf.org/doc/html/rfc5575)
    SourcePrefix = 2,

    /// [RFC5575](https://datatracker.ietf.org/doc/html/rfc5575)
    IpProtocol = 3,

    /// Matches either the source or the destination port
    /// [RFC5575](https://datatracker.ietf.org/doc/html/rfc5575)
    Port = 4,

    /// [RFC5575](https://datatracker.ietf.org/doc/html/rfc5575)
    DestinationPort = 5,

    /// [RFC5575](https://datatracker.ietf.org/doc/html/rfc5575)
    SourcePort = 6,

    /// [RFC5575](https://datatracker.ietf.org/doc/html/rfc5575)
    IcmpType = 7,

    /// [RFC5575](https://datatracker.ietf.org/doc/html/rfc5575)
    IcmpCode = 8,

    /// [RFC5575](https://datatracker.ietf.org/doc/html/rfc5575)
    TcpFlags = 9,

    /// [RFC5575](https://datatracker.ietf.org/doc/html/rfc5575)
    PacketLength = 10,

    /// [RFC5575](https://datatracker.ietf.org/doc/html/rfc5575)
    Dscp = 11,

    /// [RFC5575](https://datatracker.ietf.org/doc/html/rfc5575)
    Fragment = 12,
}

impl FlowSpecComponentType {
    /// Prefix components carry a single network, the rest carry a list of
    /// numeric operator/value pairs
    pub const fn is_prefix(&self) -> bool {
        matches!(self, Self::DestinationPrefix | Self::SourcePrefix)
    }

    /// Keyword used when rendering a flow in the text form
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::DestinationPrefix => "destination",
            Self::SourcePrefix => "source",
            Self::IpProtocol => "protocol",
            Self::Port => "port",
            Self::DestinationPort => "destination-port",
            Self::SourcePort => "source-port",
            Self::IcmpType => "icmp-type",
            Self::IcmpCode => "icmp-code",
            Self::TcpFlags => "tcp-flags",
            Self::PacketLength => "packet-length",
            Self::Dscp => "dscp",
            Self::Fragment => "fragment",
        }
    }
}

/// Flow Spec component type is not one of [`FlowSpecComponentType`], the
/// carried value is the undefined code.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct UndefinedFlowSpecComponentType(pub u8);

impl From<FlowSpecComponentType> for u8 {
    fn from(value: FlowSpecComponentType) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for FlowSpecComponentType {
    type Error = UndefinedFlowSpecComponentType;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match Self::from_repr(value) {
            Some(val) => Ok(val),
            None => Err(UndefinedFlowSpecComponentType(value)),
        }
    }
}
