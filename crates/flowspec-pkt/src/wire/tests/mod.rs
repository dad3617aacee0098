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

use std::str::FromStr;

use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use netgauze_iana::address_family::AddressFamily;
use netgauze_parse_utils::{
    test_helpers::{
        combine, test_parse_error_with_one_input, test_parsed_completely_with_one_input,
        test_write,
    },
    Span,
};
use nom::Slice;

use crate::{
    component::{FlowComponent, NumericMatch, NumericOperator},
    iana::{FlowSpecComponentType, UndefinedFlowSpecComponentType},
    wire::{
        deserializer::{
            FlowComponentParsingError, FlowNlriParsingError, FlowSpecPrefixParsingError,
            LocatedFlowComponentParsingError, LocatedFlowNlriParsingError,
            NumericMatchParsingError,
        },
        serializer::{FlowComponentWritingError, FlowWritingError},
    },
    Flow,
};

mod component;

pub(crate) const DESTINATION_WIRE: &[u8] = &[0x01, 0x18, 0xc0, 0x00, 0x02];
pub(crate) const SOURCE_WIRE: &[u8] = &[0x02, 0x18, 0x0a, 0x01, 0x02];
pub(crate) const PORT_RANGE_WIRE: &[u8] = &[0x04, 0x43, 0x19, 0x85, 0x50];

pub(crate) fn destination() -> FlowComponent {
    FlowComponent::destination_prefix(Ipv4Net::from_str("192.0.2.0/24").unwrap())
}

pub(crate) fn source() -> FlowComponent {
    FlowComponent::source_prefix(Ipv4Net::from_str("10.1.2.0/24").unwrap())
}

/// `port >=25&<=80`
pub(crate) fn port_range() -> FlowComponent {
    FlowComponent::Port(vec![
        NumericMatch::new(NumericOperator::GREATER | NumericOperator::EQUAL, 25),
        NumericMatch::new(NumericOperator::LESS | NumericOperator::EQUAL, 80),
    ])
}
