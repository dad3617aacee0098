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

use super::*;

#[test]
fn test_prefix_components() -> Result<(), FlowComponentWritingError> {
    let destination_v6_wire = [0x01, 0x20, 0x20, 0x01, 0x0d, 0xb8];
    let default_route_wire = [0x02, 0x00];
    let host_wire = [0x01, 0x20, 0xc0, 0x00, 0x02, 0x01];

    let destination_v6 =
        FlowComponent::destination_prefix(Ipv6Net::from_str("2001:db8::/32").unwrap());
    let default_route = FlowComponent::source_prefix(Ipv4Net::from_str("0.0.0.0/0").unwrap());
    let host = FlowComponent::destination_prefix(Ipv4Net::from_str("192.0.2.1/32").unwrap());

    test_parsed_completely_with_one_input(DESTINATION_WIRE, AddressFamily::IPv4, &destination());
    test_parsed_completely_with_one_input(SOURCE_WIRE, AddressFamily::IPv4, &source());
    test_parsed_completely_with_one_input(
        &destination_v6_wire,
        AddressFamily::IPv6,
        &destination_v6,
    );
    test_parsed_completely_with_one_input(&default_route_wire, AddressFamily::IPv4, &default_route);
    test_parsed_completely_with_one_input(&host_wire, AddressFamily::IPv4, &host);

    test_write(&destination(), DESTINATION_WIRE)?;
    test_write(&source(), SOURCE_WIRE)?;
    test_write(&destination_v6, &destination_v6_wire)?;
    test_write(&default_route, &default_route_wire)?;
    test_write(&host, &host_wire)?;
    Ok(())
}

#[test]
fn test_prefix_host_bits() -> Result<(), FlowComponentWritingError> {
    // 192.0.3.0/23 with a stray bit past the prefix length
    let stray_bits_wire = [0x01, 0x17, 0xc0, 0x00, 0x03];
    let masked_wire = [0x01, 0x17, 0xc0, 0x00, 0x02];
    let masked = FlowComponent::destination_prefix(Ipv4Net::from_str("192.0.2.0/23").unwrap());
    // Built without the constructor, so nothing cleared the host bits yet
    let unmasked = FlowComponent::DestinationPrefix(IpNet::from_str("192.0.3.7/23").unwrap());

    test_parsed_completely_with_one_input(&stray_bits_wire, AddressFamily::IPv4, &masked);
    test_write(&unmasked, &masked_wire)?;
    Ok(())
}

#[test]
fn test_prefix_errors() {
    let truncated_wire = [0x01, 0x18, 0xc0, 0x00];
    let too_long_wire = [0x01, 0x21, 0xc0, 0x00, 0x02, 0x00, 0x00];
    let too_long_v6_wire = [0x01, 0x81, 0x20, 0x01];

    let truncated = LocatedFlowComponentParsingError::new(
        Span::new(&truncated_wire).slice(1..),
        FlowComponentParsingError::PrefixError(FlowSpecPrefixParsingError::TruncatedPrefix(24)),
    );
    let too_long = LocatedFlowComponentParsingError::new(
        Span::new(&too_long_wire).slice(1..),
        FlowComponentParsingError::PrefixError(FlowSpecPrefixParsingError::TruncatedPrefix(33)),
    );
    let too_long_v6 = LocatedFlowComponentParsingError::new(
        Span::new(&too_long_v6_wire).slice(1..),
        FlowComponentParsingError::PrefixError(FlowSpecPrefixParsingError::TruncatedPrefix(
            129,
        )),
    );

    test_parse_error_with_one_input::<
        FlowComponent,
        AddressFamily,
        LocatedFlowComponentParsingError<'_>,
    >(
        &truncated_wire,
        AddressFamily::IPv4,
        &truncated,
    );
    test_parse_error_with_one_input::<
        FlowComponent,
        AddressFamily,
        LocatedFlowComponentParsingError<'_>,
    >(
        &too_long_wire,
        AddressFamily::IPv4,
        &too_long,
    );
    test_parse_error_with_one_input::<
        FlowComponent,
        AddressFamily,
        LocatedFlowComponentParsingError<'_>,
    >(
        &too_long_v6_wire,
        AddressFamily::IPv6,
        &too_long_v6,
    );
}

#[test]
fn test_numeric_components() -> Result<(), FlowComponentWritingError> {
    let port_wire = [0x04, 0x81, 0x19];
    let protocol_wire = [0x03, 0x81, 0x06];
    let dscp_wire = [0x0b, 0x81, 0x2e];
    let fragment_wire = [0x0c, 0x81, 0x02];
    let tcp_flags_wire = [0x09, 0x81, 0x02];

    let port = FlowComponent::port(NumericOperator::EQUAL, 25);
    let protocol = FlowComponent::ip_protocol(NumericOperator::EQUAL, 6);
    let dscp = FlowComponent::dscp(NumericOperator::EQUAL, 46);
    let fragment = FlowComponent::fragment(NumericOperator::EQUAL, 2);
    let tcp_flags = FlowComponent::tcp_flags(NumericOperator::EQUAL, 2);

    test_parsed_completely_with_one_input(&port_wire, AddressFamily::IPv4, &port);
    test_parsed_completely_with_one_input(PORT_RANGE_WIRE, AddressFamily::IPv4, &port_range());
    test_parsed_completely_with_one_input(&protocol_wire, AddressFamily::IPv4, &protocol);
    test_parsed_completely_with_one_input(&dscp_wire, AddressFamily::IPv6, &dscp);
    test_parsed_completely_with_one_input(&fragment_wire, AddressFamily::IPv4, &fragment);
    test_parsed_completely_with_one_input(&tcp_flags_wire, AddressFamily::IPv4, &tcp_flags);

    test_write(&port, &port_wire)?;
    test_write(&port_range(), PORT_RANGE_WIRE)?;
    test_write(&protocol, &protocol_wire)?;
    test_write(&dscp, &dscp_wire)?;
    test_write(&fragment, &fragment_wire)?;
    test_write(&tcp_flags, &tcp_flags_wire)?;
    Ok(())
}

#[test]
fn test_numeric_value_widths() -> Result<(), FlowComponentWritingError> {
    let two_bytes_wire = [0x0a, 0x91, 0x05, 0xdc];
    let four_bytes_wire = [0x0a, 0xa3, 0x00, 0x01, 0x00, 0x00];
    let eight_bytes_wire = [
        0x0a, 0xb4, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
    ];
    let mixed_wire = combine(vec![
        &[0x05][..],
        &[0x53, 0x01, 0x00],
        &[0x65, 0x01, 0x00, 0x00, 0x00],
        &[0x82, 0x16],
    ]);

    let two_bytes = FlowComponent::packet_length(NumericOperator::EQUAL, 1500);
    let four_bytes = FlowComponent::packet_length(
        NumericOperator::GREATER | NumericOperator::EQUAL,
        0x10000,
    );
    let eight_bytes = FlowComponent::packet_length(NumericOperator::LESS, 0x1_0000_0000);
    let mixed = FlowComponent::DestinationPort(vec![
        NumericMatch::new(NumericOperator::GREATER | NumericOperator::EQUAL, 256),
        NumericMatch::new(NumericOperator::LESS | NumericOperator::EQUAL, 0x1000000),
        NumericMatch::new(NumericOperator::GREATER, 22),
    ]);

    test_parsed_completely_with_one_input(&two_bytes_wire, AddressFamily::IPv4, &two_bytes);
    test_parsed_completely_with_one_input(&four_bytes_wire, AddressFamily::IPv4, &four_bytes);
    test_parsed_completely_with_one_input(&eight_bytes_wire, AddressFamily::IPv4, &eight_bytes);
    test_parsed_completely_with_one_input(&mixed_wire, AddressFamily::IPv4, &mixed);

    test_write(&two_bytes, &two_bytes_wire)?;
    test_write(&four_bytes, &four_bytes_wire)?;
    test_write(&eight_bytes, &eight_bytes_wire)?;
    test_write(&mixed, &mixed_wire)?;
    Ok(())
}

#[test]
fn test_numeric_non_minimal_width() -> Result<(), FlowComponentWritingError> {
    // 25 carried in 2 and 8 bytes, written back in a single byte
    let two_bytes_wire = [0x04, 0x91, 0x00, 0x19];
    let eight_bytes_wire = [
        0x04, 0xb1, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x19,
    ];
    let minimal_wire = [0x04, 0x81, 0x19];
    let port = FlowComponent::port(NumericOperator::EQUAL, 25);

    test_parsed_completely_with_one_input(&two_bytes_wire, AddressFamily::IPv4, &port);
    test_parsed_completely_with_one_input(&eight_bytes_wire, AddressFamily::IPv4, &port);
    test_write(&port, &minimal_wire)?;
    Ok(())
}

#[test]
fn test_numeric_reserved_bit_ignored() {
    let wire = [0x04, 0x8b, 0x19];
    let port = FlowComponent::port(NumericOperator::GREATER | NumericOperator::EQUAL, 25);
    test_parsed_completely_with_one_input(&wire, AddressFamily::IPv4, &port);
}

#[test]
fn test_numeric_empty_predicate() -> Result<(), FlowComponentWritingError> {
    // Neither lt, gt nor eq, the pair never matches but still round-trips
    let wire = [0x06, 0x80, 0x50];
    let never = FlowComponent::source_port(NumericOperator::default(), 80);
    test_parsed_completely_with_one_input(&wire, AddressFamily::IPv4, &never);
    test_write(&never, &wire)?;
    Ok(())
}

#[test]
fn test_numeric_errors() {
    let eol_and_wire = [0x04, 0xc1, 0x19];
    let short_value_wire = [0x04, 0x91, 0x01];
    let short_eight_bytes_wire = [0x04, 0x41, 0x19, 0xb1, 0x00, 0x00];
    let missing_value_wire = [0x04, 0x81];
    let unterminated_wire = [0x04, 0x43, 0x19];
    let or_chain_wire = [0x04, 0x01, 0x19, 0x81, 0x50];
    let unknown_type_wire = [0x0d, 0x81, 0x19];
    let zero_type_wire = [0x00, 0x81, 0x19];

    let eol_and = LocatedFlowComponentParsingError::new(
        Span::new(&eol_and_wire).slice(1..),
        FlowComponentParsingError::NumericMatchError(NumericMatchParsingError::MalformedOperator(
            0xc1,
        )),
    );
    let short_value = LocatedFlowComponentParsingError::new(
        Span::new(&short_value_wire).slice(1..),
        FlowComponentParsingError::NumericMatchError(NumericMatchParsingError::MalformedOperator(
            0x91,
        )),
    );
    let short_eight_bytes = LocatedFlowComponentParsingError::new(
        Span::new(&short_eight_bytes_wire).slice(3..),
        FlowComponentParsingError::NumericMatchError(NumericMatchParsingError::MalformedOperator(
            0xb1,
        )),
    );
    let missing_value = LocatedFlowComponentParsingError::new(
        Span::new(&missing_value_wire).slice(1..),
        FlowComponentParsingError::NumericMatchError(NumericMatchParsingError::MalformedOperator(
            0x81,
        )),
    );
    let unterminated = LocatedFlowComponentParsingError::new(
        Span::new(&unterminated_wire).slice(3..),
        FlowComponentParsingError::UnterminatedList(FlowSpecComponentType::Port),
    );
    let or_chain = LocatedFlowComponentParsingError::new(
        Span::new(&or_chain_wire).slice(1..),
        FlowComponentParsingError::UnsupportedOrChain(FlowSpecComponentType::Port),
    );
    let unknown_type = LocatedFlowComponentParsingError::new(
        Span::new(&unknown_type_wire),
        FlowComponentParsingError::UnknownComponentType(UndefinedFlowSpecComponentType(13)),
    );
    let zero_type = LocatedFlowComponentParsingError::new(
        Span::new(&zero_type_wire),
        FlowComponentParsingError::UnknownComponentType(UndefinedFlowSpecComponentType(0)),
    );

    for (wire, expected) in [
        (&eol_and_wire[..], &eol_and),
        (&short_value_wire[..], &short_value),
        (&short_eight_bytes_wire[..], &short_eight_bytes),
        (&missing_value_wire[..], &missing_value),
        (&unterminated_wire[..], &unterminated),
        (&or_chain_wire[..], &or_chain),
        (&unknown_type_wire[..], &unknown_type),
        (&zero_type_wire[..], &zero_type),
    ] {
        test_parse_error_with_one_input::<
            FlowComponent,
            AddressFamily,
            LocatedFlowComponentParsingError<'_>,
        >(wire, AddressFamily::IPv4, expected);
    }
}
