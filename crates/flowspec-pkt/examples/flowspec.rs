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

use bytes::BytesMut;
use ipnet::{Ipv4Net, Ipv6Net};
use netgauze_flowspec_pkt::{
    codec::FlowSpecNlriCodec,
    component::{FlowComponent, NumericMatch, NumericOperator},
    Flow,
};
use netgauze_iana::address_family::AddressFamily;
use tokio_util::codec::{Decoder, Encoder};

pub fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Match SMTP and HTTP traffic from 10.1.2.0/24 to 192.0.2.0/24
    let mut flow = Flow::new();
    flow.add(FlowComponent::destination_prefix(
        Ipv4Net::from_str("192.0.2.0/24").unwrap(),
    ))
    .unwrap();
    flow.add(FlowComponent::source_prefix(
        Ipv4Net::from_str("10.1.2.0/24").unwrap(),
    ))
    .unwrap();
    flow.add(FlowComponent::port(
        NumericOperator::GREATER | NumericOperator::EQUAL,
        25,
    ))
    .unwrap();
    flow.add(FlowComponent::port(
        NumericOperator::LESS | NumericOperator::EQUAL,
        80,
    ))
    .unwrap();
    println!("Flow: {flow}");

    // Serialize the flow into its NLRI binary format
    let buf = flow.pack();
    assert_eq!(
        buf,
        vec![
            0x0f, 0x01, 0x18, 0xc0, 0x00, 0x02, 0x02, 0x18, 0x0a, 0x01, 0x02, 0x04, 0x43, 0x19,
            0x85, 0x50
        ]
    );

    // Deserialize the flow from binary format
    let flow_back = Flow::unpack(&buf).unwrap();
    assert_eq!(flow, flow_back);
    println!("JSON: {}", serde_json::to_string(&flow_back).unwrap());

    // Frame IPv6 flows over a byte stream
    let mut v6 = Flow::new();
    v6.add(FlowComponent::destination_prefix(
        Ipv6Net::from_str("2001:db8::/32").unwrap(),
    ))
    .unwrap();
    v6.add(FlowComponent::Dscp(vec![NumericMatch::new(
        NumericOperator::EQUAL,
        46,
    )]))
    .unwrap();
    let mut codec = FlowSpecNlriCodec::new(AddressFamily::IPv6);
    let mut stream = BytesMut::new();
    codec.encode(v6, &mut stream).unwrap();
    // A flow without prefixes fits any address family
    let mut https = Flow::new();
    https
        .add(FlowComponent::destination_port(NumericOperator::EQUAL, 443))
        .unwrap();
    codec.encode(https, &mut stream).unwrap();
    println!("Decoded: {:?}", codec.decode(&mut stream));
    println!("Decoded: {:?}", codec.decode(&mut stream));
}
