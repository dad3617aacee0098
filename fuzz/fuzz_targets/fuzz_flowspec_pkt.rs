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

#![no_main]

use libfuzzer_sys::fuzz_target;
use netgauze_flowspec_pkt::{wire::deserializer::LocatedFlowNlriParsingError, Flow};
use netgauze_iana::address_family::AddressFamily;
use netgauze_parse_utils::{ReadablePduWithOneInput, Span};

fuzz_target!(|data: (&[u8], AddressFamily)| {
    let (mut buf, address_family) = data;
    while let Ok((retbuf, flow)) = <Flow as ReadablePduWithOneInput<
        '_,
        AddressFamily,
        LocatedFlowNlriParsingError<'_>,
    >>::from_wire(Span::new(buf), address_family)
    {
        // Whatever decodes must survive a second trip through the wire
        let packed = flow.pack();
        assert_eq!(
            Flow::unpack_with_address_family(&packed, address_family).as_ref(),
            Ok(&flow)
        );
        buf = *retbuf.fragment();
    }
});
