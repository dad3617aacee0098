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
use netgauze_flowspec_pkt::Flow;
use netgauze_iana::address_family::AddressFamily;

fuzz_target!(|flow: Flow| {
    let packed = flow.pack();
    let address_family = flow.address_family().unwrap_or(AddressFamily::IPv4);
    assert_eq!(
        Flow::unpack_with_address_family(&packed, address_family),
        Ok(flow)
    );
});
