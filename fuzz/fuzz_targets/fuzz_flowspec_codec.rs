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

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use netgauze_flowspec_pkt::codec::FlowSpecNlriCodec;
use netgauze_iana::address_family::AddressFamily;
use tokio_util::codec::Decoder;

fuzz_target!(|data: (&[u8], AddressFamily)| {
    let (buf, address_family) = data;
    let mut codec = FlowSpecNlriCodec::new(address_family);
    let mut buf = BytesMut::from(buf);
    // Every call either waits for more bytes or consumes a whole NLRI
    loop {
        let before = buf.len();
        match codec.decode(&mut buf) {
            Ok(None) => break,
            Ok(Some(_)) | Err(_) => assert!(buf.len() < before),
        }
    }
});
