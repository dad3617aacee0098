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

//! Handling [AddressFamily] (AFI) and [SubsequentAddressFamily] (SAFI) for
//! the Dissemination of Flow Specification Rules.
//! [AddressType] only admits the AFI/SAFI combinations that carry FlowSpec
//! NLRI.
//!
//! ```rust
//! use netgauze_iana::address_family::*;
//!
//! let ipv4 = AddressType::Ipv4FlowSpec;
//! let ipv6 = AddressType::from_afi_safi(
//!     AddressFamily::IPv6,
//!     SubsequentAddressFamily::FlowSpecFilter,
//! );
//! assert_eq!(ipv4.address_family(), AddressFamily::IPv4);
//! assert_eq!(
//!     ipv4.subsequent_address_family(),
//!     SubsequentAddressFamily::FlowSpecFilter
//! );
//! assert_eq!(ipv6, Ok(AddressType::Ipv6FlowSpec));
//! ```

use serde::{Deserialize, Serialize};
use strum_macros::{Display, FromRepr};

/// Address families identifiers (AFI) registered at IANA [Address Family Number](https://www.iana.org/assignments/address-family-numbers/address-family-numbers.xhtml)
/// that can carry flow specification rules.
///
/// ```rust
/// use netgauze_iana::address_family::{AddressFamily, UndefinedAddressFamily};
///
/// let undefined = AddressFamily::try_from(25);
/// assert_eq!(undefined, Err(UndefinedAddressFamily(25)));
/// ```
#[repr(u16)]
#[derive(FromRepr, Display, Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum AddressFamily {
    IPv4 = 1,
    IPv6 = 2,
}

impl AddressFamily {
    /// Longest prefix, in bits, an address of this family can have
    pub const fn max_prefix_len(&self) -> u8 {
        match self {
            Self::IPv4 => 32,
            Self::IPv6 => 128,
        }
    }
}

/// Error type used in [`TryFrom`] for [`AddressFamily`].
/// The value carried is the undefined value being parsed
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct UndefinedAddressFamily(pub u16);

impl From<AddressFamily> for u16 {
    fn from(afi: AddressFamily) -> Self {
        afi as u16
    }
}

impl TryFrom<u16> for AddressFamily {
    type Error = UndefinedAddressFamily;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match Self::from_repr(value) {
            Some(val) => Ok(val),
            None => Err(UndefinedAddressFamily(value)),
        }
    }
}

/// Subsequent Address families identifiers (SAFI) registered at IANA [Subsequent Address Family Identifiers (SAFI) Parameters](https://www.iana.org/assignments/safi-namespace/safi-namespace.xhtml)
#[repr(u8)]
#[derive(FromRepr, Display, Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum SubsequentAddressFamily {
    /// Dissemination of Flow Specification rules
    /// [RFC5575](https://datatracker.ietf.org/doc/html/rfc5575)
    FlowSpecFilter = 133,

    /// L3VPN Dissemination of Flow Specification rules
    /// [RFC5575](https://datatracker.ietf.org/doc/html/rfc5575)
    FlowSpecFilterL3Vpn = 134,
}

/// Error type used in [`TryFrom`] for [`SubsequentAddressFamily`].
/// The value carried is the undefined value being parsed
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct UndefinedSubsequentAddressFamily(pub u8);

impl From<SubsequentAddressFamily> for u8 {
    fn from(safi: SubsequentAddressFamily) -> Self {
        safi as u8
    }
}

impl TryFrom<u8> for SubsequentAddressFamily {
    type Error = UndefinedSubsequentAddressFamily;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match Self::from_repr(value) {
            Some(val) => Ok(val),
            None => Err(UndefinedSubsequentAddressFamily(value)),
        }
    }
}

/// Valid AFI/SAFI combinations for FlowSpec NLRI
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum AddressType {
    Ipv4FlowSpec,
    Ipv6FlowSpec,
}

/// The AFI/SAFI pair doesn't name a FlowSpec address type
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct InvalidAddressType {
    address_family: AddressFamily,
    subsequent_address_family: SubsequentAddressFamily,
}

impl InvalidAddressType {
    pub const fn new(
        address_family: AddressFamily,
        subsequent_address_family: SubsequentAddressFamily,
    ) -> Self {
        Self {
            address_family,
            subsequent_address_family,
        }
    }

    pub const fn address_family(&self) -> AddressFamily {
        self.address_family
    }

    pub const fn subsequent_address_family(&self) -> SubsequentAddressFamily {
        self.subsequent_address_family
    }
}

impl AddressType {
    pub const fn address_family(&self) -> AddressFamily {
        match self {
            Self::Ipv4FlowSpec => AddressFamily::IPv4,
            Self::Ipv6FlowSpec => AddressFamily::IPv6,
        }
    }

    pub const fn subsequent_address_family(&self) -> SubsequentAddressFamily {
        match self {
            Self::Ipv4FlowSpec | Self::Ipv6FlowSpec => SubsequentAddressFamily::FlowSpecFilter,
        }
    }

    pub const fn from_afi_safi(
        afi: AddressFamily,
        safi: SubsequentAddressFamily,
    ) -> Result<Self, InvalidAddressType> {
        match (afi, safi) {
            (AddressFamily::IPv4, SubsequentAddressFamily::FlowSpecFilter) => {
                Ok(Self::Ipv4FlowSpec)
            }
            (AddressFamily::IPv6, SubsequentAddressFamily::FlowSpecFilter) => {
                Ok(Self::Ipv6FlowSpec)
            }
            _ => Err(InvalidAddressType::new(afi, safi)),
        }
    }
}
