//! Unique identifiers for game objects.
//!
//! A [`Uid`] combines a machine fingerprint, a timestamp and a random number
//! so that objects authored on different machines, or at different times,
//! never collide. UIDs are produced by a [`UidGenerator`]; there is no global
//! generator state.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use network_interface::{NetworkInterface, NetworkInterfaceConfig};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::UidParseError;

/// A unique game object identifier.
///
/// The string form is 32 uppercase hex digits: 16 for the machine, 8 for the
/// timestamp and 8 for the random part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Uid {
    /// Fingerprint of the machine that created the UID.
    #[serde(rename = "myMac")]
    pub mac: u64,
    /// Creation time, seconds since the Unix epoch truncated to 32 bits.
    #[serde(rename = "myTime")]
    pub time: u32,
    /// Random discriminator.
    #[serde(rename = "myRndNum")]
    pub rnd: u32,
}

impl Uid {
    /// The unassigned UID (all zero).
    pub const NIL: Uid = Uid {
        mac: 0,
        time: 0,
        rnd: 0,
    };

    #[must_use]
    pub const fn new(mac: u64, time: u32, rnd: u32) -> Self {
        Self { mac, time, rnd }
    }

    /// Returns `true` if this is the unassigned UID.
    #[must_use]
    pub const fn is_nil(self) -> bool {
        self.mac == 0 && self.time == 0 && self.rnd == 0
    }
}

impl Default for Uid {
    fn default() -> Self {
        Self::NIL
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016X}{:08X}{:08X}", self.mac, self.time, self.rnd)
    }
}

impl FromStr for Uid {
    type Err = UidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(bad) = s.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(UidParseError::Digit(bad));
        }
        if s.len() != 32 {
            return Err(UidParseError::Length(s.len()));
        }

        // All characters are ASCII hex digits here, so parsing cannot fail.
        let mac = u64::from_str_radix(&s[..16], 16).unwrap_or_default();
        let time = u32::from_str_radix(&s[16..24], 16).unwrap_or_default();
        let rnd = u32::from_str_radix(&s[24..], 16).unwrap_or_default();
        Ok(Self { mac, time, rnd })
    }
}

/// Produces fresh [`Uid`]s for one machine.
#[derive(Debug)]
pub struct UidGenerator {
    machine: u64,
    rng: StdRng,
}

impl UidGenerator {
    /// Creates a generator for this machine, seeded from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_machine(machine_fingerprint())
    }

    /// Creates a generator with an explicit machine fingerprint.
    #[must_use]
    pub fn with_machine(machine: u64) -> Self {
        Self {
            machine,
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a fully deterministic generator (apart from the timestamp).
    #[must_use]
    pub fn seeded(machine: u64, seed: u64) -> Self {
        Self {
            machine,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The machine fingerprint stamped into every UID.
    #[must_use]
    pub fn machine(&self) -> u64 {
        self.machine
    }

    /// Generates a new UID.
    pub fn create(&mut self) -> Uid {
        let time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0);
        Uid {
            mac: self.machine,
            time,
            rnd: self.rng.next_u32(),
        }
    }
}

impl Default for UidGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Fingerprint of the local machine derived from the first non-loopback
/// network interface with a MAC address, or 0 if there is none.
#[must_use]
pub fn machine_fingerprint() -> u64 {
    let interfaces = match NetworkInterface::show() {
        Ok(interfaces) => interfaces,
        Err(err) => {
            debug!(%err, "could not enumerate network interfaces");
            return 0;
        }
    };

    interfaces
        .iter()
        .filter(|iface| iface.name != "lo")
        .filter_map(|iface| iface.mac_addr.as_deref())
        .filter_map(parse_mac)
        .find(|mac| mac.iter().any(|b| *b != 0))
        .map(|mac| fold_mac(&mac))
        .unwrap_or(0)
}

/// Parses `aa:bb:cc:dd:ee:ff` (or `-` separated) into six bytes.
#[must_use]
pub fn parse_mac(text: &str) -> Option<[u8; 6]> {
    let mut bytes = [0u8; 6];
    let mut parts = text.split([':', '-']);
    for byte in &mut bytes {
        *byte = u8::from_str_radix(parts.next()?, 16).ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(bytes)
}

/// Folds MAC bytes into a fingerprint, most significant byte first.
#[must_use]
pub fn fold_mac(mac: &[u8; 6]) -> u64 {
    mac.iter()
        .enumerate()
        .fold(0u64, |acc, (i, b)| acc + (u64::from(*b) << (40 - 8 * i)))
}
