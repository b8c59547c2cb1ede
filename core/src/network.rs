//! Network classification for downloads.

use std::fmt;

/// A network a download may be reachable on.
///
/// Names are interned: `hasNet("tor")` and `hasNet("Tor")` both resolve to
/// `Network::Tor` at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Public,
    I2P,
    Tor,
}

impl Network {
    /// All known networks.
    pub const ALL: [Network; 3] = [Network::Public, Network::I2P, Network::Tor];

    /// Intern a network name. Returns `None` for unknown names.
    pub fn internalise(name: &str) -> Option<Network> {
        Self::ALL
            .into_iter()
            .find(|n| n.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Canonical name of this network.
    pub fn name(&self) -> &'static str {
        match self {
            Network::Public => "Public",
            Network::I2P => "I2P",
            Network::Tor => "Tor",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
