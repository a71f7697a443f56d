//! Bridge lifecycle state

use std::fmt;

/// Lifecycle phase of the bridge
///
/// `Uninitialized → Initialized → Loaded → Initialized → Uninitialized`.
/// Requests are only answered with dialog in `Loaded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Created, no engine resources held
    #[default]
    Uninitialized,
    /// Engine ready, no ghost attached
    Initialized,
    /// Ghost attached, requests answered
    Loaded,
}

impl Phase {
    /// Check if `request` may produce dialog in this phase
    pub fn accepts_requests(&self) -> bool {
        matches!(self, Self::Loaded)
    }

    /// Check if the engine has been initialized
    pub fn is_initialized(&self) -> bool {
        !matches!(self, Self::Uninitialized)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::Loaded => "loaded",
        };
        f.write_str(name)
    }
}

/// Tag for the host's opaque ghost handle
///
/// The bridge never dereferences the handle the host passes to `load`;
/// it only records and forwards it. Modeling it as a plain tag keeps raw
/// pointers out of the safe API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GhostHandle(u64);

impl GhostHandle {
    /// Wrap a raw handle value
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw handle value, for forwarding back to the host
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for GhostHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
