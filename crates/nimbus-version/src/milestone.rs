//! Named release thresholds used to gate client-side behavior.

use std::fmt;

/// A named reference server release.
///
/// Milestones form a closed, ordered lookup table (name to version triple).
/// Feature gates refer to the semantic aliases rather than the release
/// numbers, so retargeting a gate is a one-line change here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Milestone {
    name: &'static str,
    major: u64,
    minor: u64,
    micro: u64,
}

impl Milestone {
    pub const SERVER_20: Milestone = Milestone::new("server-20", 20, 0, 0);
    pub const SERVER_21: Milestone = Milestone::new("server-21", 21, 0, 0);
    pub const SERVER_22: Milestone = Milestone::new("server-22", 22, 0, 0);

    /// Release that started normalizing phone numbers on write.
    pub const PHONE_NORMALIZATION: Milestone = Milestone::SERVER_21;
    /// Release that introduced the user-status API.
    pub const USER_STATUS: Milestone = Milestone::SERVER_20;

    /// All named releases, oldest first.
    pub const ALL: &'static [Milestone] =
        &[Milestone::SERVER_20, Milestone::SERVER_21, Milestone::SERVER_22];

    const fn new(name: &'static str, major: u64, minor: u64, micro: u64) -> Self {
        Self {
            name,
            major,
            minor,
            micro,
        }
    }

    pub fn name(self) -> &'static str {
        self.name
    }

    pub fn triple(self) -> (u64, u64, u64) {
        (self.major, self.minor, self.micro)
    }
}

impl PartialOrd for Milestone {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Milestone {
    // Order by release triple, never by name. Names break ties so the order
    // stays consistent with equality.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.triple()
            .cmp(&other.triple())
            .then_with(|| self.name.cmp(other.name))
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}.{}.{})", self.name, self.major, self.minor, self.micro)
    }
}
