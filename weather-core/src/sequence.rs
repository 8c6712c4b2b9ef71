//! Request tagging so late responses can't overwrite newer ones.

use std::fmt;

/// Tag attached to one outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTag(u64);

impl fmt::Display for RequestTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues monotonically increasing tags for one logical slot and
/// remembers which one is current.
#[derive(Debug, Default, Clone)]
pub struct RequestSlot {
    issued: u64,
}

impl RequestSlot {
    pub fn issue(&mut self) -> RequestTag {
        self.issued += 1;
        RequestTag(self.issued)
    }

    pub fn is_latest(&self, tag: RequestTag) -> bool {
        self.issued != 0 && tag.0 == self.issued
    }

    /// Invalidate every issued tag without issuing a new one.
    pub fn invalidate(&mut self) {
        self.issued += 1;
    }
}
