//! Per-call context handed to every store operation.
//!
//! The store protocol expects an operation-name tag and a credential tag on
//! each call. Instead of hard-coding the credential literal at each call
//! site, operations carry an [`AccessTier`] and the store resolves the tier
//! to whatever tag it was configured with.

use std::fmt;

/// The five store operations, named by the tag sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListAccidents,
    GetAccidentById,
    CreateAccident,
    UpdateAccident,
    DeleteAccident,
}

impl Operation {
    /// Operation-name tag forwarded to the store.
    pub fn tag(self) -> &'static str {
        match self {
            Operation::ListAccidents => "ListAccidents",
            Operation::GetAccidentById => "GetAccidentById",
            Operation::CreateAccident => "CreateAccident",
            Operation::UpdateAccident => "UpdateAccident",
            Operation::DeleteAccident => "DeleteAccident",
        }
    }

    /// Access tier the operation requires.
    pub fn tier(self) -> AccessTier {
        match self {
            Operation::ListAccidents | Operation::GetAccidentById => AccessTier::Read,
            Operation::CreateAccident | Operation::UpdateAccident | Operation::DeleteAccident => {
                AccessTier::Write
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Caller tier distinguishing reads from writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessTier {
    Read,
    Write,
}

/// Context object passed to each store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub operation: Operation,
    pub tier: AccessTier,
}

impl CallContext {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            tier: operation.tier(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_use_read_tier() {
        assert_eq!(Operation::ListAccidents.tier(), AccessTier::Read);
        assert_eq!(Operation::GetAccidentById.tier(), AccessTier::Read);
    }

    #[test]
    fn writes_use_write_tier() {
        for op in [
            Operation::CreateAccident,
            Operation::UpdateAccident,
            Operation::DeleteAccident,
        ] {
            assert_eq!(CallContext::new(op).tier, AccessTier::Write);
        }
    }

    #[test]
    fn display_matches_wire_tag() {
        assert_eq!(Operation::GetAccidentById.to_string(), "GetAccidentById");
        assert_eq!(Operation::DeleteAccident.tag(), "DeleteAccident");
    }
}
