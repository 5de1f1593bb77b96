//! Access modes — the appliance's fixed capability levels.
//!
//! Each mode carries a wire code and a permission rank. Ranks are totally
//! ordered and lower means more privileged; [`Mode::Unauthenticated`] has
//! the weakest rank. The ordering is only ever used for the client-side
//! capability gate in [`Mode::require`].

use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

/// A named capability level recognized by the control appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Complete system access, for development and debugging.
    Admin,
    /// Full access to control parameters, for common main-user tasks.
    Operator,
    /// Read access to temperature parameters and write access to the
    /// temperature set point.
    Lead,
    /// Read access to temperature.
    Follow,
    /// No API key required.
    Unauthenticated,
}

impl Mode {
    /// Wire identifier of this mode.
    pub fn code(self) -> u8 {
        match self {
            Mode::Admin => 0,
            Mode::Operator => 1,
            Mode::Lead => 2,
            Mode::Follow => 3,
            Mode::Unauthenticated => 99,
        }
    }

    /// Permission rank; lower dominates higher.
    pub fn permission(self) -> u8 {
        match self {
            Mode::Admin => 0,
            Mode::Operator => 1,
            Mode::Lead => 2,
            Mode::Follow => 3,
            Mode::Unauthenticated => 99,
        }
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Admin => "admin",
            Mode::Operator => "operator",
            Mode::Lead => "lead",
            Mode::Follow => "follow",
            Mode::Unauthenticated => "unauthenticated",
        }
    }

    /// Capability gate: check that this mode may invoke an operation gated
    /// at `required`.
    ///
    /// Fails iff this mode's rank is strictly weaker (numerically greater)
    /// than the required rank; equal or stronger always passes. This is a
    /// client-side pre-flight filter — the appliance enforces the real
    /// access control — so a passing gate proves nothing beyond "worth
    /// sending".
    pub fn require(self, required: Mode) -> Result<(), ClientError> {
        if self.permission() > required.permission() {
            return Err(ClientError::InsufficientPermission {
                required: required.permission(),
                actual: self.permission(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Mode::Admin),
            "operator" => Ok(Mode::Operator),
            "lead" => Ok(Mode::Lead),
            "follow" => Ok(Mode::Follow),
            "unauthenticated" => Ok(Mode::Unauthenticated),
            other => Err(ClientError::Config(format!(
                "unknown access mode {other:?} (expected one of: admin, operator, lead, follow, unauthenticated)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_table() {
        assert_eq!(Mode::Admin.permission(), 0);
        assert_eq!(Mode::Operator.permission(), 1);
        assert_eq!(Mode::Lead.permission(), 2);
        assert_eq!(Mode::Follow.permission(), 3);
        assert_eq!(Mode::Unauthenticated.permission(), 99);
        assert_eq!(Mode::Unauthenticated.code(), 99);
    }

    #[test]
    fn test_gate_passes_equal_or_stronger() {
        // Equal rank passes.
        assert!(Mode::Operator.require(Mode::Operator).is_ok());
        // Stronger rank passes.
        assert!(Mode::Admin.require(Mode::Operator).is_ok());
        assert!(Mode::Admin.require(Mode::Unauthenticated).is_ok());
        // Everyone may call unauthenticated operations.
        assert!(Mode::Unauthenticated.require(Mode::Unauthenticated).is_ok());
    }

    #[test]
    fn test_gate_fails_strictly_weaker() {
        let err = Mode::Follow.require(Mode::Operator).unwrap_err();
        match err {
            ClientError::InsufficientPermission { required, actual } => {
                assert_eq!(required, 1);
                assert_eq!(actual, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(Mode::Unauthenticated.require(Mode::Follow).is_err());
    }

    #[test]
    fn test_gate_message_embeds_both_ranks() {
        let err = Mode::Follow.require(Mode::Operator).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains('1'), "message should embed required rank: {msg}");
        assert!(msg.contains('3'), "message should embed actual rank: {msg}");
    }

    #[test]
    fn test_parse_round_trip() {
        for mode in [
            Mode::Admin,
            Mode::Operator,
            Mode::Lead,
            Mode::Follow,
            Mode::Unauthenticated,
        ] {
            assert_eq!(mode.name().parse::<Mode>().unwrap(), mode);
        }
        assert!("superuser".parse::<Mode>().is_err());
    }
}
