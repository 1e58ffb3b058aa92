//! Typed entity identifiers
//!
//! Every entity kind in the inventory hierarchy has its own opaque
//! identifier type, parsed from a single URL path segment. Parsing is
//! total: malformed text yields an [`IdParseError`], never a panic.
//! Identifiers of different kinds are distinct types and never compare
//! against each other.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum accepted identifier length in characters.
const MAX_ID_LEN: usize = 100;

/// Error returned when a path segment does not form a valid identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {kind}Id '{text}': {reason}")]
pub struct IdParseError {
    /// Entity kind name, e.g. `RoamingNetwork`
    pub kind: &'static str,
    /// The offending input text
    pub text: String,
    /// What was wrong with it
    pub reason: &'static str,
}

/// Shared identifier grammar: non-empty, bounded length, ASCII
/// alphanumerics plus the separators used by e-mobility identifier
/// conventions (`DE*GEF`, `DE*GEF*P555*A`, UUID text).
fn check_grammar(kind: &'static str, text: &str) -> Result<(), IdParseError> {
    if text.is_empty() {
        return Err(IdParseError {
            kind,
            text: text.to_string(),
            reason: "must not be empty",
        });
    }
    if text.len() > MAX_ID_LEN {
        return Err(IdParseError {
            kind,
            text: text.to_string(),
            reason: "exceeds maximum length",
        });
    }
    if !text
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '*' | '-' | '_' | '+' | '.' | ':'))
    {
        return Err(IdParseError {
            kind,
            text: text.to_string(),
            reason: "contains characters outside [A-Za-z0-9*-_+.:]",
        });
    }
    Ok(())
}

/// Roaming network identifier, e.g. `Prod` or `DE*GEF`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoamingNetworkId(String);

impl RoamingNetworkId {
    pub const KIND: &'static str = "RoamingNetwork";

    pub fn parse(text: &str) -> Result<Self, IdParseError> {
        check_grammar(Self::KIND, text)?;
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoamingNetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoamingNetworkId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Charging station operator identifier (country * party convention).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChargingStationOperatorId(String);

impl ChargingStationOperatorId {
    pub const KIND: &'static str = "ChargingStationOperator";

    pub fn parse(text: &str) -> Result<Self, IdParseError> {
        check_grammar(Self::KIND, text)?;
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChargingStationOperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ChargingStationOperatorId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Brand identifier, scoped to an operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrandId(String);

impl BrandId {
    pub const KIND: &'static str = "Brand";

    pub fn parse(text: &str) -> Result<Self, IdParseError> {
        check_grammar(Self::KIND, text)?;
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BrandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BrandId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Charging station group identifier, scoped to an operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChargingStationGroupId(String);

impl ChargingStationGroupId {
    pub const KIND: &'static str = "ChargingStationGroup";

    pub fn parse(text: &str) -> Result<Self, IdParseError> {
        check_grammar(Self::KIND, text)?;
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChargingStationGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ChargingStationGroupId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Charging pool identifier, e.g. `DE*GEF*P555`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChargingPoolId(String);

impl ChargingPoolId {
    pub const KIND: &'static str = "ChargingPool";

    pub fn parse(text: &str) -> Result<Self, IdParseError> {
        check_grammar(Self::KIND, text)?;
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChargingPoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ChargingPoolId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Charging station identifier, e.g. `DE*GEF*S555*1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChargingStationId(String);

impl ChargingStationId {
    pub const KIND: &'static str = "ChargingStation";

    pub fn parse(text: &str) -> Result<Self, IdParseError> {
        check_grammar(Self::KIND, text)?;
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChargingStationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ChargingStationId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// EVSE identifier, e.g. `DE*GEF*E555*1*A`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvseId(String);

impl EvseId {
    pub const KIND: &'static str = "EVSE";

    pub fn parse(text: &str) -> Result<Self, IdParseError> {
        check_grammar(Self::KIND, text)?;
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EvseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EvseId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Charging session identifier. UUID text fits the shared grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChargingSessionId(String);

impl ChargingSessionId {
    pub const KIND: &'static str = "ChargingSession";

    pub fn parse(text: &str) -> Result<Self, IdParseError> {
        check_grammar(Self::KIND, text)?;
        Ok(Self(text.to_string()))
    }

    /// Fresh random session identifier.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChargingSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ChargingSessionId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Charging reservation identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChargingReservationId(String);

impl ChargingReservationId {
    pub const KIND: &'static str = "ChargingReservation";

    pub fn parse(text: &str) -> Result<Self, IdParseError> {
        check_grammar(Self::KIND, text)?;
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChargingReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ChargingReservationId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// E-mobility provider identifier, e.g. `DE-GDF`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EMobilityProviderId(String);

impl EMobilityProviderId {
    pub const KIND: &'static str = "EMobilityProvider";

    pub fn parse(text: &str) -> Result<Self, IdParseError> {
        check_grammar(Self::KIND, text)?;
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EMobilityProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EMobilityProviderId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_star_separated_ids() {
        let id = RoamingNetworkId::parse("DE*GEF").expect("valid id");
        assert_eq!(id.as_str(), "DE*GEF");
        assert_eq!(id.to_string(), "DE*GEF");
    }

    #[test]
    fn accepts_uuid_text_for_sessions() {
        let id = ChargingSessionId::random();
        let reparsed = ChargingSessionId::parse(id.as_str()).expect("uuid text is valid");
        assert_eq!(id, reparsed);
    }

    #[test]
    fn rejects_empty_input() {
        let err = ChargingPoolId::parse("").unwrap_err();
        assert_eq!(err.kind, "ChargingPool");
        assert_eq!(err.reason, "must not be empty");
    }

    #[test]
    fn rejects_forbidden_characters() {
        let err = RoamingNetworkId::parse("!!invalid!!").unwrap_err();
        assert_eq!(err.kind, "RoamingNetwork");
        assert!(err.to_string().contains("RoamingNetworkId"));
    }

    #[test]
    fn rejects_overlong_input() {
        let text = "A".repeat(101);
        assert!(EvseId::parse(&text).is_err());
        assert!(EvseId::parse(&"A".repeat(100)).is_ok());
    }

    #[test]
    fn from_str_round_trips() {
        let id: EvseId = "DE*GEF*E555*1*A".parse().expect("valid");
        assert_eq!(id.as_str(), "DE*GEF*E555*1*A");
    }
}
