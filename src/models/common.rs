use serde::{Deserialize, Serialize};

/// Simple message response for lightweight endpoints (e.g., health)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Ledger tag for payment-sourced credits
pub const FEATURE_PAYMENT: &str = "PAYMENT";

/// Ledger tag for administrative credits and resets
pub const FEATURE_MANUAL: &str = "MANUAL";

/// Gated features with fixed credit costs.
///
/// The cost table is a closed enumeration: a feature without a price cannot
/// exist at runtime, so nothing is ever charged zero by accident. Strings
/// enter only at the API boundary via `from_str`, which rejects unknown
/// names with a client error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Feature {
    Order,
    TextProcessing,
    ImageProcessing,
}

impl Feature {
    /// Credit cost for one invocation of this feature
    pub fn cost(&self) -> i64 {
        match self {
            Feature::Order => 1,
            Feature::TextProcessing => 2,
            Feature::ImageProcessing => 10, // Images are more expensive
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ORDER" => Some(Self::Order),
            "TEXT_PROCESSING" => Some(Self::TextProcessing),
            "IMAGE_PROCESSING" => Some(Self::ImageProcessing),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Order => "ORDER",
            Self::TextProcessing => "TEXT_PROCESSING",
            Self::ImageProcessing => "IMAGE_PROCESSING",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl TransactionKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "credit" => Some(Self::Credit),
            "debit" => Some(Self::Debit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role carried in access token claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Member,
    Admin,
}

impl ActorRole {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "member" => Some(Self::Member),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }
}
