//! Challenge identifiers for the scoring layer.
//!
//! Each variant names one exploit scenario. The solved flags themselves live
//! in the server's challenge registry; this module only describes them.

use serde::{Deserialize, Serialize};

/// Challenge category, as shown on the score board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChallengeCategory {
    #[serde(rename = "Broken Access Control")]
    BrokenAccessControl,
    #[serde(rename = "Sensitive Data Exposure")]
    SensitiveDataExposure,
    #[serde(rename = "Improper Input Validation")]
    ImproperInputValidation,
}

/// A challenge tracked by the registry.
///
/// Serialized using the camelCase keys the score board and fixtures use,
/// e.g. `basketAccessChallenge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChallengeKey {
    /// View another user's shopping basket.
    BasketAccessChallenge,
    /// Access a confidential document in the FTP folder.
    DirectoryListingChallenge,
    /// Find the old easter egg.
    EasterEggLevelOneChallenge,
    /// Access a developer's forgotten backup file.
    ForgottenDevBackupChallenge,
    /// Access a salesman's forgotten backup file.
    ForgottenBackupChallenge,
    /// Access a misplaced SIEM signature file.
    MisplacedSignatureFileChallenge,
    /// Bypass a security control with a poison null byte.
    NullByteChallenge,
}

impl ChallengeKey {
    /// Every challenge, in score board order.
    pub const ALL: [Self; 7] = [
        Self::BasketAccessChallenge,
        Self::DirectoryListingChallenge,
        Self::EasterEggLevelOneChallenge,
        Self::ForgottenDevBackupChallenge,
        Self::ForgottenBackupChallenge,
        Self::MisplacedSignatureFileChallenge,
        Self::NullByteChallenge,
    ];

    /// Stable camelCase key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::BasketAccessChallenge => "basketAccessChallenge",
            Self::DirectoryListingChallenge => "directoryListingChallenge",
            Self::EasterEggLevelOneChallenge => "easterEggLevelOneChallenge",
            Self::ForgottenDevBackupChallenge => "forgottenDevBackupChallenge",
            Self::ForgottenBackupChallenge => "forgottenBackupChallenge",
            Self::MisplacedSignatureFileChallenge => "misplacedSignatureFileChallenge",
            Self::NullByteChallenge => "nullByteChallenge",
        }
    }

    /// Display name shown on the score board.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BasketAccessChallenge => "View Basket",
            Self::DirectoryListingChallenge => "Confidential Document",
            Self::EasterEggLevelOneChallenge => "Easter Egg",
            Self::ForgottenDevBackupChallenge => "Forgotten Developer Backup",
            Self::ForgottenBackupChallenge => "Forgotten Sales Backup",
            Self::MisplacedSignatureFileChallenge => "Misplaced Signature File",
            Self::NullByteChallenge => "Poison Null Byte",
        }
    }

    #[must_use]
    pub const fn category(self) -> ChallengeCategory {
        match self {
            Self::BasketAccessChallenge | Self::EasterEggLevelOneChallenge => {
                ChallengeCategory::BrokenAccessControl
            }
            Self::DirectoryListingChallenge
            | Self::ForgottenDevBackupChallenge
            | Self::ForgottenBackupChallenge
            | Self::MisplacedSignatureFileChallenge => ChallengeCategory::SensitiveDataExposure,
            Self::NullByteChallenge => ChallengeCategory::ImproperInputValidation,
        }
    }

    /// Position in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for ChallengeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Returned when parsing an unknown challenge key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown challenge: {0}")]
pub struct UnknownChallenge(pub String);

impl std::str::FromStr for ChallengeKey {
    type Err = UnknownChallenge;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|challenge| challenge.key() == s)
            .ok_or_else(|| UnknownChallenge(s.to_owned()))
    }
}
