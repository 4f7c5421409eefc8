use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::CoreError;

/// Hold used for every step of the shout banner, whatever the tier.
pub const COOL_INTERVAL: Duration = Duration::from_millis(10);

/// Delay between two row launches in grid mode.
pub const ROW_STAGGER: Duration = Duration::from_millis(90);

/// Named speed setting.
///
/// # Example
/// ```
/// use hz_core::timing::SpeedTier;
/// let tier: SpeedTier = "high".parse().unwrap();
/// assert_eq!(tier, SpeedTier::High);
/// assert_eq!(SpeedTier::default(), SpeedTier::Middle);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedTier {
    /// Slowest reveal.
    Low,
    /// Default reveal speed.
    #[default]
    Middle,
    /// Fastest reveal.
    High,
}

impl SpeedTier {
    /// All tiers, slowest first.
    pub const ALL: [SpeedTier; 3] = [SpeedTier::Low, SpeedTier::Middle, SpeedTier::High];

    /// Lowercase name as accepted on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SpeedTier::Low => "low",
            SpeedTier::Middle => "middle",
            SpeedTier::High => "high",
        }
    }
}

impl fmt::Display for SpeedTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SpeedTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(SpeedTier::Low),
            "middle" => Ok(SpeedTier::Middle),
            "high" => Ok(SpeedTier::High),
            other => Err(CoreError::InvalidTier(other.to_string())),
        }
    }
}

/// Concrete hold durations for one tier.
///
/// # Example
/// ```
/// use hz_core::timing::{SpeedTier, Timing};
/// use std::time::Duration;
/// let t = Timing::for_tier(SpeedTier::High);
/// assert_eq!(t.row, Duration::from_millis(150));
/// assert_eq!(t.letter, Duration::from_millis(90));
/// assert_eq!(t.cool, Duration::from_millis(10));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// Hold for each single-letter flicker frame and for the completed line.
    pub row: Duration,
    /// Hold for each prefix frame. Also paces the dance.
    pub letter: Duration,
    /// Hold for each step of the shout banner.
    pub cool: Duration,
}

impl Timing {
    /// Timing profile of a tier.
    #[must_use]
    pub fn for_tier(tier: SpeedTier) -> Self {
        let (row, letter) = match tier {
            SpeedTier::Low => (600, 270),
            SpeedTier::Middle => (300, 180),
            SpeedTier::High => (150, 90),
        };
        Self {
            row: Duration::from_millis(row),
            letter: Duration::from_millis(letter),
            cool: COOL_INTERVAL,
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::for_tier(SpeedTier::default())
    }
}

/// Resolve a tier name into its timing profile.
///
/// The empty string selects the default tier.
///
/// # Errors
/// Returns [`CoreError::InvalidTier`] for any other unknown name.
///
/// # Example
/// ```
/// use hz_core::timing::resolve;
/// assert!(resolve("middle").is_ok());
/// assert!(resolve("turbo").is_err());
/// ```
pub fn resolve(tier: &str) -> Result<Timing, CoreError> {
    if tier.is_empty() {
        return Ok(Timing::default());
    }
    tier.parse().map(Timing::for_tier)
}
