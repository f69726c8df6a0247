use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Type of time instants and durations.
///
/// Units are left to the caller (typically microseconds or milliseconds);
/// all analysis is exact integer arithmetic over this type.
pub type Time = u64;

/// Dense task identifier, equal to the task's position in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub usize);

impl TaskId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the hyperperiod of a task set is derived from its periods.
///
/// - `MaxPeriod`: the largest period. Exact only when every period divides
///   it; this is the historical behaviour and the default.
/// - `Lcm`: least common multiple of all periods, the textbook hyperperiod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HyperperiodMode {
    MaxPeriod,
    Lcm,
}

impl Default for HyperperiodMode {
    fn default() -> Self {
        HyperperiodMode::MaxPeriod
    }
}

impl HyperperiodMode {
    /// Fold one more period into an accumulated hyperperiod (0 = no tasks yet).
    ///
    /// Returns `None` if the LCM overflows [`Time`].
    pub fn combine(self, acc: Time, period: Time) -> Option<Time> {
        match self {
            HyperperiodMode::MaxPeriod => Some(acc.max(period)),
            HyperperiodMode::Lcm if acc == 0 => Some(period),
            HyperperiodMode::Lcm => (acc / gcd(acc, period)).checked_mul(period),
        }
    }
}

impl FromStr for HyperperiodMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "max_period" | "max" => Ok(HyperperiodMode::MaxPeriod),
            "lcm" => Ok(HyperperiodMode::Lcm),
            other => Err(format!(
                "invalid hyperperiod mode: {other} (expected \"max_period\" or \"lcm\")"
            )),
        }
    }
}

fn gcd(mut a: Time, mut b: Time) -> Time {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
