//! Compounding and contribution frequencies

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CalcError;

/// How often interest compounds or an installment is paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    #[serde(alias = "semi-annually", alias = "half_yearly", alias = "halfyearly")]
    HalfYearly,
    #[serde(alias = "annually", alias = "annual")]
    Yearly,
}

impl Frequency {
    pub const ALL: [Frequency; 6] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::HalfYearly,
        Frequency::Yearly,
    ];

    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Daily => 365,
            Frequency::Weekly => 52,
            Frequency::Monthly => 12,
            Frequency::Quarterly => 4,
            Frequency::HalfYearly => 2,
            Frequency::Yearly => 1,
        }
    }

    /// Calendar months between two installments (None below a month)
    pub fn months_per_period(&self) -> Option<u32> {
        match self {
            Frequency::Daily | Frequency::Weekly => None,
            Frequency::Monthly => Some(1),
            Frequency::Quarterly => Some(3),
            Frequency::HalfYearly => Some(6),
            Frequency::Yearly => Some(12),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::HalfYearly => "half-yearly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "half-yearly" | "half_yearly" | "semi-annually" => Ok(Frequency::HalfYearly),
            "yearly" | "annually" | "annual" => Ok(Frequency::Yearly),
            other => Err(CalcError::invalid("frequency", format!("unknown frequency '{}'", other))),
        }
    }
}

/// Unit a time period is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Days,
    Months,
    #[default]
    Years,
}

impl TimeUnit {
    pub fn to_years(&self, value: f64) -> f64 {
        match self {
            TimeUnit::Days => value / 365.0,
            TimeUnit::Months => value / 12.0,
            TimeUnit::Years => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periods_per_year() {
        assert_eq!(Frequency::Daily.periods_per_year(), 365);
        assert_eq!(Frequency::Quarterly.periods_per_year(), 4);
        assert_eq!(Frequency::HalfYearly.months_per_period(), Some(6));
        assert_eq!(Frequency::Weekly.months_per_period(), None);
    }

    #[test]
    fn test_wire_names() {
        let f: Frequency = serde_json::from_str("\"half-yearly\"").unwrap();
        assert_eq!(f, Frequency::HalfYearly);
        let f: Frequency = serde_json::from_str("\"semi-annually\"").unwrap();
        assert_eq!(f, Frequency::HalfYearly);
        let f: Frequency = serde_json::from_str("\"annually\"").unwrap();
        assert_eq!(f, Frequency::Yearly);
        assert_eq!(serde_json::to_string(&Frequency::HalfYearly).unwrap(), "\"half-yearly\"");
        assert_eq!("Quarterly".parse::<Frequency>().unwrap(), Frequency::Quarterly);
        assert!("fortnightly".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_time_unit() {
        assert_eq!(TimeUnit::Months.to_years(18.0), 1.5);
        assert_eq!(TimeUnit::Days.to_years(730.0), 2.0);
    }
}
