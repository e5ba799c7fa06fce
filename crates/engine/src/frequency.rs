//! Recurrence frequencies shared by expenses and savings.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    Once,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
            Self::Once => "once",
        }
    }

    /// `false` only for [`Frequency::Once`].
    pub fn is_periodic(self) -> bool {
        !matches!(self, Self::Once)
    }

    /// The date one period after `date`, or `None` for [`Frequency::Once`]
    /// (and on calendar overflow).
    ///
    /// Month arithmetic clamps to the end of the month, so Jan 31 + 1 month is
    /// Feb 28 (or 29).
    pub fn next_date(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Daily => date.checked_add_days(Days::new(1)),
            Self::Weekly => date.checked_add_days(Days::new(7)),
            Self::Monthly => date.checked_add_months(Months::new(1)),
            Self::Quarterly => date.checked_add_months(Months::new(3)),
            Self::Yearly => date.checked_add_months(Months::new(12)),
            Self::Once => None,
        }
    }
}

impl TryFrom<&str> for Frequency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            "once" => Ok(Self::Once),
            other => Err(EngineError::InvalidInput(format!(
                "invalid frequency: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn next_date_steps_one_period() {
        let start = date(2026, 1, 31);
        assert_eq!(Frequency::Daily.next_date(start), Some(date(2026, 2, 1)));
        assert_eq!(Frequency::Weekly.next_date(start), Some(date(2026, 2, 7)));
        assert_eq!(Frequency::Monthly.next_date(start), Some(date(2026, 2, 28)));
        assert_eq!(Frequency::Quarterly.next_date(start), Some(date(2026, 4, 30)));
        assert_eq!(Frequency::Yearly.next_date(start), Some(date(2027, 1, 31)));
        assert_eq!(Frequency::Once.next_date(start), None);
    }

    #[test]
    fn parses_storage_names() {
        for freq in [
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::Monthly,
            Frequency::Quarterly,
            Frequency::Yearly,
            Frequency::Once,
        ] {
            assert_eq!(Frequency::try_from(freq.as_str()).unwrap(), freq);
        }
        assert!(Frequency::try_from("fortnightly").is_err());
    }
}
