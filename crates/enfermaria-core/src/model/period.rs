use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Window offered by the history listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryPeriod {
    #[default]
    Days15,
    Days30,
    Days60,
    /// Since 1 January of the current year
    YearToDate,
}

impl HistoryPeriod {
    pub fn label(&self) -> &'static str {
        match self {
            HistoryPeriod::Days15 => "15 dias",
            HistoryPeriod::Days30 => "30 dias",
            HistoryPeriod::Days60 => "60 dias",
            HistoryPeriod::YearToDate => "YTD",
        }
    }

    /// Day count for the listing query; year-to-date counts 1 January itself
    pub fn days_ago(&self, today: NaiveDate) -> i64 {
        match self {
            HistoryPeriod::Days15 => 15,
            HistoryPeriod::Days30 => 30,
            HistoryPeriod::Days60 => 60,
            HistoryPeriod::YearToDate => i64::from(today.ordinal()),
        }
    }
}

impl FromStr for HistoryPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "15" | "15 dias" => Ok(HistoryPeriod::Days15),
            "30" | "30 dias" => Ok(HistoryPeriod::Days30),
            "60" | "60 dias" => Ok(HistoryPeriod::Days60),
            "ytd" => Ok(HistoryPeriod::YearToDate),
            other => Err(format!("unknown history period '{}'", other)),
        }
    }
}

/// Days since admission, from a `dd/mm/YYYY` tenure
pub fn tenure_days(tenure: &str, today: NaiveDate) -> Option<i64> {
    let admission = NaiveDate::parse_from_str(tenure.trim(), "%d/%m/%Y").ok()?;
    Some((today - admission).num_days())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_year_to_date_includes_first_of_january() {
        assert_eq!(HistoryPeriod::YearToDate.days_ago(day(2024, 1, 1)), 1);
        assert_eq!(HistoryPeriod::YearToDate.days_ago(day(2024, 3, 1)), 61);
        assert_eq!(HistoryPeriod::Days30.days_ago(day(2024, 3, 1)), 30);
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!("YTD".parse::<HistoryPeriod>(), Ok(HistoryPeriod::YearToDate));
        assert_eq!("60 dias".parse::<HistoryPeriod>(), Ok(HistoryPeriod::Days60));
        assert!("90".parse::<HistoryPeriod>().is_err());
    }

    #[test]
    fn test_tenure_days() {
        assert_eq!(tenure_days("01/01/2024", day(2024, 1, 31)), Some(30));
        assert_eq!(tenure_days("2024-01-01", day(2024, 1, 31)), None);
        assert_eq!(tenure_days("Digite a data de admissão", day(2024, 1, 31)), None);
    }
}
