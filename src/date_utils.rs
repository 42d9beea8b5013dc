use chrono::{Datelike, Local, NaiveDate};

use crate::error::{AppError, AppResult};

/// Month abbreviations used for chart labels, indexed by `month0()`.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Named time window relative to the current date.
///
/// Any selector that is not recognized resolves to [`Period::All`], which
/// applies no filtering at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    Day,
    #[default]
    Month,
    Semester,
    Year,
    All,
}

impl Period {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "day" => Self::Day,
            "month" => Self::Month,
            "semester" => Self::Semester,
            "year" => Self::Year,
            _ => Self::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::Semester => "semester",
            Self::Year => "year",
            Self::All => "all",
        }
    }

    /// Dashboard caption, in the same locale as [`MONTH_ABBREVIATIONS`].
    pub fn label(&self) -> &'static str {
        match self {
            Self::Day => "Hoje",
            Self::Month => "Este Mês",
            Self::Semester => "Este Semestre",
            Self::Year => "Este Ano",
            Self::All => "Período",
        }
    }

    /// Whether `date` falls inside this period as seen from `today`.
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            Self::Day => date == today,
            Self::Month => date.year() == today.year() && date.month() == today.month(),
            Self::Semester => {
                let start = semester_start_month0(today);
                date.year() == today.year()
                    && date.month0() >= start
                    && date.month0() < start + 6
            }
            Self::Year => date.year() == today.year(),
            Self::All => true,
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait for query params that carry a period selector and an optional
/// `as_of` date pinning "today".
pub trait PeriodFilterable {
    fn period(&self) -> Option<&String>;
    fn as_of(&self) -> Option<&String>;

    fn resolve_period(&self) -> Period {
        self.period()
            .map(|p| Period::parse(p))
            .unwrap_or_default()
    }

    /// The pinned `as_of` date, or the clock when absent. A malformed
    /// `as_of` is rejected rather than replaced by the clock.
    fn resolve_today(&self) -> AppResult<NaiveDate> {
        match self.as_of().map(|d| d.trim()).filter(|d| !d.is_empty()) {
            Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map_err(|_| AppError::Validation(format!("Invalid as_of date '{}'", d))),
            None => Ok(today()),
        }
    }
}

/// The local calendar date. Only the HTTP edge reads the clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// First zero-based month index of the half-year containing `date`.
pub fn semester_start_month0(date: NaiveDate) -> u32 {
    if date.month0() < 6 {
        0
    } else {
        6
    }
}

pub fn month_abbreviation(date: NaiveDate) -> &'static str {
    MONTH_ABBREVIATIONS[date.month0() as usize]
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month `months` away from `date`'s month.
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let total_months = date.year() * 12 + date.month0() as i32 + months;
    let new_year = total_months.div_euclid(12);
    let new_month = (total_months.rem_euclid(12) + 1) as u32;
    NaiveDate::from_ymd_opt(new_year, new_month, 1).unwrap_or_else(|| month_start(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_known_and_unknown() {
        assert_eq!(Period::parse("day"), Period::Day);
        assert_eq!(Period::parse("Semester"), Period::Semester);
        assert_eq!(Period::parse(" year "), Period::Year);
        assert_eq!(Period::parse("fortnight"), Period::All);
        assert_eq!(Period::parse(""), Period::All);
    }

    #[test]
    fn test_day_is_calendar_day_not_rolling_window() {
        let today = d(2024, 3, 15);
        assert!(Period::Day.contains(d(2024, 3, 15), today));
        assert!(!Period::Day.contains(d(2024, 3, 14), today));
        assert!(!Period::Day.contains(d(2023, 3, 15), today));
    }

    #[test]
    fn test_semester_boundaries() {
        let spring = d(2024, 6, 30);
        assert!(Period::Semester.contains(d(2024, 1, 1), spring));
        assert!(!Period::Semester.contains(d(2024, 7, 1), spring));

        let autumn = d(2024, 7, 1);
        assert!(Period::Semester.contains(d(2024, 12, 31), autumn));
        assert!(!Period::Semester.contains(d(2024, 6, 30), autumn));
        assert!(!Period::Semester.contains(d(2023, 9, 1), autumn));
    }

    #[test]
    fn test_shift_months_across_years() {
        assert_eq!(shift_months(d(2024, 2, 29), -5), d(2023, 9, 1));
        assert_eq!(shift_months(d(2024, 11, 30), 2), d(2025, 1, 1));
        assert_eq!(shift_months(d(2024, 1, 31), 0), d(2024, 1, 1));
    }

    struct Params {
        as_of: Option<String>,
    }

    impl PeriodFilterable for Params {
        fn period(&self) -> Option<&String> {
            None
        }

        fn as_of(&self) -> Option<&String> {
            self.as_of.as_ref()
        }
    }

    #[test]
    fn test_resolve_today_rejects_malformed_as_of() {
        let pinned = Params {
            as_of: Some("2024-03-15".into()),
        };
        assert_eq!(pinned.resolve_today().unwrap(), d(2024, 3, 15));

        let bad = Params {
            as_of: Some("2024-13-45".into()),
        };
        assert!(matches!(bad.resolve_today(), Err(AppError::Validation(_))));

        let absent = Params { as_of: None };
        assert!(absent.resolve_today().is_ok());
    }

    #[test]
    fn test_labels_share_month_locale() {
        assert_eq!(Period::Month.label(), "Este Mês");
        assert_eq!(Period::Day.label(), "Hoje");
        assert_eq!(Period::parse("bogus").label(), "Período");
    }

    #[test]
    fn test_month_abbreviation() {
        assert_eq!(month_abbreviation(d(2024, 2, 10)), "Fev");
        assert_eq!(month_abbreviation(d(2024, 12, 1)), "Dez");
    }
}
