//! Sort orders and time windows accepted by listing endpoints.

use std::fmt;
use std::str::FromStr;

/// How links in a listing are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkSortType {
    #[default]
    Hot,
    New,
    Top,
    Controversial,
}

impl LinkSortType {
    pub fn path(&self) -> &'static str {
        match self {
            LinkSortType::Hot => "hot",
            LinkSortType::New => "new",
            LinkSortType::Top => "top",
            LinkSortType::Controversial => "controversial",
        }
    }

    /// Whether the `t` time window parameter means anything for this sort.
    pub fn uses_time_filter(&self) -> bool {
        matches!(self, LinkSortType::Top | LinkSortType::Controversial)
    }
}

/// Time window for `top` and `controversial` listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilterWithin {
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeFilterWithin {
    pub fn param(&self) -> &'static str {
        match self {
            TimeFilterWithin::Hour => "hour",
            TimeFilterWithin::Day => "day",
            TimeFilterWithin::Week => "week",
            TimeFilterWithin::Month => "month",
            TimeFilterWithin::Year => "year",
            TimeFilterWithin::All => "all",
        }
    }
}

/// Ordering of a comment tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentSort {
    #[default]
    Confidence,
    Top,
    New,
    Controversial,
    Old,
    Random,
    Qa,
}

impl CommentSort {
    pub fn param(&self) -> &'static str {
        match self {
            CommentSort::Confidence => "confidence",
            CommentSort::Top => "top",
            CommentSort::New => "new",
            CommentSort::Controversial => "controversial",
            CommentSort::Old => "old",
            CommentSort::Random => "random",
            CommentSort::Qa => "qa",
        }
    }
}

macro_rules! string_enum {
    ($ty:ident, $method:ident, [$($variant:ident),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(self.$method())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                $(
                    if $ty::$variant.$method() == wanted {
                        return Ok($ty::$variant);
                    }
                )+
                let choices = [$($ty::$variant.$method()),+];
                Err(format!("unknown value {:?}, expected one of: {}", s, choices.join(", ")))
            }
        }
    };
}

string_enum!(LinkSortType, path, [Hot, New, Top, Controversial]);
string_enum!(TimeFilterWithin, param, [Hour, Day, Week, Month, Year, All]);
string_enum!(CommentSort, param, [Confidence, Top, New, Controversial, Old, Random, Qa]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_parse_case_insensitively() {
        assert_eq!("TOP".parse::<LinkSortType>(), Ok(LinkSortType::Top));
        assert_eq!("week".parse::<TimeFilterWithin>(), Ok(TimeFilterWithin::Week));
        assert_eq!("qa".parse::<CommentSort>(), Ok(CommentSort::Qa));
        assert!("rising".parse::<LinkSortType>().is_err());
    }

    #[test]
    fn only_top_and_controversial_use_time_filter() {
        assert!(!LinkSortType::Hot.uses_time_filter());
        assert!(!LinkSortType::New.uses_time_filter());
        assert!(LinkSortType::Top.uses_time_filter());
        assert!(LinkSortType::Controversial.uses_time_filter());
    }
}
