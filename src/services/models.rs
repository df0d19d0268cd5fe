use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// School day a lesson belongs to. Stored and exchanged by its English code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    pub const ALL: [Day; 6] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
        }
    }

    /// Lowercase day name as printed in the school's spreadsheets
    pub fn local_name(self) -> &'static str {
        match self {
            Day::Monday => "понедельник",
            Day::Tuesday => "вторник",
            Day::Wednesday => "среда",
            Day::Thursday => "четверг",
            Day::Friday => "пятница",
            Day::Saturday => "суббота",
        }
    }

    pub fn from_code(code: &str) -> Option<Day> {
        Day::ALL.into_iter().find(|day| day.code() == code)
    }

    /// Day whose local name is the whole of `text`, ignoring case and padding
    pub fn from_local_name(text: &str) -> Option<Day> {
        let lowered = text.trim().to_lowercase();
        Day::ALL
            .into_iter()
            .find(|day| day.local_name() == lowered)
    }

    /// First day whose local name occurs anywhere in `text`, ignoring case
    pub fn find_in(text: &str) -> Option<Day> {
        let lowered = text.to_lowercase();
        Day::ALL
            .into_iter()
            .find(|day| lowered.contains(day.local_name()))
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Day {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_lowercase();
        Day::from_code(&trimmed)
            .or_else(|| Day::from_local_name(&trimmed))
            .ok_or_else(|| anyhow::anyhow!("Unknown day: {s}"))
    }
}

/// One lesson extracted from a timetable sheet
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct LessonRecord {
    pub class_name: String,
    pub day: Day,
    pub lesson_number: u8,
    pub subject: String,
    pub teacher: Option<String>,
    pub room: Option<String>,
    pub shift: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_codes_round_trip() {
        for day in Day::ALL {
            assert_eq!(Day::from_code(day.code()), Some(day));
            assert_eq!(day.code().parse::<Day>().unwrap(), day);
        }
        assert_eq!(Day::from_code("sunday"), None);
    }

    #[test]
    fn test_day_parses_local_names() {
        assert_eq!("Среда".parse::<Day>().unwrap(), Day::Wednesday);
        assert_eq!(" суббота ".parse::<Day>().unwrap(), Day::Saturday);
        assert!("воскресенье".parse::<Day>().is_err());
    }

    #[test]
    fn test_find_in_matches_anywhere_ignoring_case() {
        assert_eq!(Day::find_in("ПОНЕДЕЛЬНИК"), Some(Day::Monday));
        assert_eq!(Day::find_in("  Вторник, 2 смена"), Some(Day::Tuesday));
        assert_eq!(Day::find_in("Физика"), None);
    }

    #[test]
    fn test_from_local_name_needs_the_whole_cell() {
        assert_eq!(Day::from_local_name(" СРЕДА "), Some(Day::Wednesday));
        assert_eq!(Day::from_local_name("Окружающая среда"), None);
        assert_eq!(Day::from_local_name("вторник, 2 смена"), None);
    }

    #[test]
    fn test_day_serializes_as_code() {
        let json = serde_json::to_string(&Day::Thursday).unwrap();
        assert_eq!(json, r#""thursday""#);
    }
}
