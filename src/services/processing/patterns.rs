//! Vocabulary and pattern tables used while discovering a timetable layout
//!
//! Every regular expression the importer relies on lives here, so the class
//! grammar and the noise vocabulary can be tested as plain tables.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::services::models::Day;

/// Rows scanned from the top of a sheet when looking for the class header
pub const HEADER_SEARCH_ROWS: usize = 15;
/// A header row must name at least this many classes
pub const MIN_HEADER_CLASSES: usize = 2;
/// Day labels are only looked for in the leftmost columns
pub const DAY_SEARCH_COLUMNS: usize = 5;
/// Column holding explicit lesson numbers (column B)
pub const LESSON_NUMBER_COLUMN: usize = 1;
pub const MAX_LESSON_NUMBER: u8 = 10;

/// Cell contents meaning "no lesson here"
pub const PLACEHOLDERS: [&str; 3] = ["-", "—", "–"];

/// Separators between a subject and its room, in priority order
pub const ROOM_SEPARATORS: [&str; 3] = [" - ", " – ", " — "];

/// One entry of the ordered class grammar
pub struct ClassPattern {
    pub name: &'static str,
    pub regex: Regex,
    extract: fn(&Captures) -> String,
}

impl ClassPattern {
    fn canonical(&self, normalized: &str) -> Option<String> {
        self.regex
            .captures(normalized)
            .map(|caps| (self.extract)(&caps))
    }
}

lazy_static! {
    /// Class grammar, tried in order; the first matching pattern names the class
    pub static ref CLASS_PATTERNS: Vec<ClassPattern> = vec![
        ClassPattern {
            name: "grade_with_section",
            regex: Regex::new(r"^([5-9])([АБВ])$").expect("valid class pattern"),
            extract: |caps| format!("{}{}", &caps[1], &caps[2]),
        },
        ClassPattern {
            name: "tenth_grade_profile",
            regex: Regex::new(r"^10([ПР])$").expect("valid class pattern"),
            extract: |caps| format!("10{}", &caps[1]),
        },
        ClassPattern {
            name: "eleventh_grade_profile",
            regex: Regex::new(r"^11Р$").expect("valid class pattern"),
            extract: |_| "11Р".to_string(),
        },
    ];

    /// Words that decorate header cells ("5А класс", "Расписание 1 смены")
    static ref NOISE_WORDS: Regex =
        Regex::new(r"(?i)класс[а-я]*|смен[а-я]*|урок[а-я]*|расписани[а-я]*|№")
            .expect("valid noise pattern");

    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid whitespace pattern");

    /// Leading one or two digit number, e.g. "3", "3.", "3 урок"
    static ref LESSON_NUMBER: Regex =
        Regex::new(r"^\s*(\d{1,2})(?:\D|$)").expect("valid lesson number pattern");

    /// Room label: digits followed by at most one letter ("201", "14а")
    static ref ROOM: Regex = Regex::new(r"^\d+\p{L}?$").expect("valid room pattern");

    /// Subject followed by a bare run of digits with no explicit separator
    static ref TRAILING_ROOM: Regex =
        Regex::new(r"^(.*\S)\s+(\d+)$").expect("valid trailing room pattern");
}

/// Uppercases a header cell and strips noise words and all whitespace
pub fn normalize_class_cell(text: &str) -> String {
    let without_noise = NOISE_WORDS.replace_all(text, " ");
    WHITESPACE
        .replace_all(&without_noise, "")
        .to_uppercase()
}

/// Canonical class name for a cell, if it matches the class grammar
pub fn match_class_name(text: &str) -> Option<String> {
    let normalized = normalize_class_cell(text);
    if normalized.is_empty() {
        return None;
    }
    CLASS_PATTERNS
        .iter()
        .find_map(|pattern| pattern.canonical(&normalized))
}

/// Whether a class name typed by a user belongs to the school's grammar
pub fn is_valid_class(text: &str) -> bool {
    let upper = text.trim().to_uppercase();
    CLASS_PATTERNS
        .iter()
        .any(|pattern| pattern.regex.is_match(&upper))
}

pub fn is_placeholder(text: &str) -> bool {
    PLACEHOLDERS.contains(&text.trim())
}

/// Whether a cell is nothing but a day name; subjects mentioning a day are not
pub fn is_day_name(text: &str) -> bool {
    Day::from_local_name(text).is_some()
}

/// Lesson number written in a cell, accepted only within 1..=10
pub fn parse_lesson_number(text: &str) -> Option<u8> {
    let caps = LESSON_NUMBER.captures(text)?;
    let number: u8 = caps[1].parse().ok()?;
    (1..=MAX_LESSON_NUMBER).contains(&number).then_some(number)
}

pub fn is_room_label(text: &str) -> bool {
    ROOM.is_match(text.trim())
}

/// Splits "Subject 201" into ("Subject", "201")
pub fn split_trailing_room(text: &str) -> Option<(String, String)> {
    TRAILING_ROOM
        .captures(text.trim())
        .map(|caps| (caps[1].trim().to_string(), caps[2].to_string()))
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}
