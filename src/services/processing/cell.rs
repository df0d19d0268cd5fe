//! Decomposition of one timetable cell into subject, teacher and room

use super::grid::CellGrid;
use super::patterns::{
    ROOM_SEPARATORS, collapse_whitespace, is_day_name, is_placeholder, is_room_label,
    split_trailing_room,
};
use super::structure::ClassColumnMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellParts {
    pub subject: String,
    pub teacher: Option<String>,
    pub room: Option<String>,
}

/// Splits free text such as "Физика (Иванов) - 201".
///
/// The teacher is the first parenthesised segment. With a " - " separator the
/// left side is the subject and the right side is the room when it looks like
/// a room label. Without one, a trailing run of digits is the room.
pub fn decompose(text: &str) -> CellParts {
    let (working, teacher) = take_teacher(text);
    let working = collapse_whitespace(&working);

    let (subject, room) = match split_on_separator(&working) {
        Some((left, right)) => {
            let room = is_room_label(right).then(|| right.trim().to_string());
            (left.trim().to_string(), room)
        }
        None => match split_trailing_room(&working) {
            Some((subject, room)) => (subject, Some(room)),
            None => (working.clone(), None),
        },
    };

    CellParts {
        subject,
        teacher,
        room,
    }
}

/// Room written in the column right of a class cell, for sheets that keep
/// rooms in their own column
pub fn adjacent_room(
    grid: &CellGrid,
    row: usize,
    col: usize,
    classes: &ClassColumnMap,
) -> Option<String> {
    let neighbour = col + 1;
    if classes.is_class_column(neighbour) {
        return None;
    }
    grid.cell(row, neighbour)
        .filter(|text| !is_placeholder(text) && !is_day_name(text))
        .map(str::to_string)
}

fn take_teacher(text: &str) -> (String, Option<String>) {
    let Some(open) = text.find('(') else {
        return (text.to_string(), None);
    };
    let Some(close) = text[open..].find(')').map(|offset| open + offset) else {
        return (text.to_string(), None);
    };

    let teacher = text[open + 1..close].trim();
    let remaining = format!("{} {}", &text[..open], &text[close + 1..]);
    let teacher = (!teacher.is_empty()).then(|| collapse_whitespace(teacher));
    (remaining, teacher)
}

fn split_on_separator(text: &str) -> Option<(&str, &str)> {
    ROOM_SEPARATORS
        .iter()
        .filter_map(|sep| text.find(sep).map(|pos| (pos, sep.len())))
        .min_by_key(|&(pos, _)| pos)
        .map(|(pos, len)| (&text[..pos], &text[pos + len..]))
}
