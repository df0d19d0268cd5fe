//! Worksheet selection for a shift

/// Sheet names a school is likely to use for `shift`, most specific first
pub fn shift_sheet_candidates(shift: &str) -> Vec<String> {
    let shift = shift.trim();
    vec![
        format!("{shift} смена"),
        format!("{shift} СМЕНА"),
        format!("{shift} Смена"),
        format!("{shift}смена"),
        format!("Смена {shift}"),
        format!("смена {shift}"),
        format!("{shift} shift"),
        format!("Shift {shift}"),
    ]
}

/// Picks the worksheet for `shift`.
///
/// Exact candidate names win, then the first sheet containing a candidate
/// (ignoring case), then the first sheet. Only an empty workbook yields `None`.
pub fn select_sheet<'a>(sheet_names: &'a [String], shift: &str) -> Option<&'a str> {
    let candidates = shift_sheet_candidates(shift);

    if let Some(name) = candidates
        .iter()
        .find_map(|candidate| sheet_names.iter().find(|name| *name == candidate))
    {
        return Some(name.as_str());
    }

    let lowered: Vec<String> = candidates.iter().map(|c| c.to_lowercase()).collect();
    if let Some(name) = sheet_names.iter().find(|name| {
        let name = name.to_lowercase();
        lowered.iter().any(|candidate| name.contains(candidate.as_str()))
    }) {
        tracing::debug!("Sheet '{name}' matched shift {shift} by substring");
        return Some(name.as_str());
    }

    let first = sheet_names.first()?;
    tracing::warn!("No sheet named for shift {shift}, falling back to first sheet '{first}'");
    Some(first.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_exact_match_wins() {
        let sheets = names(&["Смена 1", "2 смена", "1 смена"]);
        // "1 смена" is the first candidate template, so it beats "Смена 1"
        assert_eq!(select_sheet(&sheets, "1"), Some("1 смена"));
        assert_eq!(select_sheet(&sheets, "2"), Some("2 смена"));
    }

    #[test]
    fn test_substring_match_ignores_case() {
        let sheets = names(&["Титул", "Расписание 2 СМЕНА (осень)"]);
        assert_eq!(select_sheet(&sheets, "2"), Some("Расписание 2 СМЕНА (осень)"));
    }

    #[test]
    fn test_falls_back_to_first_sheet() {
        let sheets = names(&["Лист1", "Лист2"]);
        assert_eq!(select_sheet(&sheets, "1"), Some("Лист1"));
    }

    #[test]
    fn test_empty_workbook_has_no_sheet() {
        assert_eq!(select_sheet(&[], "1"), None);
    }

    #[test]
    fn test_shift_is_trimmed() {
        let sheets = names(&["Лист1", "1 смена"]);
        assert_eq!(select_sheet(&sheets, " 1 "), Some("1 смена"));
    }
}
