//! Reminder marker parser

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::model::Reminder;

/// Unchecked list-item marker stripped from the reminder text
const CHECKBOX_PREFIX: &str = "- [ ]";

const MARKER_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

// Text before the marker is matched lazily up to the nearest marker on the
// same line. Any of `\n`, `\r`, U+2028 and U+2029 ends a line.
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([^\n\r\x{2028}\x{2029}]*?)(\(gChat@(\d{4}-\d{2}-\d{2} \d{2}:\d{2})\))")
        .expect("reminder marker pattern is valid")
});

/// Extract every reminder from `text`, reading marker timestamps as local time
pub fn extract(text: &str) -> Vec<Reminder> {
    extract_in(text, &Local)
}

/// Extract every reminder from `text`, reading marker timestamps in `tz`
pub fn extract_in<Tz: TimeZone>(text: &str, tz: &Tz) -> Vec<Reminder> {
    MARKER_RE
        .captures_iter(text)
        .map(|caps| {
            let content = reminder_text(&caps[1]);
            let due = parse_due(&caps[3], tz);
            if due.is_none() {
                debug!("Unparsable reminder date {:?} for {:?}", &caps[3], content);
            }
            Reminder::new(content, due)
        })
        .collect()
}

fn reminder_text(prefix: &str) -> String {
    let text = prefix.trim();
    match text.strip_prefix(CHECKBOX_PREFIX) {
        Some(rest) => rest.trim().to_string(),
        None => text.to_string(),
    }
}

/// Resolve a marker timestamp in `tz`. Dates that do not exist (month 13, a
/// skipped DST hour) resolve to `None`; ambiguous local times take the
/// earlier instant.
fn parse_due<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw, MARKER_DATE_FORMAT).ok()?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_checkbox_item() {
        let reminders = extract_in("- [ ] Pay rent (gChat@2024-01-01 09:00)", &Utc);
        assert_eq!(
            reminders,
            vec![Reminder::new("Pay rent", Some(utc(2024, 1, 1, 9, 0)))]
        );
    }

    #[test]
    fn test_local_time_is_used_by_default() {
        let reminders = extract("Standup (gChat@2024-03-04 10:30)");
        let expected = Local
            .with_ymd_and_hms(2024, 3, 4, 10, 30, 0)
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(reminders[0].due, Some(expected));
    }

    #[test]
    fn test_two_markers_on_one_line() {
        let reminders = extract_in(
            "Call mom (gChat@2099-01-01 09:00) and buy milk (gChat@2099-01-02 09:00)",
            &Utc,
        );
        assert_eq!(reminders.len(), 2);
        assert_eq!(reminders[0].content, "Call mom");
        assert_eq!(reminders[0].due, Some(utc(2099, 1, 1, 9, 0)));
        assert_eq!(reminders[1].content, "and buy milk");
        assert_eq!(reminders[1].due, Some(utc(2099, 1, 2, 9, 0)));
    }

    #[test]
    fn test_count_matches_markers_across_lines() {
        let doc = "# Notes\n\
                   - [ ] First (gChat@2024-01-01 09:00)\n\
                   plain line without a reminder\n\
                   - [x] Done item (gChat@2024-01-02 09:00)\n\
                   \tIndented (gChat@2024-01-03 09:00)\n";
        let reminders = extract_in(doc, &Utc);
        let contents: Vec<&str> = reminders.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, vec!["First", "- [x] Done item", "Indented"]);
    }

    #[test]
    fn test_prefix_does_not_cross_lines() {
        let reminders = extract_in("heading\n(gChat@2024-01-01 09:00)", &Utc);
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].content, "");
    }

    #[test]
    fn test_carriage_return_ends_line() {
        let text = "- [ ] Old line\r- [ ] Call mom (gChat@2024-01-01 09:00)\r\n\
                    Para\u{2028}Water plants (gChat@2024-01-02 09:00)";
        let contents: Vec<String> = extract_in(text, &Utc)
            .into_iter()
            .map(|r| r.content)
            .collect();
        assert_eq!(contents, vec!["Call mom", "Water plants"]);
    }

    #[test]
    fn test_checkbox_only_stripped_at_start() {
        let reminders = extract_in("Note - [ ] inline (gChat@2024-01-01 09:00)", &Utc);
        assert_eq!(reminders[0].content, "Note - [ ] inline");
    }

    #[test]
    fn test_malformed_markers_are_ignored() {
        let doc = "a (gChat@) b (gChat@2024-01-01) c (gChat@2024-1-1 9:00) d (gChat 2024-01-01 09:00)";
        assert!(extract_in(doc, &Utc).is_empty());
    }

    #[test]
    fn test_impossible_date_yields_invalid_due() {
        let reminders = extract_in("Never (gChat@2024-13-45 25:99)", &Utc);
        assert_eq!(reminders, vec![Reminder::new("Never", None)]);
    }

    #[test]
    fn test_extract_is_restartable() {
        let doc = "One (gChat@2024-01-01 09:00)";
        assert_eq!(extract_in(doc, &Utc), extract_in(doc, &Utc));
    }

    #[test]
    fn test_nested_parentheses_kept_in_prefix() {
        let reminders = extract_in("Email (work) boss (gChat@2024-01-01 09:00)", &Utc);
        assert_eq!(reminders[0].content, "Email (work) boss");
    }
}
