//! Publish-date extraction.
//!
//! A missing or unparsable date is not an error: legacy exports frequently
//! carry none, and the record keeps `None` for "unknown".

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::dom::{element_text, Document};
use crate::parser::strategy::{first_hit, Attempt};

/// Formats tried in order against every candidate string. Offset-aware
/// timestamps are handled by the RFC 3339 parser before this ladder.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%Y年%m月%d日 %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y年%m月%d日",
    "%Y.%m.%d",
];

pub fn extract(doc: &Document) -> Option<NaiveDateTime> {
    let attempts = vec![
        Attempt::new("json-ld datePublished", || hit(json_ld_date(doc))),
        Attempt::new("time datetime attr", || hit(time_attr(doc))),
        Attempt::new("time element text", || hit(time_text(doc))),
        Attempt::new("meta article:published_time", || {
            hit(doc.meta_content("meta[property='article:published_time']"))
        }),
        Attempt::new("meta pubdate", || hit(doc.meta_content("meta[name='pubdate']"))),
        Attempt::new("meta date", || hit(doc.meta_content("meta[name='date']"))),
        Attempt::new("date class", || hit(date_class_text(doc))),
    ];
    first_hit(attempts).ok()
}

/// Tries the known formats in order; the first that parses wins.
/// Offset-aware inputs keep their local wall-clock time.
pub fn parse_date_str(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Tolerant scan for `"datePublished"` inside JSON-LD blocks. Deliberately
/// not a JSON parser: these blocks are routinely malformed in the wild, so we
/// locate the key, skip the separator and read the quoted value up to the
/// next unescaped quote.
fn json_ld_date(doc: &Document) -> Option<String> {
    let scripts = doc.query("script[type='application/ld+json']").ok()?;
    scripts
        .iter()
        .find_map(|s| scan_date_published(&element_text(s)))
}

fn scan_date_published(json: &str) -> Option<String> {
    const KEY: &str = "\"datePublished\"";
    let idx = json.find(KEY)?;
    let remain = json[idx + KEY.len()..].trim_start_matches([':', ' ']);
    let mut chars = remain.chars();
    if chars.next() != Some('"') {
        return None;
    }
    let mut value = String::new();
    let mut escaped = false;
    for c in chars {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return Some(value),
            _ => {
                escaped = false;
                value.push(c);
            }
        }
    }
    None
}

fn time_attr(doc: &Document) -> Option<String> {
    let el = doc.query_first("time[datetime]").ok().flatten()?;
    el.value().attr("datetime").map(|v| v.to_string())
}

fn time_text(doc: &Document) -> Option<String> {
    let el = doc.query_first("time[datetime]").ok().flatten()?;
    Some(element_text(&el))
}

fn date_class_text(doc: &Document) -> Option<String> {
    let el = doc.query_first(".date").ok().flatten()?;
    Some(element_text(&el))
}

fn hit(candidate: Option<String>) -> Result<NaiveDateTime, String> {
    match candidate {
        None => Err("not found".to_string()),
        Some(s) => parse_date_str(&s).ok_or_else(|| format!("unparsable date {s:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32, hh: u32, mm: u32, ss: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hh, mm, ss)
            .unwrap()
    }

    #[test]
    fn accepted_formats() {
        let cases = [
            ("2023-12-01T10:30:00+09:00", date(2023, 12, 1, 10, 30, 0)),
            ("2023-11-15T14:20:00Z", date(2023, 11, 15, 14, 20, 0)),
            ("2023-10-20", date(2023, 10, 20, 0, 0, 0)),
            ("2023/09/15", date(2023, 9, 15, 0, 0, 0)),
            ("2023年8月10日", date(2023, 8, 10, 0, 0, 0)),
            ("2023年08月10日", date(2023, 8, 10, 0, 0, 0)),
            ("2023.07.25", date(2023, 7, 25, 0, 0, 0)),
            ("2023年6月12日 15:30", date(2023, 6, 12, 15, 30, 0)),
            ("2023-05-01 08:09:10", date(2023, 5, 1, 8, 9, 10)),
        ];
        for (input, want) in cases {
            assert_eq!(parse_date_str(input), Some(want), "input {input:?}");
        }
    }

    #[test]
    fn rejected_candidates() {
        assert_eq!(parse_date_str("invalid-date"), None);
        assert_eq!(parse_date_str(""), None);
    }

    #[test]
    fn json_ld_wins_over_time_element() {
        let doc = Document::parse(
            r#"<head><script type="application/ld+json">
            {"@type":"BlogPosting", "datePublished": "2023-12-01T10:30:00+09:00",}
            </script></head>
            <body><time datetime="2020-01-01">old</time></body>"#,
        );
        assert_eq!(extract(&doc), Some(date(2023, 12, 1, 10, 30, 0)));
    }

    #[test]
    fn time_text_is_a_secondary_attempt() {
        let doc = Document::parse(
            r#"<body><time datetime="not-a-date">2023/09/15</time></body>"#,
        );
        assert_eq!(extract(&doc), Some(date(2023, 9, 15, 0, 0, 0)));
    }

    #[test]
    fn meta_and_class_fallbacks() {
        let doc = Document::parse(r#"<head><meta name="date" content="2023/07/25"></head>"#);
        assert_eq!(extract(&doc), Some(date(2023, 7, 25, 0, 0, 0)));

        let doc = Document::parse(r#"<body><span class="date">2023.07.25</span></body>"#);
        assert_eq!(extract(&doc), Some(date(2023, 7, 25, 0, 0, 0)));
    }

    #[test]
    fn absence_is_none_not_an_error() {
        let doc = Document::parse("<body><p>undated post</p></body>");
        assert_eq!(extract(&doc), None);
    }

    #[test]
    fn tolerant_scan_reads_to_unescaped_quote() {
        assert_eq!(
            scan_date_published(r#"{"datePublished": "2023-10-20""#).as_deref(),
            Some("2023-10-20")
        );
        assert_eq!(scan_date_published(r#"{"datePublished": 42}"#), None);
        assert_eq!(scan_date_published("{}"), None);
    }
}
