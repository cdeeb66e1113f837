use chrono::{Datelike, NaiveDate};

pub const PLACEHOLDER: &str = "—";

pub fn release_year(date: Option<&str>) -> Option<i32> {
    let date = date?.trim();
    if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Some(parsed.year());
    }
    date.get(..4).and_then(|y| y.parse().ok())
}

pub fn format_runtime(minutes: Option<u32>) -> String {
    match minutes {
        Some(m) => format!("{}h {}m", m / 60, m % 60),
        None => PLACEHOLDER.to_string(),
    }
}

/// Whole dollars with thousands separators; zero means unknown on TMDB.
pub fn format_money(amount: Option<u64>) -> String {
    match amount {
        Some(n) if n > 0 => {
            let digits = n.to_string();
            let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
            out.push('$');
            for (i, c) in digits.chars().enumerate() {
                if i > 0 && (digits.len() - i) % 3 == 0 {
                    out.push(',');
                }
                out.push(c);
            }
            out
        }
        _ => PLACEHOLDER.to_string(),
    }
}

pub fn format_rating(vote_average: Option<f64>, missing: &str) -> String {
    match vote_average {
        Some(v) => format!("{v:.1}"),
        None => missing.to_string(),
    }
}

pub fn join_or_placeholder<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = items
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        joined
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_splits_hours_and_minutes() {
        assert_eq!(format_runtime(Some(148)), "2h 28m");
        assert_eq!(format_runtime(Some(0)), "0h 0m");
        assert_eq!(format_runtime(None), "—");
    }

    #[test]
    fn money_groups_thousands() {
        assert_eq!(format_money(Some(160_000_000)), "$160,000,000");
        assert_eq!(format_money(Some(999)), "$999");
        assert_eq!(format_money(Some(1_000)), "$1,000");
        assert_eq!(format_money(Some(0)), "—");
        assert_eq!(format_money(None), "—");
    }

    #[test]
    fn year_from_release_date() {
        assert_eq!(release_year(Some("2010-07-15")), Some(2010));
        assert_eq!(release_year(Some("1999")), Some(1999));
        assert_eq!(release_year(Some("")), None);
        assert_eq!(release_year(None), None);
    }

    #[test]
    fn rating_uses_one_decimal() {
        assert_eq!(format_rating(Some(8.369), "N/A"), "8.4");
        assert_eq!(format_rating(Some(0.0), "N/A"), "0.0");
        assert_eq!(format_rating(None, "—"), "—");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn join_skips_empty_names() {
        assert_eq!(join_or_placeholder(["English", "", "French"]), "English, French");
        assert_eq!(join_or_placeholder(Vec::<String>::new()), "—");
    }
}
