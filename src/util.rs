use chrono::{DateTime, FixedOffset};

pub fn parse_match_date(date: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(date.trim()).ok()
}

// 2023-04-01T20:00:00+00:00 => 01/04/2023. Dates that don't parse are shown as-is.
pub fn display_date(date: &str) -> String {
    match parse_match_date(date) {
        Some(d) => d.format("%d/%m/%Y").to_string(),
        None => date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_date_uses_day_first() {
        assert_eq!(display_date("2023-04-01T20:00:00+00:00"), "01/04/2023");
        assert_eq!(display_date("2023-12-06T22:00:00-03:00"), "06/12/2023");
        assert_eq!(display_date(""), "");
        assert_eq!(display_date("amanhã"), "amanhã");
    }
}
