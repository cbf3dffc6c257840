//! Best-effort coercion of free-form user input.

/// Parse a comma separated week list such as `"1, 3, 5-7, x"`.
///
/// Each token contributes its leading integer if it is positive; anything else
/// is dropped rather than rejected. Order and duplicates are kept as typed.
pub fn parse_weeks(text: &str) -> Vec<u32> {
    text.split(',')
        .filter_map(|token| leading_integer(token.trim()))
        .filter(|&week| week > 0)
        .collect()
}

pub fn format_weeks(weeks: &[u32]) -> String {
    weeks
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn leading_integer(token: &str) -> Option<u32> {
    let token = token.strip_prefix('+').unwrap_or(token);
    let digits = token
        .find(|c: char| !c.is_ascii_digit())
        .map_or(token, |end| &token[..end]);
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_positive_numbers_in_order() {
        assert_eq!(parse_weeks("3, 1,2 ,2"), [3, 1, 2, 2]);
    }

    #[test]
    fn drops_invalid_tokens() {
        assert_eq!(parse_weeks("1,,x, 0, -4, 5"), [1, 5]);
        assert!(parse_weeks("").is_empty());
    }

    #[test]
    fn takes_leading_digits() {
        assert_eq!(parse_weeks("3rd, 5-7, +8"), [3, 5, 8]);
    }

    #[test]
    fn formats_with_commas() {
        assert_eq!(format_weeks(&[1, 3, 5]), "1, 3, 5");
        assert_eq!(format_weeks(&[]), "");
    }
}
