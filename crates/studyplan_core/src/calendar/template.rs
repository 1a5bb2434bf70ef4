//! Week-relative description templates.
//!
//! Three placeholder characters are rewritten, in this order, by literal
//! replacement:
//!
//! | Placeholder | Replacement |
//! |---|---|
//! | `=` | current week number |
//! | `<` | previous week number |
//! | `>` | next week number |
//!
//! Every other character, `%` included, is copied verbatim.

pub const CURRENT_WEEK_PLACEHOLDER: char = '=';
pub const PREVIOUS_WEEK_PLACEHOLDER: char = '<';
pub const NEXT_WEEK_PLACEHOLDER: char = '>';

/// Expands the week placeholders in `description` for `week_number`.
pub fn apply_template(week_number: u32, description: &str) -> String {
    let current = i64::from(week_number);
    [
        (CURRENT_WEEK_PLACEHOLDER, current),
        (PREVIOUS_WEEK_PLACEHOLDER, current - 1),
        (NEXT_WEEK_PLACEHOLDER, current + 1),
    ]
    .into_iter()
    .fold(description.to_string(), |text, (placeholder, value)| {
        if text.contains(placeholder) {
            text.replace(placeholder, &value.to_string())
        } else {
            text
        }
    })
}

/// Whether `description` contains any week placeholder.
pub fn has_placeholders(description: &str) -> bool {
    description.contains([
        CURRENT_WEEK_PLACEHOLDER,
        PREVIOUS_WEEK_PLACEHOLDER,
        NEXT_WEEK_PLACEHOLDER,
    ])
}

#[cfg(test)]
mod tests {
    use super::{apply_template, has_placeholders};

    #[test]
    fn replaces_current_and_next_week() {
        assert_eq!(
            apply_template(5, "Homework =, prep for >"),
            "Homework 5, prep for 6"
        );
    }

    #[test]
    fn replaces_previous_week() {
        assert_eq!(apply_template(5, "Review <"), "Review 4");
    }

    #[test]
    fn replaces_every_occurrence() {
        assert_eq!(apply_template(10, "= = < > >"), "10 10 9 11 11");
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(apply_template(3, "Read notes"), "Read notes");
        assert!(!has_placeholders("Read notes"));
    }

    #[test]
    fn percent_signs_are_literal() {
        assert_eq!(apply_template(2, "100% of week = %d %s"), "100% of week 2 %d %s");
    }

    #[test]
    fn first_week_has_previous_week_zero() {
        assert_eq!(apply_template(1, "<|=|>"), "0|1|2");
    }
}
