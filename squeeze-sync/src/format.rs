//! Time formatting for the `*Text` fields

/// Format seconds as `H:MM:SS`, or `MM:SS` below one hour
///
/// Hours carry no leading zero; minutes and seconds are always two digits.
/// Negative input is treated as zero.
pub fn to_formatted_time(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds / 60) % 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "00:00")]
    #[case(5, "00:05")]
    #[case(65, "01:05")]
    #[case(599, "09:59")]
    #[case(3599, "59:59")]
    #[case(3600, "1:00:00")]
    #[case(3661, "1:01:01")]
    #[case(36_000, "10:00:00")]
    #[case(-3, "00:00")]
    fn test_to_formatted_time(#[case] seconds: i64, #[case] expected: &str) {
        assert_eq!(to_formatted_time(seconds), expected);
    }
}
