use super::short_summary;

#[test]
fn short_summary_keeps_short_text() {
    assert_eq!(short_summary("Photosynthesis"), "Photosynthesis");
}

#[test]
fn short_summary_truncates_on_char_boundary() {
    let long = "é".repeat(70);
    let short = short_summary(&long);
    assert_eq!(short.chars().count(), 61);
    assert!(short.ends_with('…'));
}
