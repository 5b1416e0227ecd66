/// UTF-8 byte-order marker some spreadsheet exports put in front of the text.
pub const BOM: char = '\u{FEFF}';

/// Drop a leading byte-order marker, if any.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BOM).unwrap_or(text)
}

/// Trim whitespace + strip one stray outer quote on each side.
///
/// The two ends are handled independently, so `"abc` becomes `abc`.
/// Doubled quotes inside the field are left alone.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);
    trimmed.to_string()
}

/// Case/space-insensitive key used to compare header names.
pub fn header_key(name: &str) -> String {
    name.trim().to_lowercase()
}
