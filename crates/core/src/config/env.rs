/// True only for the literal value `false`.
///
/// Feature switches default to on; `0`, `no` or `FALSE` keep them on.
pub fn is_false_flag(raw: Option<&str>) -> bool {
    raw.map(str::trim) == Some("false")
}

/// Trim a value and drop it when empty.
pub fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
