use chrono::NaiveDateTime;

/// Builds the target file name:
/// `{prefix_}{YYYY-MM-DD HH.MM.SS}{ heightp}{ ratefps}{extension}`.
///
/// The resolution and frame rate segments are omitted entirely when their
/// value is empty. The extension is appended verbatim, leading dot included.
pub fn build_file_name(
    prefix: &str,
    timestamp: NaiveDateTime,
    resolution_height: &str,
    frame_rate: &str,
    extension: &str,
) -> String {
    let mut name = String::new();
    if !prefix.is_empty() {
        name.push_str(prefix);
        name.push('_');
    }
    name.push_str(&timestamp.format("%Y-%m-%d %H.%M.%S").to_string());
    if !resolution_height.is_empty() {
        name.push(' ');
        name.push_str(resolution_height);
        name.push('p');
    }
    if !frame_rate.is_empty() {
        name.push(' ');
        name.push_str(strip_trailing_zeros(frame_rate));
        name.push_str("fps");
    }
    name.push_str(extension);
    name
}

/// "29.970000" -> "29.97", "30.000000" -> "30." (the bare dot stays).
/// A rate without a decimal point passes through unchanged.
fn strip_trailing_zeros(rate: &str) -> &str {
    if rate.contains('.') {
        rate.trim_end_matches('0')
    } else {
        rate
    }
}
