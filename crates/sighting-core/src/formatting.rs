/// Line emitted by the per-animal count report.
///
/// # Examples
///
/// ```
/// use sighting_core::formatting::format_count_line;
///
/// assert_eq!(format_count_line("cat", 0), "cat count: 0");
/// assert_eq!(format_count_line("Buffalo", 1234), "Buffalo count: 1234");
/// ```
pub fn format_count_line(animal: &str, count: i64) -> String {
    format!("{} count: {}", animal, count)
}

/// Line emitted for each animal at or under the endangered threshold.
///
/// # Examples
///
/// ```
/// use sighting_core::formatting::format_endangered_line;
///
/// assert_eq!(format_endangered_line("fox"), "fox is endangered.");
/// ```
pub fn format_endangered_line(animal: &str) -> String {
    format!("{} is endangered.", animal)
}

/// Format an integer total with thousands separators.
///
/// # Examples
///
/// ```
/// use sighting_core::formatting::format_total;
///
/// assert_eq!(format_total(0), "0");
/// assert_eq!(format_total(1_234_567), "1,234,567");
/// assert_eq!(format_total(-9_876), "-9,876");
/// ```
pub fn format_total(value: i64) -> String {
    let grouped = group_thousands(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Join integer identifiers as `"1, 2, 3"`, or `"-"` when there are none.
pub fn format_id_list(ids: &[u32]) -> String {
    if ids.is_empty() {
        return "-".to_string();
    }
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// # Examples
///
/// ```
/// use sighting_core::formatting::percentage;
///
/// assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
