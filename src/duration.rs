/// Convert a human-entered duration into the canonical
/// `totalMinutes:remainderSeconds` form, e.g. `"1:05"` -> `"1:5"` and
/// `"1h 30m"` -> `"90:0"`. Returns `None` for empty input so the caller
/// can emit an explicit NULL. Input shapes are tried in order:
///
/// 1. `MM:SS` / `HH:MM:SS`, non-numeric segments read as zero
/// 2. `h`/`m` unit suffixes ("1h 30m", "45m")
/// 3. a bare integer, read as whole minutes
///
/// Anything else passes through unchanged. All numeric paths recompute
/// from total seconds before formatting, so seconds past 59 roll into
/// minutes exactly once.
pub fn parse_duration(input: &str) -> Option<String> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if s.contains(':') {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() == 2 {
            let total = digits_or_zero(parts[0])
                .saturating_mul(60)
                .saturating_add(digits_or_zero(parts[1]));
            return Some(format_total_seconds(total));
        }
        if parts.len() == 3 {
            let total = digits_or_zero(parts[0])
                .saturating_mul(3600)
                .saturating_add(digits_or_zero(parts[1]).saturating_mul(60))
                .saturating_add(digits_or_zero(parts[2]));
            return Some(format_total_seconds(total));
        }
        // Other colon counts fall through to the unit-suffix shapes.
    }

    let lower = s.to_lowercase();
    let mut hours = 0u64;
    let mut minutes = 0u64;
    if let Some(h_pos) = lower.find('h') {
        if let Some(h) = parse_all_digits(lower[..h_pos].trim()) {
            hours = h;
        }
    }
    if let Some(m_pos) = lower.find('m') {
        let mut part = &lower[..m_pos];
        if let Some(h_pos) = part.rfind('h') {
            part = &part[h_pos + 1..];
        }
        if let Some(m) = parse_all_digits(part.trim()) {
            minutes = m;
        }
    }
    if hours > 0 || minutes > 0 {
        let total = hours
            .saturating_mul(3600)
            .saturating_add(minutes.saturating_mul(60));
        return Some(format_total_seconds(total));
    }

    if let Some(m) = parse_all_digits(s) {
        return Some(format_total_seconds(m.saturating_mul(60)));
    }

    // Best effort: unparseable values are carried through as-is.
    Some(s.to_string())
}

fn format_total_seconds(total: u64) -> String {
    format!("{}:{}", total / 60, total % 60)
}

fn digits_or_zero(s: &str) -> u64 {
    parse_all_digits(s.trim()).unwrap_or(0)
}

fn parse_all_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u64>().ok()
}
