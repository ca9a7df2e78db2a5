// Duration strings -> milliseconds.
//
// Accepts the simple "<number><unit>" form and Go's time.Duration formatting
// ("1m30.5s", "2h0m1s"). Never fails: unusable input becomes 0.

const MS_PER_HOUR: f64 = 3_600_000.0;
const MS_PER_MINUTE: f64 = 60_000.0;
const MS_PER_SECOND: f64 = 1_000.0;
const US_PER_MS: f64 = 1_000.0;
const NS_PER_MS: f64 = 1_000_000.0;

/// Micro-second spellings: micro sign (U+00B5), Greek mu (U+03BC), ASCII.
const MICRO_SUFFIXES: [&str; 3] = ["\u{b5}s", "\u{3bc}s", "us"];

/// Normalize a raw duration to milliseconds.
///
/// Absent input is 0 (failed operations are often logged without a duration).
/// Negative values pass through unclamped; non-finite results become 0.
pub fn normalize(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };
    let s = raw.trim();
    let ms = parse_simple(s).or_else(|| parse_compound(s)).unwrap_or(0.0);
    if ms.is_finite() { ms } else { 0.0 }
}

/// Single unit suffix, checked ns, µs/us, ms, s; otherwise a bare number (taken as ms).
fn parse_simple(s: &str) -> Option<f64> {
    if let Some(v) = s.strip_suffix("ns") {
        return number(v).map(|n| n / NS_PER_MS);
    }
    for micro in MICRO_SUFFIXES {
        if let Some(v) = s.strip_suffix(micro) {
            return number(v).map(|n| n / US_PER_MS);
        }
    }
    if let Some(v) = s.strip_suffix("ms") {
        return number(v);
    }
    if let Some(v) = s.strip_suffix('s') {
        return number(v).map(|n| n * MS_PER_SECOND);
    }
    number(s)
}

fn number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

/// Sum of "<number><unit>" segments with an optional leading sign.
fn parse_compound(s: &str) -> Option<f64> {
    let (sign, mut rest) = match s.strip_prefix('-') {
        Some(r) => (-1.0, r),
        None => (1.0, s.strip_prefix('+').unwrap_or(s)),
    };
    if rest.is_empty() {
        return None;
    }
    let mut total = 0.0;
    while !rest.is_empty() {
        let num_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if num_end == 0 {
            return None;
        }
        let value: f64 = rest[..num_end].parse().ok()?;
        rest = &rest[num_end..];

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        total += value * unit_factor(&rest[..unit_end])?;
        rest = &rest[unit_end..];
    }
    Some(sign * total)
}

fn unit_factor(unit: &str) -> Option<f64> {
    match unit {
        "h" => Some(MS_PER_HOUR),
        "m" => Some(MS_PER_MINUTE),
        "s" => Some(MS_PER_SECOND),
        "ms" => Some(1.0),
        "ns" => Some(1.0 / NS_PER_MS),
        u if MICRO_SUFFIXES.contains(&u) => Some(1.0 / US_PER_MS),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_requires_unit_on_every_segment() {
        assert_eq!(parse_compound("1m30"), None);
        assert_eq!(parse_compound("1x"), None);
        assert_eq!(parse_compound(""), None);
    }

    #[test]
    fn compound_sums_segments() {
        assert_eq!(parse_compound("1h1m1s"), Some(3_661_000.0));
        assert_eq!(parse_compound("-1m"), Some(-60_000.0));
    }
}
