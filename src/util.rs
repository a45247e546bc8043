//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// This is intentionally simple (no nested/conditional logic).
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Normalize an answer for comparison: trim surrounding whitespace, lowercase.
pub fn normalize_answer(s: &str) -> String {
  s.trim().to_lowercase()
}

/// Percentage rounding used by all scoring paths: round-half-up on 100 * part/total.
/// Caller guarantees `total > 0`.
pub fn percent_rounded(part: usize, total: usize) -> u8 {
  let pct = (100.0 * part as f64 / total as f64).round();
  pct.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn template_replaces_all_occurrences() {
    let out = fill_template("{a} and {b} and {a}", &[("a", "x"), ("b", "y")]);
    assert_eq!(out, "x and y and x");
  }

  #[test]
  fn normalize_trims_and_lowercases() {
    assert_eq!(normalize_answer("  True \n"), "true");
    assert_eq!(normalize_answer("A Container For Storing Data"), "a container for storing data");
  }

  #[test]
  fn percent_rounds_half_up() {
    assert_eq!(percent_rounded(1, 3), 33);
    assert_eq!(percent_rounded(2, 3), 67);
    assert_eq!(percent_rounded(1, 2), 50);
    assert_eq!(percent_rounded(1, 8), 13); // 12.5 rounds up
    assert_eq!(percent_rounded(0, 5), 0);
    assert_eq!(percent_rounded(5, 5), 100);
  }
}
