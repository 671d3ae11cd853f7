use std::collections::HashMap;
use std::hash::Hash;

/// Key → count table that remembers the order keys were first seen in.
///
/// The mode is the key with the highest count; when counts tie, the key that
/// was inserted first wins.
#[derive(Debug, Clone)]
pub(crate) struct FrequencyTable<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, usize)>,
}

impl<K: Copy + Eq + Hash> FrequencyTable<K> {
    pub(crate) fn new() -> Self {
        FrequencyTable {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub(crate) fn increment(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    pub(crate) fn count(&self, key: &K) -> usize {
        self.index.get(key).map_or(0, |&slot| self.entries[slot].1)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn mode(&self) -> Option<K> {
        let mut best: Option<(K, usize)> = None;
        for &(key, count) in &self.entries {
            // strictly greater, so earlier keys keep ties
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((key, count));
            }
        }
        best.map(|(key, _)| key)
    }
}

/// Parse a CSS-like font size such as `"12px"`, `"12.5px"` or `"9"`.
///
/// Returns `None` for anything that is not a finite number.
pub(crate) fn parse_font_size_px(style: &str) -> Option<f64> {
    let trimmed = style.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim_end();
    match number.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

/// Round to the nearest integer with halves going towards positive infinity.
pub(crate) fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn mode_picks_highest_count() {
        let mut table = FrequencyTable::new();
        for key in [3, 7, 7, 3, 7] {
            table.increment(key);
        }
        assert_eq!(table.mode(), Some(7));
        assert_eq!(table.count(&7), 3);
        assert_eq!(table.count(&3), 2);
        assert_eq!(table.count(&99), 0);
        assert_eq!(table.len(), 2);
    }

    #[test_log::test]
    fn mode_tie_goes_to_first_inserted() {
        let mut table = FrequencyTable::new();
        for key in [40, 10, 10, 40] {
            table.increment(key);
        }
        assert_eq!(table.mode(), Some(40));

        let mut table = FrequencyTable::new();
        for key in [-5, 12] {
            table.increment(key);
        }
        assert_eq!(table.mode(), Some(-5));
    }

    #[test_log::test]
    fn empty_table_has_no_mode() {
        let table: FrequencyTable<i64> = FrequencyTable::new();
        assert_eq!(table.mode(), None);
    }

    #[test_log::test]
    fn font_size_parsing() {
        assert_eq!(parse_font_size_px("12px"), Some(12.0));
        assert_eq!(parse_font_size_px("12.5px"), Some(12.5));
        assert_eq!(parse_font_size_px(" 9 "), Some(9.0));
        assert_eq!(parse_font_size_px("9.75 px"), Some(9.75));
        assert_eq!(parse_font_size_px(""), None);
        assert_eq!(parse_font_size_px("px"), None);
        assert_eq!(parse_font_size_px("large"), None);
        assert_eq!(parse_font_size_px("12em"), None);
        assert_eq!(parse_font_size_px("NaNpx"), None);
        assert_eq!(parse_font_size_px("infpx"), None);
    }

    #[test_log::test]
    fn rounding_halves_go_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.51), -3);
        assert_eq!(round_half_up(0.0), 0);
    }
}
