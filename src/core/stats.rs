//! 欄位統計工具。全部只處理非缺值，空輸入回傳 `None`。

use std::cmp::Ordering;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// 母體標準差 (ddof = 0)
pub fn population_std(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// 線性內插分位數：位置 = (n - 1) * q
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let pos = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// 出現次數最多的值；同票時取最小者
pub fn most_frequent<T, I>(values: I) -> Option<T>
where
    T: Ord + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts = std::collections::BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0usize) += 1;
    }
    // BTreeMap 依鍵遞增排列，max_by 遇同票保留後者，所以反向走訪
    counts
        .into_iter()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(value, _)| value)
}

/// 浮點數的全序包裝，讓數值能放進 `most_frequent`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderedF64(pub f64);

impl Eq for OrderedF64 {}

impl PartialOrd for OrderedF64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedF64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(mean(&values), Some(2.5));
        let std = population_std(&values).unwrap();
        assert!((std - 1.118033988749895).abs() < 1e-12);
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_quantile_linear_interpolation() {
        let values = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(quantile(&values, 0.25), Some(1.75));
        assert_eq!(quantile(&values, 0.75), Some(3.25));
        assert_eq!(median(&values), Some(2.5));
        assert_eq!(quantile(&[7.0], 0.99), Some(7.0));
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min_max(&[3.0, -1.0, 8.0]), Some((-1.0, 8.0)));
        assert_eq!(min_max(&[]), None);
    }

    #[test]
    fn test_most_frequent_breaks_ties_with_smallest() {
        assert_eq!(most_frequent(vec!["b", "a", "b", "a", "c"]), Some("a"));
        assert_eq!(most_frequent(vec!["x", "y", "y"]), Some("y"));

        let numbers = [3.0, 1.0, 3.0, 1.0].map(OrderedF64);
        assert_eq!(most_frequent(numbers), Some(OrderedF64(1.0)));
        assert_eq!(most_frequent(Vec::<&str>::new()), None);
    }
}
