/// Arithmetic mean of the values. `None` when there are none.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty_is_none() {
        assert_eq!(mean(Vec::<f64>::new()), None);
    }

    #[test]
    fn test_mean_values() {
        assert_eq!(mean([1.0, 2.0, 3.0, 6.0]), Some(3.0));
        assert_eq!(mean(vec![0.5]), Some(0.5));
    }
}
