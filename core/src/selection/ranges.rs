use crate::error::{CsaSelectError, Result};

/// Parses a comma-separated list of integers and inclusive ranges
///
/// Each token is `n`, `a:b` or `a:step:b`. A range without a step counts
/// down when `a > b`. Values are returned in the order written.
///
/// # Example
///
/// ```
/// use csaselect_core::selection::parse_ints;
///
/// assert_eq!(parse_ints("1,3").unwrap(), vec![1, 3]);
/// assert_eq!(parse_ints("0:2,7").unwrap(), vec![0, 1, 2, 7]);
/// assert_eq!(parse_ints("6:-2:2").unwrap(), vec![6, 4, 2]);
/// assert!(parse_ints("1,,2").is_err());
/// ```
pub fn parse_ints(list: &str) -> Result<Vec<i64>> {
    let ranges = parse_ranges(list)?;
    Ok(ranges.iter().flat_map(IntRange::values).collect())
}

/// Parses an index list like [`parse_ints`], keeping only lists that fit `0..count`
///
/// Returns `Ok(None)` when any value lies outside `0..count`. Range ends are
/// checked before a range is expanded, so each range yields at most `count`
/// values however wide it is written.
///
/// # Example
///
/// ```
/// use csaselect_core::selection::parse_indices;
///
/// assert_eq!(parse_indices("0:2", 4).unwrap(), Some(vec![0, 1, 2]));
/// assert_eq!(parse_indices("0:3000000000", 4).unwrap(), None);
/// ```
pub fn parse_indices(list: &str, count: usize) -> Result<Option<Vec<usize>>> {
    let ranges = parse_ranges(list)?;
    let limit = i64::try_from(count).unwrap_or(i64::MAX);
    if !ranges.iter().all(|range| range.within(limit)) {
        return Ok(None);
    }

    Ok(Some(
        ranges
            .iter()
            .flat_map(IntRange::values)
            .filter_map(|n| usize::try_from(n).ok())
            .collect(),
    ))
}

/// One token of an index list: `first` to `last` inclusive, moving by `step`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IntRange {
    first: i64,
    step: i64,
    last: i64,
}

impl IntRange {
    fn single(n: i64) -> Self {
        IntRange {
            first: n,
            step: 1,
            last: n,
        }
    }

    /// Both ends lie in `0..limit`
    ///
    /// Every value a range yields lies between its ends, so this bounds the
    /// whole expansion.
    fn within(&self, limit: i64) -> bool {
        (0..limit).contains(&self.first) && (0..limit).contains(&self.last)
    }

    fn values(&self) -> impl Iterator<Item = i64> {
        let IntRange { first, step, last } = *self;
        std::iter::successors(Some(first), move |n| n.checked_add(step))
            .take_while(move |&n| if step > 0 { n <= last } else { n >= last })
    }
}

fn parse_ranges(list: &str) -> Result<Vec<IntRange>> {
    list.split(',')
        .map(|token| {
            let parts = token
                .split(':')
                .map(|part| parse_one(part, list))
                .collect::<Result<Vec<_>>>()?;

            match parts.as_slice() {
                [n] => Ok(IntRange::single(*n)),
                [first, last] => Ok(IntRange {
                    first: *first,
                    step: if first <= last { 1 } else { -1 },
                    last: *last,
                }),
                [first, step, last] => {
                    let ascending = first <= last;
                    if *step == 0 || ((*step > 0) != ascending && first != last) {
                        return Err(invalid(list));
                    }
                    Ok(IntRange {
                        first: *first,
                        step: *step,
                        last: *last,
                    })
                }
                _ => Err(invalid(list)),
            }
        })
        .collect()
}

fn parse_one(part: &str, list: &str) -> Result<i64> {
    part.trim().parse().map_err(|_| invalid(list))
}

fn invalid(list: &str) -> CsaSelectError {
    CsaSelectError::InvalidSequence(list.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("4", vec![4])]
    #[case("1,3", vec![1, 3])]
    #[case("3,1", vec![3, 1])]
    #[case("2:5", vec![2, 3, 4, 5])]
    #[case("5:2", vec![5, 4, 3, 2])]
    #[case("0:2:6", vec![0, 2, 4, 6])]
    #[case("0:2:5", vec![0, 2, 4])]
    #[case("3:3", vec![3])]
    #[case("1, 4:5 ,9", vec![1, 4, 5, 9])]
    fn test_parse_ints(#[case] list: &str, #[case] expected: Vec<i64>) {
        assert_eq!(parse_ints(list).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("1,")]
    #[case("1,,2")]
    #[case("1:2:3:4")]
    #[case("1:x")]
    #[case("1.5")]
    #[case("0:0:4")]
    #[case("4:1:0")]
    fn test_parse_ints_rejects(#[case] list: &str) {
        assert!(matches!(
            parse_ints(list),
            Err(CsaSelectError::InvalidSequence(_))
        ));
    }

    #[rstest]
    #[case("1,3", 4, Some(vec![1, 3]))]
    #[case("3:0", 4, Some(vec![3, 2, 1, 0]))]
    #[case("0:2:3", 4, Some(vec![0, 2]))]
    #[case("4", 4, None)]
    #[case("-1:2", 4, None)]
    #[case("0:3000000000", 4, None)]
    #[case("-9223372036854775808:9223372036854775807", 4, None)]
    #[case("0", 0, None)]
    fn test_parse_indices(
        #[case] list: &str,
        #[case] count: usize,
        #[case] expected: Option<Vec<usize>>,
    ) {
        assert_eq!(parse_indices(list, count).unwrap(), expected);
    }

    #[test]
    fn test_parse_indices_rejects_malformed_before_bounds() {
        assert!(matches!(
            parse_indices("0:99999999999,x", 4),
            Err(CsaSelectError::InvalidSequence(_))
        ));
    }

    #[test]
    fn test_range_stops_at_integer_limit() {
        let range = IntRange {
            first: i64::MAX - 1,
            step: 1,
            last: i64::MAX,
        };
        assert_eq!(range.values().collect::<Vec<_>>(), vec![i64::MAX - 1, i64::MAX]);
    }
}
