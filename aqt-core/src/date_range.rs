use chrono::NaiveDate;

/// Iterator over every calendar day from the first date through the second,
/// both inclusive. Yields nothing when the end precedes the start.
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DayRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl DayRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            next: (start <= end).then_some(start),
            end,
        }
    }
}

impl Iterator for DayRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.succ_opt().filter(|d| *d <= self.end);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::DayRange;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn includes_both_ends() {
        let days: Vec<NaiveDate> = DayRange::new(ymd(2024, 2, 27), ymd(2024, 3, 1)).collect();
        assert_eq!(days.len(), 4, "2024 is a leap year");
        assert_eq!(days[0], ymd(2024, 2, 27));
        assert_eq!(days[2], ymd(2024, 2, 29));
        assert_eq!(days[3], ymd(2024, 3, 1));
    }

    #[test]
    fn single_day() {
        let day = ymd(2023, 3, 15);
        assert_eq!(DayRange::new(day, day).collect::<Vec<_>>(), vec![day]);
    }

    #[test]
    fn reversed_range_is_empty() {
        assert_eq!(DayRange::new(ymd(2023, 3, 15), ymd(2023, 3, 14)).count(), 0);
    }

    #[test]
    fn stops_at_max_date() {
        assert_eq!(DayRange::new(NaiveDate::MAX, NaiveDate::MAX).count(), 1);
    }
}
