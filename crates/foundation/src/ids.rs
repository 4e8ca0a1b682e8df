/// Forecast horizon index selecting which dataset snapshot is displayed.
///
/// Valid days are `1..=8`; construction through [`Day::new`] enforces the range.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(u8);

impl Day {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 8;

    pub fn new(day: u8) -> Result<Self, DayError> {
        if (Self::MIN..=Self::MAX).contains(&day) {
            Ok(Day(day))
        } else {
            Err(DayError::OutOfRange(day))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayError {
    OutOfRange(u8),
}

impl std::fmt::Display for DayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayError::OutOfRange(d) => write!(
                f,
                "day {d} out of range (expected {}..={})",
                Day::MIN,
                Day::MAX
            ),
        }
    }
}

impl std::error::Error for DayError {}

/// Monotonic epoch identifying one day-change request.
///
/// Every `load_day` call mints a strictly larger token; a response is only
/// applied while its token is still the current one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LoadToken(u64);

impl LoadToken {
    pub const fn new(n: u64) -> Self {
        LoadToken(n)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        LoadToken(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for LoadToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{Day, DayError, LoadToken};

    #[test]
    fn day_range_is_enforced() {
        assert_eq!(Day::new(1).map(Day::get), Ok(1));
        assert_eq!(Day::new(8).map(Day::get), Ok(8));
        assert_eq!(Day::new(0), Err(DayError::OutOfRange(0)));
        assert_eq!(Day::new(9), Err(DayError::OutOfRange(9)));
    }

    #[test]
    fn tokens_increase() {
        let t0 = LoadToken::default();
        let t1 = t0.next();
        assert!(t1 > t0);
        assert_eq!(t1.get(), 1);
    }
}
