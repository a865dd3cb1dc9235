use chrono::{DateTime, Utc};
use folio_shared_contracts::time::TimeService;

#[derive(Debug, Clone, Copy, Default)]
pub struct TimeServiceImpl;

impl TimeService for TimeServiceImpl {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_is_monotonic_enough() {
        let sut = TimeServiceImpl;

        let a = sut.now();
        let b = sut.now();

        assert!(a <= b);
    }
}
