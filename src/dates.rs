use chrono::{DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, TimeZone};

/// Trailing window of whole days, `[from, to)`, ending after today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncWindow {
    from: NaiveDate,
    to: NaiveDate,
}

impl SyncWindow {
    pub fn trailing(window_size_days: u32) -> Self {
        Self::ending_after(Local::now().date_naive(), window_size_days)
    }

    pub fn ending_after(today: NaiveDate, window_size_days: u32) -> Self {
        let to = today + Duration::days(1);
        let from = to - Duration::days(i64::from(window_size_days));
        Self { from, to }
    }

    pub fn from_date(&self) -> NaiveDate {
        self.from
    }

    pub fn to_date(&self) -> NaiveDate {
        self.to
    }

    /// Bounds as local midnights.
    pub fn bounds(&self) -> (DateTime<Local>, DateTime<Local>) {
        (local_midnight(self.from), local_midnight(self.to))
    }

    pub fn contains(&self, instant: &DateTime<FixedOffset>) -> bool {
        let (start, end) = self.bounds();
        *instant >= start && *instant < end
    }

    pub fn label(&self) -> String {
        format!(
            "{} → {}",
            self.from.format("%Y-%m-%d"),
            self.to.format("%Y-%m-%d")
        )
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn local_midnight(date: NaiveDate) -> DateTime<Local> {
    let result = Local.with_ymd_and_hms(date.year(), date.month(), date.day(), 0, 0, 0);
    result
        .earliest()
        .or_else(|| result.latest())
        .unwrap_or_else(Local::now)
}
