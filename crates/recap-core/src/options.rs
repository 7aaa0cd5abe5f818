use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    #[serde(default)]
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

pub const MODE_CLASSIC: &str = "classic";
pub const MODE_MODERN: &str = "modern";

pub const MAX_AUDIO_BYTES: u64 = 100 * 1024 * 1024;

// How many years the wizard asks for; the service only keeps footage
// for the two most recent, so the list is capped below.
pub const YEAR_WINDOW: usize = 5;
const YEAR_CAP: usize = 2;

/// First entry is the default.
pub fn mode_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new(MODE_CLASSIC, "Classic (30 seconds)"),
        SelectOption::new(MODE_MODERN, "Full"),
    ]
}

pub fn default_mode() -> Option<SelectOption> {
    mode_options().into_iter().next()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilDate {
    pub year: i32,
    /// 1 through 12.
    pub month: u8,
}

impl CivilDate {
    pub fn new(year: i32, month: u8) -> Self {
        Self { year, month }
    }

    pub fn is_second_half(self) -> bool {
        self.month >= 7
    }
}

/// Most recent year first.
pub fn year_options(today: CivilDate, requested: usize) -> Vec<SelectOption> {
    (0..requested.min(YEAR_CAP))
        .map(|back| {
            let year = today.year - back as i32;
            SelectOption::new(year.to_string(), year.to_string())
        })
        .collect()
}

/// Early in the year a recap usually means last year; from July on it
/// means the current one.
pub fn default_year(today: CivilDate) -> Option<SelectOption> {
    let years = year_options(today, YEAR_WINDOW);
    let index = if today.is_second_half() { 0 } else { 1 };
    years.get(index).cloned()
}

pub fn find_by_value(options: &[SelectOption], value: &str) -> Option<SelectOption> {
    options.iter().find(|option| option.value == value).cloned()
}
