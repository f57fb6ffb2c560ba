use serde::{Deserialize, Deserializer};
use std::{convert::Infallible, fmt, str::FromStr};

/// Sentinel the backend UI uses for "no filter".
pub const ALL_SENTINEL: &str = "todos";

/// One dashboard filter: a concrete value or everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum FilterValue {
    #[default]
    All,
    Only(String),
}

impl FilterValue {
    pub fn only(value: impl Into<String>) -> Self {
        FilterValue::Only(value.into())
    }

    pub fn as_param(&self) -> Option<&str> {
        match self {
            FilterValue::All => None,
            FilterValue::Only(value) => Some(value.as_str()),
        }
    }
}

impl FromStr for FilterValue {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case(ALL_SENTINEL)
            || trimmed.eq_ignore_ascii_case("all")
        {
            Ok(FilterValue::All)
        } else {
            Ok(FilterValue::Only(trimmed.to_string()))
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::All => write!(f, "{}", ALL_SENTINEL),
            FilterValue::Only(value) => write!(f, "{}", value),
        }
    }
}

impl<'de> Deserialize<'de> for FilterValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_default())
    }
}

/// Which filter a change targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Fuel,
    State,
    Vehicle,
}

/// Immutable copy of the filters taken when a fetch is triggered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSnapshot {
    pub fuel: FilterValue,
    pub state: FilterValue,
    pub vehicle: FilterValue,
}

impl FilterSnapshot {
    pub fn new(fuel: FilterValue, state: FilterValue, vehicle: FilterValue) -> Self {
        Self {
            fuel,
            state,
            vehicle,
        }
    }

    pub fn get(&self, kind: FilterKind) -> &FilterValue {
        match kind {
            FilterKind::Fuel => &self.fuel,
            FilterKind::State => &self.state,
            FilterKind::Vehicle => &self.vehicle,
        }
    }

    pub(crate) fn set(&mut self, kind: FilterKind, value: FilterValue) {
        match kind {
            FilterKind::Fuel => self.fuel = value,
            FilterKind::State => self.state = value,
            FilterKind::Vehicle => self.vehicle = value,
        }
    }

    /// Query parameters for the filtered endpoints; "all" filters are left out entirely.
    pub fn query_params(&self) -> Vec<(String, String)> {
        [
            ("tipo_combustivel", &self.fuel),
            ("estado", &self.state),
            ("tipo_veiculo", &self.vehicle),
        ]
        .into_iter()
        .filter_map(|(key, filter)| filter.as_param().map(|v| (key.to_string(), v.to_string())))
        .collect()
    }
}

/// Pagination cursor for the historical records table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current_page: u32,
    page_size: u32,
}

impl PageState {
    /// `page_size` of zero is bumped to one.
    pub fn new(page_size: u32) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn skip(&self) -> u64 {
        u64::from(self.current_page - 1) * u64::from(self.page_size)
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Moves to `page`; pages below 1 are rejected and leave the state untouched.
    pub fn go_to(&mut self, page: i64) -> bool {
        match u32::try_from(page) {
            Ok(page) if page >= 1 => {
                self.current_page = page;
                true
            }
            _ => false,
        }
    }
}
