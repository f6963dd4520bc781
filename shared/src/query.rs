use crate::config::PlaybackConfig;

/// Read/write access to the query string of the page address.
///
/// The browser implementation lives in the frontend; `MemoryQueryStore`
/// stands in for it in tests.
pub trait QueryStore {
    /// Value of `name` at the moment of the call.
    fn read_param(&self, name: &str) -> Option<String>;

    /// Replace or insert `name`, keeping every other parameter. Best effort.
    fn write_param(&mut self, name: &str, value: &str);
}

/// The two playback parameters as read at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySnapshot {
    pub year: Option<String>,
    pub paused: Option<String>,
}

impl QuerySnapshot {
    pub fn read(store: &impl QueryStore, config: &PlaybackConfig) -> Self {
        Self {
            year: store.read_param(&config.year_param),
            paused: store.read_param(&config.paused_param),
        }
    }

    /// Numeric `year` value, if present. Fractional values are truncated.
    pub fn initial_year(&self) -> Option<i32> {
        let raw = self.year.as_deref()?.trim();
        if let Ok(year) = raw.parse::<i32>() {
            return Some(year);
        }
        raw.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(|value| value.trunc() as i32)
    }

    /// Only the exact string `"true"` starts paused.
    pub fn starts_paused(&self) -> bool {
        self.paused.as_deref() == Some("true")
    }
}

/// Ordered in-memory query string. Values are stored verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryQueryStore {
    params: Vec<(String, String)>,
}

impl MemoryQueryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `?a=1&b=2` (the leading `?` is optional).
    pub fn from_query(query: &str) -> Self {
        let params = query
            .trim_start_matches('?')
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((name, value)) => (name.to_string(), value.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect();
        Self { params }
    }

    /// Serialize back to `?a=1&b=2`, or an empty string without params.
    pub fn to_query(&self) -> String {
        if self.params.is_empty() {
            return String::new();
        }
        let pairs: Vec<String> = self
            .params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        format!("?{}", pairs.join("&"))
    }
}

impl QueryStore for MemoryQueryStore {
    fn read_param(&self, name: &str) -> Option<String> {
        self.params
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, value)| value.clone())
    }

    fn write_param(&mut self, name: &str, value: &str) {
        match self.params.iter_mut().find(|(candidate, _)| candidate == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.params.push((name.to_string(), value.to_string())),
        }
    }
}
