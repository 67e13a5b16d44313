//! The ordered, complete result of one scan.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};

use crate::outcome::Outcome;

/// Mapping from source name to [`Outcome`], in source registration order.
///
/// Built by the orchestrator and read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanReport {
    target: String,
    started_at: DateTime<Utc>,
    elapsed: Duration,
    entries: Vec<(String, Outcome)>,
}

impl ScanReport {
    pub fn new(target: impl Into<String>, entries: Vec<(String, Outcome)>) -> Self {
        Self {
            target: target.into(),
            started_at: Utc::now(),
            elapsed: Duration::ZERO,
            entries,
        }
    }

    pub(crate) fn timed(mut self, started_at: DateTime<Utc>, elapsed: Duration) -> Self {
        self.started_at = started_at;
        self.elapsed = elapsed;
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Wall-clock time of the whole scan.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn get(&self, source: &str) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|(name, _)| name == source)
            .map(|(_, outcome)| outcome)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Outcome)> {
        self.entries
            .iter()
            .map(|(name, outcome)| (name.as_str(), outcome))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn successes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .filter_map(|(name, outcome)| outcome.payload().map(|payload| (name, payload)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &Outcome)> {
        self.iter().filter(|(_, outcome)| !outcome.is_success())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct OrderedSources<'a>(&'a [(String, Outcome)]);

impl Serialize for OrderedSources<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, outcome) in self.0 {
            map.serialize_entry(name, outcome)?;
        }
        map.end()
    }
}

impl Serialize for ScanReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ScanReport", 4)?;
        state.serialize_field("target", &self.target)?;
        state.serialize_field("started_at", &self.started_at)?;
        state.serialize_field("elapsed_ms", &(self.elapsed.as_millis() as u64))?;
        state.serialize_field("sources", &OrderedSources(&self.entries))?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::FailureKind;

    fn sample() -> ScanReport {
        ScanReport::new(
            "https://example.com/",
            vec![
                ("wayback".into(), Outcome::success("12 captures")),
                ("nuclei".into(), Outcome::failure(FailureKind::ToolUnavailable, "not found")),
                ("shodan".into(), Outcome::success("ports: 443")),
            ],
        )
    }

    #[test]
    fn lookups_and_filters() {
        let report = sample();
        assert_eq!(report.len(), 3);
        assert_eq!(report.get("shodan"), Some(&Outcome::success("ports: 443")));
        assert!(report.get("missing").is_none());
        assert_eq!(report.successes().count(), 2);
        assert_eq!(report.failures().map(|(n, _)| n).collect::<Vec<_>>(), ["nuclei"]);
    }

    #[test]
    fn json_keeps_source_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        let wayback = json.find("\"wayback\"").unwrap();
        let nuclei = json.find("\"nuclei\"").unwrap();
        let shodan = json.find("\"shodan\"").unwrap();
        assert!(wayback < nuclei && nuclei < shodan);
    }
}
