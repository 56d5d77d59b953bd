use dashmap::DashMap;
use std::sync::Arc;

use capital_rs::websocket::models::{OhlcUpdate, QuoteUpdate};

/// What the stream has told us about one epic.
#[derive(Debug, Clone, Default)]
pub struct EpicState {
    pub last_quote: Option<QuoteUpdate>,
    pub last_bar: Option<OhlcUpdate>,
    pub quotes: u64,
    pub bars: u64,
    pub min_spread: Option<f64>,
    pub max_spread: Option<f64>,
}

impl EpicState {
    pub fn apply_quote(&mut self, quote: QuoteUpdate) {
        let spread = quote.spread();
        self.min_spread = Some(self.min_spread.map_or(spread, |s| s.min(spread)));
        self.max_spread = Some(self.max_spread.map_or(spread, |s| s.max(spread)));
        self.quotes += 1;
        self.last_quote = Some(quote);
    }

    /// Counts every update, including repeats of the bar still forming.
    pub fn apply_bar(&mut self, bar: OhlcUpdate) {
        self.bars += 1;
        self.last_bar = Some(bar);
    }
}

#[derive(Clone, Debug, Default)]
pub struct Shared {
    pub epics: Arc<DashMap<String, EpicState>>,
}

impl Shared {
    pub fn new(epics: &[String]) -> Self {
        let map = DashMap::new();
        for e in epics {
            map.insert(e.clone(), EpicState::default());
        }
        Self { epics: Arc::new(map) }
    }

    /// Unknown epics are added on first sight.
    pub fn apply_quote(&self, quote: QuoteUpdate) {
        self.epics
            .entry(quote.epic.clone())
            .or_default()
            .apply_quote(quote);
    }

    pub fn apply_bar(&self, bar: OhlcUpdate) {
        self.epics
            .entry(bar.epic.clone())
            .or_default()
            .apply_bar(bar);
    }

    /// Copy out every epic, sorted by name.
    pub fn snapshot(&self) -> Vec<(String, EpicState)> {
        let mut out: Vec<(String, EpicState)> = self
            .epics
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}
