//! Per-airport runways, frequencies and navaids.

use std::cmp::Ordering;
use std::collections::HashMap;

/// Maximum navaids returned for one airport.
pub const MAX_NAVAIDS: usize = 50;

const SEPARATOR: &str = " • ";

fn or_placeholder<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(placeholder)
}

/// A runway belonging to an airport.
#[derive(Debug, Clone, PartialEq)]
pub struct Runway {
    pub airport_ident: String,
    /// Low-end designator, e.g. "07".
    pub le_ident: Option<String>,
    /// High-end designator, e.g. "25".
    pub he_ident: Option<String>,
    pub length_ft: Option<u32>,
    pub surface: Option<String>,
    pub lighted: bool,
    pub closed: bool,
}

impl Runway {
    /// One-line description, e.g. `07/25 • 12001 ft • ASP • Lighted`.
    pub fn summary(&self) -> String {
        let length = self
            .length_ft
            .map(|l| l.to_string())
            .unwrap_or_else(|| "?".to_string());
        let mut text = format!(
            "{}/{}{}{} ft{}{}",
            or_placeholder(self.le_ident.as_deref(), "?"),
            or_placeholder(self.he_ident.as_deref(), "?"),
            SEPARATOR,
            length,
            SEPARATOR,
            or_placeholder(self.surface.as_deref(), "?"),
        );

        let flags: Vec<&str> = [(self.lighted, "Lighted"), (self.closed, "Closed")]
            .into_iter()
            .filter_map(|(set, label)| set.then_some(label))
            .collect();
        if !flags.is_empty() {
            text.push_str(SEPARATOR);
            text.push_str(&flags.join(", "));
        }
        text
    }
}

/// A radio frequency published for an airport.
#[derive(Debug, Clone, PartialEq)]
pub struct Frequency {
    pub airport_ident: String,
    /// Service type, e.g. "TWR".
    pub kind: Option<String>,
    pub description: Option<String>,
    pub mhz: Option<f64>,
}

impl Frequency {
    /// One-line description, e.g. `TWR • 118.1 MHz`, followed by the
    /// description when there is one.
    pub fn summary(&self) -> String {
        let mhz = self
            .mhz
            .map(|f| f.to_string())
            .unwrap_or_else(|| "?".to_string());
        let head = format!(
            "{}{}{} MHz",
            or_placeholder(self.kind.as_deref(), "UNK"),
            SEPARATOR,
            mhz
        );
        match self.description.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(desc) => format!("{} — {}", head, desc),
            None => head,
        }
    }
}

/// A navaid associated with an airport.
#[derive(Debug, Clone, PartialEq)]
pub struct Navaid {
    pub airport_ident: String,
    /// Navaid type, e.g. "VOR-DME".
    pub kind: Option<String>,
    pub ident: Option<String>,
    pub name: Option<String>,
    pub khz: Option<f64>,
}

impl Navaid {
    /// One-line description, e.g. `VOR-DME MMV • 112500 kHz • Chennai`.
    pub fn summary(&self) -> String {
        let mut parts = vec![format!(
            "{} {}",
            or_placeholder(self.kind.as_deref(), "NAV"),
            or_placeholder(self.ident.as_deref(), "?")
        )];
        if let Some(khz) = self.khz {
            parts.push(format!("{} kHz", khz));
        }
        if let Some(name) = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            parts.push(name.to_string());
        }
        parts.join(SEPARATOR)
    }
}

/// Details for one airport, already sorted for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AirportDetails {
    pub runways: Vec<Runway>,
    pub frequencies: Vec<Frequency>,
    pub navaids: Vec<Navaid>,
}

impl AirportDetails {
    pub fn is_empty(&self) -> bool {
        self.runways.is_empty() && self.frequencies.is_empty() && self.navaids.is_empty()
    }
}

/// Details grouped by airport ident.
#[derive(Debug, Default)]
pub struct AirportDetailsIndex {
    by_ident: HashMap<String, AirportDetails>,
}

impl AirportDetailsIndex {
    /// Group records by trimmed airport ident and sort each group once.
    pub fn new(runways: Vec<Runway>, frequencies: Vec<Frequency>, navaids: Vec<Navaid>) -> Self {
        let mut by_ident: HashMap<String, AirportDetails> = HashMap::new();

        for runway in runways {
            let key = runway.airport_ident.trim().to_string();
            if !key.is_empty() {
                by_ident.entry(key).or_default().runways.push(runway);
            }
        }
        for frequency in frequencies {
            let key = frequency.airport_ident.trim().to_string();
            if !key.is_empty() {
                by_ident.entry(key).or_default().frequencies.push(frequency);
            }
        }
        for navaid in navaids {
            let key = navaid.airport_ident.trim().to_string();
            if !key.is_empty() {
                by_ident.entry(key).or_default().navaids.push(navaid);
            }
        }

        for details in by_ident.values_mut() {
            // Longest first, unknown lengths last
            details
                .runways
                .sort_by(|a, b| b.length_ft.unwrap_or(0).cmp(&a.length_ft.unwrap_or(0)));
            details.frequencies.sort_by(|a, b| {
                a.kind.cmp(&b.kind).then_with(|| {
                    a.mhz
                        .partial_cmp(&b.mhz)
                        .unwrap_or(Ordering::Equal)
                })
            });
            details
                .navaids
                .sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.ident.cmp(&b.ident)));
            details.navaids.truncate(MAX_NAVAIDS);
        }

        Self { by_ident }
    }

    /// Details for `ident`; empty when the ident is blank or unknown.
    pub fn details(&self, ident: &str) -> AirportDetails {
        let key = ident.trim();
        if key.is_empty() {
            return AirportDetails::default();
        }
        self.by_ident.get(key).cloned().unwrap_or_default()
    }

    /// Number of airports with at least one detail record.
    pub fn airport_count(&self) -> usize {
        self.by_ident.len()
    }
}
