use crate::domain::model::{Coordinate, CycleToken, SearchPhase, SearchResultSet};
use crate::domain::ports::ResultSink;
use crate::utils::error::{ExploreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

pub fn render(
    format: OutputFormat,
    token: CycleToken,
    center: Option<Coordinate>,
    results: &SearchResultSet,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(center, results)),
        OutputFormat::Json => render_json(token, center, results),
        OutputFormat::Csv => render_csv(results),
    }
}

pub fn render_text(center: Option<Coordinate>, results: &SearchResultSet) -> String {
    let mut out = String::new();
    if let Some(center) = center {
        let _ = writeln!(
            out,
            "Around ({:.5}, {:.5}):",
            center.latitude(),
            center.longitude()
        );
    }
    if results.is_empty() {
        out.push_str("No places found nearby.\n");
        return out;
    }

    for (index, poi) in results.iter().enumerate() {
        // writing into a String cannot fail
        let _ = writeln!(
            out,
            "{}. {} ({:.5}, {:.5})",
            index + 1,
            poi.name,
            poi.latitude,
            poi.longitude
        );
        if let Some(description) = &poi.description {
            let _ = writeln!(out, "   {}", description);
        }
        if let Some(image) = &poi.image_url {
            let _ = writeln!(out, "   image: {}", image);
        }
        if let Some(link) = &poi.reference_link {
            let _ = writeln!(out, "   more: {}", link);
        }
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    token: CycleToken,
    generated_at: chrono::DateTime<chrono::Utc>,
    center: Option<Coordinate>,
    count: usize,
    places: &'a SearchResultSet,
}

pub fn render_json(
    token: CycleToken,
    center: Option<Coordinate>,
    results: &SearchResultSet,
) -> Result<String> {
    let report = JsonReport {
        token,
        generated_at: chrono::Utc::now(),
        center,
        count: results.len(),
        places: results,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

#[derive(Serialize)]
struct CsvRow<'a> {
    id: u64,
    name: &'a str,
    latitude: f64,
    longitude: f64,
    description: Option<&'a str>,
    image_url: Option<&'a str>,
    reference_link: Option<&'a str>,
}

pub fn render_csv(results: &SearchResultSet) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record([
        "id",
        "name",
        "latitude",
        "longitude",
        "description",
        "image_url",
        "reference_link",
    ])?;

    for poi in results {
        writer.serialize(CsvRow {
            id: poi.id,
            name: &poi.name,
            latitude: poi.latitude,
            longitude: poi.longitude,
            description: poi.description.as_deref(),
            image_url: poi.image_url.as_deref(),
            reference_link: poi.reference_link.as_deref(),
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExploreError::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| ExploreError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Prints every committed result set to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink {
    format: OutputFormat,
}

impl ConsoleSink {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl ResultSink for ConsoleSink {
    fn publish(&self, token: CycleToken, center: Option<Coordinate>, results: &SearchResultSet) {
        match render(self.format, token, center, results) {
            Ok(output) => print!("{}", output),
            Err(e) => tracing::error!("❌ Failed to render results of search {}: {}", token, e),
        }
    }
}

#[derive(Default)]
struct Recorded {
    published: Vec<(CycleToken, Option<Coordinate>, SearchResultSet)>,
    phases: Vec<(CycleToken, SearchPhase)>,
}

/// Keeps what it was given in memory, for hosts that render on their own.
#[derive(Default)]
pub struct MemorySink {
    recorded: Mutex<Recorded>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.recorded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn last_results(&self) -> Option<SearchResultSet> {
        self.lock().published.last().map(|(_, _, results)| results.clone())
    }

    pub fn last_token(&self) -> Option<CycleToken> {
        self.lock().published.last().map(|(token, _, _)| *token)
    }

    pub fn last_center(&self) -> Option<Coordinate> {
        self.lock().published.last().and_then(|(_, center, _)| *center)
    }

    pub fn publish_count(&self) -> usize {
        self.lock().published.len()
    }

    pub fn phases(&self) -> Vec<(CycleToken, SearchPhase)> {
        self.lock().phases.clone()
    }
}

impl ResultSink for MemorySink {
    fn publish(&self, token: CycleToken, center: Option<Coordinate>, results: &SearchResultSet) {
        self.lock().published.push((token, center, results.clone()));
    }

    fn phase_changed(&self, token: CycleToken, phase: SearchPhase) {
        self.lock().phases.push((token, phase));
    }
}
