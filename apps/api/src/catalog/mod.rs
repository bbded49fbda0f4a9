//! Incident catalog — an immutable snapshot of past incident records.
//!
//! Loaded once at startup from a UTF-8 CSV export of the incident database
//! and shared read-only across handlers as `Arc<Catalog>`. There is no
//! reload path and no mutation after construction.

pub mod matching;

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One catalog entry. The serde renames follow the CSV export's Japanese
/// column headers exactly; content is CJK text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// 発生状況 — what happened.
    #[serde(rename = "発生状況")]
    pub situation: String,
    /// 原因 — why it happened.
    #[serde(rename = "原因")]
    pub cause: String,
    /// 対策 — the corrective measure taken.
    #[serde(rename = "対策")]
    pub mitigation: String,
    /// 災害の種類(事故の型) — incident-type category.
    #[serde(rename = "災害の種類(事故の型)")]
    pub category: String,
}

impl IncidentRecord {
    /// The text the matcher scans for query tokens: the situation
    /// description plus the incident category.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.situation, self.category)
    }
}

/// The fixed collection of incident records available for matching.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<IncidentRecord>,
}

impl Catalog {
    pub fn new(records: Vec<IncidentRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[IncidentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Loads the catalog from a CSV file, falling back to the built-in stub
    /// on any failure. A missing catalog degrades report enrichment but must
    /// never prevent startup.
    pub fn load_or_stub(path: &Path) -> Catalog {
        match Self::load(path) {
            Ok(catalog) => {
                info!(
                    "incident catalog loaded: {} records from {}",
                    catalog.len(),
                    path.display()
                );
                catalog
            }
            Err(e) => {
                warn!(
                    "failed to load incident catalog from {}: {e:#}; using stub catalog",
                    path.display()
                );
                Self::stub()
            }
        }
    }

    fn load(path: &Path) -> Result<Catalog> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("opening catalog file {}", path.display()))?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: IncidentRecord = row.context("parsing catalog row")?;
            records.push(record);
        }
        Ok(Catalog::new(records))
    }

    /// Two-record placeholder used when no catalog file is available.
    pub fn stub() -> Catalog {
        Catalog::new(vec![
            IncidentRecord {
                situation: "コンベアで巻き込まれた".to_string(),
                cause: "安全装置がなかった".to_string(),
                mitigation: "安全柵の設置".to_string(),
                category: "はさまれ・巻き込まれ".to_string(),
            },
            IncidentRecord {
                situation: "高所から転落".to_string(),
                cause: "安全帯を着用していなかった".to_string(),
                mitigation: "安全帯の使用".to_string(),
                category: "墜落・転落".to_string(),
            },
        ])
    }
}
