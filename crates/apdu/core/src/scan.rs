//! Catalog scanning
//!
//! Runs [`select_application`] over every entry of a category and sorts the
//! outcomes into hits and misses worth reporting. Absence codes are the
//! normal answer for most of a catalog and are dropped.

use bytes::Bytes;
use tracing::{debug, info, instrument};

use crate::aid::Aid;
use crate::catalog::{AidCatalogEntry, Catalog, Category};
use crate::select::{SelectResult, select_application};
use crate::transport::CardTransport;

/// An AID the card accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found {
    /// Catalog label
    pub name: String,
    /// The selected AID
    pub aid: Aid,
    /// Data returned with the SELECT, possibly empty
    pub data: Bytes,
}

/// A failed SELECT that was not a plain "not here"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Miss {
    /// Catalog label
    pub name: String,
    /// The probed AID
    pub aid: Aid,
    /// What the engine reported
    pub result: SelectResult,
}

impl Miss {
    /// Short reason suitable for a report line
    pub fn reason(&self) -> String {
        format!("SW={}", self.result.status_text())
    }
}

/// Outcome of scanning one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryScan {
    /// Category label
    pub category: &'static str,
    /// Accepted AIDs, in probe order
    pub found: Vec<Found>,
    /// Unexpected failures, in probe order
    pub misses: Vec<Miss>,
    /// Number of SELECTs sent
    pub probed: usize,
    /// Set when the scan stopped early because the card went away
    pub interrupted: bool,
}

impl CategoryScan {
    fn new(category: &'static str) -> Self {
        Self {
            category,
            found: Vec::new(),
            misses: Vec::new(),
            probed: 0,
            interrupted: false,
        }
    }

    fn record(&mut self, entry: &AidCatalogEntry, result: SelectResult) {
        self.probed += 1;

        if result.success {
            info!(name = %entry.name, aid = %entry.aid, bytes = result.response_data.len(), "AID selected");
            self.found.push(Found {
                name: entry.name.to_string(),
                aid: entry.aid.clone(),
                data: result.response_data,
            });
            return;
        }

        if result.status.is_some_and(|sw| sw.is_application_absent()) {
            return;
        }

        self.misses.push(Miss {
            name: entry.name.to_string(),
            aid: entry.aid.clone(),
            result,
        });
    }
}

/// Probe every entry of a category, in order
///
/// A transport failure is recorded and the scan moves on. Once the transport
/// reports itself disconnected, whatever the last result was, the rest of
/// the category is skipped: a reconnect may reach a different device.
#[instrument(level = "debug", skip_all, fields(category = category.name))]
pub fn scan_category<T>(transport: &mut T, category: &Category) -> CategoryScan
where
    T: CardTransport + ?Sized,
{
    let mut scan = CategoryScan::new(category.name);

    for entry in &category.entries {
        let result = select_application(transport, entry.aid.as_bytes());
        scan.record(entry, result);

        if !transport.is_connected() {
            debug!("Card gone, skipping the rest of the category");
            scan.interrupted = true;
            break;
        }
    }

    scan
}

/// Outcome of scanning a whole catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Per-category outcomes, in catalog order
    pub categories: Vec<CategoryScan>,
}

impl ScanReport {
    /// Every hit across all categories
    pub fn found(&self) -> impl Iterator<Item = &Found> {
        self.categories.iter().flat_map(|c| c.found.iter())
    }

    /// Number of hits
    pub fn total_found(&self) -> usize {
        self.categories.iter().map(|c| c.found.len()).sum()
    }

    /// Number of SELECTs sent
    pub fn total_probed(&self) -> usize {
        self.categories.iter().map(|c| c.probed).sum()
    }

    /// Whether any category stopped early
    pub fn interrupted(&self) -> bool {
        self.categories.iter().any(|c| c.interrupted)
    }

    /// Distinct accepted AIDs, first occurrence order
    ///
    /// Several catalog labels share an AID (Visa and Google Pay, for
    /// example), so a single application can show up more than once in
    /// [`found`](Self::found).
    pub fn unique_aids(&self) -> Vec<&Aid> {
        let mut out: Vec<&Aid> = Vec::new();
        for found in self.found() {
            if !out.contains(&&found.aid) {
                out.push(&found.aid);
            }
        }
        out
    }
}

/// Scan every category of a catalog, in order
///
/// `on_category` sees each category as soon as it is done. Stops after the
/// first interrupted category.
pub fn scan_catalog<T, F>(transport: &mut T, catalog: &Catalog, mut on_category: F) -> ScanReport
where
    T: CardTransport + ?Sized,
    F: FnMut(&CategoryScan),
{
    let mut report = ScanReport::default();

    for category in catalog.categories() {
        let scan = scan_category(transport, category);
        on_category(&scan);
        let interrupted = scan.interrupted;
        report.categories.push(scan);
        if interrupted {
            break;
        }
    }

    report
}
