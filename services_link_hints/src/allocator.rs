//! Hint allocation
//!
//! The allocator scans the page for eligible, visible elements, assigns
//! each a code and renders a badge next to it. It only inserts badges; it
//! never touches the elements themselves.

use crate::codes::{HintAlphabet, HintCode};
use crate::session::{Candidate, Session};
use page_api::PageApi;
use page_types::{BadgeSpec, ElementId, ElementKind, Rect, Viewport};
use serde::{Deserialize, Serialize};
use services_settings::{BadgePalette, NavigatorSettings, ScanOrder};

/// An eligible element found by a scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScannedElement {
    pub element: ElementId,
    pub kind: ElementKind,
    pub rect: Rect,
}

/// Candidate dropped because its badge could not be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedCandidate {
    pub element: ElementId,
    pub code: HintCode,
    pub reason: String,
}

/// Summary of one allocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationReport {
    /// Visible eligible elements found
    pub eligible: usize,
    /// Candidates labeled and rendered
    pub labeled: usize,
    /// Number of distinct codes available
    pub capacity: usize,
    /// Elements left without a code because capacity ran out
    pub unlabeled: Vec<ElementId>,
    /// Elements whose badge could not be created
    pub skipped: Vec<SkippedCandidate>,
}

impl AllocationReport {
    pub fn capacity_exceeded(&self) -> bool {
        !self.unlabeled.is_empty()
    }
}

/// Result of an allocation: the new session plus its report
#[derive(Debug)]
pub struct Allocation {
    pub session: Session,
    pub report: AllocationReport,
}

/// Hint allocator
pub struct HintAllocator {
    alphabet: HintAlphabet,
    palette: BadgePalette,
    badge_offset: f64,
    scan_order: ScanOrder,
}

impl HintAllocator {
    pub fn new(alphabet: HintAlphabet, settings: &NavigatorSettings) -> Self {
        Self {
            alphabet,
            palette: settings.palette,
            badge_offset: settings.badge_offset,
            scan_order: settings.scan_order,
        }
    }

    pub fn alphabet(&self) -> &HintAlphabet {
        &self.alphabet
    }

    /// Returns the visible eligible elements in scan order
    pub fn scan<P: PageApi + ?Sized>(&self, page: &P) -> Vec<ScannedElement> {
        let viewport = page.viewport();
        let found: Vec<ScannedElement> = page
            .elements()
            .into_iter()
            .filter_map(|element| scan_element(page, element, &viewport))
            .collect();

        match self.scan_order {
            ScanOrder::DocumentOrder => found,
            ScanOrder::GroupedByKind => ElementKind::SCAN_ORDER
                .iter()
                .flat_map(|kind| found.iter().filter(move |scanned| scanned.kind == *kind))
                .copied()
                .collect(),
        }
    }

    /// Scans the page, assigns codes and renders badges
    pub fn allocate<P: PageApi + ?Sized>(&self, page: &mut P) -> Allocation {
        let scanned = self.scan(page);
        let codes = self.alphabet.generate_codes(scanned.len());

        let mut report = AllocationReport {
            eligible: scanned.len(),
            capacity: self.alphabet.capacity(),
            unlabeled: scanned[codes.len()..].iter().map(|s| s.element).collect(),
            ..AllocationReport::default()
        };

        if report.capacity_exceeded() {
            tracing::warn!(
                "{} eligible elements exceed hint capacity {}; {} left unlabeled",
                report.eligible,
                report.capacity,
                report.unlabeled.len()
            );
        }

        let mut candidates = Vec::with_capacity(codes.len());
        for (scanned, code) in scanned.iter().zip(codes) {
            let spec = BadgeSpec::near(
                code.as_str(),
                scanned.element,
                &scanned.rect,
                self.badge_offset,
                self.palette.initial(scanned.kind),
            );

            match page.create_badge(spec) {
                Ok(badge) => candidates.push(Candidate {
                    target: scanned.element,
                    kind: scanned.kind,
                    code,
                    badge,
                }),
                Err(err) => {
                    tracing::warn!("Skipping {} ({}): {}", scanned.element, code, err);
                    report.skipped.push(SkippedCandidate {
                        element: scanned.element,
                        code,
                        reason: err.to_string(),
                    });
                }
            }
        }

        report.labeled = candidates.len();
        Allocation {
            session: Session::new(candidates),
            report,
        }
    }
}

/// Classifies one element and checks that it is visible in the viewport
fn scan_element<P: PageApi + ?Sized>(
    page: &P,
    element: ElementId,
    viewport: &Viewport,
) -> Option<ScannedElement> {
    let kind = page.describe(element).ok()?.classify()?;
    let rect = page.bounding_rect(element).ok()??;

    if !rect.has_area() || !rect.is_within(viewport) {
        return None;
    }
    if !page.computed_visibility(element).ok()?.is_shown() {
        return None;
    }

    Some(ScannedElement {
        element,
        kind,
        rect,
    })
}
