//! Owner of the comparison display regions.
//!
//! `Idle -> Loading -> Rendered | Error`, and back to `Loading` on every new
//! request. Each request takes a ticket; only the newest ticket may complete.

use crate::compare::{Comparator, CompareError, Comparison, Severity};
use crate::diff::DisplayMode;
use crate::version::{VersionPair, VersionSet};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonRequest {
    pub pair: VersionPair,
    pub mode: DisplayMode,
}

/// Single message region replacing both panes
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorPanel {
    pub severity: Severity,
    pub message: String,
}

impl From<&CompareError> for ErrorPanel {
    fn from(err: &CompareError) -> Self {
        Self {
            severity: err.severity(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderState {
    Idle,
    Loading {
        ticket: Ticket,
        /// Previous result, hidden behind the busy indicator but kept
        suspended: Option<Box<Comparison>>,
    },
    Rendered(Box<Comparison>),
    Error(ErrorPanel),
}

#[derive(Debug)]
pub struct RenderController {
    state: RenderState,
    next_ticket: u64,
    last_request: Option<ComparisonRequest>,
}

impl Default for RenderController {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderController {
    pub fn new() -> Self {
        Self {
            state: RenderState::Idle,
            next_ticket: 0,
            last_request: None,
        }
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn last_request(&self) -> Option<ComparisonRequest> {
        self.last_request
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, RenderState::Loading { .. })
    }

    /// Comparison currently on screen or suspended behind the busy indicator
    pub fn current(&self) -> Option<&Comparison> {
        match &self.state {
            RenderState::Rendered(c) => Some(&**c),
            RenderState::Loading {
                suspended: Some(c), ..
            } => Some(&**c),
            _ => None,
        }
    }

    /// Back to `Idle` for a new version list. Tickets keep counting up, so
    /// comparisons still running against the old list stay stale.
    pub fn reset(&mut self) {
        debug!("Resetting display, tickets up to {} are stale", self.next_ticket);
        self.state = RenderState::Idle;
        self.last_request = None;
    }

    /// Enter `Loading` for a new request; any earlier ticket becomes stale
    pub fn begin(&mut self, request: ComparisonRequest) -> Ticket {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);

        let suspended = match std::mem::replace(&mut self.state, RenderState::Idle) {
            RenderState::Rendered(c) => Some(c),
            RenderState::Loading { suspended, .. } => suspended,
            RenderState::Idle | RenderState::Error(_) => None,
        };

        debug!("Comparison request {:?} took ticket {:?}", request, ticket);
        self.state = RenderState::Loading { ticket, suspended };
        self.last_request = Some(request);
        ticket
    }

    /// Apply a result; returns false when the ticket was superseded
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<Comparison, CompareError>,
    ) -> bool {
        match &self.state {
            RenderState::Loading { ticket: current, .. } if *current == ticket => {}
            _ => {
                warn!("Discarding stale comparison result for {:?}", ticket);
                return false;
            }
        }

        self.state = match result {
            Ok(comparison) => RenderState::Rendered(Box::new(comparison)),
            Err(err) => {
                warn!("Comparison failed: {}", err);
                RenderState::Error(ErrorPanel::from(&err))
            }
        };
        true
    }

    /// Synchronous path: begin, compute, complete
    pub fn run(
        &mut self,
        comparator: &Comparator,
        versions: &VersionSet,
        request: ComparisonRequest,
    ) -> &RenderState {
        let ticket = self.begin(request);
        let result = comparator.compare(versions, request.pair, request.mode);
        self.complete(ticket, result);
        &self.state
    }

    /// Same pair again with a different layout
    pub fn with_mode(&self, mode: DisplayMode) -> Option<ComparisonRequest> {
        self.last_request
            .map(|request| ComparisonRequest { mode, ..request })
    }

    /// Sides exchanged, keeping the layout
    pub fn swapped(&self) -> Option<ComparisonRequest> {
        self.last_request.map(|request| ComparisonRequest {
            pair: request.pair.swapped(),
            ..request
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::diff::OutputLayout;
    use crate::version::GuardError;
    use crate::version::tests::sample_set;

    fn request(old: i64, new: i64) -> ComparisonRequest {
        ComparisonRequest {
            pair: VersionPair::new(old, new),
            mode: DisplayMode::Segments,
        }
    }

    fn comparison(old: i64, new: i64) -> Comparison {
        Comparator::from_settings(&Settings::default())
            .compare(&sample_set(), VersionPair::new(old, new), DisplayMode::Segments)
            .unwrap()
    }

    #[test]
    fn starts_idle() {
        let controller = RenderController::new();
        assert_eq!(controller.state(), &RenderState::Idle);
        assert!(controller.current().is_none());
    }

    #[test]
    fn loading_suspends_previous_content() {
        let mut controller = RenderController::new();
        let first = controller.begin(request(1, 2));
        assert!(controller.complete(first, Ok(comparison(1, 2))));

        controller.begin(request(2, 3));
        assert!(controller.is_loading());
        assert_eq!(controller.current().unwrap().pair, VersionPair::new(1, 2));
    }

    #[test]
    fn stale_result_cannot_overwrite_newer_one() {
        let mut controller = RenderController::new();
        let slow = controller.begin(request(1, 2));
        let fast = controller.begin(request(2, 3));

        assert!(controller.complete(fast, Ok(comparison(2, 3))));
        assert!(!controller.complete(slow, Ok(comparison(1, 2))));

        assert_eq!(controller.current().unwrap().pair, VersionPair::new(2, 3));
    }

    #[test]
    fn stale_result_is_dropped_while_newer_is_in_flight() {
        let mut controller = RenderController::new();
        let slow = controller.begin(request(1, 2));
        let newest = controller.begin(request(1, 3));

        assert!(!controller.complete(slow, Ok(comparison(1, 2))));
        assert!(controller.is_loading());
        assert!(controller.complete(newest, Ok(comparison(1, 3))));
    }

    #[test]
    fn reset_keeps_earlier_tickets_stale() {
        let mut controller = RenderController::new();
        let old_file = controller.begin(request(1, 2));

        controller.reset();
        assert_eq!(controller.state(), &RenderState::Idle);
        assert!(controller.swapped().is_none());

        let new_file = controller.begin(request(2, 3));
        assert_ne!(old_file, new_file);
        assert!(!controller.complete(old_file, Ok(comparison(1, 2))));
        assert!(controller.complete(new_file, Ok(comparison(2, 3))));
        assert_eq!(controller.current().unwrap().pair, VersionPair::new(2, 3));
    }

    #[test]
    fn error_replaces_content_with_single_panel() {
        let mut controller = RenderController::new();
        let first = controller.begin(request(1, 2));
        controller.complete(first, Ok(comparison(1, 2)));

        let second = controller.begin(request(3, 3));
        controller.complete(second, Err(CompareError::Guard(GuardError::SameVersion)));

        match controller.state() {
            RenderState::Error(panel) => {
                assert_eq!(panel.severity, Severity::Warning);
                assert_eq!(panel.message, "Please select different versions to compare");
            }
            other => panic!("unexpected state {other:?}"),
        }
        assert!(controller.current().is_none());
    }

    #[test]
    fn run_drives_the_full_cycle() {
        let comparator = Comparator::from_settings(&Settings::default());
        let versions = sample_set();
        let mut controller = RenderController::new();

        assert!(matches!(
            controller.run(&comparator, &versions, request(1, 3)),
            RenderState::Rendered(_)
        ));

        let toggled = controller
            .with_mode(DisplayMode::Unified(OutputLayout::SideBySide))
            .unwrap();
        assert_eq!(toggled.pair, VersionPair::new(1, 3));
        controller.run(&comparator, &versions, toggled);
        assert!(matches!(controller.state(), RenderState::Rendered(_)));

        let swapped = controller.swapped().unwrap();
        assert_eq!(swapped.pair, VersionPair::new(3, 1));
        assert_eq!(swapped.mode, DisplayMode::Unified(OutputLayout::SideBySide));
    }
}
