use prompt_compare::compare::{CompareError, Comparator, FieldDiff, Severity};
use prompt_compare::config::Settings;
use prompt_compare::diff::{DisplayMode, OutputLayout};
use prompt_compare::modal::{ConfirmRequest, ConfirmationModal, RetainedDialog};
use prompt_compare::render::{ComparisonRequest, RenderController, RenderState};
use prompt_compare::version::{GuardError, VersionPair, VersionSet};

const VERSIONS: &str = r#"[
    {"version": 1, "system_prompt": "Be brief.", "user_prompt": "Translate {text}",
     "is_active": true, "created_at": "2024-06-01T12:00:00", "created_by": 1},
    {"version": 2, "system_prompt": "Be brief and polite.", "user_prompt": "Translate {text} to French",
     "is_active": false, "created_at": "2024-06-02T12:00:00", "created_by": 1}
]"#;

fn versions() -> VersionSet {
    VersionSet::from_json(VERSIONS).unwrap()
}

fn comparator() -> Comparator {
    Comparator::from_settings(&Settings::default())
}

#[test]
fn default_pair_compares_in_every_mode() {
    let versions = versions();
    let pair = versions.default_pair().unwrap();
    assert_eq!(pair, VersionPair::new(1, 2));

    let segments = comparator()
        .compare(&versions, pair, DisplayMode::Segments)
        .unwrap();
    assert!(segments.system.markup().contains("polite"));
    assert!(matches!(segments.user, FieldDiff::Segments { .. }));

    for layout in [OutputLayout::Inline, OutputLayout::SideBySide] {
        let unified = comparator()
            .compare(&versions, pair, DisplayMode::Unified(layout))
            .unwrap();
        let FieldDiff::Unified { text, .. } = &unified.user else {
            panic!("expected unified diff");
        };
        assert!(text.contains("-Translate {text}"));
        assert!(text.contains("+Translate {text} to French"));
    }
}

#[test]
fn guards_surface_as_warnings() {
    let single = VersionSet::from_json(
        r#"[{"version": 1, "system_prompt": "a", "user_prompt": "b", "is_active": true,
            "created_at": "2024-06-01T12:00:00"}]"#,
    )
    .unwrap();
    assert_eq!(single.default_pair(), None);

    let err = comparator()
        .compare(&single, VersionPair::new(1, 2), DisplayMode::Segments)
        .unwrap_err();
    assert_eq!(err, CompareError::Guard(GuardError::InsufficientVersions { count: 1 }));
    assert_eq!(err.severity(), Severity::Warning);

    let err = comparator()
        .compare(&versions(), VersionPair::new(2, 2), DisplayMode::Segments)
        .unwrap_err();
    assert_eq!(err, CompareError::Guard(GuardError::SameVersion));
}

#[test]
fn only_the_newest_request_renders() {
    let versions = versions();
    let comparator = comparator();
    let mut controller = RenderController::new();

    let first = ComparisonRequest {
        pair: VersionPair::new(1, 2),
        mode: DisplayMode::Segments,
    };
    let stale = controller.begin(first);
    let second = controller.swapped().unwrap();
    let current = controller.begin(second);

    let late = comparator.compare(&versions, first.pair, first.mode);
    assert!(!controller.complete(stale, late));
    assert!(controller.is_loading());

    let fresh = comparator.compare(&versions, second.pair, second.mode);
    assert!(controller.complete(current, fresh));
    let RenderState::Rendered(comparison) = controller.state() else {
        panic!("expected a rendered comparison");
    };
    assert_eq!(comparison.pair, VersionPair::new(2, 1));
    assert!(comparison.set_active.is_none());
}

#[test]
fn set_active_goes_through_the_confirmation_modal() {
    let comparison = comparator()
        .compare(&versions(), VersionPair::new(1, 2), DisplayMode::Segments)
        .unwrap();
    let action = comparison.set_active.unwrap();
    assert_eq!(action.url, "/prompts/2/activate");

    let mut modal = ConfirmationModal::new(RetainedDialog::default());
    modal.open(ConfirmRequest::SetActive {
        version: action.version,
        url: action.url.clone(),
    });
    assert_eq!(
        modal.dialog().current().unwrap().confirm_label,
        "Set Version 2 as Active"
    );

    let Some(ConfirmRequest::SetActive { url, .. }) = modal.confirm() else {
        panic!("expected set active request");
    };
    assert_eq!(url, action.url);
    assert_eq!(modal.button().unwrap().label(), "Processing...");

    modal.settle(false);
    assert!(modal.is_open());
    modal.settle(true);
    assert!(!modal.is_open());
}

#[test]
fn reloading_the_file_keeps_older_comparisons_stale() {
    let versions = versions();
    let comparator = comparator();
    let mut controller = RenderController::new();

    let before_reload = ComparisonRequest {
        pair: VersionPair::new(1, 2),
        mode: DisplayMode::Segments,
    };
    let stale = controller.begin(before_reload);

    controller.reset();
    let after_reload = ComparisonRequest {
        pair: VersionPair::new(2, 1),
        mode: DisplayMode::Unified(OutputLayout::Inline),
    };
    let fresh = controller.begin(after_reload);

    let late = comparator.compare(&versions, before_reload.pair, before_reload.mode);
    assert!(!controller.complete(stale, late));

    let result = comparator.compare(&versions, after_reload.pair, after_reload.mode);
    assert!(controller.complete(fresh, result));
    assert_eq!(controller.current().unwrap().pair, VersionPair::new(2, 1));
}
