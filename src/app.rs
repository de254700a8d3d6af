use crate::backend::RemoteClient;
use crate::compare::{CompareError, Comparator};
use crate::config::Config;
use crate::diff::{DisplayMode, OutputLayout};
use crate::messages::ResponseMessage;
use crate::modal::{ConfirmRequest, ConfirmationModal, RetainedDialog};
use crate::notification::Notifications;
use crate::render::{ComparisonRequest, ErrorPanel, RenderController, RenderState};
use crate::style::configure_style;
use crate::ui::compare_view::{self, CompareViewAction};
use crate::ui::dialog::{self, DialogAction};
use crate::ui::title_bar::{TitleBar, TitleBarAction, TitleBarState};
use crate::ui::toasts::show_toasts;
use crate::version::{GuardError, VersionPair, VersionSet};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

pub struct PromptCompareApp {
    ctx: egui::Context,
    config: Config,
    comparator: Arc<Comparator>,
    remote: RemoteClient,
    versions: Arc<VersionSet>,
    current_file: Option<PathBuf>,
    pair: Option<VersionPair>,
    mode: DisplayMode,
    controller: RenderController,
    notifications: Notifications,
    modal: ConfirmationModal<RetainedDialog>,
    pub response_sender: Sender<ResponseMessage>,
    response_receiver: Receiver<ResponseMessage>,
}

impl PromptCompareApp {
    pub fn new(cc: &eframe::CreationContext<'_>, initial_file: Option<PathBuf>) -> Self {
        configure_style(&cc.egui_ctx);

        let config = Config::default();
        let settings = &config.settings;
        let (response_sender, response_receiver) = std::sync::mpsc::channel();

        let app = Self {
            ctx: cc.egui_ctx.clone(),
            comparator: Arc::new(Comparator::from_settings(settings)),
            remote: RemoteClient::http(settings.api_base_url.clone()),
            mode: settings.diff.mode,
            notifications: Notifications::new(Duration::from_millis(settings.toast_timeout_ms)),
            config,
            versions: Arc::new(VersionSet::default()),
            current_file: None,
            pair: None,
            controller: RenderController::new(),
            modal: ConfirmationModal::new(RetainedDialog::default()),
            response_sender,
            response_receiver,
        };

        if let Some(path) = initial_file {
            app.load_file(path);
        }
        app
    }

    /// Read and parse the version list off the UI thread
    fn load_file(&self, path: PathBuf) {
        tracing::info!("Loading versions from {:?}", path);
        let sender = self.response_sender.clone();
        let ctx = self.ctx.clone();
        std::thread::spawn(move || send_loaded(&sender, &ctx, path));
    }

    fn open_dialog(&self) {
        let sender = self.response_sender.clone();
        let ctx = self.ctx.clone();
        let data_dir = self.config.data_dir();
        std::thread::spawn(move || {
            if let Some(path) = rfd::FileDialog::new()
                .set_directory(&data_dir)
                .add_filter("Prompt versions", &["json"])
                .pick_file()
            {
                send_loaded(&sender, &ctx, path);
            }
        });
    }

    /// Hand a comparison to a worker; the ticket decides whether its result still counts
    fn request_comparison(&mut self, request: ComparisonRequest) {
        self.pair = Some(request.pair);
        self.mode = request.mode;

        let ticket = self.controller.begin(request);
        let comparator = Arc::clone(&self.comparator);
        let versions = Arc::clone(&self.versions);
        let sender = self.response_sender.clone();
        let ctx = self.ctx.clone();

        std::thread::spawn(move || {
            let result = comparator.compare(&versions, request.pair, request.mode);
            if let Err(e) = sender.send(ResponseMessage::ComparisonDone(ticket, result)) {
                tracing::error!("Failed to send comparison result: {}", e);
            }
            ctx.request_repaint();
        });
    }

    fn activate(&self, url: String) {
        let remote = self.remote.clone();
        let sender = self.response_sender.clone();
        let ctx = self.ctx.clone();
        std::thread::spawn(move || {
            let result = remote
                .post(&url, &json!({}))
                .map(|_| "Active version updated successfully".to_string())
                .map_err(|e| e.to_string());
            if let Err(e) = sender.send(ResponseMessage::ActivationDone(result)) {
                tracing::error!("Failed to send activation result: {}", e);
            }
            ctx.request_repaint();
        });
    }

    fn handle_response(&mut self, response: ResponseMessage) {
        let now = Instant::now();
        match response {
            ResponseMessage::VersionsLoaded(Ok((path, versions))) => {
                tracing::info!("Loaded {} versions from {:?}", versions.len(), path);
                self.versions = Arc::new(versions);
                self.current_file = Some(path.clone());
                self.config.add_recent_file(path);
                self.pair = self.versions.default_pair();
                self.controller.reset();
                if let Some(pair) = self.pair {
                    self.request_comparison(ComparisonRequest {
                        pair,
                        mode: self.mode,
                    });
                }
            }
            ResponseMessage::VersionsLoaded(Err(e)) => {
                self.notifications.error(e, now);
            }
            ResponseMessage::ComparisonDone(ticket, result) => {
                self.controller.complete(ticket, result);
            }
            ResponseMessage::ActivationDone(result) => {
                self.modal.settle(result.is_ok());
                match result {
                    Ok(message) => {
                        self.notifications.success(message, now);
                        if let Some(path) = self.current_file.clone() {
                            self.load_file(path);
                        }
                    }
                    Err(message) => {
                        self.notifications.error(message, now);
                    }
                }
            }
        }
    }

    fn handle_title_bar(&mut self, action: TitleBarAction) {
        match action {
            TitleBarAction::Open => self.open_dialog(),
            TitleBarAction::OpenFile(path) => self.load_file(path),
            TitleBarAction::Reload => {
                if let Some(path) = self.current_file.clone() {
                    self.load_file(path);
                }
            }
            TitleBarAction::Select(pair) => self.request_comparison(ComparisonRequest {
                pair,
                mode: self.mode,
            }),
            TitleBarAction::Swap => {
                if let Some(request) = self.controller.swapped() {
                    self.request_comparison(request);
                }
            }
            TitleBarAction::Mode(mode) => match self.controller.with_mode(mode) {
                Some(request) => self.request_comparison(request),
                None => self.mode = mode,
            },
        }
    }

    fn handle_dialog(&mut self, action: DialogAction) {
        match action {
            DialogAction::Cancel => self.modal.cancel(),
            DialogAction::Choose(choice) => self.modal.choose(choice),
            DialogAction::Confirm => {
                if let Some(ConfirmRequest::SetActive { url, .. }) = self.modal.confirm() {
                    self.activate(url);
                }
            }
        }
    }

    fn layout(&self) -> OutputLayout {
        match self.mode {
            DisplayMode::Unified(layout) => layout,
            DisplayMode::Segments => OutputLayout::SideBySide,
        }
    }
}

fn send_loaded(sender: &Sender<ResponseMessage>, ctx: &egui::Context, path: PathBuf) {
    let result = VersionSet::load(&path)
        .map(|versions| (path.clone(), versions))
        .map_err(|e| format!("Failed to load {}: {}", path.display(), e));
    if let Err(e) = sender.send(ResponseMessage::VersionsLoaded(result)) {
        tracing::error!("Failed to send loaded versions: {}", e);
    }
    ctx.request_repaint();
}

impl eframe::App for PromptCompareApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(response) = self.response_receiver.try_recv() {
            self.handle_response(response);
        }

        let dropped = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .find_map(|file| file.path.clone())
        });
        if let Some(path) = dropped {
            self.load_file(path);
        }

        let mut title_action = None;
        egui::TopBottomPanel::top("title_bar_panel").show(ctx, |ui| {
            title_action = TitleBar::show(
                ui,
                TitleBarState {
                    title: crate::constant::DEFAULT_WINDOW_TITLE,
                    versions: &self.versions,
                    pair: self.pair,
                    mode: self.mode,
                    recent_files: &self.config.settings.recent_files,
                    has_current_file: self.current_file.is_some(),
                    is_loading: self.controller.is_loading(),
                },
            );
        });
        if let Some(action) = title_action {
            self.handle_title_bar(action);
        }

        let layout = self.layout();
        let mut view_action = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                if self.current_file.is_none() {
                    ui.label("Open a prompt version file (JSON) to compare versions.");
                    return;
                }
                if self.pair.is_none() {
                    let err = CompareError::Guard(GuardError::InsufficientVersions {
                        count: self.versions.len(),
                    });
                    compare_view::show_error(ui, &ErrorPanel::from(&err));
                    return;
                }
                match self.controller.state() {
                    RenderState::Idle => {}
                    RenderState::Loading { suspended, .. } => {
                        if let Some(previous) = suspended {
                            ui.disable();
                            compare_view::show_comparison(ui, previous, layout);
                        } else {
                            ui.spinner();
                        }
                    }
                    RenderState::Rendered(comparison) => {
                        view_action = compare_view::show_comparison(ui, comparison, layout);
                    }
                    RenderState::Error(panel) => compare_view::show_error(ui, panel),
                }
            });
        });

        match view_action {
            Some(CompareViewAction::SetActive { version, url }) => {
                self.modal.open(ConfirmRequest::SetActive { version, url });
            }
            Some(CompareViewAction::CopyMarkup(markup)) => {
                ctx.copy_text(markup);
                self.notifications.info("Diff markup copied", Instant::now());
            }
            None => {}
        }

        if let Some(action) = dialog::show_dialog(ctx, &self.modal) {
            self.handle_dialog(action);
        }

        show_toasts(ctx, &mut self.notifications);
    }
}
