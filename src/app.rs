use crate::backend::ai_backend::AiBackend;
use crate::backend::diff_worker::DiffWorker;
use crate::backend::export::{spawn_save_dialog, suggested_file_name};
use crate::backend::key_store::{self, KeyNotice};
use crate::config::Config;
use crate::messages::ResponseMessage;
use crate::review::{ReviewError, ReviewSession};
use crate::style::configure_style;
use crate::ui::api_key_panel::{ApiKeyAction, ApiKeyPanel};
use crate::ui::comparison::{ComparisonAction, ComparisonState, ComparisonView};
use crate::ui::input_panel::{InputAction, InputPanel};
use crate::ui::zoom::Zoom;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;
use tracing::{error, info};

pub struct RevitApp {
    config: Config,
    session: ReviewSession,
    backend: AiBackend,
    diff_worker: DiffWorker,
    zoom: Zoom,
    api_key_panel: ApiKeyPanel,
    comparison_view: ComparisonView,
    response_sender: Sender<ResponseMessage>,
    response_receiver: Receiver<ResponseMessage>,
}

impl Default for RevitApp {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl RevitApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        configure_style(&cc.egui_ctx);
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        let (response_sender, response_receiver) = std::sync::mpsc::channel();
        let backend = AiBackend::from_config(&config.settings.reviewer);
        let notice = if backend.has_api_key() {
            KeyNotice::Loaded
        } else {
            key_store::initial_notice(&config)
        };

        Self {
            session: ReviewSession::new(),
            diff_worker: DiffWorker::spawn(config.diff_options()),
            zoom: Zoom::new(config.settings.font_scale),
            api_key_panel: ApiKeyPanel::new(notice),
            comparison_view: ComparisonView::default(),
            backend,
            config,
            response_sender,
            response_receiver,
        }
    }

    fn handle_responses(&mut self) {
        while let Ok(message) = self.response_receiver.try_recv() {
            match message {
                ResponseMessage::RevisionFinished {
                    generation,
                    elapsed,
                    result,
                } => {
                    let key_notice = result.as_ref().err().and_then(|e| e.key_notice());
                    if self.session.finish_review(generation, elapsed, result)
                        && let Some(notice) = key_notice
                    {
                        self.api_key_panel.set_notice(notice);
                    }
                }
                ResponseMessage::ExportFinished(Ok(path)) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    self.comparison_view.flash(format!("Salvo em {}", name));
                }
                ResponseMessage::ExportFinished(Err(e)) => {
                    self.comparison_view.flash(e);
                }
            }
        }
    }

    /// Keep the diff worker in step with the texts being compared
    fn sync_comparison(&mut self) {
        if self.session.show_comparison() {
            self.diff_worker
                .request(self.session.original(), self.session.candidate());
        } else {
            self.diff_worker.clear();
        }
        self.diff_worker.poll();
    }

    fn start_review(&mut self) {
        match self.session.begin_review(self.backend.has_api_key()) {
            Ok(request) => {
                info!(
                    "Starting revision #{} ({} chars)",
                    request.generation,
                    self.session.original_char_count()
                );
                self.backend
                    .request_revision(request, self.response_sender.clone());
            }
            Err(ReviewError::MissingApiKey) => {
                self.api_key_panel.set_notice(KeyNotice::Required);
            }
            Err(e) => info!("Revision not started: {}", e),
        }
    }

    fn handle_api_key_action(&mut self, action: ApiKeyAction) {
        let notice = match action {
            ApiKeyAction::Save(input) => key_store::save_api_key(&mut self.config, &input),
            ApiKeyAction::Remove => {
                self.session.clear_error();
                key_store::remove_api_key(&mut self.config)
            }
        };
        self.backend = AiBackend::from_config(&self.config.settings.reviewer);
        self.api_key_panel.set_notice(notice);
    }

    fn handle_comparison_action(&mut self, ctx: &egui::Context, action: ComparisonAction) {
        let candidate = self.session.candidate();
        if candidate.is_empty() {
            self.comparison_view.flash("Nada para copiar ou exportar.");
            return;
        }

        match action {
            ComparisonAction::Copy => {
                ctx.copy_text(candidate.to_string());
                self.comparison_view.flash("Texto copiado!");
            }
            ComparisonAction::Export => {
                spawn_save_dialog(
                    Some(self.config.data_dir()),
                    suggested_file_name(self.session.original()),
                    candidate.to_string(),
                    self.response_sender.clone(),
                );
            }
        }
    }
}

impl eframe::App for RevitApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_responses();
        self.sync_comparison();

        // Background work reports through channels, so keep polling while it runs
        if self.session.is_loading() || !self.diff_worker.is_settled() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        let has_key = self.backend.has_api_key();

        let mut key_action = None;
        egui::TopBottomPanel::top("settings_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.heading(crate::constant::DEFAULT_WINDOW_TITLE);
            key_action = self.api_key_panel.show(ui, has_key);
            ui.add_space(4.0);
        });
        if let Some(action) = key_action {
            self.handle_api_key_action(action);
        }

        let mut input_actions = Vec::new();
        let mut comparison_action = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                input_actions =
                    InputPanel::show(&mut columns[0], &mut self.session, &mut self.zoom, has_key);

                let state = ComparisonState {
                    is_loading: self.session.is_loading(),
                    wants_panel: self.session.wants_comparison_panel(),
                    readiness: self.diff_worker.readiness(),
                    is_settled: self.diff_worker.is_settled(),
                    result: self.diff_worker.result(),
                    last_error: self.diff_worker.last_error(),
                    candidate_char_count: self.session.candidate_char_count(),
                    review_time: self.session.review_time_label(),
                    font_size: self.zoom.font_size(),
                };
                comparison_action = self.comparison_view.show(&mut columns[1], state);
            });
        });

        for action in input_actions {
            match action {
                InputAction::Edited => self.session.on_original_edited(),
                InputAction::ReviewRequested => self.start_review(),
                InputAction::ZoomChanged => self.config.settings.font_scale = self.zoom.scale(),
            }
        }
        if let Some(action) = comparison_action {
            self.handle_comparison_action(ctx, action);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.config.settings.font_scale = self.zoom.scale();
        if let Err(e) = self.config.save() {
            error!("Failed to save config on exit: {}", e);
        }
    }
}
