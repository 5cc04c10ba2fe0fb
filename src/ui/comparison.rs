use crate::constant::FLASH_DURATION_MS;
use crate::diff::{DisplayClass, DisplayUnit};
use crate::engine::{DiffError, DiffResult, Readiness};
use crate::style::{ADDED_BG, ERROR_TEXT, REMOVED_BG, REMOVED_TEXT, SUCCESS_TEXT};
use egui::{Color32, FontId, RichText, Stroke, TextFormat, Ui, text::LayoutJob};
use std::time::{Duration, Instant};

pub enum ComparisonAction {
    Copy,
    Export,
}

/// Everything the right-hand column needs for one frame
pub struct ComparisonState<'a> {
    pub is_loading: bool,
    pub wants_panel: bool,
    pub readiness: Readiness,
    pub is_settled: bool,
    pub result: &'a DiffResult,
    pub last_error: Option<&'a DiffError>,
    pub candidate_char_count: usize,
    pub review_time: Option<String>,
    pub font_size: f32,
}

/// Build the highlighted text of the comparison, one section per unit
pub fn build_layout_job(units: &[DisplayUnit], font_size: f32, base_color: Color32) -> LayoutJob {
    let mut job = LayoutJob::default();
    let font_id = FontId::proportional(font_size);
    let line_height = Some(font_size * 1.5);

    for unit in units {
        let format = match unit.class {
            DisplayClass::Added => TextFormat {
                font_id: font_id.clone(),
                color: base_color,
                background: ADDED_BG,
                line_height,
                ..Default::default()
            },
            DisplayClass::Removed => TextFormat {
                font_id: font_id.clone(),
                color: REMOVED_TEXT,
                background: REMOVED_BG,
                strikethrough: Stroke::new(1.0, REMOVED_TEXT),
                line_height,
                ..Default::default()
            },
            DisplayClass::Unchanged => TextFormat {
                font_id: font_id.clone(),
                color: base_color,
                line_height,
                ..Default::default()
            },
        };
        job.append(&unit.text, 0.0, format);
    }

    job
}

#[derive(Default)]
pub struct ComparisonView {
    flash: Option<(String, Instant)>,
}

impl ComparisonView {
    /// Show a short confirmation under the buttons
    pub fn flash(&mut self, message: impl Into<String>) {
        self.flash = Some((message.into(), Instant::now()));
    }

    pub fn show(&mut self, ui: &mut Ui, state: ComparisonState<'_>) -> Option<ComparisonAction> {
        let mut action = None;

        ui.heading("Comparação com a revisão");
        ui.add_space(4.0);

        if !state.wants_panel {
            ui.label(
                RichText::new("O texto revisado e as diferenças aparecerão aqui.").weak(),
            );
            return None;
        }

        if state.is_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("A IA está revisando o texto...");
            });
            return None;
        }

        let height = (ui.available_height() - 70.0).max(120.0);
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_min_height(height);
            ui.set_width(ui.available_width());
            Self::body(ui, &state, height);
        });

        ui.horizontal_wrapped(|ui| {
            let stats = state.result.stats();
            ui.label(
                RichText::new(format!("+{}", stats.added_count))
                    .color(SUCCESS_TEXT)
                    .strong(),
            );
            ui.label(
                RichText::new(format!("-{}", stats.removed_count))
                    .color(ERROR_TEXT)
                    .strong(),
            );
            ui.separator();
            ui.label(format!("{} caracteres", state.candidate_char_count));
            if let Some(time) = &state.review_time {
                ui.separator();
                ui.label(format!("Revisado em {}", time));
            }
        });

        ui.horizontal(|ui| {
            if ui.button("📋 Copiar texto revisado").clicked() {
                action = Some(ComparisonAction::Copy);
            }
            if ui.button("💾 Baixar .txt").clicked() {
                action = Some(ComparisonAction::Export);
            }
            self.show_flash(ui);
        });

        action
    }

    fn body(ui: &mut Ui, state: &ComparisonState<'_>, height: f32) {
        if state.readiness == Readiness::Unavailable {
            ui.label(
                RichText::new(
                    "Comparação indisponível: o mecanismo de diferenças não pôde ser iniciado.",
                )
                .color(ERROR_TEXT),
            );
            return;
        }

        if state.readiness == Readiness::Pending || !state.is_settled {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Calculando diferenças...");
            });
            return;
        }

        if let Some(DiffError::ComputationFailure(_)) = state.last_error {
            ui.label(RichText::new("Não foi possível calcular as diferenças.").color(ERROR_TEXT));
            return;
        }

        let units = state.result.display_units();
        if units.is_empty() {
            ui.label(
                RichText::new("Nenhuma diferença encontrada ou textos vazios.")
                    .italics()
                    .weak(),
            );
            return;
        }

        let mut job = build_layout_job(&units, state.font_size, ui.visuals().text_color());
        job.wrap.max_width = ui.available_width();

        egui::ScrollArea::vertical()
            .id_salt("comparison_scroll")
            .max_height(height)
            .show(ui, |ui| {
                ui.add(egui::Label::new(job).wrap());
            });
    }

    fn show_flash(&mut self, ui: &mut Ui) {
        let Some((message, shown_at)) = &self.flash else {
            return;
        };

        let duration = Duration::from_millis(FLASH_DURATION_MS);
        let elapsed = shown_at.elapsed();
        if elapsed >= duration {
            self.flash = None;
            return;
        }

        let fade = 1.0 - elapsed.as_secs_f32() / duration.as_secs_f32();
        ui.label(RichText::new(message.as_str()).color(ui.visuals().text_color().gamma_multiply(fade)));
        ui.ctx().request_repaint_after(Duration::from_millis(50));
    }
}
