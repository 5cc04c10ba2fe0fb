use crate::review::ReviewSession;
use crate::style::{ERROR_TEXT, SUCCESS_TEXT};
use crate::ui::zoom::Zoom;
use egui::{FontId, RichText, Ui};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Edited,
    ReviewRequested,
    ZoomChanged,
}

/// Left column: the original text, the transcription toggle and the review button
pub struct InputPanel;

impl InputPanel {
    pub fn show(
        ui: &mut Ui,
        session: &mut ReviewSession,
        zoom: &mut Zoom,
        has_api_key: bool,
    ) -> Vec<InputAction> {
        let mut actions = Vec::new();

        ui.horizontal(|ui| {
            ui.heading("Texto original");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if zoom.controls(ui) {
                    actions.push(InputAction::ZoomChanged);
                }
            });
        });

        let editor_height = (ui.available_height() - 120.0).max(160.0);
        egui::ScrollArea::vertical()
            .id_salt("original_scroll")
            .max_height(editor_height)
            .show(ui, |ui| {
                let response = ui.add_enabled(
                    !session.is_loading(),
                    egui::TextEdit::multiline(session.original_mut())
                        .font(FontId::proportional(zoom.font_size()))
                        .hint_text("Cole aqui o texto legislativo a ser revisado...")
                        .desired_width(f32::INFINITY)
                        .desired_rows(20),
                );
                if response.changed() {
                    actions.push(InputAction::Edited);
                }
            });

        ui.label(
            RichText::new(format!("{} caracteres", session.original_char_count()))
                .size(12.0)
                .weak(),
        );

        ui.add_enabled(
            !session.is_loading(),
            egui::Checkbox::new(
                session.transcription_mut(),
                "Transcrição de discurso (preservar a fala do orador)",
            ),
        );

        ui.horizontal(|ui| {
            let label = if session.is_loading() {
                "Revisando..."
            } else {
                "Revisar com IA"
            };
            if ui
                .add_enabled(
                    session.can_review(has_api_key),
                    egui::Button::new(RichText::new(label).strong()),
                )
                .clicked()
            {
                actions.push(InputAction::ReviewRequested);
            }
            if session.is_loading() {
                ui.spinner();
            }
        });

        if let Some(error) = session.error() {
            ui.label(RichText::new(error).color(ERROR_TEXT));
        } else if let Some(success) = session.success() {
            ui.label(RichText::new(success).color(SUCCESS_TEXT));
        }

        actions
    }
}
