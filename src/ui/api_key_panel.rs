use crate::backend::key_store::KeyNotice;
use crate::constant::API_KEY_HELP_URL;
use crate::style::{ERROR_TEXT, SUCCESS_TEXT};
use egui::{RichText, Ui};

pub enum ApiKeyAction {
    Save(String),
    Remove,
}

/// Collapsible settings block where the user enters the Gemini API key
pub struct ApiKeyPanel {
    input: String,
    notice: KeyNotice,
}

impl ApiKeyPanel {
    pub fn new(notice: KeyNotice) -> Self {
        Self {
            input: String::new(),
            notice,
        }
    }

    pub fn set_notice(&mut self, notice: KeyNotice) {
        if notice.is_success() {
            self.input.clear();
        }
        self.notice = notice;
    }

    pub fn show(&mut self, ui: &mut Ui, has_key: bool) -> Option<ApiKeyAction> {
        let mut action = None;

        egui::CollapsingHeader::new("⚙ Configuração da API Key")
            .default_open(!has_key)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let hint = if has_key {
                        "Chave salva. Digite para substituir."
                    } else {
                        "Cole sua API Key do Google Gemini"
                    };
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.input)
                            .password(true)
                            .hint_text(hint)
                            .desired_width(280.0),
                    );
                    let submitted =
                        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                    if ui.button("Salvar").clicked() || submitted {
                        action = Some(ApiKeyAction::Save(self.input.clone()));
                    }
                    if has_key && ui.button("Remover").clicked() {
                        action = Some(ApiKeyAction::Remove);
                    }
                });

                let text = RichText::new(self.notice.to_string()).size(12.0);
                let text = if self.notice.is_success() {
                    text.color(SUCCESS_TEXT)
                } else if self.notice.is_error() {
                    text.color(ERROR_TEXT)
                } else {
                    text.weak()
                };
                ui.label(text);

                ui.hyperlink_to("Obtenha uma API Key no Google AI Studio", API_KEY_HELP_URL);
            });

        action
    }
}
