use crate::constant::{BASE_FONT_SIZE, FONT_SCALE_STEP, MAX_FONT_SCALE, MIN_FONT_SCALE};
use egui::Ui;

/// Font scale shared by both text panels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom {
    scale: f32,
}

impl Default for Zoom {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl Zoom {
    pub fn new(scale: f32) -> Self {
        let scale = if scale.is_finite() { scale } else { 1.0 };
        Self {
            scale: scale.clamp(MIN_FONT_SCALE, MAX_FONT_SCALE),
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn font_size(&self) -> f32 {
        BASE_FONT_SIZE * self.scale
    }

    pub fn percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }

    pub fn can_zoom_in(&self) -> bool {
        self.scale < MAX_FONT_SCALE - f32::EPSILON
    }

    pub fn can_zoom_out(&self) -> bool {
        self.scale > MIN_FONT_SCALE + f32::EPSILON
    }

    pub fn zoom_in(&mut self) {
        self.step(FONT_SCALE_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.step(-FONT_SCALE_STEP);
    }

    pub fn reset(&mut self) {
        self.scale = 1.0;
    }

    fn step(&mut self, delta: f32) {
        // Round to one decimal so repeated steps don't drift
        let next = ((self.scale + delta) * 10.0).round() / 10.0;
        self.scale = next.clamp(MIN_FONT_SCALE, MAX_FONT_SCALE);
    }

    /// Draw the "A-" / "A+" buttons. Returns `true` when the scale changed.
    pub fn controls(&mut self, ui: &mut Ui) -> bool {
        let before = self.scale;
        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.can_zoom_out(), egui::Button::new("A-"))
                .on_hover_text("Diminuir fonte")
                .clicked()
            {
                self.zoom_out();
            }
            if ui
                .add(egui::Button::new(format!("{}%", self.percent())).frame(false))
                .on_hover_text("Tamanho padrão")
                .clicked()
            {
                self.reset();
            }
            if ui
                .add_enabled(self.can_zoom_in(), egui::Button::new("A+"))
                .on_hover_text("Aumentar fonte")
                .clicked()
            {
                self.zoom_in();
            }
        });
        self.scale != before
    }
}
