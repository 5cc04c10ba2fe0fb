use egui::{Color32, Context, Stroke, Style, Visuals};

// Comparison highlights
pub const ADDED_BG: Color32 = Color32::from_rgb(200, 245, 200);
pub const REMOVED_BG: Color32 = Color32::from_rgb(255, 215, 215);
pub const REMOVED_TEXT: Color32 = Color32::from_rgb(120, 120, 120);

pub const SUCCESS_TEXT: Color32 = Color32::from_rgb(0, 120, 0);
pub const ERROR_TEXT: Color32 = Color32::from_rgb(180, 0, 0);

pub fn configure_style(ctx: &Context) {
    let mut style = Style::default();

    style.spacing.item_spacing = egui::vec2(10.0, 8.0);
    style.spacing.window_margin = egui::Margin::same(15);

    ctx.set_style(style);

    let mut visuals = Visuals::light();
    visuals.window_shadow = egui::epaint::Shadow::NONE;
    visuals.popup_shadow = egui::epaint::Shadow::NONE;

    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, Color32::from_gray(225));
    visuals.widgets.hovered.bg_fill = Color32::from_gray(240);
    visuals.widgets.active.bg_fill = Color32::from_gray(230);

    visuals.selection.bg_fill = Color32::from_rgb(200, 220, 255);
    visuals.selection.stroke = Stroke::new(1.0, Color32::from_rgb(100, 100, 100));

    ctx.set_visuals(visuals);
}
