use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Visuals};

pub const BG_PANEL: Color32 = Color32::from_rgb(246, 245, 240);
pub const BG_WIDGET: Color32 = Color32::from_rgb(232, 230, 222);
pub const BG_WIDGET_HOVER: Color32 = Color32::from_rgb(222, 219, 207);
pub const BG_WIDGET_ACTIVE: Color32 = Color32::from_rgb(210, 205, 188);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(52, 50, 46);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(128, 124, 116);

pub const ACCENT_SHELL: Color32 = Color32::from_rgb(196, 150, 28);
pub const ACCENT_GREEN: Color32 = Color32::from_rgb(52, 140, 70);
pub const ACCENT_ORANGE: Color32 = Color32::from_rgb(200, 110, 30);
pub const ACCENT_RED: Color32 = Color32::from_rgb(180, 45, 40);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(214, 210, 198);

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::light();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.faint_bg_color = BG_WIDGET;
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.window_rounding = Rounding::same(6.0);
    visuals.selection.bg_fill = ACCENT_SHELL.gamma_multiply(0.35);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT_SHELL);
    visuals.warn_fg_color = ACCENT_ORANGE;
    visuals.error_fg_color = ACCENT_RED;
    visuals.slider_trailing_fill = true;

    let widgets = &mut visuals.widgets;
    for (state, fill) in [
        (&mut widgets.inactive, BG_WIDGET),
        (&mut widgets.hovered, BG_WIDGET_HOVER),
        (&mut widgets.active, BG_WIDGET_ACTIVE),
    ] {
        state.bg_fill = fill;
        state.weak_bg_fill = fill;
        state.rounding = Rounding::same(4.0);
    }
    widgets.noninteractive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    widgets.active.bg_stroke = Stroke::new(1.5, ACCENT_SHELL);

    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
        style.spacing.slider_width = 180.0;

        style.text_styles = [
            (TextStyle::Small, FontId::new(11.0, FontFamily::Proportional)),
            (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
            (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
            (TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional)),
            (TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace)),
        ]
        .into();
    });
}
