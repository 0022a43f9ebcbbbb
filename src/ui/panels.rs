use egui::{Color32, Context, RichText, ScrollArea, Ui};

use conch3d::math::{AngleUnit, DegenerateNormals, SURFACE_PRESETS, TessellationMode};

use crate::ui::state::{MeshStats, UiState};
use crate::ui::theme::*;

#[derive(Default)]
pub struct UiActions {
    pub rebuild_mesh: bool,
    pub reset_view: bool,
}

pub fn draw_side_panel(
    ctx: &Context,
    state: &mut UiState,
    stats: &MeshStats,
    last_error: &Option<String>,
) -> UiActions {
    let mut actions = UiActions::default();

    egui::SidePanel::right("control_panel")
        .min_width(300.0)
        .max_width(380.0)
        .default_width(320.0)
        .frame(egui::Frame::default().fill(BG_PANEL).inner_margin(16.0))
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.heading(RichText::new("Conch 3D").strong());
                ui.label(RichText::new("Parametric surface viewer").color(TEXT_MUTED).size(11.0));
                ui.add_space(16.0);

                section_header(ui, "PRESET");
                let selected = state
                    .selected_preset
                    .map(|i| SURFACE_PRESETS[i].name)
                    .unwrap_or("Custom");
                egui::ComboBox::from_id_salt("surface_presets")
                    .selected_text(selected)
                    .width(ui.available_width())
                    .show_ui(ui, |ui| {
                        for (i, preset) in SURFACE_PRESETS.iter().enumerate() {
                            if ui.selectable_label(state.selected_preset == Some(i), preset.name).clicked() {
                                state.apply_preset(i, preset);
                                actions.reset_view = true;
                            }
                        }
                    });
                if let Some(i) = state.selected_preset {
                    ui.add_space(4.0);
                    ui.label(RichText::new(SURFACE_PRESETS[i].description)
                        .color(TEXT_MUTED).size(11.0).italics());
                }
                ui.add_space(16.0);

                let mut changed = false;

                section_header(ui, "SURFACE");
                ui.label(RichText::new(state.kind.label()).color(ACCENT_SHELL));
                egui::Grid::new("scale").num_columns(2).spacing([8.0, 4.0]).show(ui, |ui| {
                    for (label, value) in [
                        ("A", &mut state.scale.0),
                        ("B", &mut state.scale.1),
                        ("C", &mut state.scale.2),
                    ] {
                        ui.label(label);
                        changed |= ui.add(egui::DragValue::new(value).speed(0.005).range(-10.0..=10.0)).changed();
                        ui.end_row();
                    }
                });
                ui.add_space(4.0);
                changed |= range_controls(ui, "u", &mut state.domain.u);
                changed |= range_controls(ui, "v", &mut state.domain.v);
                ui.horizontal(|ui| {
                    ui.label("Angles:");
                    let mut unit = state.unit;
                    ui.radio_value(&mut unit, AngleUnit::Degrees, "deg");
                    ui.radio_value(&mut unit, AngleUnit::Radians, "rad");
                    if unit != state.unit {
                        state.set_unit(unit);
                        changed = true;
                    }
                });
                ui.add_space(16.0);

                section_header(ui, "TESSELLATION");
                ui.horizontal(|ui| {
                    ui.label("Step:");
                    let range = state.step_range();
                    changed |= ui.add(egui::Slider::new(&mut state.tessellation.step, range).logarithmic(true)).changed();
                });
                ui.horizontal(|ui| {
                    ui.label("Delta:");
                    changed |= ui.add(egui::DragValue::new(&mut state.tessellation.delta)
                        .speed(0.0001).range(1e-6..=0.1).max_decimals(6)).changed();
                });
                ui.horizontal(|ui| {
                    ui.label("Mode:");
                    changed |= ui.radio_value(&mut state.tessellation.mode, TessellationMode::Indexed, "Indexed").changed();
                    changed |= ui.radio_value(&mut state.tessellation.mode, TessellationMode::Flat, "Flat").changed();
                });
                let mut zero = state.tessellation.degenerate_normals == DegenerateNormals::Zero;
                if ui.checkbox(&mut zero, "Zero degenerate normals").changed() {
                    state.tessellation.degenerate_normals = if zero {
                        DegenerateNormals::Zero
                    } else {
                        DegenerateNormals::Propagate
                    };
                    changed = true;
                }

                if changed {
                    state.selected_preset = None;
                    state.mesh_needs_rebuild = true;
                }
                if state.mesh_needs_rebuild {
                    actions.rebuild_mesh = true;
                }

                if let Some(err) = last_error {
                    ui.add_space(6.0);
                    error_frame(ui, err);
                }
                ui.add_space(16.0);

                ui.separator();
                ui.add_space(12.0);

                lighting_controls(ui, state);
                ui.add_space(16.0);

                section_header(ui, "VIEW");
                ui.horizontal(|ui| {
                    ui.checkbox(&mut state.vsync_enabled, "VSync");
                    ui.checkbox(&mut state.show_stats, "Stats");
                    if ui.button("Reset view").clicked() {
                        actions.reset_view = true;
                    }
                });
                ui.add_space(16.0);

                if state.show_stats {
                    stats_panel(ui, stats);
                }
            });
        });

    actions
}

fn section_header(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).color(TEXT_MUTED).size(11.0).strong());
    ui.add_space(4.0);
}

fn range_controls(ui: &mut Ui, label: &str, range: &mut (f64, f64)) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label(format!("{}:", label));
        changed |= ui.add(egui::DragValue::new(&mut range.0).speed(0.1)).changed();
        ui.label("to");
        changed |= ui.add(egui::DragValue::new(&mut range.1).speed(0.1)).changed();
    });
    changed
}

fn lighting_controls(ui: &mut Ui, state: &mut UiState) {
    section_header(ui, "LIGHT");
    let light = &mut state.lighting;

    egui::Grid::new("light_position").num_columns(2).spacing([8.0, 4.0]).show(ui, |ui| {
        for (label, value) in ["X", "Y", "Z"].iter().zip(light.position.iter_mut()) {
            ui.label(*label);
            ui.add(egui::Slider::new(value, -10.0..=10.0));
            ui.end_row();
        }
        ui.label("Range");
        ui.add(egui::Slider::new(&mut light.range, 0.5..=180.0).suffix("°"));
        ui.end_row();
        ui.label("Focus");
        ui.add(egui::Slider::new(&mut light.focus, 0.0..=64.0));
        ui.end_row();
        ui.label("Ambient");
        ui.add(egui::Slider::new(&mut light.ambient, 0.0..=1.0));
        ui.end_row();
    });

    ui.horizontal(|ui| {
        ui.label("Colour:");
        ui.color_edit_button_rgba_unmultiplied(&mut light.color);
        ui.label("Background:");
        ui.color_edit_button_rgba_unmultiplied(&mut state.background);
    });
}

fn error_frame(ui: &mut Ui, err: &str) {
    egui::Frame::default()
        .fill(Color32::from_rgb(250, 228, 224))
        .stroke(egui::Stroke::new(1.0, ACCENT_RED))
        .rounding(4.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.label(RichText::new(err).color(ACCENT_RED).size(11.0));
        });
}

fn stats_panel(ui: &mut Ui, stats: &MeshStats) {
    section_header(ui, "STATISTICS");
    egui::Frame::default()
        .fill(BG_WIDGET)
        .stroke(egui::Stroke::new(1.0, BORDER_SUBTLE))
        .rounding(6.0)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.style_mut().override_font_id = Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));

            let fps_color = if stats.fps >= 60.0 { ACCENT_GREEN } else if stats.fps >= 30.0 { ACCENT_ORANGE } else { ACCENT_RED };

            egui::Grid::new("stats").num_columns(2).spacing([20.0, 4.0]).show(ui, |ui| {
                ui.label(RichText::new("FPS").color(TEXT_MUTED));
                ui.label(RichText::new(format!("{:.0}", stats.fps)).color(fps_color));
                ui.end_row();

                ui.label(RichText::new("Vertices").color(TEXT_MUTED));
                ui.label(fmt_num(stats.vertices));
                ui.end_row();

                ui.label(RichText::new("Triangles").color(TEXT_MUTED));
                ui.label(fmt_num(stats.triangles));
                ui.end_row();

                ui.label(RichText::new("Indices").color(TEXT_MUTED));
                ui.label(stats.index_format.unwrap_or("none"));
                ui.end_row();

                ui.label(RichText::new("Build ms").color(TEXT_MUTED));
                ui.label(format!("{:.1}", stats.tessellation_ms));
                ui.end_row();
            });
        });
}

pub fn draw_help_overlay(ctx: &Context) {
    egui::Area::new(egui::Id::new("help_overlay"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(12.0, -12.0))
        .show(ctx, |ui| {
            egui::Frame::default()
                .fill(Color32::from_white_alpha(200))
                .rounding(6.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.label(RichText::new("LMB+Drag - Rotate | Scroll - Zoom | Tab - Panel").color(TEXT_MUTED).size(11.0));
                });
        });
}

fn fmt_num(n: usize) -> String {
    if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        format!("{}", n)
    }
}
