/// Custom egui Widgets
///
/// Implementations of dashboard widgets using egui::Painter:
/// - FpsBadge: realized frame rate pill
/// - BiasBar: share of CPU the background workload is shown taking
/// - LagOverlay: banner painted over a frozen frame
/// - TerminalViewport: monospace activity log

use eframe::egui;
use egui::{Color32, Pos2, Rect, Rounding, Stroke, Vec2};

pub const ACCENT: Color32 = Color32::from_rgb(0, 229, 255);
pub const ALERT: Color32 = Color32::from_rgb(239, 68, 68);
pub const OK: Color32 = Color32::from_rgb(74, 222, 128);

/// Below this the FPS badge turns red
pub const LOW_FPS: u32 = 30;

pub fn fps_color(fps: Option<u32>) -> Color32 {
    match fps {
        Some(fps) if fps >= LOW_FPS => OK,
        Some(_) => ALERT,
        None => Color32::GRAY,
    }
}

/// Rounded pill showing the last FPS reading
pub fn fps_badge(ui: &mut egui::Ui, fps: Option<u32>) {
    let text = match fps {
        Some(fps) => format!("● {} FPS", fps),
        None => "● -- FPS".to_string(),
    };
    egui::Frame::none()
        .fill(Color32::from_white_alpha(12))
        .stroke(Stroke::new(1.0, Color32::from_white_alpha(25)))
        .rounding(Rounding::same(12.0))
        .inner_margin(egui::Margin::symmetric(10.0, 4.0))
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new(text)
                    .monospace()
                    .strong()
                    .color(fps_color(fps)),
            );
        });
}

/// Horizontal bar from "Idle" to "Stress Limit"
///
/// # Arguments
/// * `share` - Fill fraction in [0, 1]
/// * `alarm` - Draw the fill in the alert color
pub fn bias_bar(ui: &mut egui::Ui, share: f32, alarm: bool) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("CPU RESOURCE BIAS").small().weak());
    });

    let (response, painter) =
        ui.allocate_painter(Vec2::new(ui.available_width(), 24.0), egui::Sense::hover());
    let rect = response.rect;

    painter.rect_filled(rect, 8.0, Color32::from_white_alpha(12));

    let inner = rect.shrink(4.0);
    let fill_width = inner.width() * share.clamp(0.0, 1.0);
    let fill_rect = Rect::from_min_size(inner.min, Vec2::new(fill_width, inner.height()));
    painter.rect_filled(fill_rect, 6.0, if alarm { ALERT } else { ACCENT });

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Idle").small().weak());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(egui::RichText::new("Stress Limit").small().weak());
        });
    });
}

/// Red "LAG DETECTED" banner over `rect`
pub fn lag_overlay(painter: &egui::Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgba_unmultiplied(239, 68, 68, 26));

    let banner = Rect::from_center_size(rect.center(), Vec2::new(220.0, 40.0));
    painter.rect_filled(banner, 4.0, Color32::from_rgb(220, 38, 38));
    painter.text(
        banner.center(),
        egui::Align2::CENTER_CENTER,
        "LAG DETECTED",
        egui::FontId::new(20.0, egui::FontFamily::Proportional),
        Color32::WHITE,
    );
}

/// Large translucent "BORE ACTIVE / DISABLED" caption while a workload runs
pub fn mode_caption(painter: &egui::Painter, rect: Rect, biased: bool) {
    let (text, color) = if biased {
        ("BORE ACTIVE", Color32::from_rgba_unmultiplied(0, 229, 255, 120))
    } else {
        ("BORE DISABLED", Color32::from_rgba_unmultiplied(239, 68, 68, 170))
    };
    painter.text(
        Pos2::new(rect.center().x, rect.top() + rect.height() * 0.25),
        egui::Align2::CENTER_CENTER,
        text,
        egui::FontId::new(44.0, egui::FontFamily::Proportional),
        color,
    );
}

/// Terminal-style log viewer with monospace font
pub fn terminal_viewport(ui: &mut egui::Ui, lines: &[String]) {
    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .stick_to_bottom(true)
        .max_height(160.0)
        .show(ui, |ui| {
            if lines.is_empty() {
                ui.monospace("Awaiting activity...");
            }
            for line in lines {
                ui.label(egui::RichText::new(line).monospace().small());
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_color_thresholds() {
        assert_eq!(fps_color(None), Color32::GRAY);
        assert_eq!(fps_color(Some(14)), ALERT);
        assert_eq!(fps_color(Some(29)), ALERT);
        assert_eq!(fps_color(Some(30)), OK);
        assert_eq!(fps_color(Some(60)), OK);
    }
}
