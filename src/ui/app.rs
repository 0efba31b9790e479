/// Main App and UI State
///
/// `DashboardApp` is the eframe::App for the visualizer. Every `update` is one
/// frame opportunity: it reconciles the latest poll result, ticks the FPS
/// monitor and the FrameClock, uploads fresh frames to a texture and draws
/// the control panel.

use eframe::egui;
use std::collections::VecDeque;
use tokio::sync::{mpsc, watch};

use super::widgets;
use crate::log_collector::LogLine;
use crate::models::BiasMode;
use crate::render::{FpsMonitor, FrameBuffer, FrameClock, SystemClock};
use crate::sync::{BackendStatus, CommandDispatcher, DashboardModel};

/// Activity lines kept for the log viewport
const ACTIVITY_CAPACITY: usize = 200;

/// Channels and settings the app is built from
pub struct DashboardChannels {
    pub status_rx: watch::Receiver<BackendStatus>,
    pub dispatcher: CommandDispatcher,
    /// Copies of log lines for the activity viewport
    pub log_rx: Option<mpsc::Receiver<LogLine>>,
}

pub struct DashboardApp {
    model: DashboardModel,
    status_rx: watch::Receiver<BackendStatus>,
    dispatcher: CommandDispatcher,
    log_rx: Option<mpsc::Receiver<LogLine>>,

    frame_clock: FrameClock<SystemClock>,
    fps: FpsMonitor,
    texture: Option<egui::TextureHandle>,
    /// Set while the visible frame is frozen
    lag: bool,

    activity: VecDeque<String>,
    backend_label: String,
}

impl DashboardApp {
    pub fn new(
        frame_clock: FrameClock<SystemClock>,
        channels: DashboardChannels,
        backend_label: String,
    ) -> Self {
        let fps = FpsMonitor::new(frame_clock.now_ms());
        let mut app = Self {
            model: DashboardModel::new(),
            status_rx: channels.status_rx,
            dispatcher: channels.dispatcher,
            log_rx: channels.log_rx,
            frame_clock,
            fps,
            texture: None,
            lag: false,
            activity: VecDeque::with_capacity(ACTIVITY_CAPACITY),
            backend_label,
        };
        app.restart_clock();
        app
    }

    /// Frames are independent, so a state change restarts the clock rather
    /// than mutating the running pipeline
    fn restart_clock(&mut self) {
        self.frame_clock.start(self.model.render_state());
        self.lag = false;
    }

    fn process_status_updates(&mut self) {
        // Err means the poller is gone; keep the last state
        if !self.status_rx.has_changed().unwrap_or(false) {
            return;
        }
        let status = *self.status_rx.borrow_and_update();
        if self.model.apply_status(status) {
            log::debug!(
                "[UI] Reconciled with backend: {:?}",
                self.model.render_state()
            );
            self.restart_clock();
        }
    }

    fn process_log_lines(&mut self) {
        let Some(rx) = self.log_rx.as_mut() else {
            return;
        };
        while let Ok(line) = rx.try_recv() {
            if self.activity.len() == ACTIVITY_CAPACITY {
                self.activity.pop_front();
            }
            self.activity
                .push_back(format!("{} {}", line.timestamp, line.message));
        }
    }

    fn on_toggle_stress(&mut self) {
        let request = self.model.toggle_stress();
        self.dispatcher.dispatch(request);
        self.restart_clock();
    }

    fn on_toggle_bias(&mut self) {
        if let Some(request) = self.model.toggle_bias() {
            self.dispatcher.dispatch(request);
        }
        self.restart_clock();
    }

    fn render_control_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("core_control")
            .resizable(false)
            .exact_width(280.0)
            .show(ctx, |ui| {
                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    ui.heading(egui::RichText::new("CORE CONTROL").strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        widgets::fps_badge(ui, self.fps.display_fps());
                    });
                });
                ui.add_space(8.0);

                let backend = self.model.backend();
                let (dot, text) = if backend.reachable {
                    (widgets::OK, format!("Backend: {}", self.backend_label))
                } else {
                    (widgets::ALERT, "Backend offline".to_string())
                };
                ui.label(egui::RichText::new(text).small().color(dot));
                ui.separator();

                let state = self.model.render_state();
                let stress_label = if state.stress_active { "⏹ HALT STRESS" } else { "▶ TRIGGER LOAD" };
                let stress_fill = if state.stress_active { widgets::ALERT } else { widgets::ACCENT };
                let stress = egui::Button::new(egui::RichText::new(stress_label).strong().size(18.0))
                    .fill(stress_fill.linear_multiply(0.35))
                    .min_size(egui::vec2(ui.available_width(), 48.0));
                if ui.add(stress).clicked() {
                    self.on_toggle_stress();
                }

                ui.add_space(8.0);
                let biased = state.bias_mode == BiasMode::LatencyBiased;
                let bias_label = if biased { "BORE ACTIVATED" } else { "BORE DEACTIVATED" };
                let bias = egui::Button::new(egui::RichText::new(bias_label).strong().size(18.0))
                    .stroke(egui::Stroke::new(
                        2.0,
                        if biased { widgets::ACCENT } else { egui::Color32::from_white_alpha(25) },
                    ))
                    .min_size(egui::vec2(ui.available_width(), 48.0));
                if ui
                    .add(bias)
                    .on_hover_text("Scheduler architecture: latency-biased (BORE) or fair")
                    .clicked()
                {
                    self.on_toggle_bias();
                }

                ui.add_space(16.0);
                let state = self.model.render_state();
                widgets::bias_bar(ui, self.model.workload_cpu_share(), state.is_contended());

                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("TARGET").small().weak());
                    ui.label(
                        egui::RichText::new(format!("{} FPS", self.model.target_fps()))
                            .monospace()
                            .strong()
                            .color(widgets::ACCENT),
                    );
                });

                ui.separator();
                ui.label(egui::RichText::new("ACTIVITY").small().weak());
                let lines: Vec<String> = self.activity.iter().cloned().collect();
                widgets::terminal_viewport(ui, &lines);
            });
    }

    fn render_canvas(&mut self, ctx: &egui::Context) {
        let state = self.model.render_state();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(egui::RichText::new("BORE DASHBOARD").strong());
                ui.label(egui::RichText::new("Interactive workload").small().weak());
                if state.is_contended() {
                    ui.label(egui::RichText::new("HIGH CONTENTION").small().color(widgets::ALERT));
                }
            });
            ui.add_space(8.0);

            let Some(texture) = &self.texture else {
                ui.centered_and_justified(|ui| ui.spinner());
                return;
            };

            let available = ui.available_size();
            let tex_size = texture.size_vec2();
            let scale = (available.x / tex_size.x).min(available.y / tex_size.y).max(0.1);
            let response = ui.image((texture.id(), tex_size * scale));
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            if state.stress_active {
                widgets::mode_caption(&painter, rect, state.bias_mode == BiasMode::LatencyBiased);
            }
            if self.lag {
                widgets::lag_overlay(&painter, rect);
            }
        });
    }
}

fn upload_frame(
    texture: &mut Option<egui::TextureHandle>,
    ctx: &egui::Context,
    frame: &FrameBuffer,
) {
    let image = egui::ColorImage::from_rgba_unmultiplied(
        [frame.width(), frame.height()],
        frame.as_rgba(),
    );
    match texture {
        Some(handle) => handle.set(image, egui::TextureOptions::NEAREST),
        None => {
            *texture = Some(ctx.load_texture("fractal", image, egui::TextureOptions::NEAREST));
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_status_updates();
        self.process_log_lines();

        // Counted on every opportunity, independent of what the frame shows
        self.fps.record_tick(self.frame_clock.now_ms());

        if let Some(report) = self.frame_clock.tick(ctx) {
            self.lag = report.lag;
            if report.is_new_frame() {
                if let Some(frame) = report.frame {
                    upload_frame(&mut self.texture, ctx, frame);
                }
            }
        }

        self.render_control_panel(ctx);
        self.render_canvas(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.frame_clock.cancel();
        log::info!("[UI] Window closed");
    }
}
