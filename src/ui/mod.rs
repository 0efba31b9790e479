//! UI Module - egui visualizer
//!
//! - `app`: the eframe::App that owns the frame loop and controls
//! - `widgets`: painter-based badges, bars and overlays

pub mod app;
pub mod widgets;

use eframe::egui;

use crate::render::FrameSignal;

pub use app::{DashboardApp, DashboardChannels};

/// egui presents as fast as the host allows once a repaint is requested
impl FrameSignal for egui::Context {
    fn request_next_frame(&self) {
        self.request_repaint();
    }
}
