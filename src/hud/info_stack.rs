//! Diagnostics panels stacked under the action bar

use glam::Vec2;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

use crate::render::{Canvas, Color, Rect, TextStyle};
use crate::transition::TransitionPhase;

const STACK_MARGIN: f32 = 8.0;
const PANEL_SPACING: f32 = 12.0;
const PANEL_PADDING: f32 = 6.0;
const PANEL_TEXT_SIZE: f32 = 16.0;
const LINE_SPACING: f32 = 2.0;

/// State the panels read every frame
#[derive(Debug, Clone, Copy)]
pub struct HudStatus {
    pub screen: Option<&'static str>,
    pub phase: TransitionPhase,
}

/// A block of text lines shown in the [`InfoStack`]
pub trait InfoPanel {
    fn update(&mut self, dt: f32, status: &HudStatus);

    fn lines(&self) -> &[String];
}

/// Frames kept for the rolling FPS average
const FRAME_WINDOW: usize = 100;
/// Seconds between text refreshes
const REFRESH_INTERVAL: f32 = 0.1;

/// Rolling FPS, last frame time and resident memory of this process
pub struct FpsPanel {
    frame_times: Vec<f32>,
    since_refresh: f32,
    system: System,
    pid: Option<Pid>,
    memory_bytes: Option<u64>,
    lines: Vec<String>,
}

impl FpsPanel {
    pub fn new() -> Self {
        Self {
            frame_times: Vec::with_capacity(FRAME_WINDOW),
            // Refresh on the first update
            since_refresh: REFRESH_INTERVAL,
            system: System::new(),
            pid: sysinfo::get_current_pid().ok(),
            memory_bytes: None,
            lines: Vec::new(),
        }
    }

    pub fn record_frame(&mut self, dt: f32) {
        self.frame_times.push(dt);
        if self.frame_times.len() > FRAME_WINDOW {
            self.frame_times.remove(0);
        }
    }

    pub fn fps(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let avg_frame_time: f32 =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        if avg_frame_time > 0.0 {
            1.0 / avg_frame_time
        } else {
            0.0
        }
    }

    fn last_frame_ms(&self) -> f32 {
        self.frame_times.last().copied().unwrap_or(0.0) * 1000.0
    }

    fn refresh_memory(&mut self) {
        let Some(pid) = self.pid else {
            return;
        };
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        self.memory_bytes = self.system.process(pid).map(|process| process.memory());
    }

    fn refresh_lines(&mut self) {
        self.lines = vec![
            format!("FPS: {:.1}", self.fps()),
            format!("Frame: {:.2} ms", self.last_frame_ms()),
        ];
        if let Some(bytes) = self.memory_bytes {
            self.lines
                .push(format!("Memory: {:.1} MB", bytes as f64 / 1_048_576.0));
        }
    }
}

impl Default for FpsPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl InfoPanel for FpsPanel {
    fn update(&mut self, dt: f32, _status: &HudStatus) {
        self.record_frame(dt);

        self.since_refresh += dt;
        if self.since_refresh >= REFRESH_INTERVAL {
            self.since_refresh = 0.0;
            self.refresh_memory();
            self.refresh_lines();
        }
    }

    fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Active screen and transition phase
#[derive(Default)]
pub struct ScreenPanel {
    lines: Vec<String>,
}

impl ScreenPanel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InfoPanel for ScreenPanel {
    fn update(&mut self, _dt: f32, status: &HudStatus) {
        self.lines = vec![
            format!("Screen: {}", status.screen.unwrap_or("none")),
            format!("Transition: {:?}", status.phase),
        ];
    }

    fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Panels drawn top to bottom starting just below `top`
pub struct InfoStack {
    panels: Vec<Box<dyn InfoPanel>>,
    visible: bool,
}

impl InfoStack {
    pub fn new() -> Self {
        Self {
            panels: Vec::new(),
            visible: true,
        }
    }

    pub fn add_panel(&mut self, panel: Box<dyn InfoPanel>) {
        self.panels.push(panel);
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn update(&mut self, dt: f32, status: &HudStatus) {
        for panel in &mut self.panels {
            panel.update(dt, status);
        }
    }

    pub fn render(&self, canvas: &mut dyn Canvas, top: f32) {
        if !self.visible {
            return;
        }

        let mut y = top + STACK_MARGIN;
        for panel in &self.panels {
            let lines = panel.lines();
            if lines.is_empty() {
                continue;
            }

            let sizes: Vec<Vec2> = lines
                .iter()
                .map(|line| canvas.measure_text(line, PANEL_TEXT_SIZE))
                .collect();
            let width = sizes.iter().map(|s| s.x).fold(0.0, f32::max);
            let height = sizes.iter().map(|s| s.y + LINE_SPACING).sum::<f32>() - LINE_SPACING;

            canvas.fill_rect(
                Rect::new(
                    STACK_MARGIN,
                    y,
                    width + PANEL_PADDING * 2.0,
                    height + PANEL_PADDING * 2.0,
                ),
                Color::BLACK.with_alpha(0.5),
            );

            let mut line_y = y + PANEL_PADDING;
            let style = TextStyle::new(PANEL_TEXT_SIZE);
            for (line, size) in lines.iter().zip(&sizes) {
                canvas.draw_text(line, Vec2::new(STACK_MARGIN + PANEL_PADDING, line_y), &style);
                line_y += size.y + LINE_SPACING;
            }

            y += height + PANEL_PADDING * 2.0 + PANEL_SPACING;
        }
    }
}

impl Default for InfoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle_status() -> HudStatus {
        HudStatus {
            screen: Some("MainMenu"),
            phase: TransitionPhase::Idle,
        }
    }

    #[test]
    fn test_fps_average() {
        let mut panel = FpsPanel::new();
        assert_eq!(panel.fps(), 0.0);

        for _ in 0..10 {
            panel.record_frame(0.02);
        }
        assert!((panel.fps() - 50.0).abs() < 0.01);
    }

    #[test]
    fn test_fps_window_is_bounded() {
        let mut panel = FpsPanel::new();
        for _ in 0..FRAME_WINDOW {
            panel.record_frame(1.0);
        }
        for _ in 0..FRAME_WINDOW {
            panel.record_frame(0.01);
        }
        assert!((panel.fps() - 100.0).abs() < 0.1);
    }

    #[test]
    fn test_fps_lines_refresh_on_interval() {
        let mut panel = FpsPanel::new();
        panel.update(0.016, &idle_status());
        let first = panel.lines().to_vec();
        assert!(first[0].starts_with("FPS:"));

        // Under the interval: text is held
        panel.update(0.05, &idle_status());
        assert_eq!(panel.lines(), first.as_slice());
    }

    #[test]
    fn test_screen_panel_lines() {
        let mut panel = ScreenPanel::new();
        panel.update(
            0.0,
            &HudStatus {
                screen: None,
                phase: TransitionPhase::FadingOut,
            },
        );
        assert_eq!(panel.lines(), ["Screen: none", "Transition: FadingOut"]);
    }
}
