//! Addons shipped with the action bar

use chrono::{DateTime, Local};
use glam::Vec2;

use super::action_bar::{BarAddon, BarAlignment};
use crate::render::{Canvas, Color, Rect, TextStyle};

const ADDON_TEXT_SIZE: f32 = 18.0;
const ADDON_PADDING: f32 = 12.0;

/// Formats an elapsed duration as `Xh Ym Zs`, leaving out leading zero units
pub fn format_uptime(total_seconds: i64) -> String {
    let total = total_seconds.max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// What the clock addon shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockMode {
    #[default]
    TimeAndUptime,
    TimeOnly,
    UptimeOnly,
}

impl ClockMode {
    pub fn next(self) -> Self {
        match self {
            Self::TimeAndUptime => Self::TimeOnly,
            Self::TimeOnly => Self::UptimeOnly,
            Self::UptimeOnly => Self::TimeAndUptime,
        }
    }
}

/// Wall clock plus process uptime; clicking cycles the display mode
pub struct ClockAddon {
    started_at: DateTime<Local>,
    mode: ClockMode,
    text: String,
}

impl ClockAddon {
    pub fn new(started_at: DateTime<Local>) -> Self {
        let mut addon = Self {
            started_at,
            mode: ClockMode::default(),
            text: String::new(),
        };
        addon.refresh(Local::now());
        addon
    }

    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Rebuilds the label for wall time `now`
    pub fn refresh(&mut self, now: DateTime<Local>) {
        let time = now.format("%H:%M:%S").to_string();
        let uptime = format_uptime((now - self.started_at).num_seconds());

        self.text = match self.mode {
            ClockMode::TimeAndUptime => format!("{time} | up {uptime}"),
            ClockMode::TimeOnly => time,
            ClockMode::UptimeOnly => format!("up {uptime}"),
        };
    }
}

impl BarAddon for ClockAddon {
    fn alignment(&self) -> BarAlignment {
        BarAlignment::Right
    }

    fn update(&mut self, _dt: f32) {
        self.refresh(Local::now());
    }

    fn required_width(&self, canvas: &mut dyn Canvas) -> f32 {
        canvas.measure_text(&self.text, ADDON_TEXT_SIZE).x + ADDON_PADDING * 2.0
    }

    fn render(&mut self, canvas: &mut dyn Canvas, rect: Rect, _hovered: bool) {
        canvas.draw_text(
            &self.text,
            rect.center(),
            &TextStyle::new(ADDON_TEXT_SIZE).centered(),
        );
    }

    fn on_click(&mut self) {
        self.mode = self.mode.next();
        self.refresh(Local::now());
    }
}

/// Static text
pub struct LabelAddon {
    text: String,
    alignment: BarAlignment,
}

impl LabelAddon {
    pub fn new(text: impl Into<String>, alignment: BarAlignment) -> Self {
        Self {
            text: text.into(),
            alignment,
        }
    }
}

impl BarAddon for LabelAddon {
    fn alignment(&self) -> BarAlignment {
        self.alignment
    }

    fn required_width(&self, canvas: &mut dyn Canvas) -> f32 {
        canvas.measure_text(&self.text, ADDON_TEXT_SIZE).x + ADDON_PADDING * 2.0
    }

    fn render(&mut self, canvas: &mut dyn Canvas, rect: Rect, hovered: bool) {
        let color = if hovered { Color::YELLOW } else { Color::WHITE };
        let size = canvas.measure_text(&self.text, ADDON_TEXT_SIZE);
        let pos = Vec2::new(rect.x + ADDON_PADDING, rect.center().y - size.y / 2.0);
        canvas.draw_text(&self.text, pos, &TextStyle::new(ADDON_TEXT_SIZE).color(color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(0), "0s");
        assert_eq!(format_uptime(59), "59s");
        assert_eq!(format_uptime(61), "1m 1s");
        assert_eq!(format_uptime(3600), "1h 0m 0s");
        assert_eq!(format_uptime(3 * 3600 + 25 * 60 + 7), "3h 25m 7s");
        assert_eq!(format_uptime(-5), "0s");
    }

    #[test]
    fn test_click_cycles_modes() {
        let mut clock = ClockAddon::new(Local::now());
        assert_eq!(clock.mode(), ClockMode::TimeAndUptime);

        clock.on_click();
        assert_eq!(clock.mode(), ClockMode::TimeOnly);
        clock.on_click();
        assert_eq!(clock.mode(), ClockMode::UptimeOnly);
        clock.on_click();
        assert_eq!(clock.mode(), ClockMode::TimeAndUptime);
    }

    #[test]
    fn test_clock_text_per_mode() {
        let started = Local::now();
        let now = started + Duration::seconds(65);
        let mut clock = ClockAddon::new(started);

        clock.refresh(now);
        assert!(clock.text().ends_with("| up 1m 5s"));

        clock.mode = ClockMode::TimeOnly;
        clock.refresh(now);
        assert_eq!(clock.text(), now.format("%H:%M:%S").to_string());

        clock.mode = ClockMode::UptimeOnly;
        clock.refresh(now);
        assert_eq!(clock.text(), "up 1m 5s");
    }
}
