//! Recording fakes shared by the integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use aethel::audio::SilentAudio;
use aethel::config::AssetsConfig;
use aethel::context::{AppContext, ScreenContext, Services};
use aethel::input::{
    InputEvent, InputQueue, Key, KeyInput, Modifiers, PointerButton, PointerButtonInput,
    PointerMotion, TimedInputEvent,
};
use aethel::render::{
    AssetError, Canvas, Color, Rect, RenderError, RenderSurface, TextAnchor, TextStyle, TextureId,
};
use aethel::screen::{Screen, ScreenFactory, ScreenId, ScreenPayload};
use glam::Vec2;

pub const RENDER_SIZE: Vec2 = Vec2::new(1920.0, 1080.0);

/// Everything the fake surface was asked to do
#[derive(Debug, Default)]
pub struct SurfaceLog {
    pub clears: usize,
    pub overlays: Vec<f32>,
    pub presents: usize,
    pub texts: Vec<String>,
    pub textures_loaded: Vec<PathBuf>,
    pub textures_unloaded: Vec<TextureId>,
    /// Returned by the next `present` instead of success
    pub fail_next_present: Option<RenderError>,
}

/// Render surface that records calls; text is 0.5 × size wide per character
pub struct FakeSurface {
    log: Rc<RefCell<SurfaceLog>>,
    next_texture: u64,
}

impl FakeSurface {
    pub fn new(log: Rc<RefCell<SurfaceLog>>) -> Self {
        Self {
            log,
            next_texture: 1,
        }
    }
}

impl Canvas for FakeSurface {
    fn size(&self) -> Vec2 {
        RENDER_SIZE
    }

    fn fill_rect(&mut self, _rect: Rect, _color: Color) {}

    fn draw_text(&mut self, text: &str, pos: Vec2, style: &TextStyle) -> Rect {
        self.log.borrow_mut().texts.push(text.to_string());
        let size = self.measure_text(text, style.size);
        let top_left = match style.anchor {
            TextAnchor::TopLeft => pos,
            TextAnchor::Center => pos - size / 2.0,
        };
        Rect::from_min_size(top_left, size)
    }

    fn measure_text(&mut self, text: &str, size: f32) -> Vec2 {
        Vec2::new(text.chars().count() as f32 * size * 0.5, size)
    }

    fn load_texture(&mut self, path: &Path) -> Result<TextureId, AssetError> {
        if !path.is_file() {
            return Err(AssetError::NotFound(path.display().to_string()));
        }
        self.log
            .borrow_mut()
            .textures_loaded
            .push(path.to_path_buf());
        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        Ok(id)
    }

    fn draw_texture(&mut self, _texture: TextureId, _rect: Rect, _tint: Color) {}

    fn unload_texture(&mut self, texture: TextureId) {
        self.log.borrow_mut().textures_unloaded.push(texture);
    }
}

impl RenderSurface for FakeSurface {
    fn clear(&mut self, _color: Color) {
        self.log.borrow_mut().clears += 1;
    }

    fn draw_overlay(&mut self, opacity: f32) {
        self.log.borrow_mut().overlays.push(opacity);
    }

    fn present(&mut self) -> Result<(), RenderError> {
        let mut log = self.log.borrow_mut();
        log.presents += 1;
        match log.fail_next_present.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

pub fn assets_in(dir: &Path) -> AssetsConfig {
    AssetsConfig {
        dir: dir.to_path_buf(),
        menu_background: PathBuf::from("images/menu_background.png"),
        menu_music: PathBuf::from("music/menu_theme.ogg"),
        icon: PathBuf::from("icon.png"),
    }
}

/// Context over a fake surface and silent audio
pub fn test_context(
    transition_seconds: f32,
    assets: AssetsConfig,
) -> (AppContext, Rc<RefCell<SurfaceLog>>) {
    let log = Rc::new(RefCell::new(SurfaceLog::default()));
    let services = Services {
        renderer: Box::new(FakeSurface::new(log.clone())),
        audio: Box::new(SilentAudio::new()),
        input: Arc::new(InputQueue::new()),
        assets,
    };
    (AppContext::new(services, transition_seconds), log)
}

fn stamp(event: InputEvent) -> TimedInputEvent {
    TimedInputEvent {
        event,
        captured_at: Instant::now(),
        capture_seconds: 0.0,
    }
}

pub fn key_down(key: Key) -> TimedInputEvent {
    stamp(InputEvent::KeyDown(KeyInput {
        key,
        scan_code: None,
        modifiers: Modifiers::empty(),
    }))
}

pub fn pointer_move(x: f32, y: f32) -> TimedInputEvent {
    stamp(InputEvent::PointerMove(PointerMotion {
        position: Vec2::new(x, y),
    }))
}

pub fn left_click(x: f32, y: f32) -> TimedInputEvent {
    stamp(InputEvent::PointerButtonDown(PointerButtonInput {
        button: PointerButton::Left,
        position: Vec2::new(x, y),
        modifiers: Modifiers::empty(),
    }))
}

pub type Journal = Rc<RefCell<Vec<String>>>;

/// Screen that writes every lifecycle call into a shared journal
///
/// Pressing Enter asks for a transition to the other screen with payload 7.
pub struct RecordingScreen {
    id: ScreenId,
    journal: Journal,
}

impl RecordingScreen {
    fn label(&self) -> &'static str {
        match self.id {
            ScreenId::MainMenu => "MainMenu",
            ScreenId::Options => "Options",
        }
    }

    fn record(&self, entry: String) {
        self.journal.borrow_mut().push(entry);
    }
}

impl Screen for RecordingScreen {
    fn init(&mut self, _ctx: &mut ScreenContext<'_>, payload: Option<ScreenPayload>) {
        let payload = payload
            .and_then(|p| p.downcast::<u32>().ok())
            .map(|p| format!("({p})"))
            .unwrap_or_default();
        self.record(format!("init:{}{}", self.label(), payload));
    }

    fn handle_event(&mut self, ctx: &mut ScreenContext<'_>, event: &TimedInputEvent) {
        self.record(format!("event:{}:{:?}", self.label(), event.kind()));
        if event.is_key_down(Key::Enter) {
            let other = match self.id {
                ScreenId::MainMenu => ScreenId::Options,
                ScreenId::Options => ScreenId::MainMenu,
            };
            ctx.request_transition(other, Some(Box::new(7u32)));
        }
    }

    fn post_present(&mut self, _ctx: &mut ScreenContext<'_>) {
        self.record(format!("post_present:{}", self.label()));
    }

    fn destroy(&mut self, _ctx: &mut ScreenContext<'_>) {
        self.record(format!("destroy:{}", self.label()));
    }

    fn name(&self) -> &'static str {
        self.label()
    }
}

/// Factory of [`RecordingScreen`]s; ids in `missing` produce no screen
pub struct RecordingFactory {
    pub journal: Journal,
    pub missing: HashSet<ScreenId>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self {
            journal: Rc::new(RefCell::new(Vec::new())),
            missing: HashSet::new(),
        }
    }

    pub fn without(mut self, id: ScreenId) -> Self {
        self.missing.insert(id);
        self
    }

    /// Journal entries that are not per-frame noise
    pub fn lifecycle(&self) -> Vec<String> {
        self.journal
            .borrow()
            .iter()
            .filter(|e| e.starts_with("init:") || e.starts_with("destroy:"))
            .cloned()
            .collect()
    }

    pub fn entries(&self) -> Vec<String> {
        self.journal.borrow().clone()
    }

    pub fn clear(&self) {
        self.journal.borrow_mut().clear();
    }
}

impl ScreenFactory for RecordingFactory {
    fn create(&self, id: ScreenId) -> Option<Box<dyn Screen>> {
        if self.missing.contains(&id) {
            return None;
        }
        Some(Box::new(RecordingScreen {
            id,
            journal: self.journal.clone(),
        }))
    }
}
