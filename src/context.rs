//! Shared application context
//!
//! The single mutable root of application state. It lives on the frame-loop
//! thread and is never shared; only the input queue inside [`Services`]
//! crosses threads.

use std::sync::Arc;

use glam::Vec2;
use tracing::{debug, info, warn};

use crate::audio::AudioService;
use crate::config::AssetsConfig;
use crate::input::{InputQueue, TimedInputEvent};
use crate::render::{Canvas, RenderSurface};
use crate::screen::{Screen, ScreenFactory, ScreenId, ScreenPayload};
use crate::transition::{Transition, TransitionStep};

/// External collaborators reachable from screens
pub struct Services {
    pub renderer: Box<dyn RenderSurface>,
    pub audio: Box<dyn AudioService>,
    pub input: Arc<InputQueue>,
    pub assets: AssetsConfig,
}

struct ActiveScreen {
    id: ScreenId,
    screen: Box<dyn Screen>,
}

/// What a screen can see and request while one of its hooks runs
pub struct ScreenContext<'a> {
    services: &'a mut Services,
    transition: &'a mut Transition,
    request_quit: &'a mut bool,
    current: Option<ScreenId>,
}

impl<'a> ScreenContext<'a> {
    fn new(
        services: &'a mut Services,
        transition: &'a mut Transition,
        request_quit: &'a mut bool,
        current: Option<ScreenId>,
    ) -> Self {
        Self {
            services,
            transition,
            request_quit,
            current,
        }
    }

    /// Asks for a faded switch to `id`
    ///
    /// Dropped when `id` is already the current screen or a transition is
    /// already running. Returns whether the request was accepted.
    pub fn request_transition(&mut self, id: ScreenId, payload: Option<ScreenPayload>) -> bool {
        if self.current == Some(id) {
            debug!(screen = ?id, "Transition to the current screen ignored");
            return false;
        }
        self.transition.request(id, payload)
    }

    /// Asks the frame loop to exit after this frame
    pub fn request_quit(&mut self) {
        *self.request_quit = true;
    }

    pub fn canvas(&mut self) -> &mut dyn Canvas {
        self.services.renderer.as_mut()
    }

    pub fn audio(&mut self) -> &mut dyn AudioService {
        self.services.audio.as_mut()
    }

    pub fn assets(&self) -> &AssetsConfig {
        &self.services.assets
    }

    /// Logical render-space size
    pub fn render_size(&self) -> Vec2 {
        self.services.renderer.size()
    }
}

/// Owner of the active screen, the transition state and the services
pub struct AppContext {
    services: Services,
    transition: Transition,
    active: Option<ActiveScreen>,
    /// Screen most recently constructed, whether or not the factory produced one
    shown: Option<ScreenId>,
    /// Screen that should be active once no transition is running
    desired: Option<ScreenId>,
    initial_payload: Option<ScreenPayload>,
    request_quit: bool,
}

impl AppContext {
    /// Creates a context with no screen; `transition_seconds` is per fade phase
    pub fn new(services: Services, transition_seconds: f32) -> Self {
        Self {
            services,
            transition: Transition::new(transition_seconds),
            active: None,
            shown: None,
            desired: None,
            initial_payload: None,
            request_quit: false,
        }
    }

    /// Selects the screen built, without a fade, on the next frame
    pub fn set_initial_screen(&mut self, id: ScreenId, payload: Option<ScreenPayload>) {
        self.desired = Some(id);
        self.initial_payload = payload;
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn services_mut(&mut self) -> &mut Services {
        &mut self.services
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    /// Same rules as [`ScreenContext::request_transition`]
    pub fn request_transition(&mut self, id: ScreenId, payload: Option<ScreenPayload>) -> bool {
        self.split().1.request_transition(id, payload)
    }

    pub fn request_quit(&mut self) {
        self.request_quit = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.request_quit
    }

    pub fn has_active_screen(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_screen_id(&self) -> Option<ScreenId> {
        self.active.as_ref().map(|a| a.id)
    }

    pub fn active_screen_name(&self) -> Option<&'static str> {
        self.active.as_ref().map(|a| a.screen.name())
    }

    fn split(&mut self) -> (Option<&mut ActiveScreen>, ScreenContext<'_>) {
        let ctx = ScreenContext::new(
            &mut self.services,
            &mut self.transition,
            &mut self.request_quit,
            self.shown,
        );
        (self.active.as_mut(), ctx)
    }

    /// Runs `f` against the active screen; returns false when there is none
    pub fn with_screen(&mut self, f: impl FnOnce(&mut dyn Screen, &mut ScreenContext<'_>)) -> bool {
        match self.split() {
            (Some(active), mut ctx) => {
                f(active.screen.as_mut(), &mut ctx);
                true
            }
            (None, _) => false,
        }
    }

    /// Forwards one event to the active screen
    pub fn dispatch_event(&mut self, event: &TimedInputEvent) -> bool {
        self.with_screen(|screen, ctx| screen.handle_event(ctx, event))
    }

    /// Advances the fade by `dt`, swapping screens when the outgoing fade
    /// completes. Returns true if a swap happened.
    pub fn advance_transition(&mut self, dt: f32, factory: &dyn ScreenFactory) -> bool {
        match self.transition.advance(dt) {
            TransitionStep::Holding => false,
            TransitionStep::Finished => {
                debug!(screen = ?self.active_screen_name(), "Transition finished");
                false
            }
            TransitionStep::Switch(pending) => {
                self.desired = Some(pending.id);
                self.swap_screen(pending.id, pending.payload, factory);
                true
            }
        }
    }

    /// Builds the desired screen without a fade when it differs from the one
    /// last built and no transition is running (the first frame, typically).
    /// Returns true if a swap happened.
    pub fn ensure_desired_screen(&mut self, factory: &dyn ScreenFactory) -> bool {
        if self.transition.is_transitioning() {
            return false;
        }
        match self.desired {
            Some(id) if self.shown != Some(id) => {
                let payload = self.initial_payload.take();
                self.swap_screen(id, payload, factory);
                true
            }
            _ => false,
        }
    }

    /// Destroys the active screen, then constructs and initializes `id`
    fn swap_screen(
        &mut self,
        id: ScreenId,
        payload: Option<ScreenPayload>,
        factory: &dyn ScreenFactory,
    ) {
        self.destroy_active();

        self.shown = Some(id);
        let Some(mut screen) = factory.create(id) else {
            warn!(screen = ?id, "No screen available for id, continuing without one");
            return;
        };

        let mut ctx = ScreenContext::new(
            &mut self.services,
            &mut self.transition,
            &mut self.request_quit,
            self.shown,
        );
        screen.init(&mut ctx, payload);
        info!(screen = screen.name(), "Screen initialized");
        self.active = Some(ActiveScreen { id, screen });
    }

    fn destroy_active(&mut self) {
        if let Some(mut old) = self.active.take() {
            let mut ctx = ScreenContext::new(
                &mut self.services,
                &mut self.transition,
                &mut self.request_quit,
                self.shown,
            );
            old.screen.destroy(&mut ctx);
            info!(screen = old.screen.name(), "Screen destroyed");
        }
    }

    /// Ordered teardown: drop pending input, destroy the active screen, stop audio
    pub fn shutdown(&mut self) {
        let dropped = self.services.input.clear();
        if dropped > 0 {
            debug!(dropped, "Discarded pending input on shutdown");
        }
        self.destroy_active();
        self.services.audio.stop_music();
        info!("Application context shut down");
    }
}
