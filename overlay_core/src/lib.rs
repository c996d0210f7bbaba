// presenter_overlay: spotlight / laser overlay engine for presenter remotes.
// The host owns the window, the event loop and the OS input hook; this crate owns
// the button decoding, the mode state and what gets drawn each tick.

mod compositor;
mod config;
mod error;
mod hook;
mod input;
mod mode;
mod raster;
mod spotlight;
mod trail;
mod types;

use wasm_bindgen::prelude::*;

pub use compositor::{OverlayCompositor, SurfaceSpec};
pub use config::{GeneralSettings, LaserSettings, OverlayConfig, SpotlightSettings};
pub use error::OverlayError;
pub use hook::{
    input_channel, HookReceiver, HookSender, InputHook, PointerCell, DEFAULT_QUEUE_CAPACITY,
};
pub use input::InputMapper;
pub use mode::{EngineState, ModeStateMachine, Transition};
pub use raster::Canvas;
pub use spotlight::SpotlightRenderer;
pub use trail::{LaserTrail, TrailDot, TrailSample};
pub use types::*;

/// Initialize panic hook and console logging when running in a JS host.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

/// The engine context: one per process, constructed at startup and driven by
/// the host's render tick. The matching [`InputHook`] goes to the input thread.
pub struct OverlayEngine {
    mapper: InputMapper,
    machine: ModeStateMachine,
    compositor: OverlayCompositor,
    inputs: HookReceiver,
    pointer: PointerCell,
    pending_mode_change: Option<PresenterMode>,
    quit_requested: bool,
}

impl OverlayEngine {
    /// Build the engine and the hook handle that feeds it.
    pub fn new(config: OverlayConfig) -> Result<(Self, InputHook), OverlayError> {
        config.validate()?;

        let (events, inputs) = input_channel(DEFAULT_QUEUE_CAPACITY);
        let pointer = PointerCell::default();
        let engine = OverlayEngine {
            mapper: InputMapper::new(config.general.double_click_ms),
            machine: ModeStateMachine::new(&config),
            compositor: OverlayCompositor::new(&config),
            inputs,
            pointer: pointer.clone(),
            pending_mode_change: None,
            quit_requested: false,
        };

        log::info!(
            "[OVERLAY] Engine ready in {} (modes: {:?})",
            engine.machine.active_mode(),
            engine.machine.modes()
        );
        Ok((engine, InputHook { events, pointer }))
    }

    /// Parse a JSON config and build the engine.
    pub fn from_json(config_json: &str) -> Result<(Self, InputHook), OverlayError> {
        OverlayEngine::new(OverlayConfig::from_json(config_json)?)
    }

    /// Apply one raw event right away, for hosts that deliver input on the render thread.
    pub fn handle_raw(&mut self, event: &RawInput) -> Option<SemanticEvent> {
        let semantic = self.mapper.map(event)?;
        self.handle_semantic(semantic);
        Some(semantic)
    }

    /// Apply one semantic event to the mode state.
    pub fn handle_semantic(&mut self, event: SemanticEvent) -> Transition {
        if event == SemanticEvent::Quit {
            if !self.quit_requested {
                log::info!("[OVERLAY] Quit requested");
            }
            self.quit_requested = true;
            return self.machine.deactivate();
        }

        let transition = self.machine.apply(event);
        if let Some(mode) = transition.mode_changed {
            self.pending_mode_change = Some(mode);
        }
        transition
    }

    /// One display tick: drain queued input, then compose the frame for the
    /// latest pointer position.
    pub fn tick(&mut self, now: Timestamp) -> Frame {
        for event in self.inputs.drain() {
            self.handle_raw(&event);
        }

        let pointer = self.pointer.load();
        let snapshot = self.machine.snapshot();
        let commands = self
            .compositor
            .compose(&snapshot, self.machine.trail_mut(), pointer, now);

        Frame {
            timestamp: now,
            snapshot,
            pointer,
            commands,
            mode_changed: self.pending_mode_change.take(),
        }
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        self.machine.snapshot()
    }

    pub fn trail(&self) -> &LaserTrail {
        self.machine.trail()
    }

    /// Latest pointer position as seen by the engine.
    pub fn pointer(&self) -> ScreenPoint {
        self.pointer.load()
    }

    /// True once Ctrl+Q was pressed; the host should unhook input and close the surface.
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Tear the engine down. Any hook still holding a sender sees a disconnect.
    pub fn shutdown(self) {
        log::info!("[OVERLAY] Engine shut down");
    }
}

/// WASM-exposed engine for JS hosts.
/// Input arrives through method calls on the render thread, so no queue is involved.
#[wasm_bindgen]
pub struct WasmOverlayEngine {
    engine: OverlayEngine,
    hook: InputHook,
    last_frame: Option<Frame>,
}

#[wasm_bindgen]
impl WasmOverlayEngine {
    /// Create the engine from a JSON config with `General`, `Spotlight`, `Laser` sections.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmOverlayEngine, JsValue> {
        let (engine, hook) = OverlayEngine::from_json(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid overlay config: {}", e)))?;

        Ok(WasmOverlayEngine {
            engine,
            hook,
            last_frame: None,
        })
    }

    /// Key pressed. `code` is the typed character (`"l"`) or a key name.
    pub fn key_down(&mut self, code: &str, ctrl: bool, timestamp_us: u64) {
        let timestamp = Timestamp::from_micros(timestamp_us);
        let event = RawInput::key_down(timestamp, Key::from_code(code), ctrl);
        self.engine.handle_raw(&event);
    }

    pub fn key_up(&mut self, code: &str, ctrl: bool, timestamp_us: u64) {
        let timestamp = Timestamp::from_micros(timestamp_us);
        let event = RawInput::key_up(timestamp, Key::from_code(code), ctrl);
        self.engine.handle_raw(&event);
    }

    pub fn mouse_click(&mut self, button: u8, timestamp_us: u64) {
        let event = RawInput {
            timestamp: Timestamp::from_micros(timestamp_us),
            kind: RawInputKind::MouseClick { button },
        };
        self.engine.handle_raw(&event);
    }

    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.hook.pointer_moved(ScreenPoint::new(x, y));
    }

    /// Compose a frame and return it as JSON.
    pub fn tick(&mut self, timestamp_us: u64) -> Result<String, JsValue> {
        let frame = self.engine.tick(Timestamp::from_micros(timestamp_us));
        let json = serde_json::to_string(&frame)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))?;
        self.last_frame = Some(frame);
        Ok(json)
    }

    /// Rasterise the last ticked frame into RGBA8 pixels.
    pub fn render_rgba(&self, width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
        let mut canvas =
            Canvas::new(width, height).map_err(|e| JsValue::from_str(&e.to_string()))?;
        if let Some(frame) = &self.last_frame {
            canvas.render(frame);
        }
        Ok(canvas.into_pixels())
    }

    /// Surface properties the host window must use, as JSON.
    pub fn surface_spec(&self, width: u32, height: u32) -> Result<String, JsValue> {
        let spec = SurfaceSpec::fullscreen(width, height)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        serde_json::to_string(&spec)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    pub fn active_mode(&self) -> String {
        self.engine.snapshot().active_mode.to_string()
    }

    pub fn indicator_on(&self) -> bool {
        self.engine.snapshot().indicator_on
    }

    pub fn quit_requested(&self) -> bool {
        self.engine.quit_requested()
    }
}
