//! Top-level application state machine.
//!
//! `AppState` owns the [`SnapPipeline`] and the status line.  It processes
//! [`InputEvent`]s from the hand source and the window, ticks the dust
//! effect, and hands draw commands to the visualizer each frame.

use std::sync::mpsc::{self, TryRecvError};
use std::time::{Duration, Instant};

use snap_core::{EffectMode, PipelineConfig, SnapPipeline, Status, StatusSink};

use crate::error::AppError;
use crate::source::{spawn_hand_source, InputEvent};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        let p = &self.pipeline;
        if p.canvas.width == 0 || p.canvas.height == 0 {
            return Err(AppError::InvalidConfig(format!(
                "canvas must be non-empty, got {}x{}", p.canvas.width, p.canvas.height
            )));
        }
        if !(p.thresholds.low < p.thresholds.high) {
            return Err(AppError::InvalidConfig(format!(
                "closed threshold ({}) must be below open threshold ({})",
                p.thresholds.low, p.thresholds.high
            )));
        }
        if p.dust.density == 0 {
            return Err(AppError::InvalidConfig("particle density must be at least 1".into()));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// StatusLine
// ════════════════════════════════════════════════════════════════════════════

/// The status bar: the latest notable event plus the live distance readout.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusLine {
    pub headline: String,
    pub detail:   String,
}

impl Default for StatusLine {
    fn default() -> Self {
        StatusLine {
            headline: "Ready: show a hand".to_string(),
            detail:   String::new(),
        }
    }
}

impl StatusSink for StatusLine {
    fn report(&mut self, status: Status) {
        match status {
            Status::Distance(_) => self.detail = status.to_string(),
            Status::HandLost => {
                self.detail.clear();
                self.headline = status.to_string();
            }
            _ => {
                tracing::debug!("{}", status);
                self.headline = status.to_string();
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    pipeline:   SnapPipeline,
    pub status: StatusLine,
    /// Session clock for cooldowns.
    started:    Instant,
}

impl AppState {
    pub fn new(cfg: AppConfig) -> Self {
        AppState {
            pipeline: SnapPipeline::new(cfg.pipeline),
            status:   StatusLine::default(),
            started:  Instant::now(),
        }
    }

    /// Deterministic particle seeding, for tests.
    pub fn with_seed(cfg: AppConfig, seed: u64) -> Self {
        AppState {
            pipeline: SnapPipeline::with_seed(cfg.pipeline, seed),
            status:   StatusLine::default(),
            started:  Instant::now(),
        }
    }

    // ── process one InputEvent ───────────────────────────────────────────

    /// Returns false when the app should quit.
    pub fn handle_event(&mut self, event: InputEvent, now: Duration) -> bool {
        match event {
            InputEvent::Frame(frame) => {
                self.pipeline.on_frame(&frame, now, &mut self.status);
            }
            InputEvent::ForceDust => {
                // Refusal lands on the status line
                let _ = self.pipeline.force_dust(&mut self.status);
            }
            InputEvent::ForceReset => self.pipeline.force_reset(&mut self.status),
            InputEvent::SourceError(msg) => {
                tracing::error!("hand source failed: {}", msg);
                self.status.headline = format!("Hand source error: {}", msg);
            }
            InputEvent::Quit => return false,
        }
        true
    }

    // ── Per-frame tick ────────────────────────────────────────────────────

    pub fn tick(&mut self, dt: f32) {
        self.pipeline.tick(dt, &mut self.status);
    }

    /// The hand source hung up.
    pub fn source_stopped(&mut self) {
        self.pipeline.stop(&mut self.status);
        self.status.headline = "Hand source stopped".to_string();
    }

    /// Time since the app started; frames are stamped with it.
    pub fn session_time(&self) -> Duration { self.started.elapsed() }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn pipeline(&self) -> &SnapPipeline { &self.pipeline }
    pub fn mode(&self)     -> EffectMode    { self.pipeline.mode() }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// This is the entry point called from `main.rs`.  It creates the visualizer,
/// the hand source (simulation by default, hardware with `--features leap`),
/// and drives the event/render loop at ~60 fps.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    cfg.validate()?;
    let canvas = cfg.pipeline.canvas;

    // ── Event channel: hand frames and window controls share one consumer ─
    let (tx, rx) = mpsc::channel::<InputEvent>();

    #[cfg(not(feature = "leap"))]
    let sim_tx = {
        let (sim_tx, sim_rx) = mpsc::channel();
        spawn_hand_source(crate::source::SimHandSource { rx: sim_rx, canvas }, tx.clone());
        Some(sim_tx)
    };
    #[cfg(feature = "leap")]
    let sim_tx = {
        spawn_hand_source(crate::source::LeapHandSource { canvas }, tx.clone());
        None
    };

    // ── Visualizer (owns the window, the controls sender and sim input) ──
    let mut vis = Visualizer::new(canvas, tx, sim_tx)?;

    // ── App state ─────────────────────────────────────────────────────────
    let mut app = AppState::new(cfg);
    tracing::info!(width = canvas.width, height = canvas.height, "snap dust running");

    let mut last_tick = Instant::now();

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        // 1. Poll window input → controls and sim pointer
        if !vis.poll_input() { break; }

        // 2. Drain input events
        loop {
            match rx.try_recv() {
                Ok(evt) => {
                    let now = app.session_time();
                    if !app.handle_event(evt, now) { return Ok(()); }
                }
                Err(TryRecvError::Empty)        => break,
                Err(TryRecvError::Disconnected) => {
                    app.source_stopped();
                    break;
                }
            }
        }

        // 3. Per-frame logic
        let dt = last_tick.elapsed().as_secs_f32();
        last_tick = Instant::now();
        app.tick(dt);

        // 4. Render
        let mode = match app.mode() {
            EffectMode::Tracking => "tracking",
            EffectMode::Dusting  => "dusting",
        };
        let detail = if app.status.detail.is_empty() {
            mode.to_string()
        } else {
            format!("{}  {}", app.status.detail, mode)
        };
        vis.render(&app.pipeline().draw_commands(), &app.status.headline, &detail)?;
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::synthetic_hand;
    use snap_core::{EffectError, HandFrame};

    fn make_app() -> AppState {
        AppState::with_seed(AppConfig::default(), 11)
    }

    fn frame(pinched: bool) -> InputEvent {
        let hand = synthetic_hand(0.5, 0.5, 1.0, pinched).unwrap();
        InputEvent::Frame(HandFrame::new(960, 720, vec![hand]))
    }

    fn ms(n: u64) -> Duration { Duration::from_millis(n) }

    #[test]
    fn default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let mut cfg = AppConfig::default();
        cfg.pipeline.thresholds.low = 80.0;
        assert!(matches!(cfg.validate(), Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn empty_canvas_is_rejected() {
        let cfg = AppConfig { pipeline: PipelineConfig::with_canvas(0, 720) };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn snap_starts_dusting() {
        let mut app = make_app();
        app.handle_event(frame(false), ms(0));
        assert_eq!(app.mode(), EffectMode::Tracking);
        app.handle_event(frame(true), ms(33));
        assert_eq!(app.mode(), EffectMode::Dusting);
        assert!(app.status.headline.starts_with("Dust effect triggered by snap"));
    }

    #[test]
    fn force_dust_without_hand_reports_refusal() {
        let mut app = make_app();
        app.handle_event(InputEvent::ForceDust, ms(0));
        assert_eq!(app.mode(), EffectMode::Tracking);
        assert_eq!(
            app.status.headline,
            Status::EffectRefused(EffectError::NoSilhouette).to_string()
        );
    }

    #[test]
    fn force_reset_returns_to_tracking() {
        let mut app = make_app();
        app.handle_event(frame(false), ms(0));
        app.handle_event(InputEvent::ForceDust, ms(10));
        assert_eq!(app.mode(), EffectMode::Dusting);
        app.handle_event(InputEvent::ForceReset, ms(20));
        assert_eq!(app.mode(), EffectMode::Tracking);
        assert!(app.pipeline().particles().is_empty());
    }

    #[test]
    fn dust_settles_after_ticks() {
        let mut app = make_app();
        app.handle_event(frame(false), ms(0));
        app.handle_event(InputEvent::ForceDust, ms(10));
        for _ in 0..600 {
            app.tick(1.0 / 60.0);
            if app.mode() == EffectMode::Tracking { break; }
        }
        assert_eq!(app.mode(), EffectMode::Tracking);
        assert_eq!(app.status.headline, "Back to tracking (dust settled)");
    }

    #[test]
    fn distance_goes_to_detail_line() {
        let mut app = make_app();
        app.handle_event(frame(false), ms(0));
        assert!(app.status.detail.starts_with("Thumb-index distance"));
        assert_eq!(app.status.headline, "Hand detected");
    }

    #[test]
    fn source_error_is_shown() {
        let mut app = make_app();
        assert!(app.handle_event(InputEvent::SourceError("no device".into()), ms(0)));
        assert!(app.status.headline.contains("no device"));
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut app = make_app();
        assert!(!app.handle_event(InputEvent::Quit, ms(0)));
    }

    #[test]
    fn source_stop_leaves_idle_tracking() {
        let mut app = make_app();
        app.handle_event(frame(false), ms(0));
        app.handle_event(InputEvent::ForceDust, ms(10));
        app.source_stopped();
        assert_eq!(app.mode(), EffectMode::Tracking);
        assert!(app.pipeline().hands().is_empty());
    }
}
