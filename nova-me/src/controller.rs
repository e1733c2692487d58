//! Avatar animation controller
//!
//! Turns directives into render-driver calls over time. All timing is owned
//! here: parameter interpolations advance once per [`AvatarController::tick`],
//! micro-timeline frames fire once when their offset is reached, and applying
//! a directive starts a new scheduling epoch so nothing from the previous one
//! can reach the driver afterwards.

use crate::clock::{Clock, SystemClock};
use crate::config::ControllerConfig;
use crate::driver::RenderDriver;
use crate::error::AvatarError;
use crate::gaze::{GazeConfig, GazeConfigUpdate};
use crate::scheduler::{Scheduler, TaskHandle};
use nova_core::{Directive, Emotion, ParamFrame};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
struct Interpolation {
    id: String,
    from: f32,
    to: f32,
    start: Duration,
    duration: Duration,
}

impl Interpolation {
    /// Value at `now` and whether the target has been reached
    fn sample(&self, now: Duration) -> (f32, bool) {
        let elapsed = now.saturating_sub(self.start).as_secs_f64();
        let progress = (elapsed / self.duration.as_secs_f64()).clamp(0.0, 1.0);
        if progress >= 1.0 {
            (self.to, true)
        } else {
            (self.from + (self.to - self.from) * progress as f32, false)
        }
    }
}

/// Non-negative finite seconds as a `Duration`
fn seconds(value: f64) -> Option<Duration> {
    if value.is_finite() && value >= 0.0 {
        Duration::try_from_secs_f64(value).ok()
    } else {
        None
    }
}

/// Fade length; finite values too large for a `Duration` saturate
fn fade_duration(value: f64) -> Duration {
    match seconds(value) {
        Some(fade) => fade,
        None if value.is_finite() && value > 0.0 => Duration::MAX,
        None => Duration::ZERO,
    }
}

enum Job {
    Frame(Vec<ParamFrame>),
    Interpolate(Interpolation),
}

pub struct AvatarController<D: RenderDriver> {
    driver: D,
    config: ControllerConfig,
    clock: Arc<dyn Clock>,
    scheduler: Scheduler<Job>,
    /// Last value written per parameter
    params: HashMap<String, f32>,
    /// In-flight interpolation per parameter
    animations: HashMap<String, TaskHandle>,
    model: Option<String>,
    disposed: bool,
}

impl<D: RenderDriver> AvatarController<D> {
    pub fn new(driver: D, config: ControllerConfig) -> Result<Self, AvatarError> {
        Self::with_clock(driver, config, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(
        driver: D,
        config: ControllerConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AvatarError> {
        config.validate().map_err(AvatarError::Config)?;
        Ok(Self {
            driver,
            config,
            clock,
            scheduler: Scheduler::new(),
            params: HashMap::new(),
            animations: HashMap::new(),
            model: None,
            disposed: false,
        })
    }

    /// Load a character model. Pending work and the parameter cache belong to
    /// the previous model and are dropped first. Gaze is applied once loaded.
    pub async fn load_model(&mut self, model_url: &str) -> Result<(), AvatarError> {
        if self.disposed {
            warn!("load_model ignored: controller disposed");
            return Ok(());
        }
        if model_url.trim().is_empty() {
            return Err(AvatarError::InvalidInput("model url is required".to_string()));
        }

        self.clear_pending();
        self.params.clear();
        self.model = None;

        self.driver.load(model_url).await?;
        info!("Model loaded via '{}' driver: {}", self.driver.name(), model_url);
        self.model = Some(model_url.to_string());

        self.apply_gaze();
        Ok(())
    }

    pub fn unload_model(&mut self) {
        if self.disposed {
            warn!("unload_model ignored: controller disposed");
            return;
        }
        self.clear_pending();
        self.params.clear();
        self.model = None;
        self.driver.unload();
    }

    pub fn apply_directive(&mut self, directive: &Directive) {
        if self.disposed {
            warn!("apply_directive ignored: controller disposed");
            return;
        }

        self.clear_pending();

        let expression = match directive.expression.as_deref() {
            Some(name) => Some(name.to_string()),
            None if self.config.auto_expression => {
                self.config.expression_for(directive.emotion).map(str::to_string)
            }
            None => None,
        };
        if let Some(ref name) = expression {
            self.driver.set_expression(Some(name));
        }

        if let Some(ref motion) = directive.gesture.motion {
            self.driver.trigger_motion(Some(motion), directive.gesture.priority);
        }

        self.apply_emotion(directive.emotion, directive.intensity as f32);
        self.apply_gaze();

        let now = self.clock.now();
        for frame in &directive.micro_timeline {
            match seconds(frame.t) {
                Some(offset) if offset.is_zero() => self.dispatch_frame(&frame.params),
                Some(offset) => match now.checked_add(offset) {
                    Some(at) => {
                        self.scheduler.schedule_once(at, Job::Frame(frame.params.clone()));
                    }
                    None => warn!("Skipping timeline frame at {}s: beyond the clock range", frame.t),
                },
                None => warn!("Skipping timeline frame with unusable offset {}", frame.t),
            }
        }

        debug!(
            "Applied {} directive ({} timeline frames pending, epoch {})",
            directive.emotion,
            self.scheduler.pending_once(),
            self.scheduler.epoch()
        );
    }

    /// Mouth openness from the lip-sync analyzer, clamped to [0, 1] and written directly
    pub fn set_lip_sync(&mut self, value: f32) {
        if self.disposed {
            return;
        }
        let value = if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 };
        let id = self.config.lip_sync_param.clone();
        self.animate_parameter(&id, value, Duration::ZERO);
    }

    /// Merge `update` into the gaze configuration and re-apply gaze
    pub fn set_gaze_config(&mut self, update: GazeConfigUpdate) {
        if self.disposed {
            warn!("set_gaze_config ignored: controller disposed");
            return;
        }
        self.config.gaze.merge(update);
        self.apply_gaze();
    }

    /// Cancel everything and release the driver. Later calls are no-ops.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.clear_pending();
        self.model = None;
        self.driver.dispose();
        self.disposed = true;
        info!("Avatar controller disposed");
    }

    /// Per-render-frame step: advance interpolations, then fire due timeline frames
    pub fn tick(&mut self) {
        if self.disposed {
            return;
        }
        let now = self.clock.now();

        let running: Vec<(TaskHandle, Interpolation)> = self
            .scheduler
            .recurring()
            .filter_map(|(handle, job)| match job {
                Job::Interpolate(interpolation) => Some((handle, interpolation.clone())),
                Job::Frame(_) => None,
            })
            .collect();

        for (handle, interpolation) in running {
            let (value, done) = interpolation.sample(now);
            self.write(&interpolation.id, value);
            if done {
                self.scheduler.cancel(handle);
                if self.animations.get(&interpolation.id) == Some(&handle) {
                    self.animations.remove(&interpolation.id);
                }
            }
        }

        for (_, job) in self.scheduler.take_due(now) {
            if let Job::Frame(params) = job {
                self.dispatch_frame(&params);
            }
        }
    }

    pub fn parameter(&self, id: &str) -> Option<f32> {
        self.params.get(id).copied()
    }

    /// Parameter cache: last value written per parameter id
    pub fn parameters(&self) -> &HashMap<String, f32> {
        &self.params
    }

    pub fn is_animating(&self, id: &str) -> bool {
        self.animations.contains_key(id)
    }

    pub fn pending_frames(&self) -> usize {
        self.scheduler.pending_once()
    }

    /// True when no timeline frame or interpolation is outstanding
    pub fn is_idle(&self) -> bool {
        self.scheduler.is_idle()
    }

    pub fn gaze_config(&self) -> &GazeConfig {
        &self.config.gaze
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn loaded_model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    fn clear_pending(&mut self) {
        self.scheduler.cancel_all();
        self.animations.clear();
    }

    fn apply_emotion(&mut self, emotion: Emotion, intensity: f32) {
        let fade = seconds(self.config.emotion_fade_secs).unwrap_or_default();
        let targets: Vec<(String, f32)> = match self.config.presets.get(&emotion) {
            Some(preset) => preset
                .targets(intensity, &self.config.rest_pose)
                .map(|(id, value)| (id.to_string(), value))
                .collect(),
            None => return,
        };

        for (id, value) in targets {
            self.animate_parameter(&id, value, fade);
        }
    }

    fn apply_gaze(&mut self) {
        let position = match self.config.gaze.resolve() {
            Some(position) => position,
            None => return,
        };
        let fade = seconds(self.config.gaze_fade_secs).unwrap_or_default();
        let x_param = self.config.gaze.x_param.clone();
        let y_param = self.config.gaze.y_param.clone();

        self.animate_parameter(&x_param, position.x, fade);
        self.animate_parameter(&y_param, position.y, fade);
    }

    fn dispatch_frame(&mut self, params: &[ParamFrame]) {
        for param in params {
            let fade = fade_duration(param.fade);
            self.animate_parameter(&param.id, param.value as f32, fade);
        }
    }

    /// Move `id` toward `to`, starting from its cached value. An in-flight
    /// interpolation on the same parameter is cancelled first.
    fn animate_parameter(&mut self, id: &str, to: f32, fade: Duration) {
        if let Some(previous) = self.animations.remove(id) {
            self.scheduler.cancel(previous);
        }

        if fade.is_zero() {
            self.write(id, to);
            return;
        }

        let interpolation = Interpolation {
            id: id.to_string(),
            from: self.params.get(id).copied().unwrap_or(0.0),
            to,
            start: self.clock.now(),
            duration: fade,
        };
        let handle = self.scheduler.schedule_recurring(Job::Interpolate(interpolation));
        self.animations.insert(id.to_string(), handle);
    }

    fn write(&mut self, id: &str, value: f32) {
        self.driver.set_parameter(id, value);
        self.params.insert(id.to_string(), value);
    }
}
