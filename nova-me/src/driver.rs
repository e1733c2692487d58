//! Render driver seam and a headless implementation

use crate::error::AvatarError;
use async_trait::async_trait;
use nova_core::MotionPriority;
use std::collections::HashMap;
use tracing::{debug, info};

/// Capability surface of whatever draws the character.
///
/// Only `load` can fail. The other calls must absorb recoverable problems
/// themselves (an unknown motion or expression is simply ignored) so that the
/// controller's bookkeeping never depends on driver health. A driver that
/// cannot do something implements the call as a no-op.
#[async_trait]
pub trait RenderDriver: Send {
    async fn load(&mut self, model_url: &str) -> Result<(), AvatarError>;

    fn unload(&mut self);

    /// `None` clears the active expression
    fn set_expression(&mut self, expression: Option<&str>);

    fn trigger_motion(&mut self, motion: Option<&str>, priority: MotionPriority);

    fn set_parameter(&mut self, id: &str, value: f32);

    /// Release renderer resources; the driver is not used afterwards
    fn dispose(&mut self);

    fn name(&self) -> &str {
        "driver"
    }
}

/// One call received by a [`TracingDriver`]
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCommand {
    Load(String),
    Unload,
    SetExpression(Option<String>),
    TriggerMotion(Option<String>, MotionPriority),
    SetParameter(String, f32),
    Dispose,
}

/// Headless driver: logs every command and keeps the resulting model state
#[derive(Debug, Default)]
pub struct TracingDriver {
    commands: Vec<DriverCommand>,
    parameters: HashMap<String, f32>,
    model: Option<String>,
    expression: Option<String>,
    disposed: bool,
}

impl TracingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command in arrival order
    pub fn commands(&self) -> &[DriverCommand] {
        &self.commands
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Parameter writes only, in arrival order
    pub fn parameter_writes(&self) -> impl Iterator<Item = (&str, f32)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DriverCommand::SetParameter(id, value) => Some((id.as_str(), *value)),
            _ => None,
        })
    }

    pub fn parameter(&self, id: &str) -> Option<f32> {
        self.parameters.get(id).copied()
    }

    pub fn loaded_model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[async_trait]
impl RenderDriver for TracingDriver {
    async fn load(&mut self, model_url: &str) -> Result<(), AvatarError> {
        info!("Loading model {}", model_url);
        self.commands.push(DriverCommand::Load(model_url.to_string()));
        self.model = Some(model_url.to_string());
        self.parameters.clear();
        Ok(())
    }

    fn unload(&mut self) {
        info!("Unloading model");
        self.commands.push(DriverCommand::Unload);
        self.model = None;
        self.parameters.clear();
    }

    fn set_expression(&mut self, expression: Option<&str>) {
        debug!("expression -> {:?}", expression);
        self.commands
            .push(DriverCommand::SetExpression(expression.map(str::to_string)));
        self.expression = expression.map(str::to_string);
    }

    fn trigger_motion(&mut self, motion: Option<&str>, priority: MotionPriority) {
        debug!("motion -> {:?} ({})", motion, priority.as_str());
        self.commands
            .push(DriverCommand::TriggerMotion(motion.map(str::to_string), priority));
    }

    fn set_parameter(&mut self, id: &str, value: f32) {
        debug!("{} = {:.3}", id, value);
        self.commands
            .push(DriverCommand::SetParameter(id.to_string(), value));
        self.parameters.insert(id.to_string(), value);
    }

    fn dispose(&mut self) {
        info!("Disposing driver");
        self.commands.push(DriverCommand::Dispose);
        self.disposed = true;
        self.model = None;
    }

    fn name(&self) -> &str {
        "tracing"
    }
}
