//! Drive the controller without a renderer and watch the commands in the log.
//!
//! Run with `RUST_LOG=debug cargo run -p nova-me --example headless_avatar`.

use nova_core::Directive;
use nova_me::{AvatarController, ControllerConfig, GazeConfigUpdate, GazeOffset, TracingDriver};
use std::time::Duration;

const DIRECTIVE: &str = r#"{
  "spokenText": "Oh! Hello there!",
  "emotion": "surprised",
  "intensity": 0.8,
  "gesture": { "motion": "Greeting", "priority": "normal" },
  "expression": null,
  "microTimeline": [
    { "t": 0.0, "params": [ { "id": "ParamAngleX", "value": 15, "fade": 0.25 } ] },
    { "t": 0.6, "params": [ { "id": "ParamAngleX", "value": 0, "fade": 0.4 } ] }
  ],
  "tts": { "voice": null, "speed": null, "pitch": null }
}"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut controller = AvatarController::new(TracingDriver::new(), ControllerConfig::default())?;
    controller.load_model("/models/nova/nova.model3.json").await?;

    let directive = Directive::from_json_str(DIRECTIVE)?;
    controller.apply_directive(&directive);
    controller.set_gaze_config(GazeConfigUpdate {
        target: Some(GazeOffset::new(0.3, 0.1)),
        ..GazeConfigUpdate::default()
    });

    let mut interval = tokio::time::interval(Duration::from_millis(16));
    for frame in 0..90u32 {
        interval.tick().await;
        // fake a mouth signal in place of the lip-sync analyzer
        controller.set_lip_sync(((frame as f32) * 0.3).sin().abs());
        controller.tick();
    }

    println!("{} driver commands issued", controller.driver().commands().len());
    for (id, value) in controller.parameters() {
        println!("{:>16} = {:+.3}", id, value);
    }

    controller.dispose();
    Ok(())
}
