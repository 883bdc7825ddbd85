use anyhow::Context;
use bridge::http::GuiBridge;
use clap::Parser;
use generator::patterns::FrameGenerator;
use generator::scenario::ScenarioConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use wisenscore::config::{SensorId, WiSensConfig};
use wisenscore::stream::{DashboardContext, StreamClient};
use wisenscore::wire::{ChannelEvent, FramePayload};

mod bridge;
mod generator;

#[derive(Parser)]
#[command(author, version, about = "Synthetic telemetry driver for the WiSens dashboard")]
struct Args {
    /// Sensor/viz configuration (JSON)
    #[arg(long, default_value = "config/wisens.json")]
    config: PathBuf,
    /// Load a capture scenario from YAML
    #[arg(long)]
    scenario: Option<PathBuf>,
    #[arg(long, default_value_t = 200)]
    frames: usize,
    #[arg(long, default_value_t = 20.0)]
    rate_hz: f32,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Keep the bridge alive for externally pushed payloads
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = WiSensConfig::load(&args.config)
        .with_context(|| format!("loading sensor config {}", args.config.display()))?;
    let scenario = if let Some(path) = args.scenario {
        ScenarioConfig::load(path)?
    } else {
        ScenarioConfig {
            frames: args.frames,
            rate_hz: args.rate_hz,
            seed: args.seed,
            ..Default::default()
        }
    };

    let mut rng = StdRng::seed_from_u64(scenario.seed);
    let context = DashboardContext::new(config, &mut rng);
    let bridge = GuiBridge::new(&context);
    let client = StreamClient::attach(&context);

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating simulator runtime")?;
    runtime.spawn(client.run());

    // One generator per tile, seeds offset so the tiles differ.
    let mut generators: Vec<(SensorId, FrameGenerator)> = context
        .config()
        .sensors
        .iter()
        .enumerate()
        .map(|(index, sensor)| {
            (
                sensor.id.clone(),
                FrameGenerator::new(
                    sensor.grid_dims(),
                    scenario.pattern,
                    scenario.noise,
                    scenario.seed.wrapping_add(index as u64),
                ),
            )
        })
        .collect();

    context.channel().publish(ChannelEvent::Connect);
    if let Some(description) = scenario.description.as_deref() {
        bridge.publish_status(description);
    }
    bridge.publish_status(&format!(
        "streaming {} frames at {:.0} Hz",
        scenario.frames, scenario.rate_hz
    ));

    runtime.block_on(async {
        let period = Duration::from_secs_f32(1.0 / scenario.rate_hz.max(0.1));
        let mut ticker = tokio::time::interval(period);
        for frame_index in 0..scenario.frames {
            ticker.tick().await;
            let mut payload = FramePayload::new();
            for (id, frame_generator) in generators.iter_mut() {
                payload.insert(id.clone(), frame_generator.next_frame());
            }
            let encoded =
                serde_json::to_string(&payload).context("encoding sensor_data payload")?;
            context.channel().publish(ChannelEvent::SensorData(encoded));
            if scenario.steps_every > 0 && frame_index % scenario.steps_every == 0 {
                context
                    .channel()
                    .publish(ChannelEvent::Step((frame_index / scenario.steps_every) as i64));
            }
        }
        Ok::<(), anyhow::Error>(())
    })?;

    let payload = bridge.payload();
    bridge.publish_status(&format!(
        "scenario complete: {} frames applied, {} dropped, step {}",
        payload.frames_applied, payload.frames_dropped, payload.snapshot.step
    ));

    if args.serve {
        bridge.publish_status("bridge serving (Ctrl+C to stop)...");
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }
    context.channel().publish(ChannelEvent::Disconnect);

    Ok(())
}
