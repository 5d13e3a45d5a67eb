//! Runs a robot lesson and a turtle drawing against engines on their own
//! threads, then logs what the engines ended up with.

use anyhow::{Result, anyhow};
use live_playground::logging::{LoggingConfig, init_logging};
use live_playground::{
    ChannelConfig, Color, EngineHost, HostConfig, RobotClient, RobotConfig, RobotEngine,
    RobotResponse, TurtleClient, TurtleConfig, TurtleEngine, levels,
};
use log::info;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let scale = std::env::var("PLAYGROUND_ANIMATION_SCALE")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.1);
    let host_config = HostConfig {
        animation_scale: scale,
    };

    run_robot(host_config)?;
    run_turtle(host_config)?;
    Ok(())
}

fn run_robot(host_config: HostConfig) -> Result<()> {
    let (host, channel) = EngineHost::connect(
        RobotEngine::new(RobotConfig::default()),
        host_config,
        ChannelConfig::default(),
    );
    let engine_thread = host.spawn();

    {
        let client = RobotClient::new(channel);
        let robot = client.load_level(&levels::level1())?;
        robot.forward()?;
        robot.forward()?;
        robot.turn_right()?;
        robot.forward()?;
        let last = robot.forward()?;
        info!("level 1 finished with {last:?}");
        if last != RobotResponse::Won {
            return Err(anyhow!("expected to win level 1, got {last:?}"));
        }
    }

    let engine = engine_thread
        .join()
        .map_err(|_| anyhow!("robot engine thread panicked"))?;
    info!(
        "robot ended at {:?} in state {:?}",
        engine.robot(),
        engine.game_state()
    );
    Ok(())
}

fn run_turtle(host_config: HostConfig) -> Result<()> {
    let (host, channel) = EngineHost::connect(
        TurtleEngine::new(TurtleConfig::default()),
        host_config,
        ChannelConfig::default(),
    );
    let engine_thread = host.spawn();

    {
        let client = TurtleClient::new(channel);
        let turtle = client.add_turtle()?;
        turtle.line_color(Color::RED)?;
        turtle.line_width(5.0)?;
        turtle.pen_down()?;
        for _ in 0..4 {
            turtle.forward(100.0)?;
            turtle.rotate(90.0)?;
        }
        turtle.pen_down_with_fill(Color::YELLOW)?;
        turtle.arc(40.0, 360.0)?;
        turtle.pen_up()?;
    }

    let engine = engine_thread
        .join()
        .map_err(|_| anyhow!("turtle engine thread panicked"))?;
    for (id, turtle) in engine.turtles() {
        let points: usize = turtle.drawn().map(|s| s.points.len()).sum();
        info!(
            "{id} drew {} strokes ({points} points), now at {:?}",
            turtle.drawn().count(),
            turtle.position()
        );
    }
    Ok(())
}
