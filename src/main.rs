//! ndcube - N-dimensional hypercube viewer
//!
//! Rotates an n-cube through every rotation plane at once and prints each
//! projected frame as text.

use std::io::Write;
use std::process::ExitCode;

use crossterm::cursor::MoveTo;
use crossterm::terminal::{Clear, ClearType};
use ndcube_core::{Engine, UpdateFlags};

use ndcube::config::AppConfig;
use ndcube::input::Script;
use ndcube::systems::{RenderSystem, SimulationSystem};

fn main() -> ExitCode {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let engine_config = config.to_engine_config()?;
    let mut engine = Engine::new(&engine_config, std::time::Duration::ZERO)?;
    let mut script = Script::new(config.script.clone());
    let mut simulation = SimulationSystem::new(config.run.fps);
    let mut render = RenderSystem::for_terminal(config.canvas.clone());

    let viewport = config.viewport.to_viewport();
    log::info!(
        "Running {:.1}s at {} fps, viewport {}x{}, canvas {}x{}, {} scripted changes",
        config.run.duration_secs,
        config.run.fps,
        viewport.width,
        viewport.height,
        render.canvas().columns(),
        render.canvas().rows(),
        script.remaining()
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut rejected = 0;

    while simulation.now().as_secs_f64() < config.run.duration_secs {
        let result = simulation.update(&mut engine, &mut script);
        rejected += result.rejected;
        if result.flags.contains(UpdateFlags::DIRECTION_REFRESHED) {
            log::debug!("t={:.2}s: new rotation direction", result.now.as_secs_f64());
        }

        if render.should_render(simulation.frames()) {
            crossterm::queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
            render.render_frame(&engine, result.now, &mut out)?;
            out.flush()?;
        }

        if config.run.realtime {
            std::thread::sleep(simulation.frame_period());
        }
    }

    log::info!(
        "Finished after {} frames: {}-cube, {} rejected changes",
        simulation.frames(),
        engine.dimension(),
        rejected
    );
    Ok(())
}
