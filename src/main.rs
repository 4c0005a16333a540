//! Celebration FX entry point
//!
//! Natively this runs every effect headlessly at 60 Hz and reports what
//! each one did. The browser build is driven from `web::Stage` instead.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use celebration_fx::audio::{RecordingAudio, SoundCue};
    use celebration_fx::fx::{Animation, FrameLoop, ManualScheduler};
    use celebration_fx::render::RecordingSurface;
    use celebration_fx::sequence::{Layers, Show};
    use celebration_fx::{Result, Settings};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const WIDTH: f32 = 1280.0;
    const HEIGHT: f32 = 720.0;
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after this many frames
    const MAX_FRAMES: usize = 60 * 60;

    type DemoShow = Show<RecordingSurface, RecordingAudio>;

    fn layers() -> Layers<RecordingSurface> {
        Layers {
            matrix: RecordingSurface::new(WIDTH, HEIGHT),
            fireworks: RecordingSurface::new(WIDTH, HEIGHT),
            confetti: RecordingSurface::new(WIDTH, HEIGHT),
            pop: RecordingSurface::new(WIDTH, HEIGHT),
        }
    }

    /// Run one choreography until every layer is quiet
    fn run(name: &str, settings: &Settings, setup: impl FnOnce(&mut DemoShow)) -> Result<()> {
        let mut show = Show::new(layers(), RecordingAudio::new(), settings)?.with_seed(2024);
        show.sound.init();
        setup(&mut show);

        let mut frames = FrameLoop::new(show, ManualScheduler::new());
        frames.kick();
        let delivered = frames.run_until_idle(0.0, FRAME_MS, MAX_FRAMES);
        if frames.is_scheduled() {
            log::warn!("{}: still active after {} frames, stopping", name, delivered);
            frames.stop();
        }

        let show = frames.animation_mut();
        let painted: usize = [
            show.matrix.surface_mut().take_ops().len(),
            show.fireworks.surface_mut().take_ops().len(),
            show.confetti.surface_mut().take_ops().len(),
            show.pop.surface_mut().take_ops().len(),
        ]
        .iter()
        .sum();
        println!(
            "{:<12} {:>5} frames ({:>5.1}s)  {:>8} surface ops  {:>3} notes",
            name,
            delivered,
            delivered as f64 * FRAME_MS / 1000.0,
            painted,
            show.sound.backend().notes().len(),
        );
        Ok(())
    }

    fn print_score() {
        println!("\nSound cues:");
        let mut rng = Pcg32::seed_from_u64(7);
        for cue in SoundCue::ALL {
            println!("  {}", cue.as_str());
            for note in cue.score(0.0, &mut rng) {
                println!(
                    "    {:>5.2}s - {:>5.2}s  {:>7.2} Hz  peak gain {:.3}",
                    note.start,
                    note.stop,
                    note.base_frequency(),
                    note.peak_gain()
                );
            }
        }
    }

    pub fn main() -> Result<()> {
        let settings = Settings::load();
        log::info!(
            "Celebration FX (native) - {} quality, cap {} particles",
            settings.quality.as_str(),
            settings.max_particles()
        );

        run("matrix", &settings, |show| show.choreography_mut().matrix_intro())?;
        run("celebration", &settings, |show| show.choreography_mut().celebration())?;
        run("grand", &settings, |show| show.choreography_mut().grand_celebration())?;

        // the full page sequence with the backdrop underneath
        run("page", &settings, |show| {
            show.choreography_mut().matrix_intro();
            show.choreography_mut().celebration();
        })?;

        let reduced = Settings {
            reduced_motion: true,
            ..settings.clone()
        };
        run("reduced", &reduced, |show| {
            show.choreography_mut().matrix_intro();
            show.choreography_mut().grand_celebration();
        })?;

        // a one-off halt mid-show leaves nothing behind
        let mut show = Show::new(layers(), RecordingAudio::new(), &settings)?;
        show.choreography_mut().grand_celebration();
        show.tick(0.0);
        show.tick(600.0);
        show.halt();
        log::info!("halted mid-show, active = {}", show.is_active());

        print_score();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(e) = demo::main() {
        log::error!("demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}
