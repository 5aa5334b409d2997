//! Edge Siege entry point
//!
//! The browser build is driven through `edge_siege::web`. Natively this runs
//! a headless attract-mode session and logs how it went.

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;
    use edge_siege::consts::SIM_DT;
    use edge_siege::highscores::FileStore;
    use edge_siege::sim::{GameEvent, autopilot_input};
    use edge_siege::{Difficulty, GameError, Session, SimConfig, Theme};

    /// Headless Edge Siege run driven by the autopilot
    #[derive(Parser, Debug)]
    #[command(name = "edge-siege")]
    #[command(about = "Run a headless Edge Siege session on autopilot")]
    #[command(version)]
    pub struct Options {
        /// RNG seed for the run
        #[arg(long, default_value_t = 12345)]
        pub seed: u64,

        /// Simulated seconds before stopping
        #[arg(long, default_value_t = 120.0)]
        pub seconds: f32,

        /// Theme (neon, tanks, desert, arctic, jungle)
        #[arg(long, default_value = "neon", value_parser = parse_theme)]
        pub theme: Theme,

        /// Difficulty preset (easy, normal, hard); ignored with --config
        #[arg(long, default_value = "normal", value_parser = parse_difficulty)]
        pub difficulty: Difficulty,

        /// JSON config file overriding the preset
        #[arg(long)]
        pub config: Option<PathBuf>,

        /// Where the best score is kept
        #[arg(long, default_value = "edge-siege-highscore.json")]
        pub highscore: PathBuf,
    }

    fn parse_theme(s: &str) -> Result<Theme, String> {
        Theme::parse(s).map_err(|e| e.to_string())
    }

    fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
        Difficulty::from_str(s).ok_or_else(|| format!("unknown difficulty: {s}"))
    }

    pub fn run(options: Options) -> Result<(), GameError> {
        let config = match &options.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::from_preset(options.difficulty),
        };

        let mut session = Session::new(config, FileStore::new(&options.highscore))?;
        session.select_theme(options.theme);
        session.start(options.seed)?;
        log::info!(
            "Edge Siege (headless) - {} theme, {} difficulty, {:.0}s",
            options.theme.as_str(),
            session.config().difficulty.as_str(),
            options.seconds
        );

        let frames = (options.seconds / SIM_DT).ceil() as u64;
        let mut specials = 0;
        for _ in 0..frames {
            let Some(input) = session.state().map(autopilot_input) else {
                break;
            };
            let events = session.frame(SIM_DT, &input);
            specials += events
                .iter()
                .filter(|e| matches!(e, GameEvent::SpecialFired { .. }))
                .count();
            if events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })) {
                break;
            }
        }

        if let Some(hud) = session.hud() {
            log::info!(
                "Finished: score {}, level {}, kills {}, lives {}, specials {}, best {}",
                hud.score,
                hud.level,
                hud.kills,
                hud.lives,
                specials,
                hud.high_score
            );
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let options = native::Options::parse();
    if let Err(e) = native::run(options) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Entry point is `edge_siege::web::WebGame`
}
