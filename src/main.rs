//! Math Balloon entry point
//!
//! Natively this runs a headless autoplay session on synthetic frame time:
//! a bot types the answer of the lowest balloon after a reaction delay and
//! plays through levels until it loses or wins. The browser build drives the
//! library through `platform::web` instead.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use math_balloon::{ConfigError, QualityPreset, Settings};
    use math_balloon::levels::LevelTable;
    use math_balloon::platform::resolve_seed;
    use math_balloon::sim::{BalloonKind, GameEvent, GamePhase, Session};

    /// Simulated time limit for one run (30 minutes)
    const MAX_RUN_MS: f64 = 30.0 * 60.0 * 1000.0;

    /// Balloon the bot has decided to answer
    struct Aim {
        id: u32,
        answer: u32,
        ready_at: f64,
    }

    #[derive(Default)]
    struct Tally {
        popped: u32,
        traps: u32,
        escaped: u32,
    }

    impl Tally {
        fn record(&mut self, event: &GameEvent) {
            match event {
                GameEvent::Popped { .. } => self.popped += 1,
                GameEvent::TrapTriggered { .. } => self.traps += 1,
                GameEvent::Escaped { .. } => self.escaped += 1,
                _ => {}
            }
        }
    }

    /// Lowest visible balloon that is safe to answer
    fn pick_target(session: &Session) -> Option<(u32, u32)> {
        session
            .state()
            .matchable()
            .filter(|b| b.kind != BalloonKind::Bomb && b.pos.y >= 0.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|b| (b.id, b.answer))
    }

    fn type_answer(session: &mut Session, answer: u32) {
        session.clear_input();
        for digit in answer.to_string().bytes() {
            session.submit_digit(digit - b'0');
        }
    }

    /// Arguments, in any order: a settings file and a quality preset name
    fn load_settings() -> Result<Settings, ConfigError> {
        let mut path = None;
        let mut preset = None;
        for arg in std::env::args().skip(1) {
            match QualityPreset::parse(&arg) {
                Some(quality) => preset = Some(quality),
                None => path = Some(PathBuf::from(arg)),
            }
        }
        Ok(match (path, preset) {
            (Some(path), preset) => {
                let mut settings = Settings::load_from(&path)?;
                if let Some(quality) = preset {
                    settings.quality = quality;
                }
                settings
            }
            (None, Some(quality)) => Settings::from_preset(quality),
            (None, None) => Settings::default(),
        })
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let settings = load_settings()?;
        let seed = resolve_seed(settings.seed);
        let frame_ms = settings.frame_ms.max(1.0);
        let delay_ms = settings.autoplay_delay_ms;
        let mut session = Session::new(LevelTable::standard(), settings, seed)?;
        log::info!(
            "Headless autoplay (seed {}, {} quality)",
            seed,
            session.settings().quality.as_str()
        );

        let mut now = 0.0;
        let mut aim: Option<Aim> = None;
        let mut tally = Tally::default();

        while now < MAX_RUN_MS {
            session.update(now)?;

            match session.phase() {
                GamePhase::Home => session.open_level_select()?,
                GamePhase::LevelSelect => session.start_session(1)?,
                GamePhase::LevelComplete => {
                    aim = None;
                    session.advance_to_next_level()?;
                }
                GamePhase::GameOver | GamePhase::Victory => break,
                GamePhase::Game => {
                    let current = aim
                        .take()
                        .filter(|a| session.state().matchable().any(|b| b.id == a.id));
                    match current {
                        Some(a) if now >= a.ready_at => type_answer(&mut session, a.answer),
                        Some(a) => aim = Some(a),
                        None => {
                            aim = pick_target(&session).map(|(id, answer)| Aim {
                                id,
                                answer,
                                ready_at: now + delay_ms,
                            });
                        }
                    }
                }
                GamePhase::Splash | GamePhase::Pause => {}
            }

            for event in session.drain_events() {
                log::debug!("{:?}", event);
                tally.record(&event);
            }
            now += frame_ms;
        }

        let snap = session.snapshot();
        println!("Finished in {:?} after {:.1}s simulated", snap.phase, now / 1000.0);
        println!(
            "Level {} | score {} | lives {}/{} | unlocked {}",
            snap.level, snap.score, snap.lives, snap.max_lives, snap.unlocked_level
        );
        println!(
            "Popped {} | traps {} | escaped {} | {} quality",
            tally.popped,
            tally.traps,
            tally.escaped,
            session.settings().quality.as_str()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Math Balloon (native) starting...");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}
