use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use anyhow::Context;
use roster_core::{update, AppState, Msg};
use roster_engine::{DataSource, HttpSource, LocalSource};
use roster_logging::{roster_debug, roster_info};

use super::config::{ClientConfig, SourceConfig, CONFIG_FILENAME};
use super::effects::EffectRunner;
use super::input::{self, Input};
use super::{logging, render};

const TICK: Duration = Duration::from_millis(75);

pub fn run_app() -> anyhow::Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
    let config = ClientConfig::load(&config_path)
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;
    logging::initialize(&config.log);
    roster_info!("Starting roster_app with {:?}", config.source);

    let source = build_source(&config)?;
    let runner = EffectRunner::new(source).context("starting engine thread")?;

    let (input_tx, input_rx) = mpsc::channel::<Input>();
    input::spawn_reader(input_tx).context("starting input thread")?;

    println!("{}", render::HELP);
    let mut app = App {
        state: AppState::with_settings(config.core_settings()),
        runner,
    };
    app.dispatch(Msg::Started);
    app.run(&input_rx);
    roster_info!("roster_app stopped");
    Ok(())
}

fn build_source(config: &ClientConfig) -> anyhow::Result<Arc<dyn DataSource>> {
    if let Some(settings) = config.http_settings() {
        let source = HttpSource::new(settings).context("configuring http source")?;
        return Ok(Arc::new(source));
    }
    match &config.source {
        SourceConfig::Local { dir } => {
            let source = LocalSource::open(dir.clone())
                .with_context(|| format!("opening local store {}", dir.display()))?;
            Ok(Arc::new(source))
        }
        SourceConfig::Http { .. } => anyhow::bail!("http source without settings"),
    }
}

struct App {
    state: AppState,
    runner: EffectRunner,
}

impl App {
    fn run(&mut self, input_rx: &mpsc::Receiver<Input>) {
        loop {
            while let Some(msg) = self.runner.try_next_msg() {
                self.dispatch(msg);
            }
            match input_rx.recv_timeout(TICK) {
                Ok(Input::Msg(msg)) => self.dispatch(msg),
                Ok(Input::Help) => println!("{}", render::HELP),
                Ok(Input::Problem(text)) => eprintln!("{text}"),
                Ok(Input::Quit) | Err(mpsc::RecvTimeoutError::Disconnected) => return,
                Err(mpsc::RecvTimeoutError::Timeout) => self.dispatch(Msg::Tick),
            }
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if !effects.is_empty() {
            roster_debug!("Running {} effect(s)", effects.len());
        }
        self.runner.enqueue(effects);
        if state.consume_dirty() {
            println!("{}", render::render(&state.view()));
        }
        self.state = state;
    }
}
