use std::io::{self, IsTerminal};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use tutor_cli::config::{DEFAULT_GENERATED_MAX_LEVEL, TutorConfig};
use tutor_cli::tui::{self, App};
use tutor_cli::worksheet::{partial_sum_line, render_worksheet};
use tutor_core::{MultiplicationProblem, QuestionProvider, RandomProvider, TutorSession};
use tutor_source::{QuestionCache, QuestionClient, Refresher, load_bank, save_bank};

use crate::cli::{ConfigAction, DecomposeArgs, FetchArgs, PlayArgs};
use crate::summary::{print_bank_table, print_rows_table};
use crate::types::PlayOutcome;

pub fn run_play(args: &PlayArgs, config: &TutorConfig) -> Result<PlayOutcome> {
    let start_level = args.start_level.unwrap_or(config.curriculum.start_level);
    let max_level = args.max_level.or(config.curriculum.max_level);

    let (provider, cache): (Box<dyn QuestionProvider>, QuestionCache) = match &args.questions {
        Some(path) => {
            let bank = load_bank(path)
                .with_context(|| format!("failed to load questions from {}", path.display()))?;
            let outside = bank
                .iter()
                .flat_map(|(_, questions)| questions)
                .filter(|question| config.bounds.check(**question).is_err())
                .count();
            if outside > 0 {
                warn!(count = outside, "question bank exceeds configured bounds");
            }
            if let Some((level, error)) = bank.iter().find_map(|(level, questions)| {
                questions
                    .iter()
                    .find_map(|question| MultiplicationProblem::from_question(*question).err())
                    .map(|error| (level, error))
            }) {
                bail!("{} level {}: {error}", path.display(), level + 1);
            }
            info!(path = %path.display(), levels = bank.level_count(), "loaded question bank");
            let provider: Box<dyn QuestionProvider> = Box::new(bank.clone());
            (provider, QuestionCache::with_bank(bank))
        }
        None => {
            let generated_max = max_level.unwrap_or(DEFAULT_GENERATED_MAX_LEVEL);
            let provider: Box<dyn QuestionProvider> = match args.seed {
                Some(seed) => Box::new(RandomProvider::seeded(seed, config.bounds, generated_max)),
                None => Box::new(RandomProvider::new(config.bounds, generated_max)),
            };
            (provider, QuestionCache::new())
        }
    };

    let refresher = if args.questions.is_none() && !args.offline && config.source.enabled {
        let client =
            QuestionClient::new(&config.source).context("failed to create question client")?;
        info!(endpoint = client.endpoint(), "starting question refresh");
        Some(Refresher::spawn(client, config.source.refresh_interval()))
    } else {
        None
    };

    let session =
        TutorSession::new(provider, start_level, max_level).context("failed to start session")?;
    let mut app = App::new(session, cache, refresher, max_level);
    tui::run(&mut app)?;

    let session = app.into_session();
    info!(
        sets = session.history().len(),
        level = session.level(),
        "session ended"
    );
    Ok(PlayOutcome {
        history: session.history().to_vec(),
        level: session.level(),
        progress: session.progress(),
        source: session.provider_label(),
    })
}

pub fn run_decompose(args: &DecomposeArgs) -> Result<()> {
    let problem = MultiplicationProblem::new(args.multiplicand, args.multiplier)
        .context("cannot decompose")?;
    println!("{}", render_worksheet(&problem));
    println!();
    print_rows_table(&problem);
    println!("{}", partial_sum_line(&problem));
    Ok(())
}

pub fn run_fetch(args: &FetchArgs, config: &TutorConfig) -> Result<()> {
    let client =
        QuestionClient::new(&config.source).context("failed to create question client")?;
    let spinner = fetch_spinner(client.endpoint());
    let result = client.fetch();
    spinner.finish_and_clear();
    let bank = result.context("failed to fetch question bank")?;
    print_bank_table(&bank);
    if let Some(path) = &args.output {
        save_bank(path, &bank)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Saved: {}", path.display());
    }
    Ok(())
}

pub fn run_config(
    action: &ConfigAction,
    explicit_path: Option<&Path>,
    config: &TutorConfig,
) -> Result<()> {
    let path = explicit_path.map_or_else(TutorConfig::config_path, Path::to_path_buf);
    match action {
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Show => print!("{}", config.to_toml()?),
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists (pass --force to overwrite)", path.display());
            }
            TutorConfig::default().save_to(&path)?;
            println!("Wrote: {}", path.display());
        }
    }
    Ok(())
}

fn fetch_spinner(endpoint: &str) -> ProgressBar {
    if !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", ""])
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Fetching questions from {endpoint}"));
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
