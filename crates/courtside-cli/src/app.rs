use anyhow::{Context, Result};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use courtside_core::constants::defaults;
use courtside_core::stats::StatsStore;
use courtside_core::{
    Catalog, ConversationSession, CourtsideError, LlmClient, SearchClient, Settings,
    StatsFetcher, StatsReport,
};

use crate::commands::{handle_command, CommandResult};
use crate::render;

/// Context handed to follow-up questions is capped at this many characters.
const SUMMARY_CHARS: usize = 6000;

const PROMPT: &str = "\nWhat would you like to do? (view [category], refresh, ask [question], help, exit): ";

pub struct App {
    fetcher: StatsFetcher,
    store: StatsStore,
    session: ConversationSession,
    report: Option<StatsReport>,
}

impl App {
    pub fn new(settings: &Settings) -> Result<Self> {
        let llm = settings.build_llm_client()?;
        let search: Arc<dyn SearchClient> = Arc::new(settings.build_search_client()?);
        Ok(Self::with_clients(settings, llm, search))
    }

    /// Build the app around injected collaborators.
    pub fn with_clients(
        settings: &Settings,
        llm: Arc<dyn LlmClient>,
        search: Arc<dyn SearchClient>,
    ) -> Self {
        Self {
            fetcher: extraction_fetcher(settings, llm.clone(), search),
            store: StatsStore::new(&settings.output.dir),
            session: ConversationSession::new(llm, settings.session_config()),
            report: None,
        }
    }

    pub fn report(&self) -> Option<&StatsReport> {
        self.report.as_ref()
    }

    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    /// Fetch, save and remember a fresh NBA report.
    pub async fn refresh(&mut self) -> Result<&StatsReport> {
        println!("Fetching latest NBA statistics...");
        let today = chrono::Local::now().date_naive();
        let report = self.fetcher.fetch(&Catalog::nba(), today).await?;

        for failure in &report.failures {
            eprintln!("{}", render::failure_diagnostic(failure));
        }

        let saved = self
            .store
            .save(&report)
            .with_context(|| format!("saving report to {}", self.store.base_dir().display()))?;
        println!("{}", render::saved_files(&saved));

        self.session
            .set_directive_context(Some(report.summary(SUMMARY_CHARS)));
        let report = self.report.insert(report);
        Ok(&*report)
    }

    /// Fetch ticker symbols for `companies` and save them as a `tickers` report.
    pub async fn lookup_tickers(&self, companies: &[String]) -> Result<StatsReport> {
        let today = chrono::Local::now().date_naive();
        let report = self.fetcher.fetch(&Catalog::tickers(companies), today).await?;

        for failure in &report.failures {
            eprintln!("{}", render::failure_diagnostic(failure));
        }

        let saved = self
            .store
            .save(&report)
            .with_context(|| format!("saving tickers to {}", self.store.base_dir().display()))?;
        println!("{}", render::saved_files(&saved));
        Ok(report)
    }

    /// Apply one command. Returns `false` when the loop should stop.
    pub async fn dispatch(&mut self, command: CommandResult) -> Result<bool> {
        tracing::debug!("Dispatching {:?}", command);
        match command {
            CommandResult::Quit => return Ok(false),
            CommandResult::Empty => {}
            CommandResult::Message(msg) => println!("{msg}"),
            CommandResult::Refresh => {
                let report = self.refresh().await?;
                println!("{}", render::recent_results(report));
            }
            CommandResult::Games => match &self.report {
                Some(report) => println!("{}", render::recent_results(report)),
                None => println!("No recent game data available"),
            },
            CommandResult::View(category) => match &self.report {
                Some(report) => println!("{}", render::category_view(report, &category)),
                None => println!("No data available for {category}"),
            },
            CommandResult::Ask(question) => match self.session.submit(&question).await {
                Ok(reply) => println!("\n{reply}"),
                Err(e @ CourtsideError::Auth { .. }) => return Err(e.into()),
                Err(e) => eprintln!("Error: {e}"),
            },
            CommandResult::Reset => {
                self.session.reset();
                println!("Conversation cleared.");
            }
        }
        Ok(true)
    }
}

/// Extraction uses the configured model at temperature zero.
fn extraction_fetcher(
    settings: &Settings,
    llm: Arc<dyn LlmClient>,
    search: Arc<dyn SearchClient>,
) -> StatsFetcher {
    let generation = settings
        .generation()
        .with_temperature(defaults::EXTRACTION_TEMPERATURE);
    StatsFetcher::new(llm, search).with_generation(generation)
}

/// Fetch once, print the results, and stay in the command loop until `exit`.
pub async fn run_interactive(settings: &Settings) -> Result<()> {
    let mut app = App::new(settings)?;
    let report = app.refresh().await?;
    println!("{}", render::recent_results(report));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{PROMPT}");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if !app.dispatch(handle_command(&line)).await? {
            break;
        }
    }
    Ok(())
}

/// Fetch, save, print recent results, exit.
pub async fn run_once(settings: &Settings) -> Result<()> {
    let mut app = App::new(settings)?;
    let report = app.refresh().await?;
    println!("{}", render::recent_results(report));
    Ok(())
}

/// Look up ticker symbols, save and print them.
pub async fn run_ticker_lookup(settings: &Settings, companies: &[String]) -> Result<()> {
    let app = App::new(settings)?;
    let report = app.lookup_tickers(companies).await?;
    println!("{}", render::ticker_table(&report));
    Ok(())
}
