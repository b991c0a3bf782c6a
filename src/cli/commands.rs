use std::time::Duration;

use tracing::{info, warn};

use crate::bridge::background::BackgroundBridge;
use crate::bridge::relay::Relay;
use crate::browser::session::BrowserSession;
use crate::cli::config::{AppConfig, PageArgs};
use crate::page::context::PageContext;
use crate::page::local::LocalPage;
use crate::panel::panel::Panel;
use crate::panel::panel_model::FillResult;
use crate::panel::view::{render_fields_json, render_panel};
use crate::proposer::ValueProposer;
use crate::proposer::delegated::DelegatedProposer;
use crate::proposer::heuristic::HeuristicProposer;
use crate::trace::logger::TraceLogger;

/// A page opened from the command line.
pub enum OpenedPage {
    Local(LocalPage),
    Browser(BrowserSession),
}

impl OpenedPage {
    pub fn context(&mut self) -> &mut dyn PageContext {
        match self {
            OpenedPage::Local(page) => page,
            OpenedPage::Browser(session) => session,
        }
    }

    fn close(self) -> Result<(), Box<dyn std::error::Error>> {
        if let OpenedPage::Browser(mut session) = self {
            session.quit()?;
        }
        Ok(())
    }
}

/// Load `--html` into a local page, or launch a browser session on `--url`.
pub fn open_page(args: &PageArgs, config: &AppConfig) -> Result<OpenedPage, Box<dyn std::error::Error>> {
    match (&args.html, &args.url) {
        (Some(path), _) => {
            let html = std::fs::read_to_string(path)?;
            Ok(OpenedPage::Local(LocalPage::from_html(&html)))
        }
        (None, Some(url)) => {
            let mut session = BrowserSession::launch(&config.browser.script)?;
            session.navigate(url)?;
            Ok(OpenedPage::Browser(session))
        }
        (None, None) => Err("either --html or --url is required".into()),
    }
}

/// Build the proposer named by `strategy`. The delegated proposer talks to
/// the relay through a background worker.
pub fn build_proposer(
    strategy: &str,
    config: &AppConfig,
    endpoint_override: Option<&str>,
) -> Result<Box<dyn ValueProposer>, Box<dyn std::error::Error>> {
    match strategy {
        "delegated" => {
            let endpoint = endpoint_override.unwrap_or(&config.relay.endpoint);
            let relay = Relay::new(endpoint, config.relay.timeout(), config.relay.connect_timeout())?;
            let bridge = BackgroundBridge::spawn(Box::new(relay))?;
            Ok(Box::new(DelegatedProposer::new(Box::new(bridge))))
        }
        "heuristic" => Ok(Box::new(HeuristicProposer)),
        other => {
            warn!(strategy = other, "unknown proposer, using heuristic");
            Ok(Box::new(HeuristicProposer))
        }
    }
}

/// Panel configured from the config file.
pub fn build_panel(
    proposer: Box<dyn ValueProposer>,
    config: &AppConfig,
    delay_ms: Option<u64>,
) -> Panel {
    let journal = match &config.trace_file {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };
    let delay = delay_ms.unwrap_or(config.panel.fill_delay_ms);

    Panel::new(proposer)
        .with_fill_delay(Duration::from_millis(delay))
        .with_autofill(config.panel.autofill_enabled)
        .with_journal(journal)
}

// ============================================================================
// scan subcommand
// ============================================================================

pub fn cmd_scan(
    args: &PageArgs,
    strategy: &str,
    format: &str,
    config: &AppConfig,
    endpoint_override: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let proposer = build_proposer(strategy, config, endpoint_override)?;
    let mut panel = build_panel(proposer, config, None);
    let mut page = open_page(args, config)?;

    panel.scan(page.context())?;

    let output = match format {
        "json" => render_fields_json(panel.fields())?,
        _ => render_panel(panel.state()),
    };
    println!("{}", output.trim_end());

    page.close()
}

// ============================================================================
// fill subcommand
// ============================================================================

pub fn cmd_fill(
    args: &PageArgs,
    strategy: &str,
    only: &[String],
    delay_ms: Option<u64>,
    output: Option<&str>,
    config: &AppConfig,
    endpoint_override: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let proposer = build_proposer(strategy, config, endpoint_override)?;
    let mut panel = build_panel(proposer, config, delay_ms);
    let mut page = open_page(args, config)?;

    panel.scan(page.context())?;

    if only.is_empty() {
        let summary = panel.fill_all(page.context());
        info!(
            filled = summary.filled,
            skipped = summary.skipped,
            failed = summary.failed,
            "fill pass complete"
        );
    } else {
        for id in only {
            if let FillResult::UnknownField = panel.fill_one(page.context(), id)? {
                eprintln!("No field '{}' on this page", id);
            }
        }
    }

    println!("{}", render_panel(panel.state()).trim_end());

    if let Some(path) = output {
        match &page {
            OpenedPage::Local(local) => {
                let doc = local.document();
                std::fs::write(path, doc.outer_html_with_values(doc.root()))?;
            }
            OpenedPage::Browser(_) => {
                warn!("--output is only supported for --html pages");
            }
        }
    }

    page.close()
}

// ============================================================================
// markup subcommand
// ============================================================================

pub fn cmd_markup(
    args: &PageArgs,
    output: Option<&str>,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = open_page(args, config)?;
    let markup = page.context().capture_markup()?;

    match output {
        Some(path) => std::fs::write(path, &markup)?,
        None => println!("{}", markup),
    }

    page.close()
}
