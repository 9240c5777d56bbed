//! Interactive mode: stdin lines drive a [`SearchOrchestrator`] and every
//! settled snapshot is printed.

use std::sync::Arc;

use nearby_core::{Coordinates, NearbyError};
use nearby_orchestrator::{SearchOrchestrator, SearchResultSet, SearchStatus, Snapshot};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use crate::location::FixedLocation;
use crate::output;

const HELP: &str = "\
type to search (debounced); commands:
  /cat <type>      select a category (again to deselect), /cat alone clears it
  /clear           clear query and category, search now
  /refresh         re-read the location and search now
  /move <lat> <lng> move the device, then refresh
  /categories      list categories
  /help            show this help
  /quit            exit";

#[derive(Debug, Clone, PartialEq)]
pub enum WatchCommand {
    Query(String),
    Category(Option<String>),
    Clear,
    Refresh,
    Move(Coordinates),
    Categories,
    Help,
    Quit,
}

/// Parses one input line. Anything not starting with `/` is a query.
pub fn parse_line(line: &str) -> Result<WatchCommand, String> {
    let line = line.trim();
    let Some(command) = line.strip_prefix('/') else {
        return Ok(WatchCommand::Query(line.to_string()));
    };

    let mut parts = command.split_whitespace();
    match parts.next().unwrap_or_default() {
        "cat" | "category" => Ok(WatchCommand::Category(parts.next().map(str::to_owned))),
        "clear" => Ok(WatchCommand::Clear),
        "refresh" => Ok(WatchCommand::Refresh),
        "move" => {
            let lat = parts.next().and_then(|v| v.parse::<f64>().ok());
            let lng = parts.next().and_then(|v| v.parse::<f64>().ok());
            match (lat, lng) {
                (Some(lat), Some(lng)) => Ok(WatchCommand::Move(Coordinates::new(lat, lng))),
                _ => Err("usage: /move <lat> <lng>".to_string()),
            }
        }
        "categories" => Ok(WatchCommand::Categories),
        "help" | "?" => Ok(WatchCommand::Help),
        "quit" | "q" | "exit" => Ok(WatchCommand::Quit),
        other => Err(format!("unknown command '/{other}', try /help")),
    }
}

/// Runs until `/quit` or end of input.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
pub async fn run(
    orchestrator: SearchOrchestrator,
    location: Arc<FixedLocation>,
) -> anyhow::Result<()> {
    println!("{HELP}");
    let printer = tokio::spawn(print_updates(orchestrator.subscribe()));

    orchestrator.initialize().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(WatchCommand::Quit) => break,
            Ok(command) => apply(&orchestrator, &location, command).await,
            Err(message) => eprintln!("{message}"),
        }
    }

    printer.abort();
    Ok(())
}

async fn apply(orchestrator: &SearchOrchestrator, location: &FixedLocation, command: WatchCommand) {
    match command {
        WatchCommand::Query(text) => orchestrator.set_query(text),
        WatchCommand::Category(None) => {
            if let Err(e) = orchestrator.set_category(None) {
                eprintln!("{e}");
            }
        }
        WatchCommand::Category(Some(kind)) => {
            if let Err(e) = orchestrator.toggle_category(&kind) {
                eprintln!("{e}; see /categories");
            }
        }
        WatchCommand::Clear => {
            orchestrator.clear_filters().await;
        }
        WatchCommand::Refresh => refresh(orchestrator).await,
        WatchCommand::Move(at) => {
            location.set(at);
            refresh(orchestrator).await;
        }
        WatchCommand::Categories => output::print_categories(&orchestrator.snapshot().categories),
        WatchCommand::Help => println!("{HELP}"),
        WatchCommand::Quit => {}
    }
}

async fn refresh(orchestrator: &SearchOrchestrator) {
    if let Err(e) = orchestrator.refresh_location().await {
        // The error itself is already published as a failed snapshot.
        tracing::debug!(error = %e, "refresh failed");
        if let Some(hint) = refresh_hint(&e) {
            eprintln!("{hint}");
        }
    }
}

fn refresh_hint(error: &NearbyError) -> Option<&'static str> {
    error
        .is_transient()
        .then_some("previous results are still shown; /refresh to try again")
}

type Rendered = (SearchStatus, Arc<SearchResultSet>);

async fn print_updates(mut updates: watch::Receiver<Snapshot>) {
    let mut last: Option<Rendered> = None;
    while updates.changed().await.is_ok() {
        let snapshot = updates.borrow_and_update().clone();
        if needs_render(last.as_ref(), &snapshot) {
            output::print_snapshot(&snapshot);
        }
        last = Some((snapshot.status.clone(), Arc::clone(&snapshot.results)));
    }
}

/// Filter edits publish too; only status changes and new result sets are shown.
fn needs_render(last: Option<&Rendered>, snapshot: &Snapshot) -> bool {
    if snapshot.status == SearchStatus::Idle {
        return false;
    }
    last.map_or(true, |(status, results)| {
        *status != snapshot.status || !Arc::ptr_eq(results, &snapshot.results)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_queries() {
        assert_eq!(
            parse_line("  pizza place "),
            Ok(WatchCommand::Query("pizza place".to_string()))
        );
        assert_eq!(parse_line(""), Ok(WatchCommand::Query(String::new())));
    }

    #[test]
    fn category_command_with_and_without_argument() {
        assert_eq!(
            parse_line("/cat cafe"),
            Ok(WatchCommand::Category(Some("cafe".to_string())))
        );
        assert_eq!(parse_line("/cat"), Ok(WatchCommand::Category(None)));
    }

    #[test]
    fn move_requires_two_numbers() {
        assert_eq!(
            parse_line("/move 51.5 -0.12"),
            Ok(WatchCommand::Move(Coordinates::new(51.5, -0.12)))
        );
        assert!(parse_line("/move 51.5").is_err());
        assert!(parse_line("/move north south").is_err());
    }

    #[test]
    fn control_commands() {
        assert_eq!(parse_line("/clear"), Ok(WatchCommand::Clear));
        assert_eq!(parse_line("/refresh"), Ok(WatchCommand::Refresh));
        assert_eq!(parse_line("/q"), Ok(WatchCommand::Quit));
        assert!(parse_line("/bogus").unwrap_err().contains("/bogus"));
    }

    #[test]
    fn retry_hint_only_for_transient_refresh_failures() {
        assert!(refresh_hint(&NearbyError::location_unavailable()).is_some());
        assert!(refresh_hint(&NearbyError::Network("timeout".to_string())).is_some());
        assert!(refresh_hint(&NearbyError::permission_denied()).is_none());
    }

    #[test]
    fn renders_only_status_changes_and_new_results() {
        let ready = Snapshot {
            status: SearchStatus::Ready,
            ..Snapshot::default()
        };
        assert!(needs_render(None, &ready));

        let rendered = (SearchStatus::Ready, Arc::clone(&ready.results));
        assert!(!needs_render(Some(&rendered), &ready), "filter edit only");

        let replaced = Snapshot {
            results: Arc::default(),
            ..ready.clone()
        };
        assert!(needs_render(Some(&rendered), &replaced));

        let failed = Snapshot {
            status: SearchStatus::Failed(NearbyError::location_unavailable()),
            ..ready.clone()
        };
        assert!(needs_render(Some(&rendered), &failed));

        assert!(!needs_render(None, &Snapshot::default()), "idle is never shown");
    }
}
