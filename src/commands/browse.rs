//! Browse command - interactive session over stdin

use crate::{
    WallifyError,
    gateway::CatalogGateway,
    query::{FilterSet, unfamiliar_terms},
    session::{Intent, SessionDriver, SessionHandle},
    ui::{LineCommand, OutputWriter, SnapshotRenderer, input::COMMANDS, parse_line},
};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

type Result<T> = std::result::Result<T, WallifyError>;

/// Extra wait after input ends, on top of the debounce window
const DRAIN_GRACE: Duration = Duration::from_millis(100);

/// Execute the browse command
///
/// Reads one line at a time from `input` and renders every snapshot the
/// session publishes. Ends on `:quit`, or once input is exhausted and the
/// last search has landed.
///
/// # Errors
///
/// Returns `WallifyError::IoError` if reading input fails and
/// `WallifyError::SessionError` if the session stops unexpectedly.
pub async fn execute<G, R>(
    gateway: Arc<G>,
    debounce: Duration,
    input: R,
    out: &dyn OutputWriter,
    quiet: bool,
) -> Result<()>
where
    G: CatalogGateway,
    R: AsyncBufRead + Unpin,
{
    let (driver, handle, mut snapshots) = SessionDriver::new(gateway, debounce);
    let session = tokio::spawn(driver.run());

    let mut renderer = SnapshotRenderer::new(quiet);
    // Filters as last sent; `:filter` edits this, not a possibly older snapshot
    let mut active = FilterSet::new();
    let mut loading = true;
    let mut lines = input.lines();

    if !quiet {
        out.info("Type to search, :help for commands.");
    }

    let input_closed = loop {
        tokio::select! {
            snapshot = snapshots.recv() => {
                let Some(snapshot) = snapshot else { break false };
                loading = snapshot.is_loading;
                renderer.render(&snapshot, out);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break true };
                if !dispatch(&line, &mut active, &handle, out)? {
                    break false;
                }
            }
        }
    };

    if input_closed {
        debug!("Input closed, waiting for the session to settle");
        let grace = debounce + DRAIN_GRACE;
        loop {
            let next = if loading {
                snapshots.recv().await
            } else {
                match tokio::time::timeout(grace, snapshots.recv()).await {
                    Ok(next) => next,
                    Err(_) => break,
                }
            };
            let Some(snapshot) = next else { break };
            loading = snapshot.is_loading;
            renderer.render(&snapshot, out);
        }
    }

    drop(handle);
    if let Err(e) = session.await {
        warn!("Session task ended abnormally: {e}");
    }
    Ok(())
}

/// Act on one input line; returns `false` when the user asked to quit
///
/// Keeps `active` in step with the filter intents it sends.
fn dispatch(
    line: &str,
    active: &mut FilterSet,
    handle: &SessionHandle,
    out: &dyn OutputWriter,
) -> Result<bool> {
    match parse_line(line, active) {
        Ok(LineCommand::Intent(intent)) => {
            let notes = match &intent {
                Intent::CategorySelected(category) => {
                    unfamiliar_terms(Some(category.as_str()), &FilterSet::new())
                }
                Intent::FiltersApplied(filters) => unfamiliar_terms(None, filters),
                _ => Vec::new(),
            };
            for note in notes {
                out.warning(&note);
            }
            match &intent {
                Intent::FiltersApplied(filters) => *active = filters.clone(),
                Intent::FilterRemoved(field) => {
                    active.remove(field);
                }
                Intent::FiltersReset | Intent::ClearAll => *active = FilterSet::new(),
                _ => {}
            }
            handle.send(intent)?;
        }
        Ok(LineCommand::Help) => {
            for (usage, about) in COMMANDS {
                out.write(&format!("  {usage:<18} {about}"));
            }
        }
        Ok(LineCommand::Quit) => return Ok(false),
        Err(e) => out.error(&e.to_string()),
    }
    Ok(true)
}
