//! Interactive page lifetime
//!
//! Loads the page, then multiplexes the display refresh tick, the expiry
//! check tick, activity commands typed on stdin and termination signals.
//! Every exit path, a failing one included, unloads the page so the
//! interval is recorded.

use anyhow::{Context, Result};
use std::io::Write;
use std::time::Duration;
use studygate_api::PageSignal;
use studygate_core::{CoreEvent, PageSession};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal::unix::{SignalKind, signal};
use tracing::{debug, info, warn};

use crate::render;

/// Why the loop ended
#[derive(Debug, PartialEq, Eq)]
enum Exit {
    Unload,
    Navigated,
}

pub async fn run(
    mut page: PageSession,
    refresh_every: Duration,
    expiry_every: Duration,
) -> Result<()> {
    let events = page.load()?;
    render::print_events(&events);
    if events
        .iter()
        .any(|e| matches!(e, CoreEvent::Redirected { .. }))
    {
        return Ok(());
    }

    let outcome = drive(&mut page, refresh_every, expiry_every).await;
    close(&mut page, outcome)?;
    info!("Page closed");
    Ok(())
}

/// The open-page event loop
async fn drive(
    page: &mut PageSession,
    refresh_every: Duration,
    expiry_every: Duration,
) -> Result<Exit> {
    println!("Commands: hidden, visible, blur, focus, toggle, logout, quit");

    let mut sigterm = signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;
    let mut sighup = signal(SignalKind::hangup()).context("Failed to create SIGHUP handler")?;

    let mut refresh_timer = tokio::time::interval(refresh_every);
    let mut expiry_timer = tokio::time::interval(expiry_every);
    // The first tick of an interval fires immediately; the gate just ran
    expiry_timer.tick().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    info!("Page open");

    loop {
        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM, unloading page");
                break Ok(Exit::Unload);
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, unloading page");
                break Ok(Exit::Unload);
            }
            _ = sighup.recv() => {
                info!("Received SIGHUP, unloading page");
                break Ok(Exit::Unload);
            }

            _ = refresh_timer.tick() => {
                let status = page.refresh()?;
                print!("\r{}    ", render::status_line(&status));
                std::io::stdout().flush().ok();
            }

            _ = expiry_timer.tick() => {
                let events = page.check_expiry()?;
                if !events.is_empty() {
                    println!();
                    render::print_events(&events);
                    break Ok(Exit::Navigated);
                }
            }

            line = lines.next_line(), if stdin_open => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    debug!("stdin closed");
                    stdin_open = false;
                    continue;
                };
                if let Some(exit) = handle_line(page, line.trim())? {
                    break Ok(exit);
                }
            }
        }
    }
}

/// Unload unless the page already navigated away. A loop error still
/// unloads first, then is returned.
fn close(page: &mut PageSession, outcome: Result<Exit>) -> Result<()> {
    match outcome {
        Ok(Exit::Navigated) => Ok(()),
        Ok(Exit::Unload) => {
            println!();
            if let Some(event) = page.unload()? {
                render::print_events(&[event]);
            }
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Page loop failed, unloading");
            match page.unload() {
                Ok(Some(event)) => render::print_events(&[event]),
                Ok(None) => {}
                Err(unload_err) => warn!(error = %unload_err, "Unload after failure also failed"),
            }
            Err(e)
        }
    }
}

fn handle_line(page: &mut PageSession, line: &str) -> Result<Option<Exit>> {
    match line {
        "" => Ok(None),
        "quit" | "exit" => Ok(Some(Exit::Unload)),
        "logout" => {
            println!();
            render::print_events(&page.logout()?);
            Ok(Some(Exit::Navigated))
        }
        "toggle" => {
            if let Some(event) = page.toggle()? {
                println!();
                render::print_events(&[event]);
            }
            Ok(None)
        }
        other => {
            match other.parse::<PageSignal>() {
                Ok(signal) => {
                    if let Some(event) = page.signal(signal)? {
                        println!();
                        render::print_events(&[event]);
                    }
                }
                Err(e) => warn!(error = %e, "Ignoring input"),
            }
            Ok(None)
        }
    }
}
