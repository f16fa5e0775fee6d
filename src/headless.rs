//! # Headless Adapter
//!
//! Drives a `ScreenController` without a terminal UI. Every time the session
//! changes, one JSON `Snapshot` is written as a line on stdout; blocking
//! notifications go to stderr as `title: message`.
//!
//! The loop ends when the controller goes idle (the location source ran out
//! and every request has reported back) or on Ctrl+C. A live or fixed source
//! never runs out, so those sessions end on Ctrl+C only.

use std::io::{self, Write};

use log::{debug, info};

use crate::core::{ScreenController, Snapshot};

pub async fn run(controller: ScreenController, destination: Option<String>) -> io::Result<()> {
    run_with(controller, destination, &mut io::stdout(), &mut io::stderr()).await
}

pub async fn run_with<W: Write, E: Write>(
    mut controller: ScreenController,
    destination: Option<String>,
    out: &mut W,
    err: &mut E,
) -> io::Result<()> {
    let mut pending_go = false;
    if let Some(text) = destination {
        pending_go = !text.trim().is_empty();
        controller.edit_destination(text);
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut last: Option<Snapshot> = None;
    loop {
        controller.drain();

        if pending_go && controller.snapshot().marker.is_some() {
            debug!("First fix arrived, planning route to command-line destination");
            pending_go = false;
            controller.go();
        }

        for notification in controller.take_notifications() {
            writeln!(err, "{}: {}", notification.title(), notification.message)?;
        }

        let snapshot = controller.snapshot();
        if last.as_ref() != Some(&snapshot) {
            serde_json::to_writer(&mut *out, &snapshot)?;
            writeln!(out)?;
            out.flush()?;
            last = Some(snapshot);
        }

        if controller.is_idle() {
            info!("Session idle, exiting");
            break;
        }

        tokio::select! {
            _ = controller.step() => {}
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
        }
    }

    controller.teardown();
    Ok(())
}
