//! Headless run of a key sequence through the compare key map and engine.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::compare::{Applied, ComparisonEngine, SessionSummary};
use crate::keymap::{COMPARE, Command, CommandRouter, KeyPress, install_default_keymaps};
use crate::model::ImageRef;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayStep {
    pub key: String,
    pub command: Option<String>,
    pub error: Option<String>,
    pub best: Option<ImageRef>,
    pub candidate: Option<ImageRef>,
    pub cursor: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub steps: Vec<ReplayStep>,
    pub summary: SessionSummary,
}

/// Feeds `keys` through a router with the compare context active.
///
/// The session ends at the first `exitComparison`; keys after it are ignored.
/// If the keys never exit, the session is closed at the end so a summary is
/// always produced.
pub fn replay(
    images: &[ImageRef],
    keys: &[String],
    overrides: &BTreeMap<String, BTreeMap<String, String>>,
) -> Result<ReplayReport> {
    let mut router = CommandRouter::<Command>::new();
    install_default_keymaps(&mut router, overrides).context("install key maps")?;
    router
        .set_active_context(Some(COMPARE))
        .context("activate compare keys")?;

    let mut engine = ComparisonEngine::new();
    engine
        .start_session(images)
        .context("start comparison session")?;

    let mut steps = Vec::new();
    let mut summary = None;
    for key in keys {
        let mut press = KeyPress::new(key.clone());
        let cmd = router.handle(&mut press);
        let mut step = ReplayStep {
            key: key.clone(),
            command: cmd.map(|c| c.as_str().to_string()),
            error: None,
            best: None,
            candidate: None,
            cursor: None,
        };

        if let Some(compare) = cmd.and_then(Command::compare) {
            match engine.apply(compare) {
                Ok(Applied::Exited(s)) => summary = Some(s),
                Ok(Applied::Updated) => {}
                Err(err) => step.error = Some(err.to_string()),
            }
        }

        if let Some(state) = engine.snapshot() {
            step.best = Some(state.current_best.clone());
            step.candidate = state.current_candidate().cloned();
            step.cursor = Some(state.cursor);
        }
        steps.push(step);

        if summary.is_some() {
            break;
        }
    }

    let summary = match summary {
        Some(s) => s,
        None => engine.exit_comparison().context("close comparison session")?,
    };
    Ok(ReplayReport { steps, summary })
}

#[cfg(test)]
#[path = "tests/replay_tests.rs"]
mod tests;
