use std::collections::{BTreeMap, HashMap};

use super::{Command, CommandRouter, GLOBAL, KeyTable, KeymapError};
use crate::compare::CompareCommand;

pub const BROWSE: &str = "browse";
pub const IMAGES: &str = "images";
pub const COMPARE: &str = "compare";

fn table(entries: &[(&str, Command)]) -> KeyTable<Command> {
    entries.iter().map(|(k, c)| (k.to_string(), *c)).collect()
}

/// The stock bindings for every context, keyed by context name.
pub fn default_keymaps() -> HashMap<String, KeyTable<Command>> {
    use CompareCommand as C;

    let mut out = HashMap::new();
    out.insert(GLOBAL.to_string(), table(&[("?", Command::ToggleHelp)]));
    out.insert(
        BROWSE.to_string(),
        table(&[
            ("enter", Command::SelectFolder),
            ("arrowup", Command::NavigateUp),
            ("arrowdown", Command::NavigateDown),
            ("escape", Command::GoBack),
        ]),
    );
    out.insert(
        IMAGES.to_string(),
        table(&[
            ("enter", Command::StartComparison),
            ("space", Command::ToggleSelect),
            ("a", Command::SelectAll),
            ("/", Command::SelectByGlob),
            ("escape", Command::GoBack),
            ("arrowleft", Command::NavigateLeft),
            ("arrowright", Command::NavigateRight),
            ("arrowup", Command::NavigateUp),
            ("arrowdown", Command::NavigateDown),
        ]),
    );
    out.insert(
        COMPARE.to_string(),
        table(&[
            ("arrowleft", C::PreviousCandidate.into()),
            ("arrowright", C::NextCandidate.into()),
            ("a", C::PreviousCandidate.into()),
            ("d", C::NextCandidate.into()),
            ("space", C::SelectCurrentBest.into()),
            ("enter", C::SelectCurrentBest.into()),
            ("s", C::SaveImage.into()),
            ("x", C::RejectImage.into()),
            ("u", C::Undo.into()),
            ("escape", C::ExitComparison.into()),
            ("q", C::ExitComparison.into()),
        ]),
    );
    out
}

/// Merges user overrides (context → key → command name) over `maps`.
///
/// Unknown command names are rejected before anything is changed.
pub fn apply_overrides(
    maps: &mut HashMap<String, KeyTable<Command>>,
    overrides: &BTreeMap<String, BTreeMap<String, String>>,
) -> Result<(), KeymapError> {
    let mut parsed = Vec::new();
    for (context, keys) in overrides {
        for (key, name) in keys {
            let cmd = name
                .parse::<Command>()
                .map_err(|_| KeymapError::UnknownCommand {
                    context: context.clone(),
                    key: key.clone(),
                    command: name.clone(),
                })?;
            parsed.push((context.clone(), key.to_lowercase(), cmd));
        }
    }

    for (context, key, cmd) in parsed {
        maps.entry(context).or_default().insert(key, cmd);
    }
    Ok(())
}

pub fn install_default_keymaps(
    router: &mut CommandRouter<Command>,
    overrides: &BTreeMap<String, BTreeMap<String, String>>,
) -> Result<(), KeymapError> {
    let mut maps = default_keymaps();
    apply_overrides(&mut maps, overrides)?;
    for (context, table) in maps {
        router.register_context(&context, table);
    }
    Ok(())
}
