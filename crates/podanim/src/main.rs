use std::env;

use anyhow::bail;
use itertools::Itertools;
use podanim::{
    scene::{Command, Recording},
    scenes::{self, SceneEntry, SCENES},
    theme::Theme,
};

const USAGE: &str = "usage: podanim [list | <scene> | all] [--dump]";

fn main() -> anyhow::Result<()> {
    podanim::init_logger!();

    let mut dump = false;
    let mut positional = Vec::new();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--dump" => dump = true,
            flag if flag.starts_with('-') => bail!("unknown flag '{flag}'\n{USAGE}"),
            _ => positional.push(arg),
        }
    }

    let selection = match positional.as_slice() {
        [] => None,
        [name] if name == "list" => None,
        [name] => Some(name.as_str()),
        [_, extra, ..] => bail!("unexpected argument '{extra}'\n{USAGE}"),
    };
    let Some(selection) = selection else {
        list();
        return Ok(());
    };

    let entries: Vec<&SceneEntry> = if selection == "all" {
        SCENES.iter().collect()
    } else {
        match scenes::find(selection) {
            Some(entry) => vec![entry],
            None => bail!(
                "unknown scene '{selection}' (available: {})",
                SCENES.iter().map(|e| e.name).join(", ")
            ),
        }
    };

    let theme = Theme::from_env()?;
    for entry in entries {
        let recording = scenes::record(entry, &theme)?;
        report(entry, &theme, &recording);
        if dump {
            for command in &recording.commands {
                println!("{}", describe(command));
            }
        }
    }

    Ok(())
}

fn list() {
    let width = SCENES.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for entry in SCENES {
        println!("{:width$}  {}", entry.name, entry.description);
    }
}

fn report(entry: &SceneEntry, theme: &Theme, recording: &Recording) {
    log::info!(
        "{}: {} objects, {} commands, {} frames, {:.1}s",
        entry.name,
        recording.objects,
        recording.commands.len(),
        recording.frames,
        recording.duration,
    );
    if let Some(nominal) = theme.nominal_duration(entry.name) {
        if recording.duration > nominal {
            log::warn!(
                "{} runs for {:.1}s, longer than its nominal {nominal:.0}s",
                entry.name,
                recording.duration
            );
        }
    }
}

fn describe(command: &Command) -> String {
    match command {
        Command::Add { id, object } => format!("add {id} {:?} {:?}", object.color, object.shape),
        Command::Update { id, object } => {
            format!("update {id} {:?} {:?}", object.color, object.shape)
        }
        Command::Remove { id } => format!("remove {id}"),
        Command::Transition {
            effect,
            targets,
            run_time,
        } => format!(
            "{effect:?} [{}] {run_time:.2}s",
            targets.iter().join(" ")
        ),
        Command::Wait { duration } => format!("wait {duration:.2}s"),
        Command::EndFrame => "frame".to_string(),
    }
}
