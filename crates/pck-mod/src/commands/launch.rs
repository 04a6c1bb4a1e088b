use crate::errors::CliError;
use crate::println_pad;
use crate::utils::config::{load_config, resolve_root};
use colored::Colorize;
use pck_mod_core::{is_process_running, launch_game, GdreTools, MergeOutcome, ModMerger};

pub struct MergeAndLaunchArgs {
    pub root: Option<String>,
}

/// Merge every mod into the output archive, then start the game against it.
///
/// The exit status reflects the merge only. Launch problems are reported but
/// don't fail the command once the archive has been written.
pub fn merge_and_launch(args: MergeAndLaunchArgs) -> Result<(), CliError> {
    let root = resolve_root(args.root)?;
    let config = load_config(&root)?;
    let patcher = GdreTools::new(&config.tool_executable);

    if is_process_running(&config.game_executable) {
        println_pad!(
            "{} {}",
            "⚠️  Game is already running, the output archive may be locked:".bright_yellow(),
            config.output_archive.as_str().bright_white()
        );
    }

    println_pad!(
        "{} {}",
        "🧩 Patching mods into:".bright_blue().bold(),
        config.output_archive.as_str().bright_cyan().bold()
    );

    let output = match ModMerger::new(&config).run(&patcher)? {
        MergeOutcome::NothingToDo => return Err(CliError::nothing_to_patch(config.mods_root)),
        MergeOutcome::Patched { entries, output } => {
            println_pad!(
                "{} {}",
                "✅ All mods patched successfully! Entries:".bright_green().bold(),
                entries.to_string().bright_white().bold()
            );
            output
        }
    };

    println_pad!(
        "{} {} --main-pack {}",
        "🚀 Launching the game:".bright_blue().bold(),
        config.game_executable.as_str().bright_cyan(),
        output.as_str().bright_white()
    );

    match launch_game(&config.game_executable, &output) {
        Ok(status) if status.success() => {}
        Ok(status) => {
            tracing::warn!("Game exited with {}", status);
        }
        Err(e) => {
            tracing::error!("Failed to launch the game: {}", e);
            println_pad!(
                "{} {}",
                "❌ Failed to launch the game:".bright_red().bold(),
                e.to_string().bright_red()
            );
        }
    }

    Ok(())
}
