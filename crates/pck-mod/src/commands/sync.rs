use crate::errors::CliError;
use crate::println_pad;
use crate::utils::config::{load_config, resolve_root};
use crate::utils::print_ansi_boxed_lines;
use colored::Colorize;
use pck_mod_core::{run_dev_sync, GdreTools};

pub struct SyncDevModArgs {
    pub root: Option<String>,
}

pub fn sync_dev_mod(args: SyncDevModArgs) -> Result<(), CliError> {
    let root = resolve_root(args.root)?;
    let config = load_config(&root)?;
    let patcher = GdreTools::new(&config.tool_executable);

    println_pad!(
        "{} {}",
        "🔍 Syncing dev-mod from:".bright_blue().bold(),
        config.baseline_root.as_str().bright_cyan().bold()
    );

    let outcome = run_dev_sync(&config, &patcher)?;

    if outcome.extracted {
        println_pad!(
            "{} {}",
            "📦 Extracted base archive:".bright_yellow(),
            config.base_archive.as_str().bright_white()
        );
    }

    print_ansi_boxed_lines(&[
        format!(
            "{} {}",
            "Copied:".bright_green(),
            outcome.report.copied.to_string().bright_white().bold()
        ),
        format!(
            "{} {}",
            "Removed:".bright_red(),
            outcome.report.removed.to_string().bright_white().bold()
        ),
        format!(
            "{} {}",
            "Pruned directories:".dimmed(),
            outcome.report.pruned_dirs.to_string().bright_white()
        ),
    ]);

    println_pad!(
        "{} {}",
        "✅ Dev-mod update complete:".bright_green().bold(),
        config.overlay_root.as_str().bright_white().bold()
    );

    Ok(())
}
