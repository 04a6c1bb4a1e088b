use camino::Utf8PathBuf;
use miette::Diagnostic;
use pck_mod_core::Error as CoreError;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("Configuration file error: {path}")]
    #[diagnostic(
        code(config::parse_error),
        help("Check pck-mod.toml for syntax errors or unknown value types")
    )]
    ConfigParseError {
        path: Utf8PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Root directory is not usable: {path}")]
    #[diagnostic(
        code(config::invalid_root),
        help("Pass an existing directory with --root, or run from the game folder")
    )]
    InvalidRoot { path: String },

    #[error("Baseline checksum file is malformed: {path} ({message})")]
    #[diagnostic(
        code(baseline::parse_error),
        help("Delete {path} to have it regenerated from the current game files on the next run")
    )]
    BaselineParseError { path: Utf8PathBuf, message: String },

    #[error("No patch files found, nothing to do")]
    #[diagnostic(
        code(merge::nothing_to_patch),
        help("Put mod folders or .zip mods into {mods_root}")
    )]
    NothingToPatch { mods_root: Utf8PathBuf },

    #[error("{program} failed")]
    #[diagnostic(
        code(tool::failed),
        help("Check the tool output above for details")
    )]
    ToolFailed {
        program: String,
        #[source]
        source: CoreError,
    },

    #[error("Could not start {program}")]
    #[diagnostic(
        code(tool::spawn_failed),
        help("Make sure the executable exists and is configured correctly in pck-mod.toml")
    )]
    ToolNotStarted {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Mod archive could not be read")]
    #[diagnostic(
        code(merge::bad_archive),
        help("Re-download the mod or unpack it into a folder inside the mods directory")
    )]
    ArchiveError {
        #[source]
        source: CoreError,
    },

    #[error("IO operation failed")]
    #[diagnostic(code(io::operation_failed))]
    IoError {
        #[source]
        source: CoreError,
    },
}

impl CliError {
    pub fn nothing_to_patch(mods_root: Utf8PathBuf) -> Self {
        Self::NothingToPatch { mods_root }
    }

    pub fn invalid_root(path: impl Into<String>) -> Self {
        Self::InvalidRoot { path: path.into() }
    }
}

/// Map core errors to user-facing diagnostics.
impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::BaselineParse { path, message } => {
                CliError::BaselineParseError { path, message }
            }
            CoreError::Subprocess { ref program, .. } => CliError::ToolFailed {
                program: program.clone(),
                source: err,
            },
            CoreError::Spawn { program, source } => CliError::ToolNotStarted { program, source },
            CoreError::Zip(_) => CliError::ArchiveError { source: err },
            other => CliError::IoError { source: other },
        }
    }
}
