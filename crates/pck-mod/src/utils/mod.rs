use regex::Regex;

pub mod config;

#[macro_export]
macro_rules! println_pad {
    ($($arg:tt)*) => {{
        let __s = format!($($arg)*);
        for __line in __s.lines() {
            println!("    {}", __line);
        }
    }};
}

/// Install the stderr tracing subscriber.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pck_mod=info,pck_mod_core=info".into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn visible_len(ansi: &Regex, s: &str) -> usize {
    ansi.replace_all(s, "").chars().count()
}

/// Renders the provided lines inside an ASCII box, ignoring ANSI color codes when measuring.
pub fn ansi_boxed_lines(lines: &[String]) -> Vec<String> {
    let ansi = Regex::new("\x1b\\[[0-9;]*m").expect("static regex");

    let width = lines
        .iter()
        .map(|s| visible_len(&ansi, s))
        .max()
        .unwrap_or(0);

    let border = "-".repeat(width + 4);
    let mut boxed = Vec::with_capacity(lines.len() + 2);
    boxed.push(border.clone());
    for line in lines {
        let pad = width - visible_len(&ansi, line);
        boxed.push(format!("| {}{} |", line, " ".repeat(pad)));
    }
    boxed.push(border);
    boxed
}

/// Prints the provided lines inside an ASCII box
pub fn print_ansi_boxed_lines(lines: &[String]) {
    for line in ansi_boxed_lines(lines) {
        println_pad!("{}", line);
    }
}
