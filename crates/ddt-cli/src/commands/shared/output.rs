use crate::cli::GlobalFlags;

/// Informational message on stderr, suppressed by `--quiet`.
pub fn notice(flags: &GlobalFlags, message: &str) {
    if !flags.quiet {
        eprintln!("{message}");
    }
}
