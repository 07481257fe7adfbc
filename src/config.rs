//! Environment-driven shell configuration.
//!
//! The shell takes no command-line arguments; everything it needs to know
//! at startup comes from the environment (§6 of the design: `PATH`,
//! `HISTFILE`, `HOME`).

use std::path::PathBuf;

/// Startup configuration read once from the environment.
#[derive(Debug, Clone, Default)]
pub struct ShellConfig {
    /// Colon-separated search path for external executables.
    pub path: String,
    /// Path to persist history to, if `HISTFILE` was set and non-empty.
    pub histfile: Option<PathBuf>,
    /// Home directory, used to expand a leading `~` in `cd`.
    pub home: Option<PathBuf>,
}

impl ShellConfig {
    /// Build a config snapshot from the current process environment.
    pub fn from_env() -> Self {
        let path = std::env::var("PATH").unwrap_or_default();
        let histfile = std::env::var("HISTFILE")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        let home = std::env::var("HOME").ok().map(PathBuf::from);
        Self { path, histfile, home }
    }

    /// The `PATH` directories, in search order, skipping empty entries.
    pub fn path_dirs(&self) -> impl Iterator<Item = &str> {
        self.path.split(':').filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_dirs_skips_empty_segments() {
        let cfg = ShellConfig {
            path: "/usr/bin::/bin:".to_string(),
            histfile: None,
            home: None,
        };
        assert_eq!(cfg.path_dirs().collect::<Vec<_>>(), vec!["/usr/bin", "/bin"]);
    }

    #[test]
    fn histfile_empty_string_is_none() {
        std::env::set_var("HISTFILE", "");
        std::env::set_var("PATH", "/bin");
        std::env::remove_var("HOME");
        let cfg = ShellConfig::from_env();
        assert!(cfg.histfile.is_none());
        std::env::remove_var("HISTFILE");
    }
}
