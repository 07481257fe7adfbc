//! Shared `PATH` executable lookup, used by the executor (to find external
//! programs) and the `type` builtin (to report where a name resolves).

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use crate::config::ShellConfig;

/// Resolve `name` to an executable path by searching `config`'s `PATH`
/// directories in order. A `name` containing a `/` is treated as a direct
/// path, mirroring the original implementation's `exec.LookPath` semantics.
pub fn lookup(config: &ShellConfig, name: &str) -> Option<PathBuf> {
    if name.contains('/') {
        return is_executable_file(name.as_ref()).then(|| PathBuf::from(name));
    }
    for dir in config.path_dirs() {
        let candidate = PathBuf::from(dir).join(name);
        if is_executable_file(&candidate) {
            return Some(candidate);
        }
    }
    None
}

fn is_executable_file(path: &std::path::Path) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_executable_in_path_dir() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("mytool");
        std::fs::write(&exe, "#!/bin/sh\n").unwrap();
        let mut perms = std::fs::metadata(&exe).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&exe, perms).unwrap();

        let config = ShellConfig {
            path: dir.path().display().to_string(),
            histfile: None,
            home: None,
        };
        assert_eq!(lookup(&config, "mytool"), Some(exe));
    }

    #[test]
    fn non_executable_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data.txt"), "hi").unwrap();
        let config = ShellConfig { path: dir.path().display().to_string(), histfile: None, home: None };
        assert_eq!(lookup(&config, "data.txt"), None);
    }

    #[test]
    fn missing_name_is_not_found() {
        let config = ShellConfig { path: "/nonexistent-dir-xyz".to_string(), histfile: None, home: None };
        assert_eq!(lookup(&config, "nope"), None);
    }
}
