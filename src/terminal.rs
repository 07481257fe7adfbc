//! Terminal raw-mode driver (§4.8).
//!
//! Puts a file descriptor into raw mode by clearing the input flags that
//! translate carriage returns and the local flags that enable echo and
//! line-canonical processing, then sets `VMIN`/`VTIME` for byte-at-a-time
//! reads. `enable_raw_mode` returns an opaque prior-state handle;
//! `RawModeGuard::restore` (or its `Drop` impl) reverses the change.

use std::os::unix::io::RawFd;

use crate::error::ShellError;

/// The terminal's prior `termios` state, captured so it can be restored.
pub struct RawModeGuard {
    fd: RawFd,
    original: libc::termios,
    restored: bool,
}

/// Enter raw mode on `fd`, returning a guard that restores the original
/// settings on `restore()` or on drop.
pub fn enable_raw_mode(fd: RawFd) -> Result<RawModeGuard, ShellError> {
    let original = get_termios(fd)?;
    let mut raw = original;

    // Local flags: no line buffering (ICANON), no local echo (ECHO).
    raw.c_lflag &= !(libc::ICANON | libc::ECHO);
    // Input flags: no software flow control (IXON), no CR-to-NL translation
    // (ICRNL) — the shell reads '\r' literally and translates it itself.
    raw.c_iflag &= !(libc::IXON | libc::ICRNL);

    raw.c_cc[libc::VMIN] = 1;
    raw.c_cc[libc::VTIME] = 0;

    set_termios(fd, &raw)?;

    Ok(RawModeGuard { fd, original, restored: false })
}

impl RawModeGuard {
    /// Reverse the raw-mode change. Safe to call more than once; only the
    /// first call has an effect. Must be called on every exit path,
    /// including from a signal handler (§4.8, §5).
    pub fn restore(&mut self) {
        if self.restored {
            return;
        }
        // Best-effort: there is nothing sensible to do if this fails,
        // especially from a signal handler.
        let _ = set_termios(self.fd, &self.original);
        self.restored = true;
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        self.restore();
    }
}

fn get_termios(fd: RawFd) -> Result<libc::termios, ShellError> {
    let mut term = std::mem::MaybeUninit::<libc::termios>::uninit();
    let rc = unsafe { libc::tcgetattr(fd, term.as_mut_ptr()) };
    if rc != 0 {
        return Err(ShellError::Terminal(std::io::Error::last_os_error()));
    }
    Ok(unsafe { term.assume_init() })
}

fn set_termios(fd: RawFd, term: &libc::termios) -> Result<(), ShellError> {
    let rc = unsafe { libc::tcsetattr(fd, libc::TCSANOW, term) };
    if rc != 0 {
        return Err(ShellError::Terminal(std::io::Error::last_os_error()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::fd::FromRawFd;
    use std::os::unix::io::AsRawFd;

    #[test]
    fn raw_mode_round_trips_on_a_pty() {
        // Use a pseudo-terminal rather than the test harness's own stdin,
        // which usually isn't a tty at all under `cargo test`.
        let fd = unsafe { libc::posix_openpt(libc::O_RDWR) };
        assert!(fd >= 0, "posix_openpt failed; no pty available in this sandbox");
        unsafe {
            assert_eq!(libc::grantpt(fd), 0);
            assert_eq!(libc::unlockpt(fd), 0);
        }
        let file = unsafe { std::fs::File::from(std::os::unix::io::OwnedFd::from_raw_fd(fd)) };
        let before = get_termios(file.as_raw_fd()).unwrap();

        let mut guard = enable_raw_mode(file.as_raw_fd()).unwrap();
        let raw = get_termios(file.as_raw_fd()).unwrap();
        assert_eq!(raw.c_lflag & libc::ECHO, 0);
        assert_eq!(raw.c_lflag & libc::ICANON, 0);

        guard.restore();
        let restored = get_termios(file.as_raw_fd()).unwrap();
        assert_eq!(restored.c_lflag, before.c_lflag);
        assert_eq!(restored.c_iflag, before.c_iflag);
    }
}
