//! Opening files with the host's default application.
use crate::common::{Error, Result};
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Something that can show a file to the user.
pub trait FileOpener {
    /// Open `path`.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when the file does not exist and [`Error::Open`]
    /// when it could not be handed to an application.
    fn open(&self, path: &Path) -> Result<()>;
}

/// Opens files with `explorer` on Windows, `open` on macOS and `xdg-open`
/// elsewhere.
///
/// The launcher is waited for; it hands the file over and exits right away.
/// The path goes to it as a plain argument, never through a shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl SystemOpener {
    /// The launcher invocation for `path` on this platform.
    pub fn command(path: &Path) -> Command {
        #[cfg(target_os = "windows")]
        {
            let mut command = Command::new("explorer");
            command.arg(path);
            command
        }

        #[cfg(target_os = "macos")]
        {
            let mut command = Command::new("open");
            command.arg(path);
            command
        }

        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            let mut command = Command::new("xdg-open");
            command.arg(path);
            command
        }
    }
}

impl FileOpener for SystemOpener {
    fn open(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        let mut command = Self::command(path);
        tracing::debug!(command = ?command, "opening file");
        let status = command.status().map_err(|e| Error::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        launcher_result(path, status)
    }
}

/// Turn the launcher's exit status into the open result.
///
/// `explorer` exits with 1 even when it opened the file, so its status is
/// not checked.
fn launcher_result(path: &Path, status: ExitStatus) -> Result<()> {
    if status.success() || cfg!(target_os = "windows") {
        return Ok(());
    }
    Err(Error::Open {
        path: path.to_path_buf(),
        reason: format!("launcher exited with {}", status),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_not_launched() {
        let dir = tempfile::tempdir().unwrap();
        let err = SystemOpener.open(&dir.path().join("OS_001-2024_ABC1234.docx")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_command_targets_the_file() {
        let path = Path::new("OS_Geradas/grafico_os.svg");
        let command = SystemOpener::command(path);
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args.last().copied(), Some(path.as_os_str()));

        let program = command.get_program().to_string_lossy().into_owned();
        if cfg!(target_os = "windows") {
            assert_eq!(program, "explorer");
            assert_eq!(args.len(), 1);
        } else if cfg!(target_os = "macos") {
            assert_eq!(program, "open");
        } else {
            assert_eq!(program, "xdg-open");
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_launcher_is_reported() {
        use std::os::unix::process::ExitStatusExt;

        let path = Path::new("OS_Geradas/OS_001-2024_ABC&1234.docx");
        assert!(launcher_result(path, ExitStatus::from_raw(0)).is_ok());

        // Exit code 3, as xdg-open reports a missing handler
        let err = launcher_result(path, ExitStatus::from_raw(3 << 8)).unwrap_err();
        assert!(matches!(err, Error::Open { path: p, .. } if p == path));
    }
}
