// src/probe/procfs.rs

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::trace;

use super::HandleProbe;
use crate::types::ProbeMode;

const O_ACCMODE: u32 = 0o3;
const O_WRONLY: u32 = 0o1;
const O_RDWR: u32 = 0o2;

/// Failure to inspect a single process. Always swallowed by the probe: the
/// process is treated as not holding the file.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("cannot list descriptors of pid {pid}: {source}")]
    Descriptors {
        pid: u32,
        #[source]
        source: io::Error,
    },
}

/// Linux `/proc` based probe.
#[derive(Debug, Clone)]
pub struct ProcHandleProbe {
    proc_root: PathBuf,
    mode: ProbeMode,
}

impl ProcHandleProbe {
    pub fn new(mode: ProbeMode) -> Self {
        Self::with_proc_root("/proc", mode)
    }

    /// Use an alternative process table root (tests).
    pub fn with_proc_root(proc_root: impl Into<PathBuf>, mode: ProbeMode) -> Self {
        Self {
            proc_root: proc_root.into(),
            mode,
        }
    }

    /// Whether process `pid` (rooted at `proc_dir`) holds `target` open.
    fn process_holds(&self, pid: u32, proc_dir: &Path, target: &Path) -> Result<bool, ProbeError> {
        let fd_dir = proc_dir.join("fd");
        let entries =
            fs::read_dir(&fd_dir).map_err(|source| ProbeError::Descriptors { pid, source })?;

        for entry in entries.flatten() {
            // The descriptor may have been closed since the listing.
            let Ok(link) = fs::read_link(entry.path()) else {
                continue;
            };
            if link != target {
                continue;
            }
            if self.mode == ProbeMode::WritersOnly
                && !fd_is_writable(proc_dir, &entry.file_name())
            {
                continue;
            }
            return Ok(true);
        }

        Ok(false)
    }
}

impl HandleProbe for ProcHandleProbe {
    fn is_open_for_write(&self, path: &Path) -> bool {
        // fd links always point at the resolved path.
        let target = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let procs = match fs::read_dir(&self.proc_root) {
            Ok(p) => p,
            Err(err) => {
                trace!(root = ?self.proc_root, error = %err, "cannot list processes");
                return false;
            }
        };

        for entry in procs.flatten() {
            let Some(pid) = entry.file_name().to_str().and_then(|s| s.parse::<u32>().ok()) else {
                continue;
            };

            match self.process_holds(pid, &entry.path(), &target) {
                Ok(true) => {
                    trace!(pid, path = ?target, "file held open");
                    return true;
                }
                Ok(false) => {}
                Err(err) => {
                    trace!(error = %err, "skipping process");
                }
            }
        }

        false
    }
}

/// Read `fdinfo/<fd>` and report whether the descriptor was opened with
/// write access. Unreadable info counts as not writable.
fn fd_is_writable(proc_dir: &Path, fd: &OsStr) -> bool {
    let Ok(info) = fs::read_to_string(proc_dir.join("fdinfo").join(fd)) else {
        return false;
    };
    parse_fdinfo_flags(&info)
        .map(|flags| matches!(flags & O_ACCMODE, O_WRONLY | O_RDWR))
        .unwrap_or(false)
}

/// Extract the octal `flags:` field from an fdinfo blob.
fn parse_fdinfo_flags(info: &str) -> Option<u32> {
    info.lines()
        .find_map(|line| line.strip_prefix("flags:"))
        .and_then(|v| u32::from_str_radix(v.trim(), 8).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_octal_flags() {
        let info = "pos:\t0\nflags:\t0100001\nmnt_id:\t29\n";
        assert_eq!(parse_fdinfo_flags(info), Some(0o100001));
        assert_eq!(parse_fdinfo_flags("pos:\t0\n"), None);
    }

    #[test]
    fn missing_proc_root_means_not_open() {
        let probe = ProcHandleProbe::with_proc_root("/definitely/not/here", ProbeMode::AnyHandle);
        assert!(!probe.is_open_for_write(Path::new("/tmp/x.dat")));
    }

    #[cfg(unix)]
    mod fake_proc {
        use std::os::unix::fs::symlink;

        use tempfile::TempDir;

        use super::*;

        /// Lay out `<root>/<pid>/fd/<fd>` -> `target` and its fdinfo.
        fn add_fd(root: &Path, pid: u32, fd: u32, target: &Path, flags: &str) {
            let proc_dir = root.join(pid.to_string());
            fs::create_dir_all(proc_dir.join("fd")).unwrap();
            fs::create_dir_all(proc_dir.join("fdinfo")).unwrap();
            symlink(target, proc_dir.join("fd").join(fd.to_string())).unwrap();
            fs::write(
                proc_dir.join("fdinfo").join(fd.to_string()),
                format!("pos:\t0\nflags:\t{flags}\n"),
            )
            .unwrap();
        }

        #[test]
        fn finds_process_holding_file() {
            let data = TempDir::new().unwrap();
            let file = data.path().join("report.dat");
            fs::write(&file, b"x").unwrap();
            let file = file.canonicalize().unwrap();

            let proc_root = TempDir::new().unwrap();
            add_fd(proc_root.path(), 42, 3, &file, "0100001");
            fs::create_dir_all(proc_root.path().join("self")).unwrap();

            let probe = ProcHandleProbe::with_proc_root(proc_root.path(), ProbeMode::AnyHandle);
            assert!(probe.is_open_for_write(&file));
            assert!(!probe.is_open_for_write(&data.path().join("other.dat")));
        }

        #[test]
        fn unreadable_process_is_skipped() {
            let data = TempDir::new().unwrap();
            let file = data.path().join("a.dat");
            fs::write(&file, b"x").unwrap();
            let file = file.canonicalize().unwrap();

            let proc_root = TempDir::new().unwrap();
            // pid 7 has no fd directory, as if it exited mid-scan.
            fs::create_dir_all(proc_root.path().join("7")).unwrap();
            add_fd(proc_root.path(), 8, 4, &file, "0100000");

            let probe = ProcHandleProbe::with_proc_root(proc_root.path(), ProbeMode::AnyHandle);
            assert!(probe.is_open_for_write(&file));
        }

        #[test]
        fn writers_only_ignores_readers() {
            let data = TempDir::new().unwrap();
            let file = data.path().join("b.dat");
            fs::write(&file, b"x").unwrap();
            let file = file.canonicalize().unwrap();

            let proc_root = TempDir::new().unwrap();
            add_fd(proc_root.path(), 10, 3, &file, "0100000");

            let any = ProcHandleProbe::with_proc_root(proc_root.path(), ProbeMode::AnyHandle);
            let writers = ProcHandleProbe::with_proc_root(proc_root.path(), ProbeMode::WritersOnly);
            assert!(any.is_open_for_write(&file));
            assert!(!writers.is_open_for_write(&file));

            add_fd(proc_root.path(), 11, 5, &file, "0100002");
            assert!(writers.is_open_for_write(&file));
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn real_proc_sees_our_own_open_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("held.dat");
        let file = fs::File::create(&path).unwrap();

        let probe = ProcHandleProbe::new(ProbeMode::WritersOnly);
        assert!(probe.is_open_for_write(&path));

        drop(file);
        assert!(!probe.is_open_for_write(&path));
    }
}
