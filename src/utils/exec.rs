//! Child processes for command hooks.
//!
//! ```ignore
//! let output = Cmd::from_slice(&["./minify.sh", "--css"])
//!     .cwd(module_dir)
//!     .envs(&vars)
//!     .stdin(data)
//!     .run()?;
//! ```

use std::{
    ffi::OsString,
    io::{self, Write},
    path::PathBuf,
    process::{Command, Output, Stdio},
    thread,
};

/// One hook invocation: program, arguments, directory, environment, input.
#[derive(Debug, Default)]
pub struct Cmd {
    argv: Vec<OsString>,
    cwd: Option<PathBuf>,
    envs: Vec<(String, String)>,
    input: Option<Vec<u8>>,
}

impl Cmd {
    /// `argv[0]` is the program; an empty slice fails at [`Cmd::run`].
    pub fn from_slice<S: Into<OsString> + Clone>(argv: &[S]) -> Self {
        Self {
            argv: argv.iter().cloned().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn envs<'a>(mut self, vars: impl IntoIterator<Item = &'a (String, String)>) -> Self {
        self.envs.extend(vars.into_iter().cloned());
        self
    }

    /// Bytes written to the child's stdin. Without input, stdin is closed.
    pub fn stdin(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.input = Some(data.into());
        self
    }

    /// Program as written in the hook file.
    pub fn program_name(&self) -> String {
        self.argv
            .first()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Spawn, feed stdin, wait, and capture both output streams.
    ///
    /// The exit status is left to the caller.
    pub fn run(self) -> io::Result<Output> {
        let Some((program, args)) = self.argv.split_first() else {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty command"));
        };

        let mut command = Command::new(program);
        command
            .args(args)
            .envs(self.envs.iter().map(|(k, v)| (k, v)))
            .stdin(if self.input.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.cwd {
            command.current_dir(dir);
        }

        let mut child = command.spawn()?;

        // Written from a separate thread: the child may fill stdout before reading stdin.
        let feeder = self
            .input
            .zip(child.stdin.take())
            .map(|(data, mut stdin)| thread::spawn(move || stdin.write_all(&data)));

        let output = child.wait_with_output()?;

        // Hooks are free to exit without reading their input.
        if let Some(Ok(Err(e))) = feeder.map(thread::JoinHandle::join)
            && e.kind() != io::ErrorKind::BrokenPipe
        {
            return Err(e);
        }

        Ok(output)
    }
}
