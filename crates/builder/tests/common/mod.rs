//! Scripted process runner for pipeline tests
//!
//! Records every command and reproduces the filesystem side effects of
//! `venv`, `pip` and the packager so the pipeline can run end to end
//! without Python installed.

#![allow(dead_code)]

use async_trait::async_trait;
use pyfreeze_errors::PlatformError;
use pyfreeze_events::{AppEvent, EventReceiver};
use pyfreeze_platform::{
    profile_for, CommandOutput, Platform, PlatformCommand, PlatformContext, PlatformKind,
    ProcessOperations,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeState {
    commands: Vec<PlatformCommand>,
    failures: HashMap<String, (i32, String)>,
    python_versions: Vec<String>,
    skip_interpreter: bool,
}

#[derive(Clone)]
pub struct FakeProcess {
    kind: PlatformKind,
    state: Arc<Mutex<FakeState>>,
}

impl FakeProcess {
    pub fn new(kind: PlatformKind) -> Self {
        let state = FakeState {
            python_versions: vec!["python3.11".to_string()],
            ..FakeState::default()
        };
        Self {
            kind,
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn posix() -> Self {
        Self::new(PlatformKind::Posix)
    }

    /// Make the command running `-m <module>` exit with `code`
    pub fn fail(self, module: &str, code: i32, stderr: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(module.to_string(), (code, stderr.to_string()));
        self
    }

    /// Interpreter directories `venv` creates under `<env>/lib`
    pub fn with_python_versions(self, versions: &[&str]) -> Self {
        self.state.lock().unwrap().python_versions =
            versions.iter().map(ToString::to_string).collect();
        self
    }

    /// `venv` succeeds but leaves no interpreter behind
    pub fn without_interpreter(self) -> Self {
        self.state.lock().unwrap().skip_interpreter = true;
        self
    }

    pub fn platform(&self) -> Platform {
        Platform::with_process(profile_for(self.kind), Box::new(self.clone()))
    }

    pub fn commands(&self) -> Vec<PlatformCommand> {
        self.state.lock().unwrap().commands.clone()
    }

    /// Commands that ran `-m <module>`
    pub fn module_commands(&self, module: &str) -> Vec<PlatformCommand> {
        self.commands()
            .into_iter()
            .filter(|cmd| module_of(cmd).as_deref() == Some(module))
            .collect()
    }

    fn create_venv(&self, state: &FakeState, dir: &Path) {
        std::fs::create_dir_all(dir).unwrap();
        match self.kind {
            PlatformKind::Posix => {
                std::fs::create_dir_all(dir.join("bin")).unwrap();
                if !state.skip_interpreter {
                    std::fs::write(dir.join("bin/python"), b"").unwrap();
                }
                std::fs::create_dir_all(dir.join("lib")).unwrap();
                for version in &state.python_versions {
                    std::fs::create_dir_all(dir.join("lib").join(version).join("site-packages/itk"))
                        .unwrap();
                }
            }
            PlatformKind::Windows => {
                std::fs::create_dir_all(dir.join("Scripts")).unwrap();
                if !state.skip_interpreter {
                    std::fs::write(dir.join("Scripts").join("python.exe"), b"").unwrap();
                }
                std::fs::create_dir_all(dir.join("Lib").join("site-packages").join("itk"))
                    .unwrap();
            }
        }
    }

    fn run_packager(&self, cmd: &PlatformCommand) {
        let workdir = cmd.get_current_dir().cloned().unwrap_or_default();
        let args = cmd.get_args();
        let value_of = |flag: &str| {
            args.iter()
                .position(|arg| arg == flag)
                .and_then(|i| args.get(i + 1))
                .cloned()
        };
        let name = value_of("--name").unwrap();
        let dist = workdir.join(value_of("--distpath").unwrap_or_else(|| "dist".to_string()));
        let work = workdir.join(value_of("--workpath").unwrap_or_else(|| "build".to_string()));
        let onefile = args.iter().any(|arg| arg == "--onefile");
        let exe = profile_for(self.kind).executable_file_name(&name);

        std::fs::create_dir_all(work.join(&name)).unwrap();
        std::fs::write(workdir.join(format!("{name}.spec")), b"# spec").unwrap();

        std::fs::create_dir_all(&dist).unwrap();
        if onefile {
            std::fs::write(dist.join(exe), b"binary").unwrap();
        } else {
            std::fs::create_dir_all(dist.join(&name)).unwrap();
            std::fs::write(dist.join(&name).join(exe), b"binary").unwrap();
        }
    }
}

/// Module run with `-m`, if any
pub fn module_of(cmd: &PlatformCommand) -> Option<String> {
    let args = cmd.get_args();
    args.iter()
        .position(|arg| arg == "-m")
        .and_then(|i| args.get(i + 1))
        .cloned()
}

#[async_trait]
impl ProcessOperations for FakeProcess {
    async fn execute_command(
        &self,
        _ctx: &PlatformContext,
        cmd: PlatformCommand,
    ) -> Result<CommandOutput, PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.commands.push(cmd.clone());

        let module = module_of(&cmd).unwrap_or_default();
        if let Some((code, stderr)) = state.failures.get(&module) {
            return Ok(CommandOutput::failure(*code, stderr.clone()));
        }

        match module.as_str() {
            "venv" => {
                let dir = PathBuf::from(cmd.get_args().last().unwrap());
                self.create_venv(&state, &dir);
            }
            "PyInstaller" => self.run_packager(&cmd),
            _ => {}
        }

        Ok(CommandOutput::success_with("ok"))
    }
}

/// Working directory with a requirements manifest
pub fn project_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("requirements.txt"), "numpy\n").unwrap();
    dir
}

pub fn drain(rx: &mut EventReceiver) -> Vec<AppEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// `true` if `flag` is immediately followed by `value`
pub fn has_pair(args: &[String], flag: &str, value: &str) -> bool {
    args.windows(2).any(|w| w[0] == flag && w[1] == value)
}
