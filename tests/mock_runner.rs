#![allow(dead_code)]

use ink_keypad::common::command::{CommandOutput, CommandRunner};
use ink_keypad::dispatcher::KeyInjector;
use ink_keypad::error::{InjectError, ToolError};
use ink_keypad::keys::KeyToken;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// Scripted stand-in for the X11 helpers. Commands are matched on their
/// full command line; unscripted commands succeed with empty output.
#[derive(Clone, Default)]
pub struct MockRunner {
    calls: Arc<Mutex<Vec<String>>>,
    responses: Arc<Mutex<HashMap<String, CommandOutput>>>,
    queued: Arc<Mutex<HashMap<String, VecDeque<CommandOutput>>>>,
    missing: Arc<Mutex<HashSet<String>>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, command: &str, stdout: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .insert(command.to_string(), CommandOutput::ok(stdout));
        self
    }

    /// Answer the next call of `command` with `stdout`, before falling back
    /// to its regular response.
    pub fn respond_once(&self, command: &str, stdout: &str) -> &Self {
        self.queued
            .lock()
            .unwrap()
            .entry(command.to_string())
            .or_default()
            .push_back(CommandOutput::ok(stdout));
        self
    }

    /// Make `command` exit with a failure status.
    pub fn fail(&self, command: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .insert(command.to_string(), CommandOutput::failed());
        self
    }

    /// Make every invocation of `tool` fail to spawn.
    pub fn uninstall(&self, tool: &str) -> &Self {
        self.missing.lock().unwrap().insert(tool.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, ToolError> {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().unwrap().push(line.clone());
        if self.missing.lock().unwrap().contains(program) {
            return Err(ToolError::missing(program));
        }
        if let Some(out) = self
            .queued
            .lock()
            .unwrap()
            .get_mut(&line)
            .and_then(VecDeque::pop_front)
        {
            return Ok(out);
        }
        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(&line)
            .cloned()
            .unwrap_or_else(|| CommandOutput::ok("")))
    }
}

/// Records the key sequences handed to the fallback path.
#[derive(Clone, Default)]
pub struct RecordingInjector {
    pub sent: Arc<Mutex<Vec<Vec<String>>>>,
    pub broken: bool,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Vec<String>> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, keys: &[KeyToken]) -> Result<(), InjectError> {
        if self.broken {
            return Err(InjectError::Simulate("no display".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push(keys.iter().map(|k| k.xdotool_name().to_string()).collect());
        Ok(())
    }
}

impl KeyInjector for RecordingInjector {
    fn press(&self, key: &KeyToken) -> Result<(), InjectError> {
        self.record(std::slice::from_ref(key))
    }

    fn hotkey(&self, keys: &[KeyToken]) -> Result<(), InjectError> {
        self.record(keys)
    }
}
