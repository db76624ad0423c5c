//! Command execution shared by all pipeline steps.

use crate::detection::PrivilegeMode;
use crate::shell::{CommandResult, Invocation};
use crate::system::System;

/// Runs invocations against a [`System`] with the run's privilege mode and
/// output policy applied.
pub struct Executor<'a> {
    system: &'a mut dyn System,
    privilege: PrivilegeMode,
    stream: bool,
}

impl<'a> Executor<'a> {
    /// Create an executor. With `stream` set, command output goes straight
    /// to the terminal instead of being captured.
    pub fn new(system: &'a mut dyn System, privilege: PrivilegeMode, stream: bool) -> Self {
        Self {
            system,
            privilege,
            stream,
        }
    }

    /// Borrow the underlying host.
    pub fn system(&self) -> &dyn System {
        &*self.system
    }

    /// Mutably borrow the underlying host.
    pub fn system_mut(&mut self) -> &mut dyn System {
        &mut *self.system
    }

    /// Run a command as the current user.
    pub fn run(&mut self, invocation: Invocation) -> CommandResult {
        let invocation = self.apply_output_policy(invocation);
        self.system.run(&invocation)
    }

    /// Run a command through the elevation helper when one is in use.
    pub fn run_privileged(&mut self, invocation: Invocation) -> CommandResult {
        let invocation = self.privilege.elevate(self.apply_output_policy(invocation));
        self.system.run(&invocation)
    }

    /// Run a command and always capture its output.
    pub fn query(&mut self, invocation: Invocation) -> CommandResult {
        self.system.run(&invocation.captured())
    }

    fn apply_output_policy(&self, invocation: Invocation) -> Invocation {
        if self.stream {
            invocation
        } else {
            invocation.captured()
        }
    }
}
