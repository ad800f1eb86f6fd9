//! Execution of a plan.

use command::Invocation;
use error::{ErrorKind, Result, ResultExt};
use pipeline::{State, Step};
use utils::CommandExt;

use std::fs::File;
use std::process::Stdio;

/// Something that can execute an [`Invocation`] to completion.
///
/// [`Invocation`]: ../command/struct.Invocation.html
pub trait Runner {
    /// Executes the invocation and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardFailed`] when the process exits unsuccessfully.
    ///
    /// [`ForwardFailed`]: ../error/enum.ErrorKind.html#variant.ForwardFailed
    fn run(&mut self, invocation: &Invocation) -> Result<()>;
}

impl<'a, R: Runner + ?Sized> Runner for &'a mut R {
    fn run(&mut self, invocation: &Invocation) -> Result<()> {
        (**self).run(invocation)
    }
}

/// Spawns real processes. Standard input and standard error are inherited, so the tools' own diagnostics reach the
/// user unmodified.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<()> {
        let mut cmd = invocation.to_command();
        if let Some(ref path) = invocation.stdout {
            trace!("redirecting stdout to {}", path.display());
            let file = File::create(path).chain_err(|| format!("cannot create `{}`", path.display()))?;
            cmd.stdout(Stdio::from(file));
        }
        debug!("Executing {:?}", cmd);
        cmd.ensure_success(&invocation.program_name())
    }
}

/// Walks through a plan, stopping at the first failing step.
///
/// No step is retried, and artifacts written by a failing step are left as they are.
#[derive(Debug)]
pub struct Orchestrator<R> {
    runner: R,
    state: State,
}

impl<R: Runner> Orchestrator<R> {
    pub fn new(runner: R) -> Orchestrator<R> {
        Orchestrator {
            runner,
            state: State::Idle,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Executes the steps in order.
    ///
    /// The state advances to a phase's completed state only after the last step of that phase succeeds. On error
    /// the state becomes [`State::Failed`] and the error of the failing step is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseOutOfOrder`] without running anything further if a step's phase is not the one the current
    /// state expects. This includes running again after a terminal state was reached. The state is left unchanged.
    ///
    /// [`State::Failed`]: ../pipeline/enum.State.html#variant.Failed
    /// [`PhaseOutOfOrder`]: ../error/enum.ErrorKind.html#variant.PhaseOutOfOrder
    pub fn run(&mut self, steps: &[Step]) -> Result<()> {
        for (i, step) in steps.iter().enumerate() {
            ensure!(self.state.next_phase() == Some(step.phase), ErrorKind::PhaseOutOfOrder(step.phase, self.state));
            if let Err(e) = self.runner.run(&step.invocation) {
                self.state = State::Failed(step.phase);
                debug!("state = {:?}", self.state);
                return Err(e);
            }
            let phase_done = steps.get(i + 1).map_or(true, |next| next.phase != step.phase);
            if phase_done {
                self.state = step.phase.completed();
                debug!("state = {:?}", self.state);
            }
        }
        Ok(())
    }
}
