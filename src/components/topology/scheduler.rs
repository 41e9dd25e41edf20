//! Bounded, cancellable tick budget driven by the host's frame loop.
//!
//! The task never schedules anything itself. The frame callback asks
//! [`TickTask::next_tick`] whether to do work this frame, which keeps the
//! relaxation steppable from tests without any timer.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskState {
	Idle,
	Running,
	Finished,
	Cancelled,
}

#[derive(Clone, Debug)]
pub struct TickTask {
	max_ticks: u32,
	ticks: u32,
	state: TaskState,
}

impl TickTask {
	pub fn new(max_ticks: u32) -> Self {
		Self {
			max_ticks,
			ticks: 0,
			state: TaskState::Idle,
		}
	}

	/// Restart from tick zero.
	pub fn start(&mut self) {
		self.ticks = 0;
		self.state = if self.max_ticks == 0 {
			TaskState::Finished
		} else {
			TaskState::Running
		};
	}

	pub fn cancel(&mut self) {
		if self.state == TaskState::Running {
			self.state = TaskState::Cancelled;
		}
	}

	pub fn is_running(&self) -> bool {
		self.state == TaskState::Running
	}

	#[cfg(test)]
	pub fn state(&self) -> TaskState {
		self.state
	}

	pub fn ticks(&self) -> u32 {
		self.ticks
	}

	/// Claim the next tick index, or `None` once the budget is spent or the
	/// task was cancelled.
	pub fn next_tick(&mut self) -> Option<u32> {
		if self.state != TaskState::Running {
			return None;
		}
		let tick = self.ticks;
		self.ticks += 1;
		if self.ticks >= self.max_ticks {
			self.state = TaskState::Finished;
		}
		Some(tick)
	}
}
