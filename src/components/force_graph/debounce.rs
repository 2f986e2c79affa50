//! Cancellable delayed tasks, used to debounce window resizes.

use log::warn;
use wasm_bindgen::prelude::*;

/// Something that can run a task after a delay and cancel it before it runs.
pub trait Scheduler {
	type Handle;

	fn schedule(&mut self, delay_ms: i32, task: Box<dyn FnOnce()>) -> Self::Handle;
	fn cancel(&mut self, handle: Self::Handle);
}

/// Runs only the last of a burst of triggers, `delay_ms` after it arrived.
pub struct Debouncer<S: Scheduler> {
	scheduler: S,
	delay_ms: i32,
	pending: Option<S::Handle>,
}

impl<S: Scheduler> Debouncer<S> {
	pub fn new(scheduler: S, delay_ms: i32) -> Self {
		Self {
			scheduler,
			delay_ms,
			pending: None,
		}
	}

	/// Cancels any pending task and schedules `task` in its place.
	pub fn trigger(&mut self, task: impl FnOnce() + 'static) {
		self.cancel();
		self.pending = Some(self.scheduler.schedule(self.delay_ms, Box::new(task)));
	}

	pub fn cancel(&mut self) {
		if let Some(handle) = self.pending.take() {
			self.scheduler.cancel(handle);
		}
	}
}

/// A `setTimeout` registration. Owns the callback so it outlives the timer.
pub struct Timeout {
	id: Option<i32>,
	_callback: Closure<dyn FnMut()>,
}

/// Browser scheduler backed by `setTimeout`/`clearTimeout`.
#[derive(Default)]
pub struct WindowScheduler;

impl Scheduler for WindowScheduler {
	type Handle = Timeout;

	fn schedule(&mut self, delay_ms: i32, task: Box<dyn FnOnce()>) -> Timeout {
		let callback: Closure<dyn FnMut()> = Closure::once(move || task());
		let id = web_sys::window().and_then(|window| {
			window
				.set_timeout_with_callback_and_timeout_and_arguments_0(
					callback.as_ref().unchecked_ref(),
					delay_ms,
				)
				.map_err(|e| warn!("setTimeout failed: {:?}", e))
				.ok()
		});
		Timeout {
			id,
			_callback: callback,
		}
	}

	fn cancel(&mut self, handle: Timeout) {
		if let (Some(window), Some(id)) = (web_sys::window(), handle.id) {
			window.clear_timeout_with_handle(id);
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use super::*;

	type Queue = Rc<RefCell<Vec<(u32, f64, Option<Box<dyn FnOnce()>>)>>>;

	/// Manually advanced clock for driving debouncers in tests.
	#[derive(Default, Clone)]
	struct ManualScheduler {
		now: Rc<RefCell<f64>>,
		queue: Queue,
		next_id: Rc<RefCell<u32>>,
	}

	impl ManualScheduler {
		fn advance(&self, ms: f64) {
			let now = {
				let mut now = self.now.borrow_mut();
				*now += ms;
				*now
			};
			let due: Vec<Box<dyn FnOnce()>> = self
				.queue
				.borrow_mut()
				.iter_mut()
				.filter(|(_, at, _)| *at <= now)
				.filter_map(|(_, _, task)| task.take())
				.collect();
			for task in due {
				task();
			}
		}
	}

	impl Scheduler for ManualScheduler {
		type Handle = u32;

		fn schedule(&mut self, delay_ms: i32, task: Box<dyn FnOnce()>) -> u32 {
			let id = {
				let mut next = self.next_id.borrow_mut();
				*next += 1;
				*next
			};
			let at = *self.now.borrow() + delay_ms as f64;
			self.queue.borrow_mut().push((id, at, Some(task)));
			id
		}

		fn cancel(&mut self, handle: u32) {
			self.queue.borrow_mut().retain(|(id, _, _)| *id != handle);
		}
	}

	#[test]
	fn burst_fires_once_with_last_value() {
		let clock = ManualScheduler::default();
		let mut debouncer = Debouncer::new(clock.clone(), 500);
		let fired = Rc::new(RefCell::new(Vec::new()));

		for size in [100, 200, 300] {
			let fired = fired.clone();
			debouncer.trigger(move || fired.borrow_mut().push(size));
			clock.advance(200.0);
		}
		assert!(fired.borrow().is_empty());

		clock.advance(300.0);
		assert_eq!(*fired.borrow(), vec![300]);

		clock.advance(1_000.0);
		assert_eq!(fired.borrow().len(), 1);
	}

	#[test]
	fn spaced_triggers_each_fire() {
		let clock = ManualScheduler::default();
		let mut debouncer = Debouncer::new(clock.clone(), 500);
		let count = Rc::new(RefCell::new(0));

		for _ in 0..2 {
			let count = count.clone();
			debouncer.trigger(move || *count.borrow_mut() += 1);
			clock.advance(600.0);
		}
		assert_eq!(*count.borrow(), 2);
	}

	#[test]
	fn cancel_drops_pending_task() {
		let clock = ManualScheduler::default();
		let mut debouncer = Debouncer::new(clock.clone(), 500);
		let count = Rc::new(RefCell::new(0));

		let c = count.clone();
		debouncer.trigger(move || *c.borrow_mut() += 1);
		debouncer.cancel();
		clock.advance(1_000.0);
		assert_eq!(*count.borrow(), 0);
	}
}
