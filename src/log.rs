//! Progress and message logging for long running operations.
//!
//! Algorithms that report progress take a `&dyn Logger` (or `&impl Logger`)
//! and work just the same with [`NullLogger`]. [`TracingLogger`] forwards
//! everything to [`tracing`].
//!
//! # Nested tasks
//!
//! Progress is a percentage in `0..=100`. A task started with
//! [`Logger::start_task`] occupies a part of its parent task: inside it,
//! percentages again go from 0 to 100, but are mapped into the range given
//! when starting the task. For example:
//!
//! ```
//! use tessel::log::{Logger, TracingLogger};
//!
//! let log = TracingLogger::new();
//! log.start_task(50.0, 100.0, "second half");
//! log.set_percentage(50.0);
//! assert_eq!(log.percentage(), 75.0);
//! log.end_task("second half");
//! assert_eq!(log.percentage(), 100.0);
//! ```

use std::{fmt, sync::Mutex};

use tracing::{debug, error, info, warn};


/// Severity of a log message. Variants are ordered from most to least
/// important.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Error,
    Warning,
    Progress,
    Debug,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Sink for messages and progress of (possibly nested) tasks.
///
/// All methods take `&self`: loggers synchronize internally so that a
/// logger can be shared with callbacks.
pub trait Logger {
    /// Logs a message with the given level.
    fn log(&self, level: LogLevel, msg: &str);

    /// Starts a new subtask that covers `from..to` (in percent) of the
    /// current task. The global percentage is set to the start of the
    /// subtask.
    fn start_task(&self, from: f64, to: f64, action: &str);

    /// Ends the current subtask. The global percentage is set to the end of
    /// the subtask's range. Ending the top level task does nothing but that.
    fn end_task(&self, action: &str);

    /// Sets the progress of the current task in percent (`0..=100`). Values
    /// outside of that range are ignored.
    fn set_percentage(&self, percent: f64);

    /// The global progress in percent.
    fn percentage(&self) -> f64;

    /// Sets the progress of the current task and logs `msg` as progress
    /// message.
    fn log_progress(&self, percent: f64, msg: &str) {
        self.set_percentage(percent);
        self.log(LogLevel::Progress, msg);
    }
}

impl<L: Logger + ?Sized> Logger for &L {
    fn log(&self, level: LogLevel, msg: &str) {
        (**self).log(level, msg)
    }
    fn start_task(&self, from: f64, to: f64, action: &str) {
        (**self).start_task(from, to, action)
    }
    fn end_task(&self, action: &str) {
        (**self).end_task(action)
    }
    fn set_percentage(&self, percent: f64) {
        (**self).set_percentage(percent)
    }
    fn percentage(&self) -> f64 {
        (**self).percentage()
    }
}


// ===========================================================================
// ===== Implementations
// ===========================================================================

/// A logger that ignores everything. Its percentage is always 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _: LogLevel, _: &str) {}
    fn start_task(&self, _: f64, _: f64, _: &str) {}
    fn end_task(&self, _: &str) {}
    fn set_percentage(&self, _: f64) {}
    fn percentage(&self) -> f64 {
        0.0
    }
}

/// The nested task ranges and the current global percentage.
#[derive(Debug, Clone)]
struct TaskStack {
    /// Global ranges of all started tasks, the current one on top. Never
    /// empty: the bottom is the whole `0..100` range.
    intervals: Vec<(f64, f64)>,
    global: f64,
}

impl TaskStack {
    fn new() -> Self {
        Self {
            intervals: vec![(0.0, 100.0)],
            global: 0.0,
        }
    }

    fn current(&self) -> (f64, f64) {
        self.intervals.last().copied().unwrap_or((0.0, 100.0))
    }

    /// Global value of the local percentage `p` of the current task.
    fn to_global(&self, p: f64) -> f64 {
        let (from, to) = self.current();
        from + (to - from) * p / 100.0
    }

    fn push(&mut self, from: f64, to: f64) {
        let interval = (self.to_global(from.max(0.0)), self.to_global(to.min(100.0)));
        self.global = interval.0;
        self.intervals.push(interval);
    }

    /// Returns `false` if only the top level task was left.
    fn pop(&mut self) -> bool {
        self.global = self.current().1;
        if self.intervals.len() > 1 {
            self.intervals.pop();
            true
        } else {
            false
        }
    }

    fn set(&mut self, p: f64) {
        if (0.0..=100.0).contains(&p) {
            self.global = self.to_global(p);
        }
    }

    fn depth(&self) -> usize {
        self.intervals.len() - 1
    }
}

/// Forwards messages to `tracing` events and keeps track of the progress.
///
/// Every event carries the global percentage and the task depth as fields.
/// Messages less important than the print level are dropped. Progress
/// messages are emitted as `info` events.
#[derive(Debug)]
pub struct TracingLogger {
    state: Mutex<TaskStack>,
    print_level: LogLevel,
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl TracingLogger {
    /// Creates a logger that forwards everything up to `Progress`.
    pub fn new() -> Self {
        Self::with_print_level(LogLevel::Progress)
    }

    pub fn with_print_level(print_level: LogLevel) -> Self {
        Self {
            state: Mutex::new(TaskStack::new()),
            print_level,
        }
    }

    pub fn print_level(&self) -> LogLevel {
        self.print_level
    }

    pub fn set_print_level(&mut self, level: LogLevel) {
        self.print_level = level;
    }

    /// Forgets all started tasks and resets the percentage to 0.
    pub fn reset(&self) {
        *self.lock() = TaskStack::new();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TaskStack> {
        // The state is always valid, even if a panic happened while it was
        // locked.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, level: LogLevel, msg: &str, percentage: f64, depth: usize) {
        if level > self.print_level {
            return;
        }

        match level {
            LogLevel::Error => error!(percentage, depth, "{}", msg),
            LogLevel::Warning => warn!(percentage, depth, "{}", msg),
            LogLevel::Progress => info!(percentage, depth, "{}", msg),
            LogLevel::Debug => debug!(percentage, depth, "{}", msg),
        }
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, msg: &str) {
        let (percentage, depth) = {
            let state = self.lock();
            (state.global, state.depth())
        };
        self.emit(level, msg, percentage, depth);
    }

    fn start_task(&self, from: f64, to: f64, action: &str) {
        let (percentage, depth) = {
            let mut state = self.lock();
            let depth = state.depth();
            state.push(from, to);
            (state.global, depth)
        };
        self.emit(LogLevel::Progress, &format!("start: {}", action), percentage, depth);
    }

    fn end_task(&self, action: &str) {
        let (ended, percentage, depth) = {
            let mut state = self.lock();
            let ended = state.pop();
            (ended, state.global, state.depth())
        };
        if ended {
            self.emit(LogLevel::Progress, &format!("end: {}", action), percentage, depth);
        }
    }

    fn set_percentage(&self, percent: f64) {
        self.lock().set(percent);
    }

    fn percentage(&self) -> f64 {
        self.lock().global
    }
}


#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn nested_tasks() {
        let log = TracingLogger::new();
        log.start_task(0.0, 50.0, "outer");
        assert_eq!(log.percentage(), 0.0);

        log.start_task(20.0, 60.0, "inner");
        assert_relative_eq!(log.percentage(), 10.0);
        log.set_percentage(50.0);
        assert_relative_eq!(log.percentage(), 20.0);
        log.end_task("inner");
        assert_relative_eq!(log.percentage(), 30.0);

        log.log_progress(100.0, "outer done");
        assert_relative_eq!(log.percentage(), 50.0);
        log.end_task("outer");
        assert_relative_eq!(log.percentage(), 50.0);

        // Ending more tasks than were started is harmless.
        log.end_task("nothing");
        assert_relative_eq!(log.percentage(), 100.0);
        log.reset();
        assert_eq!(log.percentage(), 0.0);
    }

    #[test]
    fn out_of_range_percentage_is_ignored() {
        let log = TracingLogger::new();
        log.set_percentage(40.0);
        log.set_percentage(140.0);
        log.set_percentage(-3.0);
        assert_eq!(log.percentage(), 40.0);
    }

    #[test]
    fn null_logger_through_reference() {
        fn work(log: impl Logger) -> f64 {
            log.start_task(0.0, 100.0, "work");
            log.log(LogLevel::Warning, "something");
            log.end_task("work");
            log.percentage()
        }

        assert_eq!(work(&NullLogger), 0.0);
        assert_eq!(work(&TracingLogger::with_print_level(LogLevel::Debug)), 100.0);
        assert!(LogLevel::Error < LogLevel::Debug);
    }
}
