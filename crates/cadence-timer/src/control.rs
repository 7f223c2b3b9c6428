//! Line-oriented control surface for a running timer.
//!
//! Recognized input lines:
//!
//! | input | command |
//! |---|---|
//! | a number | set the interval (seconds), effective immediately |
//! | `p`, `pause` | pause |
//! | `r`, `resume` | resume |
//! | `R`, `reset` | reset |
//! | `t`, `time` | print interval, elapsed, paused and time to next checkpoint |
//! | `q`, `Q`, `quit`, `stop` | stop the timer and leave |
//!
//! Anything else is ignored.

use crate::interval::IntervalChange;
use crate::timer::Timer;
use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;
use std::sync::Arc;

const HELP: &str = "\
-----------------------------------------------------------------
Timer Command-Line-Interface. Possible inputs:
- any number (int/float): change timer interval to that new value
- 'p' or 'pause': pause timer
- 'r' or 'resume': resume timer
- 'R' or 'reset': reset timer
- 't' or 'time': print timing (interval, elapsed time, etc.) info
- 'q', 'Q', 'quit' or 'stop': stop timer and exit
-----------------------------------------------------------------";

/// A parsed control line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Set the interval to this many seconds.
    SetInterval(f64),
    /// Pause the timer.
    Pause,
    /// Resume the timer.
    Resume,
    /// Reset the timer.
    Reset,
    /// Print timing information.
    ReportStatus,
    /// Stop the timer and leave the control loop.
    Quit,
    /// Unrecognized input.
    Unknown,
}

impl Command {
    /// Parse one input line. Surrounding whitespace is ignored; the letter
    /// commands are case sensitive (`r` resumes, `R` resets).
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if let Ok(seconds) = line.parse::<f64>() {
            return Self::SetInterval(seconds);
        }

        match line {
            "p" | "pause" => Self::Pause,
            "r" | "resume" => Self::Resume,
            "R" | "reset" => Self::Reset,
            "t" | "time" => Self::ReportStatus,
            "q" | "Q" | "quit" | "stop" => Self::Quit,
            _ => Self::Unknown,
        }
    }
}

impl From<&str> for Command {
    fn from(line: &str) -> Self {
        Self::parse(line)
    }
}

/// Executes [`Command`]s against a shared timer, echoing to `output`.
#[derive(Debug)]
pub struct Controller<W> {
    timer: Arc<Timer>,
    output: W,
}

impl<W: Write> Controller<W> {
    /// Create a controller for `timer`.
    pub fn new(timer: Arc<Timer>, output: W) -> Self {
        Self { timer, output }
    }

    /// The controlled timer.
    pub fn timer(&self) -> &Arc<Timer> {
        &self.timer
    }

    /// Consume the controller and return the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Print the list of accepted inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails.
    pub fn print_help(&mut self) -> io::Result<()> {
        writeln!(self.output, "{HELP}")
    }

    /// Execute one command.
    ///
    /// Returns `Break` once the timer has been stopped.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails.
    pub fn execute(&mut self, command: Command) -> io::Result<ControlFlow<()>> {
        match command {
            Command::SetInterval(seconds) => {
                match self.timer.set_interval(seconds, IntervalChange::Immediate) {
                    Ok(()) => writeln!(self.output, "--- Interval (s) changed to {seconds}")?,
                    Err(_) => writeln!(self.output, "--- Invalid Interval")?,
                }
            }
            Command::Pause => {
                writeln!(self.output, "--- Timer Paused")?;
                self.timer.pause();
            }
            Command::Resume => {
                writeln!(self.output, "--- Timer Resumed")?;
                self.timer.resume();
            }
            Command::Reset => {
                writeln!(self.output, "--- Timer Restarted")?;
                self.timer.reset();
            }
            Command::ReportStatus => {
                let snapshot = self.timer.snapshot();
                writeln!(
                    self.output,
                    "[Interval {:.3}] [Elapsed: {:.3}] [Paused {:.3}] [Next {:.3}]",
                    snapshot.interval.as_secs_f64(),
                    snapshot.elapsed.as_secs_f64(),
                    snapshot.paused.as_secs_f64(),
                    snapshot.until_target_secs(),
                )?;
            }
            Command::Quit => {
                writeln!(self.output, "--- Timer Stopped")?;
                self.timer.stop();
            }
            Command::Unknown => {}
        }

        self.output.flush()?;
        if self.timer.is_stopped() {
            Ok(ControlFlow::Break(()))
        } else {
            Ok(ControlFlow::Continue(()))
        }
    }

    /// Read commands from `input` until the timer is stopped.
    ///
    /// End of input stops the timer. Returns the output sink.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the input or writing the output fails; the
    /// timer is stopped in that case too.
    pub fn serve<R: BufRead>(mut self, mut input: R) -> io::Result<W> {
        let result = self.serve_lines(&mut input);
        if result.is_err() {
            self.timer.stop();
        }
        result?;

        writeln!(self.output, "--- Loop Exited")?;
        self.output.flush()?;
        Ok(self.output)
    }

    fn serve_lines<R: BufRead>(&mut self, input: &mut R) -> io::Result<()> {
        self.print_help()?;

        let mut line = Vec::new();
        while !self.timer.is_stopped() {
            line.clear();
            if input.read_until(b'\n', &mut line)? == 0 {
                tracing::debug!(timer = %self.timer.name(), "control input closed");
                self.timer.stop();
                break;
            }

            // Undecodable bytes turn into an unknown command.
            let command = Command::parse(&String::from_utf8_lossy(&line));
            tracing::trace!(?command, "control command");
            if self.execute(command)?.is_break() {
                break;
            }
        }
        Ok(())
    }
}
