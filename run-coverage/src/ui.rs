//! Print colored text.
//!
//! Provides functions and macros that simulate the `cargo` output style.

use error::Error;

use covrun::Step;
use termcolor::*;

use std::fmt::Arguments;
use std::io::{Result, Write};

/// Prints a progress (green text), similar to the cargo output.
macro_rules! progress {
    ($tag:expr, $($arg:tt)+) => {
        ::ui::print_tagged($tag, 12, ::termcolor::Color::Green, format_args!($($arg)+)).expect("print progress")
    }
}

/// Prints a warning (yellow text), similar to cargo output.
macro_rules! warning {
    ($($arg:tt)+) => {
        ::ui::print_tagged("warning:", 0, ::termcolor::Color::Yellow, format_args!($($arg)+)).expect("print warning")
    }
}

/// Prints `tag` in bold `color`, right-aligned to `width` columns, followed by the message.
pub fn print_tagged(tag: &str, width: usize, color: Color, message: Arguments) -> Result<()> {
    let stream = StandardStream::stderr(ColorChoice::Auto);
    let mut lock = stream.lock();
    lock.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(lock, "{:>width$} ", tag, width = width)?;
    lock.reset()?;
    writeln!(lock, "{}", message)
}

/// Prints the planned steps without running them.
pub fn print_plan(steps: &[Step]) -> Result<()> {
    let stream = StandardStream::stdout(ColorChoice::Auto);
    let mut lock = stream.lock();
    for step in steps {
        lock.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(lock, "{:>12} ", step.phase.name())?;
        lock.reset()?;
        writeln!(lock, "(cd {} && {})", step.invocation.current_dir.display(), step.invocation)?;
    }
    Ok(())
}

/// Prints an error and the causes.
pub fn print_error(error: &Error) -> Result<()> {
    let stream = StandardStream::stderr(ColorChoice::Auto);
    let mut lock = stream.lock();

    for (i, e) in error.iter().enumerate() {
        if i == 0 {
            lock.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_intense(true).set_bold(true))?;
            write!(lock, "error: ")?;
        } else {
            lock.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            write!(lock, "caused by: ")?;
        }
        lock.reset()?;
        writeln!(lock, "{}", e)?;
    }
    if let Some(backtrace) = error.backtrace() {
        writeln!(lock, "\n{:?}", backtrace)?;
    }
    Ok(())
}
