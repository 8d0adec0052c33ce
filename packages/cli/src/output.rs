use std::io::{self, Stderr, Write};
use std::sync::Mutex;

use console::{Term, style};

use admin::{Notifier, Toast, ToastLevel};
use common::FieldErrors;

/// Prints toasts to stderr. A terminal gets a coloured marker, anything
/// else gets a plain `level: message` line.
pub(crate) struct ConsoleNotifier<W: Write + Send = Stderr> {
    out: Mutex<W>,
    styled: bool,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::with_writer(io::stderr(), Term::stderr().is_term())
    }
}

impl<W: Write + Send> ConsoleNotifier<W> {
    pub fn with_writer(out: W, styled: bool) -> Self {
        Self {
            out: Mutex::new(out),
            styled,
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

fn render(toast: &Toast, styled: bool) -> String {
    if !styled {
        let label = match toast.level {
            ToastLevel::Success => "ok",
            ToastLevel::Warning => "warning",
            ToastLevel::Error => "error",
        };
        return format!("{label}: {}", toast.message);
    }
    let marker = match toast.level {
        ToastLevel::Success => style("✔").green().bold(),
        ToastLevel::Warning => style("!").yellow().bold(),
        ToastLevel::Error => style("✘").red().bold(),
    };
    format!("{marker} {}", toast.message)
}

impl<W: Write + Send> Notifier for ConsoleNotifier<W> {
    fn notify(&self, toast: Toast) {
        let line = render(&toast, self.styled);
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        // A closed stderr leaves nowhere to report to.
        let _ = writeln!(out, "{line}");
    }
}

/// One line per invalid field, in the order they were found.
pub(crate) fn print_field_errors(errors: &FieldErrors) {
    eprintln!("{}", style("Draft has invalid fields:").red().bold());
    for e in errors.iter() {
        eprintln!("  {} {}", style(format!("{}:", e.field)).dim(), e.message);
    }
}

pub(crate) fn heading(text: &str) -> String {
    style(text).bold().underlined().to_string()
}
