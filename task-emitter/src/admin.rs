//! RabbitMQ admin console launcher.
//!
//! Opening the management UI is a convenience for watching the queue fill up.
//! Nothing here can fail the run: a missing browser or an unreadable prompt is
//! logged and ignored.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use tracing::{info, warn};

/// When to open the admin console before emitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminConsole {
    /// Ask on stdin and open only on `y`.
    Offer,
    /// Open without asking.
    #[default]
    Open,
    /// Never open (headless runs).
    Off,
}

impl FromStr for AdminConsole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "offer" | "prompt" => Ok(AdminConsole::Offer),
            "open" | "auto" => Ok(AdminConsole::Open),
            "off" | "none" => Ok(AdminConsole::Off),
            other => Err(format!("unknown admin console mode: {}", other)),
        }
    }
}

/// Open the admin console at `url` according to `mode`.
///
/// Returns whether a browser was launched.
pub fn show_admin_console(mode: AdminConsole, url: &str) -> bool {
    let stdin = io::stdin();
    let stdout = io::stdout();
    show_with(mode, url, &mut stdin.lock(), &mut stdout.lock(), webbrowser::open)
}

fn show_with<R, W, F>(mode: AdminConsole, url: &str, input: &mut R, output: &mut W, open: F) -> bool
where
    R: BufRead,
    W: Write,
    F: FnOnce(&str) -> io::Result<()>,
{
    match mode {
        AdminConsole::Off => {
            info!("admin_console_disabled");
            false
        }
        AdminConsole::Open => launch(url, output, open),
        AdminConsole::Offer => {
            log_write_error(
                write!(output, "Would you like to monitor RabbitMQ queues? y or n ")
                    .and_then(|()| output.flush()),
            );

            let mut answer = String::new();
            if let Err(e) = input.read_line(&mut answer) {
                warn!(error = %e, "admin_console_prompt_failed");
                return false;
            }
            log_write_error(writeln!(output));

            if accepts(&answer) {
                launch(url, output, open)
            } else {
                info!("admin_console_declined");
                false
            }
        }
    }
}

fn launch<W, F>(url: &str, output: &mut W, open: F) -> bool
where
    W: Write,
    F: FnOnce(&str) -> io::Result<()>,
{
    let opened = match open(url) {
        Ok(()) => {
            info!(url = url, "admin_console_opened");
            true
        }
        Err(e) => {
            warn!(url = url, error = %e, "admin_console_open_failed");
            false
        }
    };
    log_write_error(writeln!(output));
    opened
}

fn log_write_error(result: io::Result<()>) {
    if let Err(e) = result {
        warn!(error = %e, "admin_console_write_failed");
    }
}

fn accepts(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}
