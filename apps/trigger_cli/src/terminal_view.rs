use std::{io::Write, sync::Mutex};

use shared::domain::ButtonAppearance;
use trigger_core::ButtonView;

struct Screen<W> {
    out: W,
    last: Option<ButtonAppearance>,
}

/// Draws the button as one `[label] (marker)` line per visible change.
pub struct TerminalView<W: Write + Send> {
    screen: Mutex<Screen<W>>,
}

impl TerminalView<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            screen: Mutex::new(Screen { out, last: None }),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        match self.screen.into_inner() {
            Ok(screen) => screen.out,
            Err(poisoned) => poisoned.into_inner().out,
        }
    }
}

impl<W: Write + Send + 'static> ButtonView for TerminalView<W> {
    fn render(&self, appearance: &ButtonAppearance) {
        let mut screen = match self.screen.lock() {
            Ok(screen) => screen,
            Err(poisoned) => poisoned.into_inner(),
        };
        if screen.last.as_ref() == Some(appearance) {
            return;
        }
        screen.last = Some(*appearance);
        if let Err(error) = writeln!(screen.out, "{appearance}").and_then(|_| screen.out.flush()) {
            tracing::debug!(%error, "failed to draw button");
        }
    }
}

#[cfg(test)]
#[path = "tests/terminal_view_tests.rs"]
mod tests;
