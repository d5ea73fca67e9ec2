use std::env;

use atty::Stream;
use color_eyre::owo_colors::OwoColorize;
use pylock_core::CommandStatus;

/// Human output styling; plain text unless the stream is a terminal and
/// neither `--no-color` nor `NO_COLOR` is set.
pub struct Style {
    color: bool,
}

impl Style {
    pub fn for_stream(no_color: bool, stream: Stream) -> Self {
        Self::new(no_color, atty::is(stream))
    }

    fn new(no_color: bool, is_tty: bool) -> Self {
        Self {
            color: is_tty && !no_color && env::var_os("NO_COLOR").is_none(),
        }
    }

    pub fn status(&self, status: &CommandStatus, text: &str) -> String {
        let tone = Tone::of(status);
        let line = format!("{} {text}", tone.symbol());
        if self.color {
            tone.paint(&line)
        } else {
            line
        }
    }

    pub fn hint(&self, hint: &str) -> String {
        let line = format!("Hint: {hint}");
        if self.color {
            line.cyan().to_string()
        } else {
            line
        }
    }
}

#[derive(Clone, Copy)]
enum Tone {
    Done,
    Misuse,
    Broken,
}

impl Tone {
    fn of(status: &CommandStatus) -> Self {
        match status {
            CommandStatus::Ok => Self::Done,
            CommandStatus::UserError => Self::Misuse,
            CommandStatus::Failure => Self::Broken,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Self::Done => "✔",
            Self::Misuse => "✗",
            Self::Broken => "✖",
        }
    }

    fn paint(self, text: &str) -> String {
        match self {
            Self::Done => text.green().bold().to_string(),
            Self::Misuse => text.yellow().bold().to_string(),
            Self::Broken => text.red().bold().to_string(),
        }
    }
}
