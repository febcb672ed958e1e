use ratatui::style::Color;
use smartagent_core::constants::texts;
use smartagent_core::{Message, Sender};

/// Colors for one kind of chat entry: the speaker label and the body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntryColors {
    pub label: Color,
    pub body: Color,
}

#[derive(Clone)]
pub struct Theme {
    pub name: &'static str,
    pub text: Color,
    pub accent: Color,
    pub muted: Color,
    pub warning: Color,
    pub border: Color,
    pub user: EntryColors,
    pub agent: EntryColors,
    /// Synthetic reminder entries and the notification toast.
    pub reminder: EntryColors,
}

impl Theme {
    pub fn dark() -> Self {
        let text = Color::Rgb(214, 214, 206);
        Self {
            name: "dark",
            text,
            accent: Color::Rgb(97, 175, 239),
            muted: Color::Rgb(92, 99, 112),
            warning: Color::Rgb(229, 192, 123),
            border: Color::Rgb(62, 68, 81),
            user: EntryColors {
                label: Color::Rgb(86, 182, 194),
                body: text,
            },
            agent: EntryColors {
                label: Color::Rgb(152, 195, 121),
                body: Color::Rgb(190, 214, 170),
            },
            reminder: EntryColors {
                label: Color::Rgb(229, 192, 123),
                body: Color::Rgb(240, 214, 160),
            },
        }
    }

    pub fn tokyo_night() -> Self {
        let text = Color::Rgb(192, 202, 245);
        Self {
            name: "tokyo-night",
            text,
            accent: Color::Rgb(187, 154, 247),
            muted: Color::Rgb(86, 95, 137),
            warning: Color::Rgb(255, 158, 100),
            border: Color::Rgb(41, 46, 66),
            user: EntryColors {
                label: Color::Rgb(125, 207, 255),
                body: text,
            },
            agent: EntryColors {
                label: Color::Rgb(158, 206, 106),
                body: Color::Rgb(169, 177, 214),
            },
            reminder: EntryColors {
                label: Color::Rgb(255, 158, 100),
                body: Color::Rgb(224, 175, 104),
            },
        }
    }

    pub fn dracula() -> Self {
        let text = Color::Rgb(248, 248, 242);
        Self {
            name: "dracula",
            text,
            accent: Color::Rgb(189, 147, 249),
            muted: Color::Rgb(98, 114, 164),
            warning: Color::Rgb(255, 184, 108),
            border: Color::Rgb(68, 71, 90),
            user: EntryColors {
                label: Color::Rgb(139, 233, 253),
                body: text,
            },
            agent: EntryColors {
                label: Color::Rgb(80, 250, 123),
                body: text,
            },
            reminder: EntryColors {
                label: Color::Rgb(241, 250, 140),
                body: Color::Rgb(241, 250, 140),
            },
        }
    }

    pub fn by_name(name: &str) -> Self {
        match name {
            "tokyo-night" => Self::tokyo_night(),
            "dracula" => Self::dracula(),
            _ => Self::dark(),
        }
    }

    pub fn all_names() -> &'static [&'static str] {
        &["dark", "tokyo-night", "dracula"]
    }

    /// Colors for a log entry. Reminders are bot entries carrying the
    /// reminder prefix.
    pub fn entry_colors(&self, message: &Message) -> EntryColors {
        match message.sender {
            Sender::User => self.user,
            Sender::Bot if message.text.starts_with(texts::REMINDER_PREFIX) => self.reminder,
            Sender::Bot => self.agent,
        }
    }
}
