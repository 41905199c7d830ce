//! Slash command parsing.
//!
//! Commands are typed after `/` and run on Enter:
//!
//! ```text
//! /connect [url]                 connect (optionally to another endpoint)
//! /disconnect                    disconnect, declining a pending decision
//! /config <min> <max> <cap> <s>  replace and apply the editor values
//! /theme                         toggle light/dark
//! /quit                          exit
//! ```

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Connect, optionally switching endpoint.
    Connect {
        /// New endpoint.
        url: Option<String>,
    },
    /// Disconnect.
    Disconnect,
    /// Set all four configuration fields and apply them.
    Config {
        /// Min floor, max floor, capacity, cycle time.
        values: [String; 4],
    },
    /// Toggle the theme.
    Theme,
    /// Exit.
    Quit,
    /// Not a known command.
    Unknown {
        /// The line as typed.
        input: String,
    },
    /// Known command with bad arguments.
    InvalidArgs {
        /// Command name.
        command: &'static str,
        /// What is wrong.
        error: String,
    },
}

/// Parse a command line. Leading `/` is optional.
pub fn parse(input: &str) -> Command {
    let line = input.trim();
    let mut parts = line.trim_start_matches('/').split_whitespace();
    let Some(name) = parts.next() else {
        return Command::Unknown { input: line.to_string() };
    };
    let args: Vec<&str> = parts.collect();

    match name {
        "connect" | "c" => match args.as_slice() {
            [] => Command::Connect { url: None },
            [url] => Command::Connect { url: Some((*url).to_string()) },
            _ => Command::InvalidArgs { command: "connect", error: "usage: /connect [url]".into() },
        },
        "disconnect" | "d" => Command::Disconnect,
        "config" => match args.as_slice() {
            [min, max, capacity, cycle_time] => Command::Config {
                values: [min, max, capacity, cycle_time].map(|v| (*v).to_string()),
            },
            _ => Command::InvalidArgs {
                command: "config",
                error: "usage: /config <min> <max> <capacity> <cycle-time>".into(),
            },
        },
        "theme" => Command::Theme,
        "quit" | "q" => Command::Quit,
        _ => Command::Unknown { input: line.to_string() },
    }
}
