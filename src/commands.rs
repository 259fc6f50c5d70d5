use std::fmt;

use spitroast_core::ItemType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError {
    message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommandError {}

/// Scenario commands understood by the headless runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpitCommand {
    /// Light or put out the campfire under the spit.
    Fire { burning: bool },
    /// Put `count` of `item` in the player's hand.
    Give { item: ItemType, count: u32 },
    /// Use the spit with whatever is in hand.
    Use,
    /// Start or stop sneaking.
    Sneak { sneaking: bool },
    /// Break the spit, dumping its contents.
    Break,
    /// Place a fresh spit.
    Place,
    /// Pick up dropped items within reach.
    Pickup,
    /// Log the current spit state.
    Status,
}

pub fn parse_command(input: &str) -> Result<SpitCommand, CommandError> {
    let input = input.trim();
    let input = input.strip_prefix('/').unwrap_or(input).trim();

    let mut parts = input.split_whitespace();
    let cmd = parts
        .next()
        .ok_or_else(|| CommandError::new("Missing command"))?
        .to_ascii_lowercase();
    let args: Vec<&str> = parts.collect();

    match cmd.as_str() {
        "fire" => Ok(SpitCommand::Fire {
            burning: parse_switch(&args, "Usage: fire on|off")?,
        }),
        "give" => {
            if !(1..=2).contains(&args.len()) {
                return Err(CommandError::new("Usage: give <item> [count]"));
            }
            let item = args[0]
                .parse::<ItemType>()
                .map_err(|err| CommandError::new(err.to_string()))?;
            let count = if args.len() == 2 {
                parse_positive_u32(args[1]).map_err(|_| CommandError::new("Invalid give count"))?
            } else {
                1
            };
            Ok(SpitCommand::Give { item, count })
        }
        "use" => no_args(&args, SpitCommand::Use, "Usage: use"),
        "sneak" => Ok(SpitCommand::Sneak {
            sneaking: parse_switch(&args, "Usage: sneak on|off")?,
        }),
        "break" => no_args(&args, SpitCommand::Break, "Usage: break"),
        "place" => no_args(&args, SpitCommand::Place, "Usage: place"),
        "pickup" => no_args(&args, SpitCommand::Pickup, "Usage: pickup"),
        "status" => no_args(&args, SpitCommand::Status, "Usage: status"),
        _ => Err(CommandError::new(format!("Unknown command: {cmd}"))),
    }
}

fn no_args(args: &[&str], cmd: SpitCommand, usage: &str) -> Result<SpitCommand, CommandError> {
    if args.is_empty() {
        Ok(cmd)
    } else {
        Err(CommandError::new(usage))
    }
}

fn parse_switch(args: &[&str], usage: &str) -> Result<bool, CommandError> {
    match args {
        ["on"] | ["true"] => Ok(true),
        ["off"] | ["false"] => Ok(false),
        _ => Err(CommandError::new(usage)),
    }
}

fn parse_positive_u32(s: &str) -> Result<u32, ()> {
    let value = s.parse::<u32>().map_err(|_| ())?;
    if value == 0 {
        return Err(());
    }
    Ok(value)
}
