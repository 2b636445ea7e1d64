//! # Command Parsing
//!
//! A line is a verb followed by a free-form argument string. Verbs are
//! case-insensitive; the argument keeps its case.

use vaultcrawl_core::Direction;

/// A parsed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Blank input.
    Empty,
    /// `north`, `n`, `go east`, ...
    Move(Direction),
    /// `go` with something that is not a direction.
    BadDirection(String),
    /// `look`, `l`, `examine`, `x`.
    Look,
    /// `where`.
    Where,
    /// `map`: the neighborhood of the current room.
    Map,
    /// `big`: the whole grid.
    Big,
    /// `exits`.
    Exits,
    /// `stats`.
    Stats,
    /// `inventory`, `inv`, `i`.
    Inventory,
    /// `open`: unseal the current room.
    Open,
    /// `back`.
    Back,
    /// `teleport <query>`, `tp`, `t`, `goto`.
    Teleport(String),
    /// `search <query>`, `find`.
    Search(String),
    /// `link <query>`.
    Link(String),
    /// `help`, `?`.
    Help,
    /// Anything else; holds the verb.
    Unknown(String),
}

/// Splits a line into its verb and the trimmed remainder.
#[must_use]
pub fn split_verb(line: &str) -> (&str, &str) {
    let line = line.trim_start();
    match line.find(char::is_whitespace) {
        Some(pos) => (&line[..pos], line[pos..].trim()),
        None => (line, ""),
    }
}

impl Command {
    /// Parses one line.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let (verb, rest) = split_verb(line);
        if verb.is_empty() {
            return Self::Empty;
        }
        if let Some(dir) = Direction::parse(verb) {
            return Self::Move(dir);
        }

        match verb.to_lowercase().as_str() {
            "go" | "walk" => match Direction::parse(rest) {
                Some(dir) => Self::Move(dir),
                None => Self::BadDirection(rest.to_string()),
            },
            "look" | "l" | "examine" | "x" => Self::Look,
            "where" => Self::Where,
            "map" => Self::Map,
            "big" => Self::Big,
            "exits" => Self::Exits,
            "stats" => Self::Stats,
            "inventory" | "inv" | "i" => Self::Inventory,
            "open" | "unseal" => Self::Open,
            "back" | "b" => Self::Back,
            "teleport" | "tp" | "t" | "goto" => Self::Teleport(rest.to_string()),
            "search" | "find" => Self::Search(rest.to_string()),
            "link" => Self::Link(rest.to_string()),
            "help" | "?" => Self::Help,
            _ => Self::Unknown(verb.to_string()),
        }
    }
}

/// Help text listing every verb.
pub const HELP_TEXT: &str = "\
Movement: north/south/east/west (n/s/e/w), go <direction>, back
Looking:  look, where, exits, map, big, stats, inventory
Actions:  open, teleport <room>, search <words>, link <room>
Other:    help";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_verb() {
        assert_eq!(split_verb("  teleport   My Note  "), ("teleport", "My Note"));
        assert_eq!(split_verb("look"), ("look", ""));
        assert_eq!(split_verb(""), ("", ""));
    }

    #[test]
    fn test_directions_and_aliases() {
        assert_eq!(Command::parse("N"), Command::Move(Direction::North));
        assert_eq!(Command::parse("go west"), Command::Move(Direction::West));
        assert_eq!(Command::parse("go up"), Command::BadDirection("up".into()));
        assert_eq!(Command::parse("x"), Command::Look);
        assert_eq!(Command::parse("INV"), Command::Inventory);
        assert_eq!(Command::parse("tp Daily Log"), Command::Teleport("Daily Log".into()));
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(Command::parse("   "), Command::Empty);
        assert_eq!(Command::parse("dance wildly"), Command::Unknown("dance".into()));
        assert_eq!(Command::parse("linked"), Command::Unknown("linked".into()));
        assert_eq!(Command::parse("link"), Command::Link(String::new()));
    }
}
