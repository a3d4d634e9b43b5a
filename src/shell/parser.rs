//! Line parser for the interactive shell.
//!
//! Commands are a keyword followed by positional arguments or `key=value`
//! pairs. Values containing spaces are quoted: `add name="Código Secreto"`.

use log::trace;

use crate::catalog::{DurationBand, FilterSpec, ImageRef, ListKind, NewGame};

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Show(ListKind),
    Search(FilterSpec),
    Filter(FilterSpec),
    Details(i64),
    Wish(i64),
    Own(i64),
    Toggle(i64),
    Remove(i64),
    Add { game: NewGame, list: ListKind },
    Export(Option<String>),
    Import(String),
    Help,
    Quit,
    Empty,
    Unknown(String),
    Invalid(String),
}

/// Split a line into words, honoring single and double quotes. A backslash
/// escapes the next character inside double quotes.
pub fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some('"') if c == '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => return Err("dangling escape at end of line".into()),
            },
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if quote.is_some() {
        return Err("unterminated quote".into());
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn parse_id(args: &[String], usage: &str) -> Result<i64, String> {
    match args {
        [id] => id
            .parse::<i64>()
            .map_err(|_| format!("'{}' is not a game id", id)),
        _ => Err(format!("Usage: {}", usage)),
    }
}

fn split_pairs(args: &[String]) -> Result<Vec<(String, String)>, String> {
    args.iter()
        .map(|arg| {
            arg.split_once('=')
                .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.to_string()))
                .ok_or_else(|| format!("expected key=value, got '{}'", arg))
        })
        .collect()
}

fn parse_number(key: &str, value: &str) -> Result<i64, String> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("{} must be a whole number, got '{}'", key, value))
}

fn parse_filter(args: &[String]) -> Result<FilterSpec, String> {
    let mut spec = FilterSpec::default();
    for (key, value) in split_pairs(args)? {
        match key.as_str() {
            "name" => spec.name_contains = Some(value),
            "players" => spec.player_count = Some(parse_number("players", &value)?),
            "duration" => spec.duration_band = Some(value.parse::<DurationBand>()?),
            other => return Err(format!("unknown filter '{}'", other)),
        }
    }
    Ok(spec)
}

fn parse_add(args: &[String]) -> Result<(NewGame, ListKind), String> {
    let mut game = NewGame::default();
    let mut list = ListKind::Owned;
    let (mut name, mut min, mut max, mut duration) = (None, None, None, None);
    for (key, value) in split_pairs(args)? {
        match key.as_str() {
            "name" => name = Some(value),
            "min" => min = Some(parse_number("min", &value)?),
            "max" => max = Some(parse_number("max", &value)?),
            "duration" => duration = Some(parse_number("duration", &value)?),
            "description" => game.description = value,
            "image" => game.image = Some(ImageRef::from(value)),
            "link" => game.link = Some(value),
            "category" => game.category = Some(value),
            "list" => list = value.parse::<ListKind>()?,
            other => return Err(format!("unknown field '{}'", other)),
        }
    }
    let missing: Vec<&str> = [
        ("name", name.is_none()),
        ("min", min.is_none()),
        ("max", max.is_none()),
        ("duration", duration.is_none()),
    ]
    .into_iter()
    .filter_map(|(field, absent)| absent.then_some(field))
    .collect();
    if !missing.is_empty() {
        return Err(format!("missing {}", missing.join(", ")));
    }
    game.name = name.unwrap_or_default();
    game.min_players = min.unwrap_or_default();
    game.max_players = max.unwrap_or_default();
    game.duration = duration.unwrap_or_default();
    Ok((game, list))
}

/// Parse one shell line. Keywords are case-insensitive.
pub fn parse(line: &str) -> ShellCommand {
    let tokens = match tokenize(line) {
        Ok(tokens) => tokens,
        Err(e) => return ShellCommand::Invalid(e),
    };
    let Some((keyword, args)) = tokens.split_first() else {
        return ShellCommand::Empty;
    };
    let keyword = keyword.to_ascii_lowercase();
    trace!("Parsed shell keyword '{}' with {} args", keyword, args.len());

    let parsed = match keyword.as_str() {
        "owned" | "games" | "ls" => Ok(ShellCommand::Show(ListKind::Owned)),
        "wishlist" | "wl" => Ok(ShellCommand::Show(ListKind::Wishlist)),
        "search" => parse_filter(args).map(ShellCommand::Search),
        "filter" => parse_filter(args).map(ShellCommand::Filter),
        "show" | "details" => parse_id(args, "show <id>").map(ShellCommand::Details),
        "wish" => parse_id(args, "wish <id>").map(ShellCommand::Wish),
        "own" => parse_id(args, "own <id>").map(ShellCommand::Own),
        "toggle" => parse_id(args, "toggle <id>").map(ShellCommand::Toggle),
        "rm" | "remove" | "delete" => parse_id(args, "rm <id>").map(ShellCommand::Remove),
        "add" => parse_add(args).map(|(game, list)| ShellCommand::Add { game, list }),
        "export" => match args {
            [] => Ok(ShellCommand::Export(None)),
            [path] => Ok(ShellCommand::Export(Some(path.clone()))),
            _ => Err("Usage: export [path]".to_string()),
        },
        "import" => match args {
            [path] => Ok(ShellCommand::Import(path.clone())),
            _ => Err("Usage: import <path>".to_string()),
        },
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
        _ => Ok(ShellCommand::Unknown(keyword.clone())),
    };
    parsed.unwrap_or_else(ShellCommand::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_handles_quotes() {
        assert_eq!(
            tokenize(r#"add name="Código Secreto" min=2 description='a "quoted" word'"#).unwrap(),
            vec![
                "add",
                "name=Código Secreto",
                "min=2",
                r#"description=a "quoted" word"#
            ]
        );
        assert_eq!(tokenize(r#"x "say \"hi\"""#).unwrap(), vec!["x", r#"say "hi""#]);
        assert_eq!(tokenize(r#"name="""#).unwrap(), vec!["name="]);
        assert!(tokenize("name=\"open").is_err());
    }

    #[test]
    fn parses_filters() {
        let cmd = parse("search name=codigo players=4 duration=Short");
        assert_eq!(
            cmd,
            ShellCommand::Search(FilterSpec {
                name_contains: Some("codigo".into()),
                player_count: Some(4),
                duration_band: Some(DurationBand::Short),
            })
        );
        assert_eq!(parse("FILTER"), ShellCommand::Filter(FilterSpec::default()));
        assert!(matches!(parse("search players=many"), ShellCommand::Invalid(_)));
        assert!(matches!(parse("search colour=red"), ShellCommand::Invalid(_)));
    }

    #[test]
    fn parses_add_with_defaults() {
        match parse(r#"add name="Ticket to Ride" min=2 max=5 duration=60 list=wishlist"#) {
            ShellCommand::Add { game, list } => {
                assert_eq!(game.name, "Ticket to Ride");
                assert_eq!((game.min_players, game.max_players, game.duration), (2, 5, 60));
                assert_eq!(list, ListKind::Wishlist);
                assert!(game.image.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
        match parse("add name=Hive min=2") {
            ShellCommand::Invalid(msg) => assert_eq!(msg, "missing max, duration"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn parses_id_commands() {
        assert_eq!(parse("wish 3"), ShellCommand::Wish(3));
        assert_eq!(parse("rm 1700000000000"), ShellCommand::Remove(1_700_000_000_000));
        assert!(matches!(parse("own"), ShellCommand::Invalid(_)));
        assert!(matches!(parse("toggle abc"), ShellCommand::Invalid(_)));
    }

    #[test]
    fn misc_commands() {
        assert_eq!(parse("   "), ShellCommand::Empty);
        assert_eq!(parse("export"), ShellCommand::Export(None));
        assert_eq!(parse("import backup.json"), ShellCommand::Import("backup.json".into()));
        assert_eq!(parse("dance"), ShellCommand::Unknown("dance".into()));
        assert_eq!(parse("Q"), ShellCommand::Quit);
    }
}
