#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Status,
    Diagnose(String),
    Code(String),
    PartSearch(String),
    CarInfo(String),
    Unknown(String),
    /// Anything that does not start with `/`.
    Text,
}

/// Parses `/name[@bot] args`. Arguments are trimmed but otherwise untouched;
/// validation happens later.
pub fn parse(text: &str) -> Command {
    let Some(rest) = text.strip_prefix('/') else {
        return Command::Text;
    };

    let (head, args) = match rest.find(char::is_whitespace) {
        Some(index) => (&rest[..index], rest[index..].trim()),
        None => (rest, ""),
    };
    let name = head.split('@').next().unwrap_or(head);

    match name {
        "start" => Command::Start,
        "help" => Command::Help,
        "status" => Command::Status,
        "diagnose" => Command::Diagnose(args.to_owned()),
        "code" => Command::Code(args.to_owned()),
        "part_search" => Command::PartSearch(args.to_owned()),
        "car_info" => Command::CarInfo(args.to_owned()),
        other => Command::Unknown(other.to_owned()),
    }
}
