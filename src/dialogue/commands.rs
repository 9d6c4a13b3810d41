//! Transcript normalisation and command matching
//!
//! Commands are fixed phrases. "speed up" and "slow down" match anywhere in
//! the transcript and win over everything else; every other command needs
//! the whole (normalised) transcript to match.

/// One recognition result
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transcript {
    raw: String,
    normalized: String,
}

impl Transcript {
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim().to_string();
        let normalized = normalize(&raw);
        Self { raw, normalized }
    }

    /// Trimmed text as heard; used for draft fields and queries
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Lower-cased, punctuation-trimmed form used for matching
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Lower-case, collapse whitespace and drop trailing punctuation engines like to add
fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .trim_end()
        .to_string()
}

/// Top-level commands understood in `Listening`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Compose,
    Read,
    Search,
    SpeedUp,
    SlowDown,
    Exit,
    SummarizeLatest,
    SummarizeAll,
    ListFolders,
    ChangeFolder,
}

const EXACT_COMMANDS: &[(&str, Command)] = &[
    ("compose", Command::Compose),
    ("read", Command::Read),
    ("search", Command::Search),
    ("exit", Command::Exit),
    ("summarize latest", Command::SummarizeLatest),
    ("summarize all", Command::SummarizeAll),
    ("list folders", Command::ListFolders),
    ("change folder", Command::ChangeFolder),
];

impl Command {
    pub fn parse(transcript: &Transcript) -> Option<Command> {
        let text = transcript.normalized();

        if text.contains("speed up") {
            return Some(Command::SpeedUp);
        }
        if text.contains("slow down") {
            return Some(Command::SlowDown);
        }

        EXACT_COMMANDS
            .iter()
            .find(|(phrase, _)| *phrase == text)
            .map(|(_, command)| *command)
    }
}

/// Commands understood while iterating search results
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultsCommand {
    Next,
    Stop,
}

impl ResultsCommand {
    pub fn parse(transcript: &Transcript) -> Option<ResultsCommand> {
        match transcript.normalized() {
            "next" => Some(ResultsCommand::Next),
            "stop" => Some(ResultsCommand::Stop),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Option<Command> {
        Command::parse(&Transcript::new(text))
    }

    #[test]
    fn test_normalization() {
        let t = Transcript::new("  Summarize   ALL. ");
        assert_eq!(t.raw(), "Summarize   ALL.");
        assert_eq!(t.normalized(), "summarize all");
    }

    #[test]
    fn test_exact_commands() {
        assert_eq!(parse("compose"), Some(Command::Compose));
        assert_eq!(parse("Read"), Some(Command::Read));
        assert_eq!(parse("search!"), Some(Command::Search));
        assert_eq!(parse("Exit."), Some(Command::Exit));
        assert_eq!(parse("summarize latest"), Some(Command::SummarizeLatest));
        assert_eq!(parse("List folders"), Some(Command::ListFolders));
        assert_eq!(parse("change folder"), Some(Command::ChangeFolder));
    }

    #[test]
    fn test_no_partial_matches() {
        assert_eq!(parse("compose an email"), None);
        assert_eq!(parse("reading"), None);
        assert_eq!(parse("please exit"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn test_speed_commands_match_as_substrings() {
        assert_eq!(parse("please speed up a bit"), Some(Command::SpeedUp));
        assert_eq!(parse("Slow down!"), Some(Command::SlowDown));
        // Substring rule wins over exact dispatch
        assert_eq!(parse("compose speed up"), Some(Command::SpeedUp));
    }

    #[test]
    fn test_results_commands() {
        assert_eq!(ResultsCommand::parse(&Transcript::new("Next.")), Some(ResultsCommand::Next));
        assert_eq!(ResultsCommand::parse(&Transcript::new("stop")), Some(ResultsCommand::Stop));
        assert_eq!(ResultsCommand::parse(&Transcript::new("stop reading")), None);
    }
}
