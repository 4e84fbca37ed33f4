use crate::format::OutputFormat;

const FORMAT_FLAG: &str = "--format=";

/// Flags and identifier taken from the command tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupArgs {
    pub id: Option<String>,
    pub send: bool,
    pub tag: bool,
    pub show_avatar: bool,
    pub format: Option<OutputFormat>,
}

impl LookupArgs {
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Self {
        let has = |flag: &str| tokens.iter().any(|token| token.as_ref() == flag);

        let send = has("--send");
        // without --send the id has to come first
        let id = if send {
            tokens
                .iter()
                .map(|token| token.as_ref())
                .find(|token| !token.starts_with('-'))
        } else {
            tokens.first().map(|token| token.as_ref())
        };

        LookupArgs {
            id: id.map(str::to_string),
            send,
            tag: !has("--no-tag"),
            show_avatar: has("--show-avatar"),
            format: tokens.iter().find_map(|token| parse_format(token.as_ref())),
        }
    }
}

// `--format=<name>`, flag matched case-insensitively, name is the leading letters.
// An unknown name still counts as a format request and falls back to the default layout.
fn parse_format(token: &str) -> Option<OutputFormat> {
    let prefix = token.get(..FORMAT_FLAG.len())?;
    if !prefix.eq_ignore_ascii_case(FORMAT_FLAG) {
        return None;
    }

    let value = &token[FORMAT_FLAG.len()..];
    let end = value
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(value.len());
    if end == 0 {
        return None;
    }

    Some(value[..end].parse().unwrap_or_default())
}

/// Split a free-text argument into tokens
pub fn tokenize(rest: &str) -> Vec<&str> {
    rest.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_id() {
        let args = LookupArgs::parse(&["175928847299117063"]);
        assert_eq!(
            args,
            LookupArgs {
                id: Some("175928847299117063".to_string()),
                send: false,
                tag: true,
                show_avatar: false,
                format: None,
            }
        );
    }

    #[test]
    fn all_flags_in_any_order() {
        let args = LookupArgs::parse(&["--send", "--no-tag", "42", "--show-avatar", "--format=yaml"]);
        assert_eq!(args.id.as_deref(), Some("42"));
        assert!(args.send);
        assert!(!args.tag);
        assert!(args.show_avatar);
        assert_eq!(args.format, Some(OutputFormat::Yaml));
    }

    #[test]
    fn id_must_lead_without_send() {
        let args = LookupArgs::parse(&["--no-tag", "175928847299117063"]);
        assert_eq!(args.id.as_deref(), Some("--no-tag"));
        assert!(!args.tag);

        assert_eq!(LookupArgs::parse(&["--no-tag"]).id.as_deref(), Some("--no-tag"));
        assert_eq!(
            LookupArgs::parse(&["--send", "--no-tag", "175928847299117063"]).id.as_deref(),
            Some("175928847299117063")
        );
    }

    #[test]
    fn missing_id() {
        assert_eq!(LookupArgs::parse(&["--send", "--format=md"]).id, None);
        assert_eq!(LookupArgs::parse::<&str>(&[]).id, None);
    }

    #[test]
    fn format_flag_variants() {
        assert_eq!(LookupArgs::parse(&["--FORMAT=json"]).format, Some(OutputFormat::Json));
        assert_eq!(LookupArgs::parse(&["--format=raw,"]).format, Some(OutputFormat::Raw));
        // names are case sensitive, unknown ones render with the default layout
        assert_eq!(LookupArgs::parse(&["--format=MD"]).format, Some(OutputFormat::Default));
        assert_eq!(LookupArgs::parse(&["--format=toml"]).format, Some(OutputFormat::Default));
        assert_eq!(LookupArgs::parse(&["--format="]).format, None);
        assert_eq!(LookupArgs::parse(&["--form"]).format, None);
    }

    #[test]
    fn tokenize_collapses_whitespace() {
        assert_eq!(tokenize("  1234 \t--send\n--format=md "), ["1234", "--send", "--format=md"]);
        assert!(tokenize("   ").is_empty());
    }
}
