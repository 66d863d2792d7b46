//! The JSON adapter: structured pass-through for programmatic callers.

use crate::{complete::Completions, error};

/// Parses a JSON array of argument vectors.
pub(super) fn parse_requests(input: &str) -> Result<Vec<Vec<String>>, error::Error> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    let requests: Vec<Vec<String>> = serde_json::from_str(input).map_err(|err| {
        error::ErrorKind::BadCompletionRequest(err.to_string())
    })?;
    Ok(requests)
}

/// Serializes the completion results as a JSON array.
pub(super) fn serialize(results: &[Completions]) -> Result<String, error::Error> {
    let mut rendered = serde_json::to_string_pretty(results)?;
    rendered.push('\n');
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complete::MatchGroup;
    use anyhow::Result;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_requests() -> Result<()> {
        let requests = parse_requests(r#"[["app", "ch"], ["app", ""]]"#)?;
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], vec!["app", "ch"]);
        Ok(())
    }

    #[test]
    fn test_parse_empty_input() -> Result<()> {
        assert!(parse_requests("")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_malformed_input() {
        let err = parse_requests("not json").unwrap_err();
        assert!(err.to_string().contains("malformed completion request"));
    }

    #[test]
    fn test_round_trip_through_json() -> Result<()> {
        let mut group = MatchGroup {
            title: String::from("Subcommands"),
            ..MatchGroup::default()
        };
        group.add("child1", "First child");

        let completions = Completions {
            groups: vec![group],
            all_words: vec![String::from("app"), String::from("ch")],
            current_word_idx: 1,
            ..Completions::default()
        };

        let rendered = serialize(&[completions])?;
        let parsed: serde_json::Value = serde_json::from_str(&rendered)?;
        assert_eq!(parsed[0]["groups"][0]["matches"][0]["word"], "child1");
        assert_eq!(parsed[0]["current_word_idx"], 1);
        Ok(())
    }
}
