use concord::ledger::{format_events, query_events, EventKind, EventQuery};
use concord::serialization::decode_event_log;
use concord::Principal;
use std::path::Path;
use tracing::debug;

/// Print an exported event log, most recent first
pub async fn execute(
    input: String,
    kind: Option<String>,
    principal: Option<String>,
    limit: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = build_query(kind.as_deref(), principal, limit)?;

    let bytes = std::fs::read(Path::new(&input))
        .map_err(|e| format!("failed to read event log '{}': {}", input, e))?;
    let records = decode_event_log(&bytes)?;
    debug!(input = %input, records = records.len(), "decoded event log");

    let matched = query_events(&records, &query);
    println!("{}", format_events(&matched));
    Ok(())
}

fn build_query(
    kind: Option<&str>,
    principal: Option<String>,
    limit: usize,
) -> Result<EventQuery, String> {
    let kind = kind
        .map(|name| EventKind::parse(name).ok_or_else(|| format!("unknown event kind '{}'", name)))
        .transpose()?;

    Ok(EventQuery {
        kind,
        principal: principal.map(Principal::new),
        after_sequence: None,
        limit: Some(limit),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_parses_kind() {
        let query = build_query(Some("vote-cast"), Some("alice".to_string()), 3).unwrap();
        assert_eq!(query.kind, Some(EventKind::VoteCast));
        assert_eq!(query.principal, Some(Principal::from("alice")));
        assert_eq!(query.limit, Some(3));
    }

    #[test]
    fn test_build_query_rejects_unknown_kind() {
        let err = build_query(Some("vote"), None, 50).unwrap_err();
        assert!(err.contains("unknown event kind"));
    }

    #[tokio::test]
    async fn test_missing_input_fails() {
        let result = execute("/nonexistent/events.cbor".to_string(), None, None, 10).await;
        assert!(result.is_err());
    }
}
