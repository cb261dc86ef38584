use serde::Deserialize;

/// Startup parameters carried by a shared link: `q` seeds the search, `game` opens one event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeepLink {
    #[serde(default, rename = "q")]
    pub search_query: Option<String>,
    #[serde(default, rename = "game")]
    pub event_id: Option<String>,
}

impl DeepLink {
    /// Parse `q=...&game=...`, with or without a leading `?` or URL prefix.
    /// Unreadable input yields an empty link rather than an error.
    pub fn parse(input: &str) -> Self {
        let query = query_part(input.trim());
        let query = query.split('#').next().unwrap_or_default();

        let link: DeepLink = serde_urlencoded::from_str(query).unwrap_or_else(|e| {
            log::warn!("ignoring unreadable deep link {input:?}: {e}");
            DeepLink::default()
        });
        link.normalized()
    }

    /// First CLI argument, else `MATCHDAY_LINK`.
    pub fn from_args_or_env(arg: Option<String>) -> Self {
        arg.or_else(|| std::env::var("MATCHDAY_LINK").ok())
            .map(|raw| Self::parse(&raw))
            .unwrap_or_default()
    }

    fn normalized(self) -> Self {
        let keep = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            search_query: keep(self.search_query),
            event_id: keep(self.event_id),
        }
    }
}

/// Strip a leading `?` or a URL/path prefix. A `?` after the first `=` belongs to a value.
fn query_part(input: &str) -> &str {
    if let Some(query) = input.strip_prefix('?') {
        return query;
    }
    match input.split_once('?') {
        Some((prefix, query)) if !prefix.contains('=') => query,
        _ => input,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_query_string() {
        let link = DeepLink::parse("q=flamengo&game=4123");
        assert_eq!(link.search_query.as_deref(), Some("flamengo"));
        assert_eq!(link.event_id.as_deref(), Some("4123"));
    }

    #[test]
    fn accepts_full_urls_and_encoding() {
        let link = DeepLink::parse("https://example.com/?q=S%C3%A3o+Paulo&utm=x#top");
        assert_eq!(link.search_query.as_deref(), Some("São Paulo"));
        assert_eq!(link.event_id, None);
    }

    #[test]
    fn question_mark_inside_a_value_is_kept() {
        let link = DeepLink::parse("q=who?&game=9");
        assert_eq!(link.search_query.as_deref(), Some("who?"));
        assert_eq!(link.event_id.as_deref(), Some("9"));

        let link = DeepLink::parse("https://example.com/live?q=who?");
        assert_eq!(link.search_query.as_deref(), Some("who?"));

        let link = DeepLink::parse("?q=10:00?");
        assert_eq!(link.search_query.as_deref(), Some("10:00?"));
    }

    #[test]
    fn empty_values_are_absent() {
        assert_eq!(DeepLink::parse("?q=&game=%20"), DeepLink::default());
        assert_eq!(DeepLink::parse(""), DeepLink::default());
    }
}
