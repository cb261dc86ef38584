use crate::cache::{DEFAULT_TTL, DayCache};
use crate::scores365::{AllScoresResponse, GameResponse, WireCompetitor, WireGame, id_to_string};
use crate::{
    AWAY_PLACEHOLDER, DayOffset, EventRecord, HOME_PLACEHOLDER, UNAVAILABLE, UNKNOWN_CATEGORY,
    UNKNOWN_COMPETITION,
};
use chrono::{DateTime, Local, NaiveDate};
use futures_util::future::join_all;
use log::{debug, warn};
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, REFERER};
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const SCORES365_WS: &str = "https://webws.365scores.com";
const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";
const IMAGE_CACHE: &str = "https://imagecache.365scores.com/image/upload/f_png,w_68,h_68,c_limit,q_auto:eco,dpr_2,d_Competitors:default1.png/v1/Competitors";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

/// Provider settings, read once from the environment.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timezone: String,
    pub cache_ttl: Duration,
    /// Local JSON snapshot used instead of the network; `{offset}` is substituted.
    pub snapshot_path: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: SCORES365_WS.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            cache_ttl: DEFAULT_TTL,
            snapshot_path: None,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            base_url: env("MATCHDAY_API_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            timezone: env("MATCHDAY_TIMEZONE").unwrap_or(defaults.timezone),
            cache_ttl: env("MATCHDAY_CACHE_TTL_SECS")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            snapshot_path: env("MATCHDAY_EVENTS_JSON"),
        }
    }
}

/// Scores client backed by 365Scores' public web endpoints.
#[derive(Debug, Clone)]
pub struct ScoresApi {
    client: Client,
    timeout: Duration,
    config: ApiConfig,
    cache: DayCache,
}

impl Default for ScoresApi {
    fn default() -> Self {
        Self::with_config(ApiConfig::default())
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ScoresApi {
    pub fn new() -> Self {
        Self::with_config(ApiConfig::from_env())
    }

    pub fn with_config(config: ApiConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert(REFERER, HeaderValue::from_static("https://www.365scores.com/"));

        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .default_headers(headers)
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(10),
            cache: DayCache::new(config.cache_ttl),
            config,
        }
    }

    /// Fetch the normalised event list for the day at `offset` from today.
    ///
    /// Source order:
    /// 1) `MATCHDAY_EVENTS_JSON` snapshot, a JSON array of records on disk.
    /// 2) Per-day cache, while the entry is younger than the TTL.
    /// 3) 365Scores day listing + one detail request per game.
    pub async fn fetch_events(&self, offset: DayOffset) -> ApiResult<Vec<EventRecord>> {
        if let Some(path) = self.config.snapshot_path.as_deref() {
            return load_snapshot(path, offset);
        }

        let day = offset.date(Local::now().date_naive());
        if let Some(events) = self.cache.get(day) {
            debug!("serving {} cached events for {day}", events.len());
            return Ok(events);
        }

        let events = self.fetch_day(day).await?;
        self.cache.insert(day, events.clone());
        Ok(events)
    }

    async fn fetch_day(&self, day: NaiveDate) -> ApiResult<Vec<EventRecord>> {
        let url = format!(
            "{}/web/games/allscores/?appTypeId=5&langId=31&timezoneName={}&userCountryId=21&date={}",
            self.config.base_url,
            self.config.timezone,
            day.format("%Y-%m-%d")
        );
        let listing: AllScoresResponse = self.get(&url).await?;
        let game_ids: Vec<String> = listing
            .games
            .unwrap_or_default()
            .iter()
            .filter_map(|g| g.id.as_ref().and_then(id_to_string))
            .collect();
        debug!("{} games listed for {day}", game_ids.len());

        let details = join_all(game_ids.iter().map(|id| self.fetch_event(id))).await;
        let events = game_ids
            .iter()
            .zip(details)
            .filter_map(|(id, detail)| match detail {
                Ok(event) => event,
                Err(e) => {
                    warn!("dropping game {id}: {e}");
                    None
                }
            })
            .collect();
        Ok(events)
    }

    /// Fetch a single game's detail and normalise it. `Ok(None)` when the provider has no game body.
    async fn fetch_event(&self, game_id: &str) -> ApiResult<Option<EventRecord>> {
        let url = format!(
            "{}/web/game/?appTypeId=5&langId=31&timezoneName={}&userCountryId=21&gameId={game_id}&topBookmaker=156",
            self.config.base_url, self.config.timezone
        );
        let raw: GameResponse = self.get(&url).await?;
        Ok(normalize_game(game_id, raw))
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

fn load_snapshot(path: &str, offset: DayOffset) -> ApiResult<Vec<EventRecord>> {
    let path = path.replace("{offset}", &offset.value().to_string());
    let content = std::fs::read_to_string(&path)
        .map_err(|e| ApiError::NotFound(format!("could not read {path}: {e}")))?;
    let events: Vec<EventRecord> = serde_json::from_str(&content)
        .map_err(|e| ApiError::Other(format!("invalid events json at {path}: {e}")))?;
    Ok(events.into_iter().filter(|e| !e.id.trim().is_empty()).collect())
}

// ---------------------------------------------------------------------------
// Mapping: 365Scores wire types → EventRecord
// ---------------------------------------------------------------------------

fn normalize_game(game_id: &str, raw: GameResponse) -> Option<EventRecord> {
    let game = raw.game?;
    let id = game
        .id
        .as_ref()
        .and_then(id_to_string)
        .unwrap_or_else(|| game_id.trim().to_string());
    if id.is_empty() {
        return None;
    }

    let category = raw
        .sports
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|s| non_blank(s.name))
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());

    let WireGame {
        competition_display_name,
        start_time,
        home_competitor,
        away_competitor,
        tv_networks,
        ..
    } = game;

    Some(EventRecord {
        id,
        category,
        sub_category: non_blank(competition_display_name)
            .unwrap_or_else(|| UNKNOWN_COMPETITION.to_string()),
        home_participant: competitor_name(home_competitor.as_ref(), HOME_PLACEHOLDER),
        away_participant: competitor_name(away_competitor.as_ref(), AWAY_PLACEHOLDER),
        home_participant_image: competitor_image(home_competitor.as_ref()),
        away_participant_image: competitor_image(away_competitor.as_ref()),
        start_time: start_time
            .as_deref()
            .and_then(format_start_time)
            .unwrap_or_else(|| UNAVAILABLE.to_string()),
        broadcast_channels: join_networks(tv_networks.unwrap_or_default()),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn competitor_name(competitor: Option<&WireCompetitor>, placeholder: &str) -> String {
    competitor
        .and_then(|c| non_blank(c.name.clone()))
        .unwrap_or_else(|| placeholder.to_string())
}

fn competitor_image(competitor: Option<&WireCompetitor>) -> Option<String> {
    let id = competitor?.id.as_ref().and_then(id_to_string)?;
    Some(format!("{IMAGE_CACHE}/{id}"))
}

/// Render an RFC 3339 instant as `DD/MM/YYYY HH:MM:SS`, keeping the provider's offset
/// (the one for the timezone we asked for).
fn format_start_time(raw: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.format("%d/%m/%Y %H:%M:%S").to_string())
}

fn join_networks(networks: Vec<crate::scores365::WireTvNetwork>) -> String {
    let names: Vec<String> = networks
        .into_iter()
        .filter_map(|n| non_blank(n.name))
        .collect();
    if names.is_empty() {
        UNAVAILABLE.to_string()
    } else {
        names.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn detail_json(id: u64, sport: &str, league: &str) -> String {
        format!(
            r#"{{
                "game": {{
                    "id": {id},
                    "competitionDisplayName": "{league}",
                    "startTime": "2026-10-17T16:00:00-03:00",
                    "homeCompetitor": {{ "id": 131, "name": "Flamengo" }},
                    "awayCompetitor": {{ "id": 1209, "name": "Palmeiras" }},
                    "tvNetworks": [{{ "name": "Globo" }}, {{ "name": "Premiere" }}]
                }},
                "sports": [{{ "id": 1, "name": "{sport}" }}]
            }}"#
        )
    }

    fn mock_config(server: &mockito::Server) -> ApiConfig {
        ApiConfig { base_url: server.url(), ..ApiConfig::default() }
    }

    #[test]
    fn normalize_game_maps_all_fields() {
        let raw: GameResponse =
            serde_json::from_str(&detail_json(4123, "Football", "Brasileirão Série A")).unwrap();
        let event = normalize_game("4123", raw).unwrap();
        assert_eq!(event.id, "4123");
        assert_eq!(event.category, "Football");
        assert_eq!(event.sub_category, "Brasileirão Série A");
        assert_eq!(event.home_participant, "Flamengo");
        assert_eq!(event.away_participant, "Palmeiras");
        assert_eq!(event.start_time, "17/10/2026 16:00:00");
        assert_eq!(event.broadcast_channels, "Globo, Premiere");
        assert!(event.home_participant_image.unwrap().ends_with("/Competitors/131"));
    }

    #[test]
    fn normalize_game_substitutes_sentinels() {
        let raw: GameResponse = serde_json::from_str(r#"{ "game": { "tvNetworks": [] } }"#).unwrap();
        let event = normalize_game("77", raw).unwrap();
        assert_eq!(event.id, "77");
        assert_eq!(event.category, UNKNOWN_CATEGORY);
        assert_eq!(event.sub_category, UNKNOWN_COMPETITION);
        assert_eq!(event.home_participant, HOME_PLACEHOLDER);
        assert_eq!(event.away_participant, AWAY_PLACEHOLDER);
        assert!(event.home_participant_image.is_none());
        assert_eq!(event.start_time, UNAVAILABLE);
        assert_eq!(event.broadcast_channels, UNAVAILABLE);
    }

    #[test]
    fn normalize_game_without_body_is_dropped() {
        assert!(normalize_game("1", GameResponse::default()).is_none());
    }

    #[test]
    fn unparseable_start_time_becomes_unavailable() {
        assert_eq!(format_start_time("tomorrow-ish"), None);
        assert_eq!(
            format_start_time("2026-01-05T09:30:00+00:00").as_deref(),
            Some("05/01/2026 09:30:00")
        );
    }

    #[test]
    fn string_ids_are_accepted() {
        let raw: GameResponse = serde_json::from_str(r#"{ "game": { "id": "abc" } }"#).unwrap();
        assert_eq!(normalize_game("ignored", raw).unwrap().id, "abc");
    }

    #[tokio::test]
    async fn fetch_events_lists_then_loads_details() {
        let mut server = mockito::Server::new_async().await;
        let listing = server
            .mock("GET", Matcher::Regex(r"^/web/games/allscores/".into()))
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{ "games": [ { "id": 1 }, { "id": null }, { "id": 2 } ] }"#)
            .expect(1)
            .create_async()
            .await;
        let first = server
            .mock("GET", Matcher::Regex(r"^/web/game/".into()))
            .match_query(Matcher::UrlEncoded("gameId".into(), "1".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(detail_json(1, "Football", "League X"))
            .create_async()
            .await;
        let second = server
            .mock("GET", Matcher::Regex(r"^/web/game/".into()))
            .match_query(Matcher::UrlEncoded("gameId".into(), "2".into()))
            .with_status(500)
            .create_async()
            .await;

        let api = ScoresApi::with_config(mock_config(&server));
        let events = api.fetch_events(DayOffset::TODAY).await.unwrap();
        assert_eq!(events.len(), 1, "failed detail should be dropped, not fail the day");
        assert_eq!(events[0].id, "1");
        assert_eq!(events[0].sub_category, "League X");

        // Second call is served from the per-day cache.
        let again = api.fetch_events(DayOffset::TODAY).await.unwrap();
        assert_eq!(again, events);

        listing.assert_async().await;
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn listing_server_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _listing = server
            .mock("GET", Matcher::Regex(r"^/web/games/allscores/".into()))
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let api = ScoresApi::with_config(mock_config(&server));
        let err = api.fetch_events(DayOffset::TOMORROW).await.unwrap_err();
        assert!(matches!(err, ApiError::Api(_, _)), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn listing_client_error_yields_empty_day() {
        let mut server = mockito::Server::new_async().await;
        let _listing = server
            .mock("GET", Matcher::Regex(r"^/web/games/allscores/".into()))
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let api = ScoresApi::with_config(mock_config(&server));
        let events = api.fetch_events(DayOffset::YESTERDAY).await.unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn snapshot_substitutes_offset_and_drops_blank_ids() {
        let dir = std::env::temp_dir().join(format!("matchday-snapshot-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("events_-1.json");
        std::fs::write(
            &path,
            r#"[ { "id": "7", "category": "Tennis" }, { "id": "  " }, { "category": "Football" }, { "id": 42 } ]"#,
        )
        .unwrap();

        let config = ApiConfig {
            snapshot_path: Some(dir.join("events_{offset}.json").display().to_string()),
            ..ApiConfig::default()
        };
        let api = ScoresApi::with_config(config);
        let events = api.fetch_events(DayOffset::YESTERDAY).await.unwrap();
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["7", "42"]);
        assert_eq!(events[0].category, "Tennis");

        let missing = api.fetch_events(DayOffset::TODAY).await.unwrap_err();
        assert!(matches!(missing, ApiError::NotFound(_)));

        let _ = std::fs::remove_dir_all(dir);
    }
}
