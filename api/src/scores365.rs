/// 365Scores raw wire types: serde shapes for deserializing provider responses.
/// These map to the clean `EventRecord` via the normalisation in client.rs.
use serde::Deserialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Day listing  (/web/games/allscores/)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct AllScoresResponse {
    pub games: Option<Vec<GameSummary>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GameSummary {
    pub id: Option<Value>,
}

// ---------------------------------------------------------------------------
// Game detail  (/web/game/)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GameResponse {
    pub game: Option<WireGame>,
    pub sports: Option<Vec<WireSport>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireGame {
    pub id: Option<Value>,
    pub competition_display_name: Option<String>,
    pub start_time: Option<String>, // ISO 8601 with the requested timezone's offset
    pub home_competitor: Option<WireCompetitor>,
    pub away_competitor: Option<WireCompetitor>,
    pub tv_networks: Option<Vec<WireTvNetwork>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireCompetitor {
    pub id: Option<Value>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireTvNetwork {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireSport {
    pub name: Option<String>,
}

/// The provider sends ids as numbers on some endpoints and strings on others.
pub fn id_to_string(id: &Value) -> Option<String> {
    match id {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}
