//! API-Basketball v1

use serde_json::Value;

use crate::api::{Country, Payload, Season};

sport_api! {
    name: "basketball",
    base_url: "https://v1.basketball.api-sports.io",
    storage: "basketball-api-cache",
    singleton {
        TIMEZONE: Vec<String> => "timezone" @ "/timezone",
        COUNTRIES: Vec<Country> => "countries" @ "/countries",
        SEASONS: Vec<Season> => "seasons" @ "/seasons",
        BOOKMAKERS: Payload => "bookmakers" @ "/bookmakers",
        BETS: Payload => "bets" @ "/bets",
    }
    keyed {
        LEAGUES: Payload => "leagues" @ "/leagues",
        TEAMS: Payload => "teams" @ "/teams",
        TEAM_STATISTICS: Value => "teamStatistics" @ "/statistics",
        PLAYERS: Payload => "players" @ "/players",
        STANDINGS: Payload => "standings" @ "/standings",
        GAMES: Payload => "games" @ "/games",
        // Head-to-head is a `h2h` filter on /games, cached apart from plain game lists.
        HEAD_TO_HEAD: Payload => "headToHead" @ "/games",
        ODDS: Payload => "odds" @ "/odds",
    }
}
