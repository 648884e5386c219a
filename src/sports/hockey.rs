//! API-Hockey v1

use crate::api::{Country, Payload, Season};

sport_api! {
    name: "hockey",
    base_url: "https://v1.hockey.api-sports.io",
    storage: "hockey-api-cache",
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
        TEAM_STATISTICS: serde_json::Value => "teamStatistics" @ "/teams/statistics",
        STANDINGS: Payload => "standings" @ "/standings",
        GAMES: Payload => "games" @ "/games",
        GAME_EVENTS: Payload => "gameEvents" @ "/games/events",
        HEAD_TO_HEAD: Payload => "headToHead" @ "/games/h2h",
        ODDS: Payload => "odds" @ "/odds",
    }
}
