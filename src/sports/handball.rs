//! API-Handball v1

use crate::api::{Country, Payload, Season};

sport_api! {
    name: "handball",
    base_url: "https://v1.handball.api-sports.io",
    storage: "handball-api-cache",
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
        STANDING_STAGES: Vec<String> => "standingStages" @ "/standings/stages",
        STANDING_GROUPS: Vec<String> => "standingGroups" @ "/standings/groups",
        GAMES: Payload => "games" @ "/games",
        HEAD_TO_HEAD: Payload => "headToHead" @ "/games/h2h",
        ODDS: Payload => "odds" @ "/odds",
    }
}
