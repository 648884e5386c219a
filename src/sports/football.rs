//! API-Football v3

use serde_json::Value;

use crate::api::{Country, Payload, Season};

sport_api! {
    name: "football",
    base_url: "https://v3.football.api-sports.io",
    storage: "football-api-cache",
    singleton {
        TIMEZONE: Vec<String> => "timezone" @ "/timezone",
        COUNTRIES: Vec<Country> => "countries" @ "/countries",
        SEASONS: Vec<Season> => "seasons" @ "/leagues/seasons",
    }
    keyed {
        LEAGUES: Payload => "leagues" @ "/leagues",
        TEAMS: Payload => "teams" @ "/teams",
        TEAM_STATISTICS: Value => "teamStatistics" @ "/teams/statistics",
        VENUES: Payload => "venues" @ "/venues",
        STANDINGS: Payload => "standings" @ "/standings",
        ROUNDS: Vec<String> => "rounds" @ "/fixtures/rounds",
        FIXTURES: Payload => "fixtures" @ "/fixtures",
        HEAD_TO_HEAD: Payload => "headToHead" @ "/fixtures/headtohead",
        FIXTURE_STATISTICS: Payload => "fixtureStatistics" @ "/fixtures/statistics",
        FIXTURE_EVENTS: Payload => "fixtureEvents" @ "/fixtures/events",
        FIXTURE_LINEUPS: Payload => "fixtureLineups" @ "/fixtures/lineups",
        PLAYERS: Payload => "players" @ "/players",
        TOP_SCORERS: Payload => "topScorers" @ "/players/topscorers",
        INJURIES: Payload => "injuries" @ "/injuries",
        PREDICTIONS: Payload => "predictions" @ "/predictions",
        ODDS: Payload => "odds" @ "/odds",
    }
}
