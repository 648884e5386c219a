//! API-American-Football v1 (NFL and NCAA)

use crate::api::{Payload, Season};

sport_api! {
    name: "nfl",
    base_url: "https://v1.american-football.api-sports.io",
    storage: "nfl-api-cache",
    singleton {
        TIMEZONE: Vec<String> => "timezone" @ "/timezone",
        SEASONS: Vec<Season> => "seasons" @ "/seasons",
        BOOKMAKERS: Payload => "bookmakers" @ "/odds/bookmakers",
        BETS: Payload => "bets" @ "/odds/bets",
    }
    keyed {
        LEAGUES: Payload => "leagues" @ "/leagues",
        TEAMS: Payload => "teams" @ "/teams",
        PLAYERS: Payload => "players" @ "/players",
        PLAYER_STATISTICS: Payload => "playerStatistics" @ "/players/statistics",
        INJURIES: Payload => "injuries" @ "/injuries",
        STANDINGS: Payload => "standings" @ "/standings",
        STANDING_CONFERENCES: Vec<String> => "standingConferences" @ "/standings/conferences",
        STANDING_DIVISIONS: Vec<String> => "standingDivisions" @ "/standings/divisions",
        GAMES: Payload => "games" @ "/games",
        GAME_EVENTS: Payload => "gameEvents" @ "/games/events",
        GAME_TEAM_STATISTICS: Payload => "gameTeamStatistics" @ "/games/statistics/teams",
        GAME_PLAYER_STATISTICS: Payload => "gamePlayerStatistics" @ "/games/statistics/players",
        ODDS: Payload => "odds" @ "/odds",
    }
}
