//! API-MMA v1

use crate::api::{Payload, Season};

sport_api! {
    name: "mma",
    base_url: "https://v1.mma.api-sports.io",
    storage: "mma-api-cache",
    singleton {
        TIMEZONE: Vec<String> => "timezone" @ "/timezone",
        SEASONS: Vec<Season> => "seasons" @ "/seasons",
        CATEGORIES: Vec<String> => "categories" @ "/categories",
        BOOKMAKERS: Payload => "bookmakers" @ "/odds/bookmakers",
        BETS: Payload => "bets" @ "/odds/bets",
    }
    keyed {
        TEAMS: Payload => "teams" @ "/teams",
        FIGHTERS: Payload => "fighters" @ "/fighters",
        FIGHTER_RECORDS: Payload => "fighterRecords" @ "/fighters/records",
        FIGHTS: Payload => "fights" @ "/fights",
        FIGHT_RESULTS: Payload => "fightResults" @ "/fights/results",
        FIGHT_STATISTICS: Payload => "fightStatistics" @ "/fights/statistics/fighters",
        ODDS: Payload => "odds" @ "/odds",
    }
}
