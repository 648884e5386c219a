//! API-Formula-1 v1

use crate::api::{Payload, Season};

sport_api! {
    name: "formula1",
    base_url: "https://v1.formula-1.api-sports.io",
    storage: "formula1-api-cache",
    singleton {
        TIMEZONE: Vec<String> => "timezone" @ "/timezone",
        SEASONS: Vec<Season> => "seasons" @ "/seasons",
    }
    keyed {
        COMPETITIONS: Payload => "competitions" @ "/competitions",
        CIRCUITS: Payload => "circuits" @ "/circuits",
        TEAMS: Payload => "teams" @ "/teams",
        DRIVERS: Payload => "drivers" @ "/drivers",
        RACES: Payload => "races" @ "/races",
        TEAM_RANKINGS: Payload => "teamRankings" @ "/rankings/teams",
        DRIVER_RANKINGS: Payload => "driverRankings" @ "/rankings/drivers",
        RACE_RANKINGS: Payload => "raceRankings" @ "/rankings/races",
        FASTEST_LAPS: Payload => "fastestLaps" @ "/rankings/fastestlaps",
        STARTING_GRID: Payload => "startingGrid" @ "/rankings/startinggrid",
        PIT_STOPS: Payload => "pitStops" @ "/pitstops",
    }
}
