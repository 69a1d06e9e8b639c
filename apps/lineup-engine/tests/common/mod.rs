//! Shared fixtures for integration tests.

#![allow(dead_code)]

use lineup_engine::domain::{PlayerPool, PlayerRecord, SalaryBounds};

/// Teams in the synthetic slate, paired into games as (0,1), (2,3), ...
pub const TEAMS: [&str; 10] = ["KC", "BUF", "SF", "LA", "DAL", "NYG", "PHI", "WAS", "MIA", "NYJ"];

/// Opponent of `TEAMS[t]`.
pub fn opponent(t: usize) -> &'static str {
    TEAMS[t ^ 1]
}

/// 50-player slate: per team one QB, one RB and two WRs, plus a TE on even
/// teams and a DST on odd teams. Salaries cover 3000..=9200; no ownership,
/// smart value or game total columns.
pub fn slate_records() -> Vec<PlayerRecord> {
    let mut rows = Vec::with_capacity(50);
    for (t, team) in TEAMS.iter().enumerate() {
        let fifth = if t % 2 == 0 { ("TE", "TE") } else { ("DST", "DST") };
        let players = [
            ("QB", "QB"),
            ("RB", "RB"),
            ("WR", "WRA"),
            ("WR", "WRB"),
            fifth,
        ];
        for (position, tag) in players {
            let k = rows.len();
            let salary = 3_000 + ((k * 13) % 32) as i64 * 200;
            let projection = salary as f64 / 1_000.0 * 2.0 + (k % 5) as f64 * 0.7;
            rows.push(PlayerRecord::new(
                format!("{team} {tag}"),
                position,
                salary,
                projection,
                *team,
                opponent(t),
            ));
        }
    }
    rows
}

/// The slate as a validated pool.
pub fn slate() -> PlayerPool {
    pool(slate_records())
}

/// Validated pool from arbitrary rows.
pub fn pool(records: Vec<PlayerRecord>) -> PlayerPool {
    PlayerPool::from_records(records, &SalaryBounds::default()).unwrap()
}
