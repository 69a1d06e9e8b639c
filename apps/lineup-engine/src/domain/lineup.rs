//! Lineup aggregate.
//!
//! A lineup is exactly nine distinct players in fixed slots. Construction
//! always goes through canonical slot assignment so that the same set of
//! players produces the same slot layout no matter the input order.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::errors::ValidationError;
use super::player::{Player, Position};

/// Default site salary cap.
pub const DEFAULT_SALARY_CAP: u32 = 50_000;

/// Players per lineup.
pub const ROSTER_SIZE: usize = 9;

/// Roster slot, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Slot {
    /// Quarterback.
    Qb,
    /// First running back.
    Rb1,
    /// Second running back.
    Rb2,
    /// First wide receiver.
    Wr1,
    /// Second wide receiver.
    Wr2,
    /// Third wide receiver.
    Wr3,
    /// Tight end.
    Te,
    /// RB, WR or TE.
    Flex,
    /// Defense.
    Dst,
}

impl Slot {
    /// Every slot in roster order.
    pub const ALL: [Self; ROSTER_SIZE] = [
        Self::Qb,
        Self::Rb1,
        Self::Rb2,
        Self::Wr1,
        Self::Wr2,
        Self::Wr3,
        Self::Te,
        Self::Flex,
        Self::Dst,
    ];

    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Qb => "QB",
            Self::Rb1 | Self::Rb2 => "RB",
            Self::Wr1 | Self::Wr2 | Self::Wr3 => "WR",
            Self::Te => "TE",
            Self::Flex => "FLEX",
            Self::Dst => "DST",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Nine players in canonical slots.
#[derive(Debug, Clone)]
pub struct Lineup {
    lineup_id: u32,
    slots: [Arc<Player>; ROSTER_SIZE],
}

impl Lineup {
    /// Assign `players` to slots and check the roster invariants.
    ///
    /// Each position group is ordered by projection (highest first, name as
    /// the tie-break). QB and DST fill directly, RB1/RB2, WR1-WR3 and TE take
    /// the top of their groups and FLEX takes the best remaining RB/WR/TE.
    pub fn from_players(
        lineup_id: u32,
        players: Vec<Arc<Player>>,
        salary_cap: u32,
    ) -> Result<Self, ValidationError> {
        if players.len() != ROSTER_SIZE {
            return Err(ValidationError::lineup(format!(
                "expected {ROSTER_SIZE} players, got {}",
                players.len()
            )));
        }

        let mut names = HashSet::new();
        for p in &players {
            if !names.insert(p.name()) {
                return Err(ValidationError::lineup(format!(
                    "duplicate player '{}'",
                    p.name()
                )));
            }
        }

        let group = |position: Position| {
            let mut group: Vec<Arc<Player>> = players
                .iter()
                .filter(|p| p.position() == position)
                .cloned()
                .collect();
            group.sort_by(by_projection_desc);
            group
        };

        let qbs = group(Position::Qb);
        let rbs = group(Position::Rb);
        let wrs = group(Position::Wr);
        let tes = group(Position::Te);
        let dsts = group(Position::Dst);

        check_count("QB", qbs.len(), 1, 1)?;
        check_count("DST", dsts.len(), 1, 1)?;
        check_count("RB", rbs.len(), 2, 3)?;
        check_count("WR", wrs.len(), 3, 4)?;
        check_count("TE", tes.len(), 1, 2)?;

        let mut leftovers: Vec<Arc<Player>> = rbs[2..]
            .iter()
            .chain(&wrs[3..])
            .chain(&tes[1..])
            .cloned()
            .collect();
        leftovers.sort_by(by_projection_desc);
        if leftovers.len() != 1 {
            return Err(ValidationError::lineup(format!(
                "RB+WR+TE must total 7, got {}",
                rbs.len() + wrs.len() + tes.len()
            )));
        }

        let slots = [
            Arc::clone(&qbs[0]),
            Arc::clone(&rbs[0]),
            Arc::clone(&rbs[1]),
            Arc::clone(&wrs[0]),
            Arc::clone(&wrs[1]),
            Arc::clone(&wrs[2]),
            Arc::clone(&tes[0]),
            Arc::clone(&leftovers[0]),
            Arc::clone(&dsts[0]),
        ];

        let lineup = Self { lineup_id, slots };
        lineup.validate(salary_cap)?;
        Ok(lineup)
    }

    /// Lineup number within its batch (1-based).
    pub const fn lineup_id(&self) -> u32 {
        self.lineup_id
    }

    /// Player in `slot`.
    pub fn slot(&self, slot: Slot) -> &Arc<Player> {
        &self.slots[slot.index()]
    }

    /// Players in slot order.
    pub fn players(&self) -> impl Iterator<Item = &Arc<Player>> {
        self.slots.iter()
    }

    /// `(slot, player)` pairs in slot order.
    pub fn assignments(&self) -> impl Iterator<Item = (Slot, &Arc<Player>)> {
        Slot::ALL.into_iter().zip(self.slots.iter())
    }

    /// Sum of salaries.
    pub fn total_salary(&self) -> u32 {
        self.slots.iter().map(|p| p.salary()).sum()
    }

    /// Sum of projections.
    pub fn total_projection(&self) -> f64 {
        self.slots.iter().map(|p| p.projection()).sum()
    }

    /// Unused cap space.
    pub fn salary_remaining(&self, salary_cap: u32) -> i64 {
        i64::from(salary_cap) - i64::from(self.total_salary())
    }

    /// Player names sorted alphabetically. Two lineups with the same players
    /// share this key regardless of slot layout.
    pub fn roster_key(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.slots.iter().map(|p| p.name()).collect();
        names.sort_unstable();
        names
    }

    /// True if the named player is rostered.
    pub fn contains(&self, name: &str) -> bool {
        self.slots.iter().any(|p| p.name() == name)
    }

    /// Number of players in common with `other`.
    pub fn shared_with(&self, other: &Self) -> usize {
        self.slots
            .iter()
            .filter(|p| other.contains(p.name()))
            .count()
    }

    /// Re-check the invariants that depend on the site cap.
    pub fn validate(&self, salary_cap: u32) -> Result<(), ValidationError> {
        let salary = self.total_salary();
        if salary > salary_cap {
            return Err(ValidationError::lineup(format!(
                "salary {salary} exceeds cap {salary_cap}"
            )));
        }
        if !self.slot(Slot::Flex).position().is_flex_eligible() {
            return Err(ValidationError::lineup("FLEX must be RB, WR or TE"));
        }
        Ok(())
    }
}

impl fmt::Display for Lineup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Lineup #{} (Salary: ${}, Projection: {:.2})",
            self.lineup_id,
            self.total_salary(),
            self.total_projection()
        )?;
        for (slot, player) in self.assignments() {
            writeln!(
                f,
                "  {:<4} {:<24} {:<4} ${:>5}  {:>6.2}",
                slot.label(),
                player.name(),
                player.team(),
                player.salary(),
                player.projection()
            )?;
        }
        Ok(())
    }
}

fn by_projection_desc(a: &Arc<Player>, b: &Arc<Player>) -> Ordering {
    b.projection()
        .total_cmp(&a.projection())
        .then_with(|| a.name().cmp(b.name()))
}

fn check_count(
    label: &str,
    count: usize,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    if (min..=max).contains(&count) {
        Ok(())
    } else {
        Err(ValidationError::lineup(format!(
            "{label} count {count} outside [{min}, {max}]"
        )))
    }
}
