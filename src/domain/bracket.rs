use crate::error::{Result, TiercadeError};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A participant identifier in a battle run.
pub type Entrant = String;

/// Current phase of a battle run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Setup,
    Battling,
    Complete,
}

/// A pairing of two entrants. `b == None` is a bye: the sole entrant wins
/// unopposed and the winner is preset at generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub a: Entrant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<Entrant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Entrant>,
}

impl Match {
    fn pair(a: Entrant, b: Entrant) -> Self {
        Self {
            a,
            b: Some(b),
            winner: None,
        }
    }

    fn bye(a: Entrant) -> Self {
        Self {
            winner: Some(a.clone()),
            a,
            b: None,
        }
    }

    pub fn is_bye(&self) -> bool {
        self.b.is_none()
    }

    pub fn involves(&self, name: &str) -> bool {
        self.a == name || self.b.as_deref() == Some(name)
    }

    /// The eliminated entrant, once a winner is recorded. Byes have none.
    pub fn loser(&self) -> Option<&Entrant> {
        let winner = self.winner.as_ref()?;
        let b = self.b.as_ref()?;
        if winner == &self.a {
            Some(b)
        } else {
            Some(&self.a)
        }
    }
}

/// One single-elimination battle run.
///
/// Entrants are shuffled into consecutive pairs each round; no seeding
/// survives from round to round. The final ranking puts the champion first,
/// then each round's losers, later-resolved matches first within a round.
/// Placement among same-round losers is shuffle-determined, not a
/// performance signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bracket {
    pub id: Uuid,
    phase: Phase,
    rounds: Vec<Vec<Match>>,
    current_round: usize,
    current_match: usize,
    eliminated: Vec<Entrant>,
    ranking: Vec<Entrant>,
}

impl Default for Bracket {
    fn default() -> Self {
        Self::new()
    }
}

impl Bracket {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: Phase::Setup,
            rounds: Vec::new(),
            current_round: 0,
            current_match: 0,
            eliminated: Vec::new(),
            ranking: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rounds(&self) -> &[Vec<Match>] {
        &self.rounds
    }

    /// 1-based number of the round being played.
    pub fn round_number(&self) -> usize {
        self.current_round + 1
    }

    /// Rough total round count shown by the wizard, `ceil(log2(n))`.
    pub fn estimated_rounds(entrant_count: usize) -> usize {
        if entrant_count < 2 {
            return 0;
        }
        (usize::BITS - (entrant_count - 1).leading_zeros()) as usize
    }

    /// `(resolved, total)` for the round being played.
    pub fn match_progress(&self) -> (usize, usize) {
        match self.rounds.get(self.current_round) {
            Some(round) => (
                round.iter().filter(|m| m.winner.is_some()).count(),
                round.len(),
            ),
            None => (0, 0),
        }
    }

    /// The match awaiting a winner, while battling.
    pub fn current_match(&self) -> Option<&Match> {
        if self.phase != Phase::Battling {
            return None;
        }
        self.rounds.get(self.current_round)?.get(self.current_match)
    }

    /// Final ordering, champion first. Empty until the run completes.
    pub fn ranking(&self) -> &[Entrant] {
        &self.ranking
    }

    /// Shuffles entrants and pairs them consecutively; an odd leftover
    /// receives a bye resolved on the spot.
    fn build_round(mut entrants: Vec<Entrant>) -> Vec<Match> {
        entrants.shuffle(&mut rand::rng());
        let mut matches = Vec::with_capacity(entrants.len().div_ceil(2));
        let mut it = entrants.into_iter();
        while let Some(a) = it.next() {
            match it.next() {
                Some(b) => matches.push(Match::pair(a, b)),
                None => matches.push(Match::bye(a)),
            }
        }
        matches
    }

    fn first_unresolved(round: &[Match], after: usize) -> Option<usize> {
        round
            .iter()
            .enumerate()
            .skip(after)
            .find(|(_, m)| m.winner.is_none())
            .map(|(i, _)| i)
    }

    /// Starts a run with the given entrants. Refused with fewer than two;
    /// the bracket then stays in `Setup`.
    pub fn start(&mut self, entrants: Vec<Entrant>) -> Result<()> {
        if self.phase != Phase::Setup {
            return Err(TiercadeError::InvalidPhase);
        }
        if entrants.len() < 2 {
            return Err(TiercadeError::NotEnoughEntrants);
        }

        let round = Self::build_round(entrants);
        self.current_match = Self::first_unresolved(&round, 0).unwrap_or(0);
        self.rounds.push(round);
        self.current_round = 0;
        self.phase = Phase::Battling;
        Ok(())
    }

    /// Records the winner of the current match and advances the run:
    /// to the next unresolved match, to a freshly shuffled round of this
    /// round's winners, or to completion.
    pub fn record_winner(&mut self, winner: &str) -> Result<Phase> {
        if self.phase != Phase::Battling {
            return Err(TiercadeError::InvalidPhase);
        }

        let round = &mut self.rounds[self.current_round];
        let current = &mut round[self.current_match];
        if !current.involves(winner) {
            return Err(TiercadeError::NotInCurrentMatch(winner.to_string()));
        }
        current.winner = Some(winner.to_string());

        if let Some(next) = Self::first_unresolved(round, self.current_match + 1) {
            self.current_match = next;
            return Ok(self.phase);
        }

        // Round fully resolved.
        let winners: Vec<Entrant> = round.iter().filter_map(|m| m.winner.clone()).collect();
        let mut losers: Vec<Entrant> = round.iter().filter_map(|m| m.loser().cloned()).collect();
        losers.reverse();

        if winners.len() == 1 {
            let mut ranking = winners;
            ranking.extend(losers);
            ranking.append(&mut self.eliminated);
            self.ranking = ranking;
            self.phase = Phase::Complete;
            return Ok(self.phase);
        }

        self.eliminated.extend(losers);
        let next_round = Self::build_round(winners);
        self.current_match = Self::first_unresolved(&next_round, 0).unwrap_or(0);
        self.rounds.push(next_round);
        self.current_round += 1;
        Ok(self.phase)
    }

    /// Returns to `Setup`, discarding all round and ranking state.
    pub fn reset(&mut self) {
        self.phase = Phase::Setup;
        self.rounds.clear();
        self.current_round = 0;
        self.current_match = 0;
        self.eliminated.clear();
        self.ranking.clear();
    }
}
