use super::*;
use fd_core::DogId;
use fd_core::Score;
use fd_model::MapId;
use std::collections::HashMap;
use std::time::Duration;

/// Binding of a bearer token to an avatar. Players address their dog by
/// (map id, dog id), never by reference, so sessions stay free to reshuffle
/// their storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub map: MapId,
    pub dog: DogId,
}

impl Player {
    pub fn new(map: MapId, dog: DogId) -> Self {
        Self { map, dog }
    }
}

/// What remains of a player after retirement, bound for the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStats {
    pub name: String,
    pub score: Score,
    pub play_time: Duration,
}

/// Registry of active players keyed by token. The token → player mapping
/// is bijective: every active player owns exactly one token.
#[derive(Debug, Default)]
pub struct Players {
    players: HashMap<Token, Player>,
}

impl Players {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn add(&mut self, token: Token, player: Player) {
        debug_assert!(!self.players.contains_key(&token), "token collision");
        self.players.insert(token, player);
    }
    pub fn find(&self, token: &Token) -> Option<&Player> {
        self.players.get(token)
    }
    /// Unbinds a token. A miss here is a logic fault in the caller, not a
    /// client error; callers log and carry on.
    pub fn remove(&mut self, token: &Token) -> Option<Player> {
        self.players.remove(token)
    }
    pub fn len(&self) -> usize {
        self.players.len()
    }
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
    /// Token/player pairs for retirement scans and snapshotting.
    pub fn pairs(&self) -> Vec<(Token, Player)> {
        self.players
            .iter()
            .map(|(t, p)| (t.clone(), p.clone()))
            .collect()
    }
}
