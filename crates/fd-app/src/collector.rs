use super::*;
use fd_model::Game;

/// Scans for players whose dogs idled past the retirement threshold, evicts
/// them, and returns their final statistics for the leaderboard.
///
/// Runs inside the tick, still under the engine lock, so no new idle time
/// can accrue between the scan and the eviction.
pub fn collect_retired(game: &mut Game, players: &mut Players) -> Vec<PlayerStats> {
    let threshold = game.retirement_time();
    let mut retired = Vec::new();
    for (token, player) in players.pairs() {
        let expired = game
            .session(&player.map)
            .and_then(|session| session.find_dog(player.dog))
            .map(|dog| dog.idle_time() >= threshold)
            .unwrap_or(false);
        if !expired {
            continue;
        }
        let Some(player) = players.remove(&token) else {
            log::error!("[collector] token of dog {} vanished mid-scan", player.dog);
            continue;
        };
        let Some(session) = game.session_mut(&player.map) else {
            continue;
        };
        if let Some(dog) = session.find_dog(player.dog) {
            retired.push(PlayerStats {
                name: dog.name().to_string(),
                score: dog.score(),
                play_time: dog.play_time(),
            });
            log::info!(
                "[collector] retired {} (dog {}) after {:?} idle",
                dog.name(),
                player.dog,
                threshold
            );
        }
        session.remove_dog(player.dog);
    }
    retired
}
