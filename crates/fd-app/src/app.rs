use super::*;
use crate::collector::collect_retired;
use fd_core::DogId;
use fd_core::LootId;
use fd_core::LootType;
use fd_core::RECORDS_PAGE_LIMIT;
use fd_core::Score;
use fd_db::RecordStore;
use fd_db::RetiredRecord;
use fd_geom::Point2;
use fd_geom::Vec2;
use fd_model::BagItem;
use fd_model::Direction;
use fd_model::Game;
use fd_model::Map;
use fd_model::MapId;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Map directory entry.
#[derive(Debug, Clone)]
pub struct MapHead {
    pub id: MapId,
    pub name: String,
}

/// Result of a successful join: the credential and the public player id.
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub token: Token,
    pub player: DogId,
}

/// Co-player directory entry.
#[derive(Debug, Clone)]
pub struct PlayerHead {
    pub id: DogId,
    pub name: String,
}

/// By-value copy of one dog for state reads.
#[derive(Debug, Clone)]
pub struct DogView {
    pub id: DogId,
    pub position: Point2,
    pub velocity: Vec2,
    pub facing: Direction,
    pub bag: Vec<BagItem>,
    pub score: Score,
}

/// By-value copy of one loot item for state reads.
#[derive(Debug, Clone)]
pub struct LootView {
    pub id: LootId,
    pub kind: LootType,
    pub position: Point2,
}

/// Everything a client may observe about its session.
#[derive(Debug, Clone, Default)]
pub struct StateView {
    pub dogs: Vec<DogView>,
    pub loots: Vec<LootView>,
}

/// All state behind the single engine lock. Mutations and live reads both
/// take it; nothing inside ever suspends except leaderboard appends, which
/// stay under the lock so a tick is atomic relative to REST traffic.
struct EngineState {
    game: Game,
    players: Players,
    saver: Option<Saver>,
}

/// Facade over every game use case. One logical writer: REST handlers and
/// the tick scheduler all funnel through here.
pub struct Application {
    state: Mutex<EngineState>,
    store: Arc<dyn RecordStore>,
    randomize_spawn: bool,
}

impl Application {
    pub fn new(game: Game, store: Arc<dyn RecordStore>, randomize_spawn: bool) -> Self {
        Self {
            state: Mutex::new(EngineState {
                game,
                players: Players::new(),
                saver: None,
            }),
            store,
            randomize_spawn,
        }
    }
    /// Installs the periodic snapshot hook.
    pub async fn install_saver(&self, saver: Saver) {
        self.state.lock().await.saver = Some(saver);
    }
    /// Restores a persisted image if one exists. Must run before the server
    /// accepts connections; a broken image aborts startup.
    pub async fn restore_from(&self, path: &Path) -> anyhow::Result<()> {
        let Some(image) = Snapshot::read(path)? else {
            log::info!("[app] no state at {}, cold start", path.display());
            return Ok(());
        };
        let mut state = self.state.lock().await;
        let EngineState { game, players, .. } = &mut *state;
        image.apply(game, players)?;
        log::info!("[app] state restored from {}", path.display());
        Ok(())
    }
    /// Writes a final image immediately, regardless of the saver period.
    pub async fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let state = self.state.lock().await;
        Snapshot::capture(&state.game, &state.players).write(path)
    }
}

impl Application {
    /// Directory of all maps.
    pub async fn maps(&self) -> Vec<MapHead> {
        self.state
            .lock()
            .await
            .game
            .maps()
            .iter()
            .map(|map| MapHead {
                id: map.id().clone(),
                name: map.name().to_string(),
            })
            .collect()
    }
    /// Full description of one map.
    pub async fn map(&self, id: &MapId) -> Result<Map, AppError> {
        self.state
            .lock()
            .await
            .game
            .find_map(id)
            .cloned()
            .ok_or(AppError::MapNotFound)
    }
    /// Enters the game: spawns a dog and mints its bearer token.
    pub async fn join(&self, name: &str, map_id: &MapId) -> Result<JoinOutcome, AppError> {
        if name.is_empty() {
            return Err(AppError::InvalidName);
        }
        let mut state = self.state.lock().await;
        let EngineState { game, players, .. } = &mut *state;
        let dog = game
            .add_dog(map_id, name, self.randomize_spawn)
            .ok_or(AppError::MapNotFound)?
            .id();
        let token = Token::generate();
        players.add(token.clone(), Player::new(map_id.clone(), dog));
        log::info!("[app] {} joined {} as player {}", name, map_id, dog);
        Ok(JoinOutcome { token, player: dog })
    }
    /// Lists the players sharing the caller's session.
    pub async fn players(&self, token: &Token) -> Result<Vec<PlayerHead>, AppError> {
        let state = self.state.lock().await;
        let player = state.players.find(token).ok_or(AppError::UnknownToken)?;
        let session = state
            .game
            .session(&player.map)
            .ok_or(AppError::UnknownToken)?;
        Ok(session
            .dogs()
            .iter()
            .map(|dog| PlayerHead {
                id: dog.id(),
                name: dog.name().to_string(),
            })
            .collect())
    }
    /// Copies the observable state of the caller's session.
    pub async fn state(&self, token: &Token) -> Result<StateView, AppError> {
        let state = self.state.lock().await;
        let player = state.players.find(token).ok_or(AppError::UnknownToken)?;
        let session = state
            .game
            .session(&player.map)
            .ok_or(AppError::UnknownToken)?;
        Ok(StateView {
            dogs: session
                .dogs()
                .iter()
                .map(|dog| DogView {
                    id: dog.id(),
                    position: dog.position(),
                    velocity: dog.velocity(),
                    facing: dog.facing(),
                    bag: dog.bag().to_vec(),
                    score: dog.score(),
                })
                .collect(),
            loots: session
                .loots()
                .iter()
                .map(|loot| LootView {
                    id: loot.id(),
                    kind: loot.kind(),
                    position: loot.position(),
                })
                .collect(),
        })
    }
    /// Steers the caller's dog.
    pub async fn change_dir(&self, token: &Token, dir: Direction) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        let EngineState { game, players, .. } = &mut *state;
        let player = players.find(token).ok_or(AppError::UnknownToken)?;
        if let Some(dog) = game
            .session_mut(&player.map)
            .and_then(|session| session.find_dog_mut(player.dog))
        {
            dog.change_dir(dir);
        }
        Ok(())
    }
    /// Advances world time: motion, loot, gathering, retirement, and the
    /// snapshot hook, all atomically under the engine lock.
    pub async fn tick(&self, dt: Duration) {
        let mut state = self.state.lock().await;
        let EngineState {
            game,
            players,
            saver,
        } = &mut *state;
        game.tick(dt);
        for stats in collect_retired(game, players) {
            let record = RetiredRecord::new(stats.name, stats.score, stats.play_time);
            if let Err(e) = self.store.save(&record).await {
                log::error!("[app] failed to persist retired player {}: {}", record.name, e);
            }
        }
        if let Some(saver) = saver {
            if let Err(e) = saver.on_tick(dt, game, players) {
                log::warn!("[app] state save failed: {}", e);
            }
        }
    }
    /// Reads a leaderboard page. The page size cap is enforced here, before
    /// the store is consulted.
    pub async fn records(
        &self,
        start: usize,
        max_items: usize,
    ) -> Result<Vec<RetiredRecord>, AppError> {
        if max_items > RECORDS_PAGE_LIMIT {
            return Err(AppError::PageLimit);
        }
        let _state = self.state.lock().await;
        self.store
            .query(start, max_items)
            .await
            .map_err(AppError::Store)
    }
}
