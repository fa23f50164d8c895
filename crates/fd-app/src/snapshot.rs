use super::*;
use fd_core::DogId;
use fd_core::LootId;
use fd_core::LootType;
use fd_core::LootValue;
use fd_core::Real;
use fd_core::Score;
use fd_geom::Point2;
use fd_geom::Vec2;
use fd_model::BagItem;
use fd_model::Direction;
use fd_model::Dog;
use fd_model::Game;
use fd_model::Loot;
use fd_model::MapId;
use serde::Deserialize;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Serialized dog, complete enough to restore every gameplay attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DogRepr {
    id: DogId,
    name: String,
    position: Point2,
    velocity: Vec2,
    facing: Direction,
    bag: Vec<BagItem>,
    score: Score,
    max_speed: Real,
    bag_capacity: usize,
    play_time_ms: u64,
    idle_time_ms: u64,
}

impl From<&Dog> for DogRepr {
    fn from(dog: &Dog) -> Self {
        Self {
            id: dog.id(),
            name: dog.name().to_string(),
            position: dog.position(),
            velocity: dog.velocity(),
            facing: dog.facing(),
            bag: dog.bag().to_vec(),
            score: dog.score(),
            max_speed: dog.max_speed(),
            bag_capacity: dog.bag_capacity(),
            play_time_ms: dog.play_time().as_millis() as u64,
            idle_time_ms: dog.idle_time().as_millis() as u64,
        }
    }
}

impl DogRepr {
    fn restore(self) -> Dog {
        Dog::restore(
            self.id,
            self.name,
            self.position,
            self.velocity,
            self.facing,
            self.bag,
            self.score,
            self.max_speed,
            self.bag_capacity,
            Duration::from_millis(self.play_time_ms),
            Duration::from_millis(self.idle_time_ms),
        )
    }
}

/// Serialized loot item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootRepr {
    id: LootId,
    #[serde(rename = "type")]
    kind: LootType,
    value: LootValue,
    position: Point2,
}

impl From<&Loot> for LootRepr {
    fn from(loot: &Loot) -> Self {
        Self {
            id: loot.id(),
            kind: loot.kind(),
            value: loot.value(),
            position: loot.position(),
        }
    }
}

/// One session with its id counters, in map-registry order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRepr {
    map: MapId,
    next_dog_id: DogId,
    next_loot_id: LootId,
    dogs: Vec<DogRepr>,
    loots: Vec<LootRepr>,
}

/// One token binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRepr {
    token: Token,
    dog: DogId,
    map: MapId,
}

/// Full durable image of the engine: every session and every token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    sessions: Vec<SessionRepr>,
    players: Vec<PlayerRepr>,
}

impl Snapshot {
    /// Captures the live state. Sessions appear in map-registry order so
    /// images of identical states compare equal.
    pub fn capture(game: &Game, players: &Players) -> Self {
        let sessions = game
            .maps()
            .iter()
            .filter_map(|map| game.session(map.id()).map(|s| (map.id(), s)))
            .map(|(id, session)| SessionRepr {
                map: id.clone(),
                next_dog_id: session.next_dog_id(),
                next_loot_id: session.next_loot_id(),
                dogs: session.dogs().iter().map(DogRepr::from).collect(),
                loots: session.loots().iter().map(LootRepr::from).collect(),
            })
            .collect();
        let players = players
            .pairs()
            .into_iter()
            .map(|(token, player)| PlayerRepr {
                token,
                dog: player.dog,
                map: player.map,
            })
            .collect();
        Self { sessions, players }
    }
    /// Replays the image into a freshly configured world. Fails when the
    /// image references a map the current config does not know.
    pub fn apply(self, game: &mut Game, players: &mut Players) -> anyhow::Result<()> {
        for repr in self.sessions {
            let session = game
                .add_session(&repr.map)
                .ok_or_else(|| anyhow::anyhow!("snapshot references unknown map {}", repr.map))?;
            session.restore(
                repr.dogs.into_iter().map(DogRepr::restore).collect(),
                repr.next_dog_id,
                repr.loots
                    .into_iter()
                    .map(|l| Loot::new(l.id, l.kind, l.value, l.position))
                    .collect(),
                repr.next_loot_id,
            );
        }
        for repr in self.players {
            if game.session(&repr.map).is_none() {
                anyhow::bail!("snapshot token {} references unknown map {}", repr.token, repr.map);
            }
            players.add(repr.token, Player::new(repr.map, repr.dog));
        }
        Ok(())
    }
    /// Writes the image next to `path` with a `~` suffix, then atomically
    /// renames over the target so a crash never leaves a torn file.
    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        let sibling = sibling(path);
        {
            let file = std::fs::File::create(&sibling)?;
            let mut writer = std::io::BufWriter::new(file);
            serde_json::to_writer(&mut writer, self)?;
            writer.flush()?;
        }
        std::fs::rename(&sibling, path)?;
        Ok(())
    }
    /// Reads an image back. `Ok(None)` when the file is absent or empty
    /// (cold start); an unreadable or unparsable file is an error.
    pub fn read(path: &Path) -> anyhow::Result<Option<Self>> {
        match std::fs::metadata(path) {
            Err(_) => return Ok(None),
            Ok(meta) if meta.len() == 0 => return Ok(None),
            Ok(_) => {}
        }
        let file = std::fs::File::open(path)?;
        let snapshot = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(Some(snapshot))
    }
}

fn sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push("~");
    PathBuf::from(name)
}

/// Periodic snapshot hook. Accumulates game time and writes an image every
/// `period` of it.
pub struct Saver {
    path: PathBuf,
    period: Duration,
    accrued: Duration,
}

impl Saver {
    pub fn new(path: PathBuf, period: Duration) -> Self {
        Self {
            path,
            period,
            accrued: Duration::ZERO,
        }
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    /// Called at the end of every tick, still under the engine lock.
    pub fn on_tick(&mut self, dt: Duration, game: &Game, players: &Players) -> anyhow::Result<()> {
        self.accrued += dt;
        if self.accrued < self.period {
            return Ok(());
        }
        Snapshot::capture(game, players).write(&self.path)?;
        self.accrued = Duration::ZERO;
        log::debug!("[saver] state written to {}", self.path.display());
        Ok(())
    }
}
