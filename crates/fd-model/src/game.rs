use super::*;
use fd_core::OFFICE_WIDTH;
use fd_geom::Item;
use fd_geom::find_gather_events;
use std::collections::HashMap;
use std::time::Duration;

/// Two-parameter loot generation model shared by all sessions.
#[derive(Debug, Clone, Copy)]
pub struct LootConfig {
    pub period: Duration,
    pub probability: f64,
}

/// Root of the world model: the immutable map registry and the mutable
/// session registry, one session per map, created lazily on first join.
pub struct Game {
    maps: Vec<Map>,
    index: HashMap<MapId, usize>,
    sessions: HashMap<MapId, GameSession>,
    loot_config: LootConfig,
    retirement_time: Duration,
}

impl Game {
    pub fn new(loot_config: LootConfig, retirement_time: Duration) -> Self {
        Self {
            maps: Vec::new(),
            index: HashMap::new(),
            sessions: HashMap::new(),
            loot_config,
            retirement_time,
        }
    }
    /// Registers a map. Ids are append-only and duplicates fail.
    pub fn add_map(&mut self, map: Map) -> anyhow::Result<()> {
        if self.index.contains_key(map.id()) {
            anyhow::bail!("map {} already exists", map.id());
        }
        self.index.insert(map.id().clone(), self.maps.len());
        self.maps.push(map);
        Ok(())
    }
    pub fn maps(&self) -> &[Map] {
        &self.maps
    }
    pub fn find_map(&self, id: &MapId) -> Option<&Map> {
        self.index.get(id).map(|&i| &self.maps[i])
    }
    pub fn session(&self, id: &MapId) -> Option<&GameSession> {
        self.sessions.get(id)
    }
    pub fn session_mut(&mut self, id: &MapId) -> Option<&mut GameSession> {
        self.sessions.get_mut(id)
    }
    /// Gets or lazily creates the session of a map. Returns `None` only for
    /// unknown map ids; calling twice hands back the same session.
    pub fn add_session(&mut self, id: &MapId) -> Option<&mut GameSession> {
        if !self.index.contains_key(id) {
            return None;
        }
        let config = self.loot_config;
        Some(self.sessions.entry(id.clone()).or_insert_with(|| {
            GameSession::new(LootGenerator::new(config.period, config.probability))
        }))
    }
    pub fn retirement_time(&self) -> Duration {
        self.retirement_time
    }
}

impl Game {
    /// Spawns a dog on a map, creating the session when needed. `None` for
    /// unknown maps.
    pub fn add_dog(&mut self, id: &MapId, name: &str, randomize_spawn: bool) -> Option<&Dog> {
        let index = *self.index.get(id)?;
        let config = self.loot_config;
        let map = &self.maps[index];
        let session = self.sessions.entry(id.clone()).or_insert_with(|| {
            GameSession::new(LootGenerator::new(config.period, config.probability))
        });
        Some(session.add_dog(map, name, randomize_spawn))
    }
    /// Advances world time by `dt` in every session: loot generation, dog
    /// motion, then gather settlement over loot and offices.
    pub fn tick(&mut self, dt: Duration) {
        for (map_id, session) in self.sessions.iter_mut() {
            let Some(&index) = self.index.get(map_id) else {
                continue;
            };
            let map = &self.maps[index];
            let mut items = session.spawn_loot(map, dt);
            let gatherers = session.advance_dogs(map, dt);
            items.extend(map.offices().iter().map(|office| Item {
                position: office.position().to_real(),
                width: OFFICE_WIDTH,
                id: Target::Office,
            }));
            session.settle(&find_gather_events(&items, &gatherers));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fd_geom::Point2;

    fn world() -> Game {
        let mut game = Game::new(
            LootConfig {
                period: Duration::from_secs(5),
                probability: 0.0,
            },
            Duration::from_secs(60),
        );
        let mut map = Map::new("m1".into(), "town".into(), 1.0, 3);
        map.add_road(Road::horizontal(GridPoint::new(0, 0), 10));
        map.add_loot_value(2);
        game.add_map(map).expect("fresh map id");
        game
    }

    #[test]
    fn duplicate_map_id_fails() {
        let mut game = world();
        let map = Map::new("m1".into(), "again".into(), 1.0, 3);
        assert!(game.add_map(map).is_err());
    }

    #[test]
    fn add_session_is_idempotent() {
        let mut game = world();
        let id: MapId = "m1".into();
        game.add_dog(&id, "A", false).expect("known map");
        // a second add_session must hand back the existing session
        let session = game.add_session(&id).expect("known map");
        assert_eq!(session.dogs().len(), 1);
        assert_eq!(session.next_dog_id(), 2);
    }

    #[test]
    fn unknown_map_has_no_session() {
        let mut game = world();
        assert!(game.add_session(&"nowhere".into()).is_none());
        assert!(game.session(&"nowhere".into()).is_none());
    }

    #[test]
    fn tick_moves_dogs_and_keeps_them_on_roads() {
        let mut game = world();
        let id: MapId = "m1".into();
        game.add_dog(&id, "A", false).expect("known map");
        game.session_mut(&id)
            .expect("session exists")
            .find_dog_mut(1)
            .expect("dog exists")
            .change_dir(Direction::Right);
        game.tick(Duration::from_secs(1));
        let session = game.session(&id).expect("session exists");
        let dog = session.find_dog(1).expect("dog exists");
        assert_eq!(dog.position(), Point2::new(1.0, 0.0));
        let map = game.find_map(&id).expect("known map");
        assert!(map.roads().iter().any(|r| r.rect().contains(dog.position())));
    }
}
