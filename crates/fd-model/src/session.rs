use super::*;
use fd_core::DogId;
use fd_core::LOOT_WIDTH;
use fd_core::LootId;
use fd_core::LootType;
use fd_core::LootValue;
use fd_geom::Gatherer;
use fd_geom::GatherEvent;
use fd_geom::Item;
use fd_geom::Point2;
use std::time::Duration;

/// What a sweep ran into: a loot item on the ground or an office.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Loot(LootId),
    Office,
}

/// A lost object lying on a road, waiting to be picked up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Loot {
    id: LootId,
    kind: LootType,
    value: LootValue,
    position: Point2,
}

impl Loot {
    pub fn new(id: LootId, kind: LootType, value: LootValue, position: Point2) -> Self {
        Self {
            id,
            kind,
            value,
            position,
        }
    }
    pub fn id(&self) -> LootId {
        self.id
    }
    pub fn kind(&self) -> LootType {
        self.kind
    }
    pub fn value(&self) -> LootValue {
        self.value
    }
    pub fn position(&self) -> Point2 {
        self.position
    }
    fn traits(&self) -> BagItem {
        BagItem {
            id: self.id,
            kind: self.kind,
            value: self.value,
        }
    }
}

/// Dynamic state bound to one map: the dogs playing on it, the loot lying
/// on its roads, and the private loot generator.
///
/// Id counters are monotonic for the session lifetime and survive snapshot
/// round-trips; ids start at 1 so that 0 never names a live entity.
pub struct GameSession {
    dogs: Vec<Dog>,
    loots: Vec<Loot>,
    next_dog_id: DogId,
    next_loot_id: LootId,
    generator: LootGenerator,
}

impl GameSession {
    pub fn new(generator: LootGenerator) -> Self {
        Self {
            dogs: Vec::new(),
            loots: Vec::new(),
            next_dog_id: 1,
            next_loot_id: 1,
            generator,
        }
    }
    pub fn dogs(&self) -> &[Dog] {
        &self.dogs
    }
    pub fn loots(&self) -> &[Loot] {
        &self.loots
    }
    pub fn next_dog_id(&self) -> DogId {
        self.next_dog_id
    }
    pub fn next_loot_id(&self) -> LootId {
        self.next_loot_id
    }
    pub fn find_dog(&self, id: DogId) -> Option<&Dog> {
        self.dogs.iter().find(|d| d.id() == id)
    }
    pub fn find_dog_mut(&mut self, id: DogId) -> Option<&mut Dog> {
        self.dogs.iter_mut().find(|d| d.id() == id)
    }
    pub fn remove_dog(&mut self, id: DogId) {
        self.dogs.retain(|d| d.id() != id);
    }
    fn find_loot(&self, id: LootId) -> Option<&Loot> {
        self.loots.iter().find(|l| l.id() == id)
    }
    fn remove_loot(&mut self, id: LootId) {
        self.loots.retain(|l| l.id() != id);
    }
    /// Replaces all dynamic contents from a snapshot, including the exact
    /// next-id counters for subsequent allocations.
    pub fn restore(
        &mut self,
        dogs: Vec<Dog>,
        next_dog_id: DogId,
        loots: Vec<Loot>,
        next_loot_id: LootId,
    ) {
        self.dogs = dogs;
        self.next_dog_id = next_dog_id;
        self.loots = loots;
        self.next_loot_id = next_loot_id;
    }
}

impl GameSession {
    /// Creates a dog at a spawn point and hands out its id.
    pub fn add_dog(&mut self, map: &Map, name: &str, randomize_spawn: bool) -> &Dog {
        let position = spawn_point(map, randomize_spawn);
        let id = self.next_dog_id;
        self.next_dog_id += 1;
        self.dogs.push(Dog::new(
            id,
            name,
            position,
            map.dog_speed(),
            map.bag_capacity(),
        ));
        log::debug!("[session {}] dog {} spawned at {:?}", map.id(), id, position);
        self.dogs.last().expect("just pushed")
    }
    /// Rolls the loot generator and scatters any new items, then reports the
    /// full loot population as collision items. Loot placement is always
    /// randomized, independent of the dog spawn flag.
    pub fn spawn_loot(&mut self, map: &Map, dt: Duration) -> Vec<Item<Target>> {
        let spawned = self
            .generator
            .generate(dt, self.loots.len(), self.dogs.len());
        if spawned > 0 {
            // an empty catalog would make loot unrepresentable
            let kinds = map.loot_type_count().max(1) as LootType;
            for _ in 0..spawned {
                let kind = rand::random_range(0..kinds);
                let id = self.next_loot_id;
                self.next_loot_id += 1;
                self.loots
                    .push(Loot::new(id, kind, map.loot_value(kind), spawn_point(map, true)));
            }
            log::debug!("[session {}] spawned {} loot items", map.id(), spawned);
        }
        self.loots
            .iter()
            .map(|loot| Item {
                position: loot.position(),
                width: LOOT_WIDTH,
                id: Target::Loot(loot.id()),
            })
            .collect()
    }
    /// Moves every dog and reports their swept segments.
    pub fn advance_dogs(&mut self, map: &Map, dt: Duration) -> Vec<Gatherer<DogId>> {
        self.dogs
            .iter_mut()
            .map(|dog| dog.advance(map.roads(), dt))
            .collect()
    }
    /// Settles gather events in chronological order: office contacts unload
    /// the bag, loot contacts attempt a pickup. A loot item claimed by an
    /// earlier event, or a full bag, leaves later events as no-ops.
    pub fn settle(&mut self, events: &[GatherEvent<Target, DogId>]) {
        for event in events {
            match event.item {
                Target::Office => {
                    if let Some(dog) = self.find_dog_mut(event.gatherer) {
                        dog.deposit();
                    }
                }
                Target::Loot(id) => {
                    let Some(traits) = self.find_loot(id).map(Loot::traits) else {
                        continue; // a faster dog already took it
                    };
                    let Some(dog) = self.find_dog_mut(event.gatherer) else {
                        continue;
                    };
                    if dog.try_stash(traits) {
                        self.remove_loot(id);
                    }
                }
            }
        }
    }
}

/// Spawn placement rule. Deterministic mode puts newcomers at the start of
/// the first road; randomized mode picks a uniform road and an integer
/// coordinate along its axis.
fn spawn_point(map: &Map, randomize: bool) -> Point2 {
    let roads = map.roads();
    let Some(first) = roads.first() else {
        return Point2::default();
    };
    if !randomize {
        return first.start().to_real();
    }
    let road = roads[rand::random_range(0..roads.len())];
    let start = road.start();
    let end = road.end();
    if road.is_vertical() {
        let (lo, hi) = (start.y.min(end.y), start.y.max(end.y));
        let y = if lo == hi { lo } else { rand::random_range(lo..hi) };
        Point2::new(start.x as f64, y as f64)
    } else {
        let (lo, hi) = (start.x.min(end.x), start.x.max(end.x));
        let x = if lo == hi { lo } else { rand::random_range(lo..hi) };
        Point2::new(x as f64, start.y as f64)
    }
}
