use std::time::Duration;

/// Uniform [0, 1) source injected into the generator. The default source is
/// the constant 1.0, which makes spawn counts deterministic.
pub type RandomSource = Box<dyn Fn() -> f64 + Send + Sync>;

/// Probabilistic loot spawner.
///
/// Accumulates game time between successful spawns. The yield for a tick is
/// `round(shortage · (1 − (1−p)^(t/T)) · r)` where `shortage` is the number
/// of looters without a matching loot item, `t` the accumulated time, `T`
/// the base interval, `p` the configured probability, and `r` a draw from
/// the random source. The accumulator resets only when something spawned.
pub struct LootGenerator {
    base_interval: Duration,
    probability: f64,
    unspent: Duration,
    random: RandomSource,
}

impl LootGenerator {
    pub fn new(base_interval: Duration, probability: f64) -> Self {
        Self::with_random(base_interval, probability, Box::new(|| 1.0))
    }
    pub fn with_random(base_interval: Duration, probability: f64, random: RandomSource) -> Self {
        Self {
            base_interval,
            probability,
            unspent: Duration::ZERO,
            random,
        }
    }
    pub fn generate(&mut self, dt: Duration, loot_count: usize, looter_count: usize) -> usize {
        self.unspent += dt;
        let shortage = looter_count.saturating_sub(loot_count);
        let ratio = self.unspent.as_secs_f64() / self.base_interval.as_secs_f64();
        let chance = (1.0 - (1.0 - self.probability).powf(ratio)) * (self.random)();
        let spawned = (shortage as f64 * chance.clamp(0.0, 1.0)).round() as usize;
        if spawned > 0 {
            self.unspent = Duration::ZERO;
        }
        spawned
    }
}
