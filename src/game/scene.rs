// Scene: owns the world and every actor in it

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use glam::Vec2;

use crate::engine::input::InputSource;
use crate::engine::physics::{presets, ActorPhysics, CollisionGroups, PhysicsWorld};
use crate::engine::timer::TimerScheduler;
use crate::engine::EntityId;

use super::actors::{
    ActorParts, DeathOutcome, EnemyController, EnemyStats, PlayerController, PlayerStats,
    PlayerTick, SinkFactory, TargetRef,
};
use super::combat::resolve_attack;
use super::spawner::{PrefabId, SpawnRequest, Spawner, SpawnerConfig};
use super::GameError;

/// Deferred scene work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SceneTask {
    Remove(EntityId),
}

/// What happened during one scene tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickSummary {
    pub player: PlayerTick,
    /// Enemies that took a chase step
    pub enemies_moved: usize,
    pub spawned: Vec<EntityId>,
    /// Spawn requests that could not be built (logged, the tick went on)
    pub failed_spawns: Vec<PrefabId>,
    pub removed: Vec<EntityId>,
}

/// Owns the physics world, the player, enemies, spawners and removal timers.
///
/// Actors never reach each other directly: the scene hands enemies a
/// [`TargetRef`] to the player and routes attack hits and contacts.
pub struct Scene {
    physics: PhysicsWorld,
    player: Option<PlayerController>,
    enemies: BTreeMap<EntityId, EnemyController>,
    surfaces: Vec<EntityId>,
    spawners: Vec<Spawner>,
    prefabs: HashMap<PrefabId, EnemyStats>,
    timers: TimerScheduler<SceneTask>,
    sinks: Box<dyn SinkFactory>,
    next_id: u64,
    next_prefab: u32,
}

impl Scene {
    pub fn new(sinks: Box<dyn SinkFactory>) -> Self {
        Self::with_physics(PhysicsWorld::new(), sinks)
    }

    pub fn with_physics(physics: PhysicsWorld, sinks: Box<dyn SinkFactory>) -> Self {
        Self {
            physics,
            player: None,
            enemies: BTreeMap::new(),
            surfaces: Vec::new(),
            spawners: Vec::new(),
            prefabs: HashMap::new(),
            timers: TimerScheduler::new(),
            sinks,
            next_id: 0,
            next_prefab: 0,
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::from_u64(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add static level geometry. `position` is the box centre.
    pub fn add_surface(
        &mut self,
        position: Vec2,
        size: Vec2,
        group: CollisionGroups,
    ) -> EntityId {
        let id = self.allocate_id();
        self.physics.add_entity(
            id,
            presets::surface_body(position.x, position.y),
            presets::surface_collider(size.x, size.y, group),
        );
        self.surfaces.push(id);
        id
    }

    /// Create the player. Only one player may exist; a second one is destroyed
    /// straight away and reported as an error.
    pub fn register_player(
        &mut self,
        position: Vec2,
        stats: PlayerStats,
    ) -> Result<EntityId, GameError> {
        let id = self.allocate_id();
        self.physics.add_entity(
            id,
            presets::player_body(position.x, position.y),
            presets::actor_collider(stats.width, stats.height, CollisionGroups::Player),
        );

        if let Some(existing) = &self.player {
            log::warn!("{} rejected, {} is already the player", id, existing.entity());
            self.physics.remove_entity(id);
            return Err(GameError::PlayerAlreadyRegistered(existing.entity()));
        }

        let parts = ActorParts::from_factory(self.sinks.as_mut(), id);
        match PlayerController::new(id, stats, parts, &self.physics) {
            Ok(player) => {
                log::info!("Registered player {}", id);
                self.player = Some(player);
                Ok(id)
            }
            Err(err) => {
                self.physics.remove_entity(id);
                Err(err)
            }
        }
    }

    /// Store an enemy template for spawners and [`Scene::instantiate`]
    pub fn register_prefab(&mut self, stats: EnemyStats) -> Result<PrefabId, GameError> {
        stats.validate()?;
        let id = PrefabId(self.next_prefab);
        self.next_prefab += 1;
        self.prefabs.insert(id, stats);
        Ok(id)
    }

    pub fn add_spawner(&mut self, config: SpawnerConfig) -> Result<(), GameError> {
        if let Some(unknown) = config
            .prefabs
            .iter()
            .find(|prefab| !self.prefabs.contains_key(prefab))
        {
            return Err(GameError::UnknownPrefab(*unknown));
        }
        self.spawners.push(Spawner::new(config)?);
        Ok(())
    }

    pub fn spawn_enemy(&mut self, stats: EnemyStats, position: Vec2) -> Result<EntityId, GameError> {
        self.spawn_enemy_rotated(stats, position, 0.0)
    }

    /// Create an enemy from a registered prefab
    pub fn instantiate(&mut self, request: SpawnRequest) -> Result<EntityId, GameError> {
        let stats = self
            .prefabs
            .get(&request.prefab)
            .cloned()
            .ok_or(GameError::UnknownPrefab(request.prefab))?;
        self.spawn_enemy_rotated(stats, request.position, request.rotation)
    }

    fn spawn_enemy_rotated(
        &mut self,
        stats: EnemyStats,
        position: Vec2,
        rotation: f32,
    ) -> Result<EntityId, GameError> {
        let id = self.allocate_id();
        self.physics.add_entity(
            id,
            presets::enemy_body(position.x, position.y, rotation),
            presets::actor_collider(stats.width, stats.height, CollisionGroups::Enemy),
        );

        let parts = ActorParts::from_factory(self.sinks.as_mut(), id);
        match EnemyController::new(id, stats, parts, &self.physics) {
            Ok(enemy) => {
                log::debug!("Spawned enemy {} at {:?}", id, position);
                self.enemies.insert(id, enemy);
                Ok(id)
            }
            Err(err) => {
                self.physics.remove_entity(id);
                Err(err)
            }
        }
    }

    /// What enemies chase
    pub fn player_target(&self) -> TargetRef {
        self.player
            .as_ref()
            .map_or(TargetRef::Unregistered, |player| TargetRef::Player(player.entity()))
    }

    /// Run one frame: timers, spawners, player, enemies, then physics.
    /// A spawn that fails is logged and reported; the rest of the frame still runs.
    pub fn tick(&mut self, dt: Duration, input: &dyn InputSource) -> TickSummary {
        let mut summary = TickSummary::default();

        for task in self.timers.advance(dt) {
            match task {
                SceneTask::Remove(id) => {
                    if self.finish_removal(id) {
                        summary.removed.push(id);
                    }
                }
            }
        }

        let requests: Vec<SpawnRequest> = self
            .spawners
            .iter_mut()
            .filter_map(|spawner| spawner.tick(dt))
            .collect();
        for request in requests {
            match self.instantiate(request) {
                Ok(id) => summary.spawned.push(id),
                Err(err) => {
                    log::warn!("Spawn of {} failed: {}", request.prefab, err);
                    summary.failed_spawns.push(request.prefab);
                }
            }
        }

        if let Some(player) = self.player.as_mut() {
            summary.player = player.tick(input, &mut self.physics);
        }

        let seconds = dt.as_secs_f32();
        let target = self.player_target();
        for enemy in self.enemies.values_mut() {
            if enemy.tick(seconds, target, &mut self.physics) {
                summary.enemies_moved += 1;
            }
        }

        if !dt.is_zero() {
            self.physics.set_timestep(seconds);
            self.physics.step();
            self.forward_contacts();
        }

        summary
    }

    fn forward_contacts(&mut self) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        for event in self.physics.contact_events() {
            let Some(other) = event.started_with(player.entity()) else {
                continue;
            };
            if let Some(group) = self.physics.group_of(other) {
                player.on_collision_enter(group);
            }
        }
    }

    /// Attack animation event raised for `entity`. Every enemy inside the
    /// player's attack circle gets a death event; the ones hit are returned.
    pub fn attack_event(&mut self, entity: EntityId) -> Result<Vec<EntityId>, GameError> {
        let player = self
            .player
            .as_ref()
            .filter(|player| player.entity() == entity)
            .ok_or(GameError::UnknownEntity(entity))?;

        let hits: Vec<EntityId> = resolve_attack(player, &self.physics)
            .into_iter()
            .filter(|hit| self.enemies.contains_key(hit))
            .collect();
        for &hit in &hits {
            self.kill(hit)?;
        }
        Ok(hits)
    }

    /// Send a death event to an enemy
    pub fn kill(&mut self, entity: EntityId) -> Result<DeathOutcome, GameError> {
        let now = self.timers.now();
        let enemy = self
            .enemies
            .get_mut(&entity)
            .ok_or(GameError::UnknownEntity(entity))?;

        let outcome = enemy.die(now);
        match outcome {
            DeathOutcome::Ignored => {}
            DeathOutcome::RemoveNow => {
                self.enemies.remove(&entity);
                self.physics.remove_entity(entity);
            }
            DeathOutcome::ScheduleRemoval(delay) => {
                self.timers.schedule_once(delay, SceneTask::Remove(entity));
            }
        }
        Ok(outcome)
    }

    fn finish_removal(&mut self, entity: EntityId) -> bool {
        let Some(enemy) = self.enemies.get_mut(&entity) else {
            return false;
        };
        if !enemy.finish_removal() {
            return false;
        }
        self.enemies.remove(&entity);
        self.physics.remove_entity(entity);
        log::debug!("Removed {}", entity);
        true
    }

    /// Destroy every entity. Spawners and prefabs go with the scene.
    pub fn unload(&mut self) {
        let mut destroyed = 0;
        if let Some(player) = self.player.take() {
            destroyed += usize::from(self.physics.remove_entity(player.entity()));
        }
        for (id, _) in std::mem::take(&mut self.enemies) {
            destroyed += usize::from(self.physics.remove_entity(id));
        }
        for id in std::mem::take(&mut self.surfaces) {
            destroyed += usize::from(self.physics.remove_entity(id));
        }
        self.spawners.clear();
        self.prefabs.clear();
        self.timers.clear();
        log::info!("Scene unloaded, {} entities destroyed", destroyed);
    }

    /// Current simulated time
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn player(&self) -> Option<&PlayerController> {
        self.player.as_ref()
    }

    pub fn enemy(&self, entity: EntityId) -> Option<&EnemyController> {
        self.enemies.get(&entity)
    }

    pub fn enemies(&self) -> impl Iterator<Item = &EnemyController> {
        self.enemies.values()
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    /// Removals waiting on their timer
    pub fn pending_removals(&self) -> usize {
        self.timers.pending_count()
    }
}
