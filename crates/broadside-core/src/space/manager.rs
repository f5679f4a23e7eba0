//! The space manager: owner of the world state and the per-tick pipeline
//! that moves it forward.
//!
//! One [`SpaceManager::update`] call is one tick. The pipeline order is
//! load-bearing; see the step comments in `update`.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use broadside_logic::angles::{limit_precision, to_degrees_delta, to_positive_degrees_delta};
use broadside_logic::circles::circles_intersection;
use broadside_logic::steering::{move_to_target, rotate_to_target, Craft};
use broadside_logic::xy::XY;
use serde::{Deserialize, Serialize};

use crate::model::{
    BotOrder, Damage, ExplosionDesign, Faction, ObjectKind, SpaceCommand, SpaceObject, SpaceState,
    DEFAULT_EXPLOSION,
};

use super::attachments::AttachmentGraph;
use super::collisions::{circle_circle, CollisionResponse};
use super::fov::{compute_visible_arcs, FieldOfView, VisibleArc};
use super::spatial::{BodyId, SpatialIndex};

/// Seconds between passes that delete destroyed objects for good.
const GC_TIMEOUT: f64 = 5.0;
const ZERO_VELOCITY_THRESHOLD: f64 = 0.0;

/// Projectiles and spent explosion clouds do not block movement and never
/// stop a raycast. An explosion counts as spent once its velocity is
/// smaller than its own radius.
fn is_projectile_like(object: &SpaceObject) -> bool {
    object.is_projectile() || (object.is_explosion() && object.velocity.is_zero(object.radius))
}

fn live_mut<'a>(state: &'a mut SpaceState, id: &str) -> Option<&'a mut SpaceObject> {
    state.get_mut(id).filter(|o| !o.destroyed)
}

struct ExtraData {
    body: BodyId,
    fov: FieldOfView,
}

/// Serializable image of everything the manager owns. Collision bodies and
/// views are derived and rebuilt on restore rather than persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceSnapshot {
    pub state: SpaceState,
    pub attachment_edges: BTreeMap<String, String>,
    pub object_damage: BTreeMap<String, Vec<Damage>>,
    pub object_order: BTreeMap<String, BotOrder>,
    pub to_insert: Vec<SpaceObject>,
    pub seconds_since_last_gc: f64,
    pub next_id: u64,
}

#[derive(Default)]
pub struct SpaceManager {
    pub state: SpaceState,
    index: SpatialIndex,
    body_to_object: HashMap<BodyId, String>,
    extra_data: HashMap<String, ExtraData>,
    attachments: AttachmentGraph,
    object_damage: BTreeMap<String, Vec<Damage>>,
    object_order: BTreeMap<String, BotOrder>,
    to_insert: Vec<SpaceObject>,
    to_update_collisions: BTreeSet<String>,
    seconds_since_last_gc: f64,
    next_id: u64,
}

impl SpaceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a fresh object id. Ids are sequential per manager, so two
    /// managers fed the same inputs mint the same ids.
    pub fn make_id(&mut self, prefix: &str) -> String {
        let id = format!("{}-{}", prefix, self.next_id);
        self.next_id += 1;
        id
    }

    // --- direct mutators, applied between ticks ---

    pub fn change_turn_speed(&mut self, id: &str, delta: f64) {
        if let Some(subject) = live_mut(&mut self.state, id) {
            subject.turn_speed += delta;
        }
    }

    pub fn set_turn_speed(&mut self, id: &str, value: f64) {
        if let Some(subject) = live_mut(&mut self.state, id) {
            subject.turn_speed = value;
        }
    }

    pub fn change_velocity(&mut self, id: &str, delta: XY) {
        if let Some(subject) = live_mut(&mut self.state, id) {
            subject.velocity += delta;
        }
    }

    pub fn set_velocity(&mut self, id: &str, velocity: XY) {
        if velocity.x.is_nan() || velocity.y.is_nan() {
            log::warn!("trying to set NaN velocity on {}", id);
            return;
        }
        if let Some(subject) = live_mut(&mut self.state, id) {
            subject.velocity = velocity;
        }
    }

    pub fn apply_command(&mut self, command: SpaceCommand) {
        match command {
            SpaceCommand::ChangeTurnSpeed { id, delta } => self.change_turn_speed(&id, delta),
            SpaceCommand::SetTurnSpeed { id, value } => self.set_turn_speed(&id, value),
            SpaceCommand::ChangeVelocity { id, delta } => self.change_velocity(&id, delta),
            SpaceCommand::SetVelocity { id, value } => self.set_velocity(&id, value),
        }
    }

    pub fn change_ship_radar_range(&mut self, id: &str, range: f64) {
        if let Some(ship) = live_mut(&mut self.state, id) {
            if let ObjectKind::Spaceship { radar_range, .. } = &mut ship.kind {
                *radar_range = range;
            }
        }
    }

    /// Replicates a ship's weapons target onto its space object.
    pub fn set_ship_weapons_target(&mut self, id: &str, target: Option<String>) {
        if let Some(ship) = live_mut(&mut self.state, id) {
            if let ObjectKind::Spaceship { target_id, .. } = &mut ship.kind {
                *target_id = target;
            }
        }
    }

    /// Deducts hull health from a live object and returns what is left.
    pub fn damage_object_health(&mut self, id: &str, amount: f64) -> Option<f64> {
        let subject = live_mut(&mut self.state, id)?;
        subject.health -= amount;
        Some(subject.health)
    }

    // --- lifecycle ---

    /// Queues an object for insertion at the next tick (or flush).
    pub fn insert(&mut self, object: SpaceObject) {
        self.to_insert.push(object);
    }

    pub fn insert_bulk(&mut self, objects: impl IntoIterator<Item = SpaceObject>) {
        self.to_insert.extend(objects);
    }

    /// Flushes queued inserts now instead of at the next tick.
    pub fn force_flush_inserts(&mut self) {
        self.handle_to_insert();
    }

    pub fn destroy_object(&mut self, id: &str) {
        self.state.destroy_object(id);
    }

    /// True when a ship with this id is already live or queued for insert.
    pub fn check_duplicate_ship(&self, id: &str) -> bool {
        self.state.get_ship(id).is_some() || self.to_insert.iter().any(|o| o.id == id)
    }

    // --- attachments ---

    /// Attaches `attacher_id` to ride `attached_to_id` rigidly, starting
    /// from the next clique recompute.
    pub fn attach(&mut self, attacher_id: &str, attached_to_id: &str) {
        self.attachments.attach(attacher_id, attached_to_id);
    }

    /// Releases an attacher. The clique's accumulated motion lives on its
    /// free members while attached, so the leaver is handed the summed
    /// velocity and turn speed of the group it departs.
    pub fn detach(&mut self, attacher_id: &str) {
        if let Some(members) = self.attachments.clique_members(attacher_id) {
            let live = self
                .state
                .get(attacher_id)
                .map_or(false, |o| !o.destroyed);
            if live {
                let mut velocity = XY::ZERO;
                let mut turn_speed = 0.0;
                for member in members {
                    if let Some(object) = self.state.get(member) {
                        velocity += object.velocity;
                        turn_speed += object.turn_speed;
                    }
                }
                if let Some(subject) = self.state.get_mut(attacher_id) {
                    subject.velocity = velocity;
                    subject.turn_speed = to_degrees_delta(turn_speed);
                }
            }
        }
        self.attachments.remove_attacher(attacher_id);
    }

    // --- queries ---

    /// Live object by id; missing and destroyed objects read as absent.
    pub fn get_object(&self, id: &str) -> Option<&SpaceObject> {
        self.state.get(id).filter(|o| !o.destroyed)
    }

    /// Drains the pending damage records for an object. Reading clears.
    pub fn resolve_object_damage(&mut self, id: &str) -> Vec<Damage> {
        self.object_damage.remove(id).unwrap_or_default()
    }

    /// Takes the pending bot order for an object. Reading clears.
    pub fn resolve_object_order(&mut self, id: &str) -> Option<BotOrder> {
        self.object_order.remove(id)
    }

    /// Broad-phase candidates around a circle, live objects only.
    pub fn select_potentials(&mut self, center: XY, radius: f64) -> Vec<String> {
        let area = self.index.insert(center, radius);
        let mut found = Vec::new();
        for body in self.index.potentials(area) {
            if let Some(id) = self.body_to_object.get(&body) {
                if self.state.get(id).map_or(false, |o| !o.destroyed) {
                    found.push(id.clone());
                }
            }
        }
        self.index.remove(area);
        found
    }

    /// Live objects whose bodies actually overlap the query circle.
    pub fn query_area(&mut self, center: XY, radius: f64) -> Vec<String> {
        let area = self.index.insert(center, radius);
        let mut found = Vec::new();
        for body in self.index.potentials(area) {
            let Some(id) = self.body_to_object.get(&body) else {
                continue;
            };
            if !self.state.get(id).map_or(false, |o| !o.destroyed) {
                continue;
            }
            if let Some((body_center, body_radius)) = self.index.body(body) {
                if circle_circle(center, radius, body_center, body_radius).is_some() {
                    found.push(id.clone());
                }
            }
        }
        self.index.remove(area);
        found
    }

    /// The object's current view, recomputed first if stale.
    pub fn fov_view(&mut self, id: &str) -> &[VisibleArc] {
        self.refresh_fov(id);
        self.extra_data
            .get(id)
            .map(|data| data.fov.view())
            .unwrap_or(&[])
    }

    /// Everything a faction can currently see: its own objects plus every
    /// object any of them detects.
    pub fn faction_visible_objects(&mut self, faction: Faction) -> BTreeSet<String> {
        let own: Vec<String> = self
            .state
            .iter()
            .filter(|o| o.faction == faction)
            .map(|o| o.id.clone())
            .collect();
        let mut visible = BTreeSet::new();
        for id in own {
            visible.insert(id.clone());
            if self.extra_data.contains_key(&id) {
                self.refresh_fov(&id);
                if let Some(data) = self.extra_data.get(&id) {
                    for arc in data.fov.view() {
                        if let Some(seen) = &arc.object {
                            visible.insert(seen.clone());
                        }
                    }
                }
            } else {
                log::error!("object leak! {} has no extra data", id);
            }
        }
        visible
    }

    fn refresh_fov(&mut self, id: &str) {
        let stale = self
            .extra_data
            .get(id)
            .map_or(false, |data| data.fov.is_dirty());
        if !stale {
            return;
        }
        let Some(owner) = self.state.get(id) else {
            return;
        };
        let position = owner.position;
        let range = owner.radar_range();
        let mut detected: Vec<(String, XY, f64)> = Vec::new();
        if range > 0.0 {
            let area = self.index.insert(position, range);
            for body in self.index.potentials(area) {
                let Some(other_id) = self.body_to_object.get(&body) else {
                    continue;
                };
                if other_id == id {
                    continue;
                }
                if let Some(other) = self.state.get(other_id) {
                    if !other.destroyed {
                        detected.push((other_id.clone(), other.position, other.radius));
                    }
                }
            }
            self.index.remove(area);
        }
        let view = compute_visible_arcs(
            position,
            range,
            detected.iter().map(|(id, center, radius)| (id.as_str(), *center, *radius)),
        );
        if let Some(data) = self.extra_data.get_mut(id) {
            data.fov.set_view(view);
        }
    }

    // --- the tick ---

    /// Advances the world by `delta_seconds`.
    pub fn update(&mut self, delta_seconds: f64) {
        // 1. derive this tick's rigid groups from the attachment edges
        self.calc_attachment_cliques();
        // 2. turn queued create commands into insert-pending objects
        self.drain_create_commands();
        // 3. flush pending inserts (collects garbage first)
        self.handle_to_insert();
        // 4. apply queued moves to whole cliques
        let move_commands = std::mem::take(&mut self.state.move_commands);
        for command in move_commands {
            self.handle_move_command(&command.ids, command.delta);
        }
        // 5. latch bot orders for live ships
        let bot_orders = std::mem::take(&mut self.state.bot_order_commands);
        for command in bot_orders {
            for id in &command.ids {
                let is_live_ship = self
                    .state
                    .get(id)
                    .map_or(false, |o| !o.destroyed && o.is_ship());
                if is_live_ship {
                    self.object_order.insert(id.clone(), command.order.clone());
                }
            }
        }
        // 6..8. timers and guidance
        self.grow_explosions(delta_seconds);
        self.destroy_timed_out(delta_seconds);
        self.calc_homing_projectiles(delta_seconds);
        // 9. drop bodies and edges of whatever died above
        self.untrack_destroyed_objects();
        // 10..11. motion
        self.frozen_and_attached_dont_move();
        self.apply_physics(delta_seconds);
        // 12..14. visibility and contact resolution
        self.update_fields_of_view();
        self.update_collision_bodies();
        self.handle_collisions(delta_seconds);
        self.seconds_since_last_gc += delta_seconds;
        if self.seconds_since_last_gc > GC_TIMEOUT {
            self.gc();
        }
    }

    fn calc_attachment_cliques(&mut self) {
        let state = &self.state;
        self.attachments
            .recompute(|id| state.get(id).map_or(false, |o| !o.destroyed));
    }

    fn drain_create_commands(&mut self) {
        let asteroids = std::mem::take(&mut self.state.create_asteroid_commands);
        for command in asteroids {
            let id = self.make_id("asteroid");
            self.insert(SpaceObject::asteroid(id, command.position, command.radius));
        }
        let explosions = std::mem::take(&mut self.state.create_explosion_commands);
        for command in explosions {
            let id = self.make_id("explosion");
            let design = ExplosionDesign {
                damage_factor: command.damage_factor,
                ..DEFAULT_EXPLOSION
            };
            self.insert(SpaceObject::explosion(id, command.position, &design));
        }
        let waypoints = std::mem::take(&mut self.state.create_waypoint_commands);
        for command in waypoints {
            let id = self.make_id("waypoint");
            self.insert(SpaceObject::waypoint(id, command.position));
        }
    }

    fn handle_to_insert(&mut self) {
        if self.to_insert.is_empty() {
            return;
        }
        self.gc();
        let pending = std::mem::take(&mut self.to_insert);
        for object in pending {
            let body = self.index.insert(object.position, object.radius);
            self.body_to_object.insert(body, object.id.clone());
            self.extra_data.insert(
                object.id.clone(),
                ExtraData {
                    body,
                    fov: FieldOfView::new(),
                },
            );
            self.state.set(object);
        }
    }

    fn handle_move_command(&mut self, ids: &[String], delta: XY) {
        let mut members: Vec<String> = Vec::new();
        for id in ids {
            match self.attachments.clique_members(id) {
                Some(clique) => members.extend(clique.iter().cloned()),
                None => members.push(id.clone()),
            }
        }
        members.sort();
        members.dedup();
        for id in members {
            if let Some(object) = live_mut(&mut self.state, &id) {
                object.position += delta;
                self.to_update_collisions.insert(id);
            }
        }
    }

    fn grow_explosions(&mut self, delta_seconds: f64) {
        let mut grown: Vec<String> = Vec::new();
        for explosion in self.state.explosions_mut() {
            if explosion.freeze {
                continue;
            }
            let speed = match &explosion.kind {
                ObjectKind::Explosion { expansion_speed, .. } => *expansion_speed,
                _ => continue,
            };
            explosion.radius += speed * delta_seconds;
            grown.push(explosion.id.clone());
        }
        self.to_update_collisions.extend(grown);
    }

    fn destroy_timed_out(&mut self, delta_seconds: f64) {
        for explosion in self.state.explosions_mut() {
            if explosion.freeze {
                continue;
            }
            if let ObjectKind::Explosion { seconds_to_live, .. } = &mut explosion.kind {
                *seconds_to_live -= delta_seconds;
                if *seconds_to_live <= 0.0 {
                    explosion.destroyed = true;
                }
            }
        }
        let mut timed_out: Vec<String> = Vec::new();
        for shell in self.state.projectiles_mut() {
            if shell.freeze {
                continue;
            }
            if let ObjectKind::Projectile { seconds_to_live, .. } = &mut shell.kind {
                *seconds_to_live -= delta_seconds;
                if *seconds_to_live <= 0.0 {
                    timed_out.push(shell.id.clone());
                }
            }
        }
        for id in timed_out {
            self.explode_projectile(&id);
        }
    }

    /// Marks a projectile destroyed and queues its explosion, inheriting
    /// the projectile's velocity.
    fn explode_projectile(&mut self, id: &str) {
        let Some(projectile) = self.state.get_mut(id) else {
            return;
        };
        let ObjectKind::Projectile { model, .. } = &projectile.kind else {
            return;
        };
        let model = *model;
        projectile.destroyed = true;
        let position = projectile.position;
        let velocity = projectile.velocity;
        let explosion_id = self.make_id("explosion");
        let mut explosion =
            SpaceObject::explosion(explosion_id, position, &model.design().explosion);
        explosion.velocity = velocity;
        self.insert(explosion);
    }

    fn calc_homing_projectiles(&mut self, delta_seconds: f64) {
        let ids: Vec<String> = self
            .state
            .iter()
            .filter(|o| o.is_projectile() && !o.freeze)
            .map(|o| o.id.clone())
            .collect();
        for id in ids {
            let Some(projectile) = self.state.get(&id) else {
                continue;
            };
            let ObjectKind::Projectile { model, target_id, .. } = &projectile.kind else {
                continue;
            };
            let Some(homing) = model.design().homing else {
                continue;
            };
            let Some(target_id) = target_id.clone() else {
                continue;
            };
            let craft = Craft {
                position: projectile.position,
                velocity: projectile.velocity,
                angle: projectile.angle,
                turn_speed: projectile.turn_speed,
            };
            let Some(target) = self.get_object(&target_id) else {
                continue;
            };
            let destination = target.position;
            let target_radius = target.radius;
            let relative = destination - craft.position;
            if relative.length() - target_radius < homing.proximity_detonation {
                self.explode_projectile(&id);
                continue;
            }
            let off_course = to_degrees_delta(relative.angle_of() - craft.velocity.angle_of());
            let rotation;
            let boost;
            if off_course.abs() > 45.0 && off_course.abs() < 135.0 {
                // drifting sideways; turn hard against the current velocity
                rotation = rotate_to_target(
                    delta_seconds,
                    &craft,
                    craft.position + craft.velocity * -10.0,
                );
                boost = 1.0;
            } else {
                rotation = rotate_to_target(delta_seconds, &craft, destination);
                boost = move_to_target(&craft, destination).boost;
            }
            if let Some(projectile) = self.state.get_mut(&id) {
                projectile.turn_speed += rotation * delta_seconds * homing.rotation_capacity;
                if boost > 0.0 {
                    projectile.velocity += XY::by_length_and_direction(
                        boost * delta_seconds * homing.velocity_capacity,
                        projectile.angle,
                    );
                }
                if projectile.velocity.length() > homing.max_speed {
                    projectile.velocity = projectile.velocity.normalized_to(homing.max_speed);
                }
            }
        }
    }

    fn untrack_destroyed_objects(&mut self) {
        let destroyed: Vec<String> = self.state.iter_destroyed().map(|o| o.id.clone()).collect();
        for id in destroyed {
            if let Some(data) = self.extra_data.remove(&id) {
                self.body_to_object.remove(&data.body);
                self.index.remove(data.body);
                self.attachments.remove_attacher(&id);
            }
        }
    }

    fn frozen_and_attached_dont_move(&mut self) {
        let attachments = &self.attachments;
        for object in self.state.iter_mut() {
            if object.freeze || attachments.is_attacher(&object.id) {
                object.velocity = XY::ZERO;
                object.turn_speed = 0.0;
            }
        }
    }

    fn apply_physics(&mut self, delta_seconds: f64) {
        let ids: Vec<String> = self.state.iter().map(|o| o.id.clone()).collect();
        for id in &ids {
            let Some(subject) = self.state.get(id) else {
                continue;
            };
            let velocity = subject.velocity;
            if !velocity.is_zero(ZERO_VELOCITY_THRESHOLD) {
                let position_delta = velocity * delta_seconds;
                for member_id in &self.members_of(id) {
                    let Some(member) = self.state.get(member_id) else {
                        continue;
                    };
                    let origin = member.position;
                    let projectile_like = is_projectile_like(member);
                    let mut destination = origin + position_delta;
                    if projectile_like {
                        let body_to_object = &self.body_to_object;
                        let state = &self.state;
                        let hit = self.index.raycast(origin, destination, |body| {
                            match body_to_object.get(&body) {
                                Some(other) => state.get(other).map_or(true, is_projectile_like),
                                None => true,
                            }
                        });
                        if let Some((_, t)) = hit {
                            destination = origin + (destination - origin) * t;
                        }
                    }
                    if let Some(member) = self.state.get_mut(member_id) {
                        member.position = destination;
                    }
                    self.to_update_collisions.insert(member_id.clone());
                }
            }
            let Some(subject) = self.state.get(id) else {
                continue;
            };
            let turn_speed = subject.turn_speed;
            let pivot = subject.position;
            if turn_speed != 0.0 {
                let angle_delta = turn_speed * delta_seconds;
                for member_id in &self.members_of(id) {
                    let Some(member) = self.state.get_mut(member_id) else {
                        continue;
                    };
                    member.angle = to_positive_degrees_delta(member.angle + angle_delta);
                    if member_id != id {
                        member.position = (member.position - pivot).rotate(angle_delta) + pivot;
                        self.to_update_collisions.insert(member_id.clone());
                    }
                }
            }
        }
    }

    /// The subject's clique, or just the subject when it has none.
    fn members_of(&self, id: &str) -> Vec<String> {
        match self.attachments.clique_members(id) {
            Some(clique) => clique.to_vec(),
            None => vec![id.to_string()],
        }
    }

    fn update_fields_of_view(&mut self) {
        let extra_data = &mut self.extra_data;
        for object in self.state.iter() {
            match extra_data.get_mut(&object.id) {
                Some(data) => data.fov.set_dirty(),
                None => log::error!("object leak! {} has no extra data", object.id),
            }
        }
    }

    fn update_collision_bodies(&mut self) {
        let to_update = std::mem::take(&mut self.to_update_collisions);
        for id in to_update {
            let Some(object) = self.state.get(&id) else {
                continue;
            };
            if object.destroyed {
                continue;
            }
            match self.extra_data.get(&id) {
                Some(data) => self.index.update_body(data.body, object.position, object.radius),
                None => log::error!("object leak! {} has no extra data", id),
            }
        }
    }

    fn handle_collisions(&mut self, delta_seconds: f64) {
        let mut position_changes: Vec<(String, XY)> = Vec::new();
        let subject_ids: Vec<String> = self.state.iter().map(|o| o.id.clone()).collect();
        for subject_id in &subject_ids {
            let Some(subject_body) = self.extra_data.get(subject_id).map(|d| d.body) else {
                continue;
            };
            for object_body in self.index.potentials(subject_body) {
                let Some(object_id) = self.body_to_object.get(&object_body).cloned() else {
                    continue;
                };
                let (Some((a_center, a_radius)), Some((b_center, b_radius))) =
                    (self.index.body(subject_body), self.index.body(object_body))
                else {
                    continue;
                };
                let Some(response) = circle_circle(a_center, a_radius, b_center, b_radius) else {
                    continue;
                };
                self.handle_collision_pair(
                    delta_seconds,
                    subject_id,
                    &object_id,
                    subject_body,
                    object_body,
                    &response,
                    &mut position_changes,
                );
            }
        }
        // position corrections apply to whole cliques, after all pairs
        for (id, change) in position_changes {
            for member_id in self.members_of(&id) {
                if let Some(member) = self.state.get_mut(&member_id) {
                    member.position += change;
                    self.to_update_collisions.insert(member_id);
                }
            }
        }
    }

    fn handle_collision_pair(
        &mut self,
        delta_seconds: f64,
        subject_id: &str,
        object_id: &str,
        subject_body: BodyId,
        object_body: BodyId,
        response: &CollisionResponse,
        position_changes: &mut Vec<(String, XY)>,
    ) {
        let Some(subject) = self.state.get(subject_id) else {
            return;
        };
        let Some(object) = self.state.get(object_id) else {
            return;
        };
        if subject.destroyed || subject.freeze || object.destroyed {
            return;
        }
        if object.is_projectile() || subject.is_waypoint() || object.is_waypoint() {
            return;
        }

        if subject.is_projectile() {
            self.explode_projectile(subject_id);
            return;
        }

        if subject.is_explosion() {
            let radius = subject.radius;
            if response.a_in_b {
                // swallowed whole: stop drifting and recoil out of the overlap
                if let Some(subject) = self.state.get_mut(subject_id) {
                    subject.velocity = XY::ZERO;
                }
                position_changes.push((subject_id.to_string(), response.overlap_v * -0.5));
            } else if limit_precision(response.overlap) > limit_precision(radius) {
                position_changes.push((subject_id.to_string(), response.overlap_n * -radius));
            }
            return;
        }

        // solid subject from here on
        let blast = match &object.kind {
            ObjectKind::Explosion {
                damage_factor,
                blast_factor,
                ..
            } => Some((*damage_factor, *blast_factor)),
            _ => None,
        };
        let object_radius = object.radius;
        let collision_damage = subject.collision_damage;
        let elasticity = subject.collision_elasticity;
        let subject_is_ship = subject.is_ship();

        let (damage_amount, position_change, velocity_change) = match blast {
            Some((damage_factor, blast_factor)) => {
                let exposure = delta_seconds * response.overlap.min(object_radius * 2.0);
                (
                    damage_factor * exposure,
                    None,
                    response.overlap_v * (-exposure * blast_factor),
                )
            }
            None => {
                let collision_vector = response.overlap_v * -0.5;
                (
                    collision_damage * response.overlap.min(object_radius * 2.0),
                    Some(collision_vector),
                    collision_vector * (elasticity / delta_seconds),
                )
            }
        };
        if let Some(subject) = self.state.get_mut(subject_id) {
            subject.velocity += velocity_change;
        }
        if subject_is_ship {
            self.queue_ship_collision_damage(
                delta_seconds,
                damage_amount,
                subject_id,
                object_id,
                subject_body,
                object_body,
            );
        } else if let Some(subject) = self.state.get_mut(subject_id) {
            subject.health -= damage_amount;
        }
        if let Some(change) = position_change {
            position_changes.push((subject_id.to_string(), change));
        }
    }

    /// Converts a hull hit into a [`Damage`] record with the struck surface
    /// arc in the ship's local frame, queued for the ship's damage manager.
    fn queue_ship_collision_damage(
        &mut self,
        delta_seconds: f64,
        amount: f64,
        subject_id: &str,
        object_id: &str,
        subject_body: BodyId,
        object_body: BodyId,
    ) {
        let (Some(subject), Some(object)) =
            (self.state.get(subject_id), self.state.get(object_id))
        else {
            return;
        };
        match circles_intersection(subject.position, subject.radius, object.position, object.radius)
        {
            Some([near, far]) => {
                let arc = (
                    limit_precision(subject.global_to_local(near - subject.position).angle_of()),
                    limit_precision(subject.global_to_local(far - subject.position).angle_of()),
                );
                let damage = Damage {
                    id: object_id.to_string(),
                    amount,
                    damage_surface_arc: arc,
                    damage_duration_seconds: delta_seconds,
                };
                self.object_damage
                    .entry(subject_id.to_string())
                    .or_default()
                    .push(damage);
            }
            None => {
                let state_distance = (subject.position - object.position).length();
                let collision_distance =
                    match (self.index.body(subject_body), self.index.body(object_body)) {
                        (Some((a, _)), Some((b, _))) => (a - b).length(),
                        _ => f64::NAN,
                    };
                log::error!(
                    "unexpected missing intersection with Spaceship. subject {} at {:?} radius {}, object {} at {:?} radius {}, state distance {}, collision distance {}",
                    subject.kind_name(),
                    subject.position,
                    subject.radius,
                    object.kind_name(),
                    object.position,
                    object.radius,
                    state_distance,
                    collision_distance
                );
            }
        }
    }

    /// Drops untracked remains and deletes destroyed objects for good.
    fn gc(&mut self) {
        self.untrack_destroyed_objects();
        self.seconds_since_last_gc = 0.0;
        let destroyed: Vec<String> = self.state.iter_destroyed().map(|o| o.id.clone()).collect();
        for id in destroyed {
            self.state.remove(&id);
            self.object_damage.remove(&id);
            self.object_order.remove(&id);
        }
    }

    // --- persistence ---

    pub fn snapshot(&self) -> SpaceSnapshot {
        SpaceSnapshot {
            state: self.state.clone(),
            attachment_edges: self.attachments.edges().clone(),
            object_damage: self.object_damage.clone(),
            object_order: self.object_order.clone(),
            to_insert: self.to_insert.clone(),
            seconds_since_last_gc: self.seconds_since_last_gc,
            next_id: self.next_id,
        }
    }

    /// Rebuilds a manager from a snapshot, re-deriving bodies and views for
    /// the live objects.
    pub fn from_snapshot(snapshot: SpaceSnapshot) -> Self {
        let mut manager = Self::new();
        manager.state = snapshot.state;
        manager.attachments = AttachmentGraph::from_edges(snapshot.attachment_edges);
        manager.object_damage = snapshot.object_damage;
        manager.object_order = snapshot.object_order;
        manager.to_insert = snapshot.to_insert;
        manager.seconds_since_last_gc = snapshot.seconds_since_last_gc;
        manager.next_id = snapshot.next_id;
        let tracked: Vec<(String, XY, f64)> = manager
            .state
            .iter()
            .map(|o| (o.id.clone(), o.position, o.radius))
            .collect();
        for (id, position, radius) in tracked {
            let body = manager.index.insert(position, radius);
            manager.body_to_object.insert(body, id.clone());
            manager.extra_data.insert(
                id,
                ExtraData {
                    body,
                    fov: FieldOfView::new(),
                },
            );
        }
        manager
    }
}
