//! The space object model.
//!
//! Every simulated thing is one [`SpaceObject`]: shared kinematic state plus
//! an [`ObjectKind`] payload for the variant-specific fields. The canonical
//! owner of all objects is [`super::SpaceState`]; everything else refers to
//! objects by id.

use broadside_logic::xy::XY;
use serde::{Deserialize, Serialize};

/// Sensor reach of everything that is not a spaceship.
pub const DEFAULT_DETECTION_RANGE: f64 = 300.0;

/// Allegiance of an object, used for visibility queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    None,
    Gravitas,
    Raiders,
}

impl Default for Faction {
    fn default() -> Self {
        Faction::None
    }
}

/// Ammunition families a chain gun can cycle through, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    CannonShell,
    BlastCannonShell,
    Missile,
}

pub const PROJECTILE_KINDS: [ProjectileKind; 3] = [
    ProjectileKind::CannonShell,
    ProjectileKind::BlastCannonShell,
    ProjectileKind::Missile,
];

/// How the explosion left behind by a projectile behaves.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExplosionDesign {
    pub seconds_to_live: f64,
    pub expansion_speed: f64,
    pub damage_factor: f64,
    pub blast_factor: f64,
}

pub const DEFAULT_EXPLOSION: ExplosionDesign = ExplosionDesign {
    seconds_to_live: 0.5,
    expansion_speed: 10.0,
    damage_factor: 20.0,
    blast_factor: 1.0,
};

/// Guidance parameters for self-steering projectiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HomingDesign {
    pub seconds_to_live: f64,
    pub max_speed: f64,
    /// Acceleration available at full boost, units/second^2.
    pub velocity_capacity: f64,
    /// Angular acceleration available at full effort, degrees/second^2.
    pub rotation_capacity: f64,
    /// Detonate when this close to the target's surface.
    pub proximity_detonation: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProjectileDesign {
    pub radius: f64,
    pub explosion: ExplosionDesign,
    pub homing: Option<HomingDesign>,
}

static CANNON_SHELL: ProjectileDesign = ProjectileDesign {
    radius: 1.0,
    explosion: DEFAULT_EXPLOSION,
    homing: None,
};

static BLAST_CANNON_SHELL: ProjectileDesign = ProjectileDesign {
    radius: 2.0,
    explosion: ExplosionDesign {
        seconds_to_live: 1.0,
        expansion_speed: 40.0,
        damage_factor: 5.0,
        blast_factor: 4.0,
    },
    homing: None,
};

static MISSILE: ProjectileDesign = ProjectileDesign {
    radius: 3.0,
    explosion: ExplosionDesign {
        seconds_to_live: 0.5,
        expansion_speed: 100.0,
        damage_factor: 50.0,
        blast_factor: 2.0,
    },
    homing: Some(HomingDesign {
        seconds_to_live: 60.0,
        max_speed: 500.0,
        velocity_capacity: 600.0,
        rotation_capacity: 720.0,
        proximity_detonation: 30.0,
    }),
};

impl ProjectileKind {
    pub fn design(self) -> &'static ProjectileDesign {
        match self {
            ProjectileKind::CannonShell => &CANNON_SHELL,
            ProjectileKind::BlastCannonShell => &BLAST_CANNON_SHELL,
            ProjectileKind::Missile => &MISSILE,
        }
    }
}

/// Variant-specific payload of a [`SpaceObject`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    Asteroid,
    Spaceship {
        /// Current weapons target, replicated for other viewers.
        target_id: Option<String>,
        radar_range: f64,
    },
    Projectile {
        model: ProjectileKind,
        seconds_to_live: f64,
        target_id: Option<String>,
    },
    Explosion {
        seconds_to_live: f64,
        expansion_speed: f64,
        damage_factor: f64,
        blast_factor: f64,
    },
    Waypoint,
}

/// One simulated object. Common kinematics live here; per-variant fields
/// live in [`ObjectKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceObject {
    pub id: String,
    pub position: XY,
    pub radius: f64,
    pub velocity: XY,
    /// Facing in degrees, 0 is +x, 90 is +y.
    pub angle: f64,
    /// Change of angle in degrees/second.
    pub turn_speed: f64,
    pub health: f64,
    /// Hull damage dealt per unit of penetration in solid collisions.
    pub collision_damage: f64,
    /// Share of the separation impulse converted back into velocity.
    pub collision_elasticity: f64,
    pub destroyed: bool,
    pub freeze: bool,
    /// Only expendable objects can be destroyed by command.
    pub expendable: bool,
    pub faction: Faction,
    pub kind: ObjectKind,
}

impl SpaceObject {
    fn base(id: String, position: XY, radius: f64, kind: ObjectKind) -> Self {
        Self {
            id,
            position,
            radius,
            velocity: XY::ZERO,
            angle: 0.0,
            turn_speed: 0.0,
            health: 1.0,
            collision_damage: 0.0,
            collision_elasticity: 0.0,
            destroyed: false,
            freeze: false,
            expendable: true,
            faction: Faction::None,
            kind,
        }
    }

    pub fn asteroid(id: impl Into<String>, position: XY, radius: f64) -> Self {
        let mut object = Self::base(id.into(), position, radius, ObjectKind::Asteroid);
        object.health = 100.0;
        object.collision_damage = 20.0;
        object.collision_elasticity = 0.25;
        object
    }

    pub fn spaceship(id: impl Into<String>, position: XY, faction: Faction) -> Self {
        let mut object = Self::base(
            id.into(),
            position,
            50.0,
            ObjectKind::Spaceship {
                target_id: None,
                radar_range: 3000.0,
            },
        );
        object.health = 1000.0;
        object.collision_damage = 50.0;
        object.collision_elasticity = 0.05;
        object.faction = faction;
        object
    }

    pub fn projectile(id: impl Into<String>, position: XY, model: ProjectileKind) -> Self {
        let design = model.design();
        Self::base(
            id.into(),
            position,
            design.radius,
            ObjectKind::Projectile {
                model,
                seconds_to_live: 0.0,
                target_id: None,
            },
        )
    }

    pub fn explosion(id: impl Into<String>, position: XY, design: &ExplosionDesign) -> Self {
        Self::base(
            id.into(),
            position,
            0.1,
            ObjectKind::Explosion {
                seconds_to_live: design.seconds_to_live,
                expansion_speed: design.expansion_speed,
                damage_factor: design.damage_factor,
                blast_factor: design.blast_factor,
            },
        )
    }

    pub fn waypoint(id: impl Into<String>, position: XY) -> Self {
        Self::base(id.into(), position, 10.0, ObjectKind::Waypoint)
    }

    pub fn is_ship(&self) -> bool {
        matches!(self.kind, ObjectKind::Spaceship { .. })
    }

    pub fn is_projectile(&self) -> bool {
        matches!(self.kind, ObjectKind::Projectile { .. })
    }

    pub fn is_explosion(&self) -> bool {
        matches!(self.kind, ObjectKind::Explosion { .. })
    }

    pub fn is_waypoint(&self) -> bool {
        matches!(self.kind, ObjectKind::Waypoint)
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ObjectKind::Asteroid => "Asteroid",
            ObjectKind::Spaceship { .. } => "Spaceship",
            ObjectKind::Projectile { .. } => "Projectile",
            ObjectKind::Explosion { .. } => "Explosion",
            ObjectKind::Waypoint => "Waypoint",
        }
    }

    /// Detection range of the object's own sensors. Only spaceships carry
    /// an adjustable radar; everything else gets a short fixed reach.
    pub fn radar_range(&self) -> f64 {
        match self.kind {
            ObjectKind::Spaceship { radar_range, .. } => radar_range,
            _ => DEFAULT_DETECTION_RANGE,
        }
    }

    /// Rotate a world-frame offset into the object's local frame.
    pub fn global_to_local(&self, offset: XY) -> XY {
        offset.rotate(-self.angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaceship_defaults() {
        let ship = SpaceObject::spaceship("s1", XY::ZERO, Faction::Gravitas);
        assert_eq!(ship.health, 1000.0);
        assert_eq!(ship.radius, 50.0);
        assert_eq!(ship.radar_range(), 3000.0);
        assert!(ship.is_ship());
        assert!(!ship.destroyed);
    }

    #[test]
    fn test_projectile_radius_comes_from_design() {
        let shell = SpaceObject::projectile("p1", XY::ZERO, ProjectileKind::Missile);
        assert_eq!(shell.radius, ProjectileKind::Missile.design().radius);
        assert!(shell.is_projectile());
        assert_eq!(shell.radar_range(), DEFAULT_DETECTION_RANGE);
    }

    #[test]
    fn test_global_to_local_uses_facing() {
        let mut ship = SpaceObject::spaceship("s1", XY::ZERO, Faction::None);
        ship.angle = 90.0;
        let local = ship.global_to_local(XY::new(0.0, 1.0));
        assert!((local.x - 1.0).abs() < 1e-9);
        assert!(local.y.abs() < 1e-9);
    }

    #[test]
    fn test_only_missile_homes() {
        assert!(ProjectileKind::Missile.design().homing.is_some());
        assert!(ProjectileKind::CannonShell.design().homing.is_none());
        assert!(ProjectileKind::BlastCannonShell.design().homing.is_none());
    }
}
