//! Per-ship subsystem state: the tree owned by a ship's manager, distinct
//! from the ship's [`super::SpaceObject`] in space.
//!
//! Every powered system carries heat, a design block and an efficiency
//! factor in [0, 1]; the factor starts at 1 and is ground down by damage.

use serde::{Deserialize, Serialize};

use super::commands::BotOrder;
use super::objects::{ProjectileKind, PROJECTILE_KINDS};

/// Aiming mode for a value that can either be held directly or follow the
/// current target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmartPilotMode {
    Direct,
    Velocity,
    Target,
}

/// Uniform view over a ship's powered systems, for heat distribution and
/// system damage.
pub trait ShipSystem {
    fn name(&self) -> &'static str;
    fn heat(&self) -> f64;
    fn heat_mut(&mut self) -> &mut f64;
    fn coolant_factor(&self) -> f64;
    fn efficiency_factor(&self) -> f64;
    fn efficiency_factor_mut(&mut self) -> &mut f64;
    /// Damage amount that halves this system's efficiency.
    fn damage50(&self) -> f64;
}

// --- Chain gun ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainGunDesign {
    pub bullets_per_second: f64,
    pub bullet_speed: f64,
    /// Standard deviation of the firing angle, degrees.
    pub bullet_degrees_deviation: f64,
    pub min_shell_range: f64,
    pub max_shell_range: f64,
    /// When positive, shells live exactly this long regardless of range mode.
    pub override_seconds_to_live: f64,
    /// Energy per bullet loaded or unloaded.
    pub energy_cost: f64,
    pub damage50: f64,
    pub use_cannon_shell: bool,
    pub use_blast_cannon_shell: bool,
    pub use_missile: bool,
}

impl Default for ChainGunDesign {
    fn default() -> Self {
        Self {
            bullets_per_second: 20.0,
            bullet_speed: 1000.0,
            bullet_degrees_deviation: 1.0,
            min_shell_range: 1000.0,
            max_shell_range: 5000.0,
            override_seconds_to_live: 0.0,
            energy_cost: 0.25,
            damage50: 20.0,
            use_cannon_shell: true,
            use_blast_cannon_shell: true,
            use_missile: false,
        }
    }
}

impl ChainGunDesign {
    pub fn uses(&self, kind: ProjectileKind) -> bool {
        match kind {
            ProjectileKind::CannonShell => self.use_cannon_shell,
            ProjectileKind::BlastCannonShell => self.use_blast_cannon_shell,
            ProjectileKind::Missile => self.use_missile,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainGun {
    pub design: ChainGunDesign,
    /// Gun bearing relative to the ship's facing, degrees.
    pub angle: f64,
    /// Manual aim correction added to the fire angle, degrees.
    pub angle_offset: f64,
    pub rate_of_fire_factor: f64,
    pub is_firing: bool,
    /// When false, a chambered round is unloaded back to the magazine.
    pub load_ammo: bool,
    /// Load progress in [0, 1].
    pub loading: f64,
    /// Fractional load progress carried between ticks, to keep very high
    /// rates of fire accurate.
    pub loading_remainder: f64,
    pub loaded_projectile: Option<ProjectileKind>,
    /// Ammo selection the loader works toward.
    pub projectile: Option<ProjectileKind>,
    pub change_projectile_command: bool,
    pub shell_range_mode: SmartPilotMode,
    /// Manual range knob in [-1, 1], lerped over the design's aim range.
    pub shell_range: f64,
    pub shell_seconds_to_live: f64,
    pub heat: f64,
    pub coolant_factor: f64,
    pub efficiency_factor: f64,
}

impl Default for ChainGun {
    fn default() -> Self {
        Self {
            design: ChainGunDesign::default(),
            angle: 0.0,
            angle_offset: 0.0,
            rate_of_fire_factor: 1.0,
            is_firing: false,
            load_ammo: true,
            loading: 0.0,
            loading_remainder: 0.0,
            loaded_projectile: None,
            projectile: None,
            change_projectile_command: false,
            shell_range_mode: SmartPilotMode::Direct,
            shell_range: 0.0,
            shell_seconds_to_live: 0.0,
            heat: 0.0,
            coolant_factor: 0.0,
            efficiency_factor: 1.0,
        }
    }
}

impl ChainGun {
    /// Functional output multiplier; zero means the gun is dead.
    pub fn effectiveness(&self) -> f64 {
        self.efficiency_factor
    }
}

impl ShipSystem for ChainGun {
    fn name(&self) -> &'static str {
        "ChainGun"
    }
    fn heat(&self) -> f64 {
        self.heat
    }
    fn heat_mut(&mut self) -> &mut f64 {
        &mut self.heat
    }
    fn coolant_factor(&self) -> f64 {
        self.coolant_factor
    }
    fn efficiency_factor(&self) -> f64 {
        self.efficiency_factor
    }
    fn efficiency_factor_mut(&mut self) -> &mut f64 {
        &mut self.efficiency_factor
    }
    fn damage50(&self) -> f64 {
        self.design.damage50
    }
}

// --- Magazine ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MagazineDesign {
    pub max_cannon_shell: u32,
    pub max_blast_cannon_shell: u32,
    pub max_missile: u32,
    pub damage50: f64,
}

impl Default for MagazineDesign {
    fn default() -> Self {
        Self {
            max_cannon_shell: 3600,
            max_blast_cannon_shell: 800,
            max_missile: 20,
            damage50: 20.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Magazine {
    pub design: MagazineDesign,
    pub count_cannon_shell: u32,
    pub count_blast_cannon_shell: u32,
    pub count_missile: u32,
    pub heat: f64,
    pub coolant_factor: f64,
    pub efficiency_factor: f64,
}

impl Default for Magazine {
    fn default() -> Self {
        let design = MagazineDesign::default();
        Self {
            count_cannon_shell: design.max_cannon_shell,
            count_blast_cannon_shell: design.max_blast_cannon_shell,
            count_missile: design.max_missile,
            design,
            heat: 0.0,
            coolant_factor: 0.0,
            efficiency_factor: 1.0,
        }
    }
}

impl Magazine {
    pub fn count(&self, kind: ProjectileKind) -> u32 {
        match kind {
            ProjectileKind::CannonShell => self.count_cannon_shell,
            ProjectileKind::BlastCannonShell => self.count_blast_cannon_shell,
            ProjectileKind::Missile => self.count_missile,
        }
    }

    pub fn count_mut(&mut self, kind: ProjectileKind) -> &mut u32 {
        match kind {
            ProjectileKind::CannonShell => &mut self.count_cannon_shell,
            ProjectileKind::BlastCannonShell => &mut self.count_blast_cannon_shell,
            ProjectileKind::Missile => &mut self.count_missile,
        }
    }

    /// First enabled kind with stock, in cycle order.
    pub fn first_available(&self, design: &ChainGunDesign) -> Option<ProjectileKind> {
        PROJECTILE_KINDS
            .iter()
            .copied()
            .find(|&kind| design.uses(kind) && self.count(kind) > 0)
    }
}

impl ShipSystem for Magazine {
    fn name(&self) -> &'static str {
        "Magazine"
    }
    fn heat(&self) -> f64 {
        self.heat
    }
    fn heat_mut(&mut self) -> &mut f64 {
        &mut self.heat
    }
    fn coolant_factor(&self) -> f64 {
        self.coolant_factor
    }
    fn efficiency_factor(&self) -> f64 {
        self.efficiency_factor
    }
    fn efficiency_factor_mut(&mut self) -> &mut f64 {
        &mut self.efficiency_factor
    }
    fn damage50(&self) -> f64 {
        self.design.damage50
    }
}

// --- Reactor ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactorDesign {
    pub energy_per_second: f64,
    pub max_energy: f64,
    /// Consumption rate (energy per minute) above which the reactor heats.
    pub energy_heat_epm_threshold: f64,
    /// Heat per second added while above the threshold.
    pub energy_heat: f64,
    pub damage50: f64,
}

impl Default for ReactorDesign {
    fn default() -> Self {
        Self {
            energy_per_second: 5.0,
            max_energy: 1000.0,
            energy_heat_epm_threshold: 240.0,
            energy_heat: 20.0,
            damage50: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reactor {
    pub design: ReactorDesign,
    pub energy: f64,
    /// Energy spent since the reactor's last update, for heat metering.
    pub spent_since_update: f64,
    pub heat: f64,
    pub coolant_factor: f64,
    pub efficiency_factor: f64,
}

impl Default for Reactor {
    fn default() -> Self {
        Self {
            design: ReactorDesign::default(),
            energy: 1000.0,
            spent_since_update: 0.0,
            heat: 0.0,
            coolant_factor: 0.0,
            efficiency_factor: 1.0,
        }
    }
}

impl Reactor {
    pub fn energy_per_second(&self) -> f64 {
        self.efficiency_factor * self.design.energy_per_second
    }

    pub fn broken(&self) -> bool {
        self.efficiency_factor == 0.0
    }
}

impl ShipSystem for Reactor {
    fn name(&self) -> &'static str {
        "Reactor"
    }
    fn heat(&self) -> f64 {
        self.heat
    }
    fn heat_mut(&mut self) -> &mut f64 {
        &mut self.heat
    }
    fn coolant_factor(&self) -> f64 {
        self.coolant_factor
    }
    fn efficiency_factor(&self) -> f64 {
        self.efficiency_factor
    }
    fn efficiency_factor_mut(&mut self) -> &mut f64 {
        &mut self.efficiency_factor
    }
    fn damage50(&self) -> f64 {
        self.design.damage50
    }
}

// --- Armor ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmorDesign {
    pub num_plates: usize,
    pub plate_max_health: f64,
}

impl Default for ArmorDesign {
    fn default() -> Self {
        Self {
            num_plates: 60,
            plate_max_health: 200.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmorPlate {
    pub health: f64,
}

/// Ring of plates around the hull; plate 0 starts at local angle 0 and
/// plates continue counter-clockwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Armor {
    pub design: ArmorDesign,
    pub plates: Vec<ArmorPlate>,
}

impl Default for Armor {
    fn default() -> Self {
        let design = ArmorDesign::default();
        let plates = vec![
            ArmorPlate {
                health: design.plate_max_health,
            };
            design.num_plates
        ];
        Self { design, plates }
    }
}

impl Armor {
    pub fn degrees_per_plate(&self) -> f64 {
        360.0 / self.plates.len() as f64
    }
}

// --- Ship state tree ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipDesign {
    /// Total coolant flow; each unit removes one heat per second.
    pub total_coolant: f64,
}

impl Default for ShipDesign {
    fn default() -> Self {
        Self { total_coolant: 6.0 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipState {
    pub design: ShipDesign,
    pub chain_gun: ChainGun,
    pub magazine: Magazine,
    pub reactor: Reactor,
    pub armor: Armor,
    pub weapons_target_id: Option<String>,
    pub current_order: BotOrder,
}

impl ShipState {
    /// The powered systems, in a fixed order.
    pub fn systems_mut(&mut self) -> [&mut dyn ShipSystem; 3] {
        [&mut self.chain_gun, &mut self.magazine, &mut self.reactor]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magazine_enum_keyed_counts() {
        let mut magazine = Magazine::default();
        assert_eq!(
            magazine.count(ProjectileKind::CannonShell),
            magazine.design.max_cannon_shell
        );
        *magazine.count_mut(ProjectileKind::Missile) = 3;
        assert_eq!(magazine.count(ProjectileKind::Missile), 3);
    }

    #[test]
    fn test_first_available_respects_design_flags() {
        let mut magazine = Magazine::default();
        let mut design = ChainGunDesign::default();
        design.use_cannon_shell = false;
        assert_eq!(
            magazine.first_available(&design),
            Some(ProjectileKind::BlastCannonShell)
        );
        magazine.count_blast_cannon_shell = 0;
        assert_eq!(magazine.first_available(&design), None);
    }

    #[test]
    fn test_reactor_output_scales_with_efficiency() {
        let mut reactor = Reactor::default();
        assert_eq!(reactor.energy_per_second(), 5.0);
        reactor.efficiency_factor = 0.5;
        assert_eq!(reactor.energy_per_second(), 2.5);
        assert!(!reactor.broken());
        reactor.efficiency_factor = 0.0;
        assert!(reactor.broken());
    }

    #[test]
    fn test_armor_ring_covers_the_hull() {
        let armor = Armor::default();
        assert_eq!(armor.plates.len(), 60);
        assert_eq!(armor.degrees_per_plate(), 6.0);
    }
}
