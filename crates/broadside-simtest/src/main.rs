//! Broadside Headless Battle Harness
//!
//! Validates the combat core end to end without a host process.
//! Runs entirely in-process: no networking, no rendering, no replication.
//!
//! Usage:
//!   cargo run -p broadside-simtest
//!   cargo run -p broadside-simtest -- --verbose

use broadside_core::model::{
    Faction, MoveCommand, ObjectKind, ProjectileKind, ShipState, SmartPilotMode, SpaceObject,
};
use broadside_core::prelude::SpaceEngine;
use broadside_core::ship::{
    add_heat, calc_shell_seconds_to_live, damage_system, distribute_coolant, reduce_heat,
    set_shell_range_mode, switch_to_available_ammo, update_chain_gun, MAX_SYSTEM_HEAT,
};
use broadside_core::space::SpaceManager;
use broadside_logic::gunnery::{self, FiringSolution};
use broadside_logic::xy::XY;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::init();
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Broadside Battle Harness ===\n");

    let mut results = Vec::new();

    // 1. Kinematics sweep
    results.extend(validate_kinematics(verbose));

    // 2. Rigid attachment cliques
    results.extend(validate_attachments(verbose));

    // 3. Radar and faction visibility
    results.extend(validate_visibility(verbose));

    // 4. Gunnery predictions
    results.extend(validate_gunnery_math(verbose));

    // 5. Chain gun loader cycle
    results.extend(validate_chain_gun(verbose));

    // 6. Heat, coolant and system damage
    results.extend(validate_heat_and_damage(verbose));

    // 7. Collisions and armor
    results.extend(validate_collision_scenario(verbose));

    // 8. Homing missiles
    results.extend(validate_homing_missiles(verbose));

    // 9. Determinism and persistence
    results.extend(validate_determinism(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Kinematics ───────────────────────────────────────────────────────

fn validate_kinematics(_verbose: bool) -> Vec<TestResult> {
    println!("--- Kinematics ---");
    let mut results = Vec::new();

    let mut space = SpaceManager::new();
    let mut drifter = SpaceObject::asteroid("drifter", XY::ZERO, 12.0);
    drifter.velocity = XY::new(120.0, -40.0);
    space.insert(drifter);
    let mut spinner = SpaceObject::asteroid("spinner", XY::new(4000.0, 0.0), 12.0);
    spinner.turn_speed = 90.0;
    space.insert(spinner);
    let mut frozen = SpaceObject::asteroid("frozen", XY::new(-4000.0, 0.0), 12.0);
    frozen.velocity = XY::new(500.0, 0.0);
    frozen.freeze = true;
    space.insert(frozen);
    let mut shell =
        SpaceObject::projectile("tracer", XY::new(0.0, 4000.0), ProjectileKind::CannonShell);
    if let ObjectKind::Projectile { seconds_to_live, .. } = &mut shell.kind {
        *seconds_to_live = 0.3;
    }
    shell.velocity = XY::new(100.0, 0.0);
    space.insert(shell);

    space.update(0.5);

    let drifter_position = space
        .get_object("drifter")
        .map_or(XY::ZERO, |o| o.position);
    results.push(TestResult {
        name: "kinematics_velocity_integrates".into(),
        passed: (drifter_position - XY::new(60.0, -20.0)).length() < 1e-9,
        detail: format!(
            "({:.1}, {:.1}) after 0.5s at (120, -40)",
            drifter_position.x, drifter_position.y
        ),
    });

    let spinner_angle = space.get_object("spinner").map_or(0.0, |o| o.angle);
    results.push(TestResult {
        name: "kinematics_turn_speed_spins".into(),
        passed: (spinner_angle - 45.0).abs() < 1e-9,
        detail: format!("{:.1}° after 0.5s at 90°/s", spinner_angle),
    });

    let frozen_position = space
        .get_object("frozen")
        .map_or(XY::ZERO, |o| o.position);
    results.push(TestResult {
        name: "kinematics_freeze_pins_objects".into(),
        passed: (frozen_position - XY::new(-4000.0, 0.0)).length() < 1e-9,
        detail: "frozen mover stayed put".into(),
    });

    space.set_velocity("drifter", XY::new(f64::NAN, 0.0));
    let drifter_velocity = space
        .get_object("drifter")
        .map_or(XY::ZERO, |o| o.velocity);
    results.push(TestResult {
        name: "kinematics_nan_velocity_rejected".into(),
        passed: (drifter_velocity - XY::new(120.0, -40.0)).length() < 1e-9,
        detail: format!(
            "velocity still ({:.0}, {:.0})",
            drifter_velocity.x, drifter_velocity.y
        ),
    });

    let expired = space.state.get("tracer").map_or(false, |o| o.destroyed);
    space.update(0.1);
    let explosion_spawned = space.state.iter().any(|o| o.is_explosion());
    results.push(TestResult {
        name: "kinematics_shells_expire_into_explosions".into(),
        passed: expired && explosion_spawned,
        detail: format!(
            "tracer destroyed={}, explosion spawned={}",
            expired, explosion_spawned
        ),
    });

    results
}

// ── 2. Rigid Attachments ────────────────────────────────────────────────

fn validate_attachments(_verbose: bool) -> Vec<TestResult> {
    println!("--- Rigid Attachments ---");
    let mut results = Vec::new();

    // Tow: the carrier's velocity moves the whole clique
    let mut space = SpaceManager::new();
    let mut carrier = SpaceObject::asteroid("carrier", XY::ZERO, 10.0);
    carrier.velocity = XY::new(10.0, 0.0);
    space.insert(carrier);
    space.insert(SpaceObject::waypoint("pod", XY::new(0.0, 100.0)));
    space.force_flush_inserts();
    space.attach("pod", "carrier");
    space.update(1.0);
    let carrier_position = space.get_object("carrier").map_or(XY::ZERO, |o| o.position);
    let pod_position = space.get_object("pod").map_or(XY::ZERO, |o| o.position);
    results.push(TestResult {
        name: "attachments_clique_moves_as_one".into(),
        passed: (carrier_position - XY::new(10.0, 0.0)).length() < 1e-9
            && (pod_position - XY::new(10.0, 100.0)).length() < 1e-9,
        detail: format!(
            "carrier ({:.0}, {:.0}), pod ({:.0}, {:.0})",
            carrier_position.x, carrier_position.y, pod_position.x, pod_position.y
        ),
    });

    // Spin: followers orbit the turning carrier
    let mut space = SpaceManager::new();
    let mut hub = SpaceObject::asteroid("hub", XY::ZERO, 10.0);
    hub.turn_speed = 90.0;
    space.insert(hub);
    space.insert(SpaceObject::waypoint("spoke", XY::new(100.0, 0.0)));
    space.force_flush_inserts();
    space.attach("spoke", "hub");
    space.update(1.0);
    let spoke = space.get_object("spoke").map_or(XY::ZERO, |o| o.position);
    results.push(TestResult {
        name: "attachments_followers_orbit_the_pivot".into(),
        passed: (spoke - XY::new(0.0, 100.0)).length() < 1e-6,
        detail: format!("spoke swung to ({:.1}, {:.1})", spoke.x, spoke.y),
    });

    // Detach: the leaver is handed the clique's summed motion
    let mut space = SpaceManager::new();
    let mut tug = SpaceObject::asteroid("tug", XY::ZERO, 10.0);
    tug.velocity = XY::new(30.0, 0.0);
    space.insert(tug);
    space.insert(SpaceObject::waypoint("barge", XY::new(0.0, 100.0)));
    space.force_flush_inserts();
    space.attach("barge", "tug");
    space.update(1.0);
    space.detach("barge");
    let barge_velocity = space.get_object("barge").map_or(XY::ZERO, |o| o.velocity);
    results.push(TestResult {
        name: "attachments_detach_hands_over_motion".into(),
        passed: (barge_velocity - XY::new(30.0, 0.0)).length() < 1e-9,
        detail: format!(
            "barge released at ({:.0}, {:.0})",
            barge_velocity.x, barge_velocity.y
        ),
    });

    // Move commands shift whole cliques
    let mut space = SpaceManager::new();
    space.insert(SpaceObject::asteroid("lead", XY::ZERO, 10.0));
    space.insert(SpaceObject::waypoint("tail", XY::new(0.0, 100.0)));
    space.force_flush_inserts();
    space.attach("tail", "lead");
    space.update(0.1);
    space.state.move_commands.push(MoveCommand {
        ids: vec!["lead".to_string()],
        delta: XY::new(7.0, -3.0),
    });
    space.update(0.1);
    let lead = space.get_object("lead").map_or(XY::ZERO, |o| o.position);
    let tail = space.get_object("tail").map_or(XY::ZERO, |o| o.position);
    results.push(TestResult {
        name: "attachments_moves_apply_to_cliques".into(),
        passed: (lead - XY::new(7.0, -3.0)).length() < 1e-9
            && (tail - XY::new(7.0, 97.0)).length() < 1e-9,
        detail: format!("lead ({:.0}, {:.0}), tail ({:.0}, {:.0})", lead.x, lead.y, tail.x, tail.y),
    });

    results
}

// ── 3. Radar & Visibility ───────────────────────────────────────────────

fn validate_visibility(_verbose: bool) -> Vec<TestResult> {
    println!("--- Radar & Visibility ---");
    let mut results = Vec::new();

    let mut space = SpaceManager::new();
    space.insert(SpaceObject::spaceship("watcher", XY::ZERO, Faction::Gravitas));
    space.insert(SpaceObject::asteroid("near", XY::new(2500.0, 0.0), 40.0));
    space.insert(SpaceObject::asteroid("far", XY::new(6000.0, 0.0), 40.0));
    space.insert(SpaceObject::spaceship(
        "prowler",
        XY::new(-2500.0, 0.0),
        Faction::Raiders,
    ));
    space.update(0.1);

    let gravitas = space.faction_visible_objects(Faction::Gravitas);
    results.push(TestResult {
        name: "visibility_radar_detects_in_range".into(),
        passed: gravitas.contains("watcher")
            && gravitas.contains("near")
            && gravitas.contains("prowler"),
        detail: format!("{} contacts on the gravitas plot", gravitas.len()),
    });
    results.push(TestResult {
        name: "visibility_radar_has_a_horizon".into(),
        passed: !gravitas.contains("far"),
        detail: "rock at 6000 is past the 3000 radar".into(),
    });

    let raiders = space.faction_visible_objects(Faction::Raiders);
    results.push(TestResult {
        name: "visibility_factions_see_their_own_plots".into(),
        passed: raiders.contains("prowler")
            && raiders.contains("watcher")
            && !raiders.contains("near"),
        detail: format!("{} contacts on the raider plot", raiders.len()),
    });

    space.change_ship_radar_range("watcher", 1000.0);
    space.update(0.1);
    let shortened = space.faction_visible_objects(Faction::Gravitas);
    results.push(TestResult {
        name: "visibility_radar_range_is_adjustable".into(),
        passed: !shortened.contains("near"),
        detail: "contact lost after the radar shrank to 1000".into(),
    });

    results
}

// ── 4. Gunnery Predictions ──────────────────────────────────────────────

fn validate_gunnery_math(_verbose: bool) -> Vec<TestResult> {
    println!("--- Gunnery Predictions ---");
    let mut results = Vec::new();

    let solution = FiringSolution {
        ship_position: XY::ZERO,
        ship_velocity: XY::ZERO,
        ship_angle: 0.0,
        ship_radius: 50.0,
        gun_angle: 0.0,
        bullet_speed: 1000.0,
        shell_seconds_to_live: 2.0,
        bullet_degrees_deviation: 1.0,
        explosion_seconds_to_live: 0.5,
        explosion_expansion_speed: 10.0,
    };

    let detonation = gunnery::shell_explosion_location(&solution);
    results.push(TestResult {
        name: "gunnery_detonation_point".into(),
        passed: (detonation - XY::new(2050.0, 0.0)).length() < 1e-9,
        detail: format!("shell detonates at ({:.0}, {:.0})", detonation.x, detonation.y),
    });

    let flight = gunnery::seconds_to_target(&solution, XY::new(3000.0, 0.0));
    results.push(TestResult {
        name: "gunnery_flight_time".into(),
        passed: (flight - 3.0).abs() < 1e-9,
        detail: format!("{:.1}s to a target at 3000", flight),
    });

    // A crossing target that will be at the detonation point when it goes off
    let crossing = gunnery::is_target_in_kill_zone(
        &solution,
        XY::new(2050.0, -300.0),
        XY::new(0.0, 150.0),
    );
    results.push(TestResult {
        name: "gunnery_lead_prediction".into(),
        passed: crossing,
        detail: "crossing target flagged inside the kill zone".into(),
    });

    let wide = gunnery::is_target_in_kill_zone(&solution, XY::new(2050.0, 2000.0), XY::ZERO);
    results.push(TestResult {
        name: "gunnery_wide_miss_flagged".into(),
        passed: !wide,
        detail: "target 2000 off axis is out of danger".into(),
    });

    let (zone_inner, zone_outer) = gunnery::kill_zone_radius(&solution);
    results.push(TestResult {
        name: "gunnery_kill_zone_band".into(),
        passed: (zone_inner - 1985.0).abs() < 1e-9 && (zone_outer - 2015.0).abs() < 1e-9,
        detail: format!("kill zone spans {:.0}..{:.0}", zone_inner, zone_outer),
    });

    let tight = gunnery::shell_danger_zone_radius(&solution);
    let sloppy = gunnery::shell_danger_zone_radius(&FiringSolution {
        bullet_degrees_deviation: 3.0,
        ..solution
    });
    results.push(TestResult {
        name: "gunnery_deviation_widens_danger".into(),
        passed: sloppy > tight,
        detail: format!("danger radius {:.0} → {:.0} as deviation triples", tight, sloppy),
    });

    results
}

// ── 5. Chain Gun Cycle ──────────────────────────────────────────────────

fn validate_chain_gun(_verbose: bool) -> Vec<TestResult> {
    println!("--- Chain Gun Cycle ---");
    let mut results = Vec::new();

    // Sustained fire through the engine
    let mut engine = SpaceEngine::new(11);
    engine.add_ship("gunner", XY::ZERO, Faction::Gravitas);
    if let Some(ship) = engine.ship_mut("gunner") {
        ship.set_firing(true);
    }
    for _ in 0..10 {
        engine.update(0.05);
    }

    let shells_in_flight = engine
        .space
        .state
        .iter()
        .filter(|o| o.is_projectile())
        .count();
    results.push(TestResult {
        name: "chain_gun_sustained_fire".into(),
        passed: shells_in_flight == 10,
        detail: format!("{} shells in flight after 10 ticks at 20 rps", shells_in_flight),
    });

    let (magazine_left, loading, reactor_energy, reactor_heat) = engine
        .ship("gunner")
        .map_or((0, 1.0, 0.0, 0.0), |ship| {
            (
                ship.state.magazine.count_cannon_shell,
                ship.state.chain_gun.loading,
                ship.state.reactor.energy,
                ship.state.reactor.heat,
            )
        });
    results.push(TestResult {
        name: "chain_gun_magazine_drains".into(),
        passed: magazine_left == 3590 && loading == 0.0,
        detail: format!("{} rounds left, loading reset to {:.1}", magazine_left, loading),
    });
    results.push(TestResult {
        name: "chain_gun_loading_costs_energy".into(),
        passed: (reactor_energy - 999.75).abs() < 1e-6,
        detail: format!("reactor at {:.2} energy mid-burst", reactor_energy),
    });
    results.push(TestResult {
        name: "chain_gun_sustained_draw_heats_reactor".into(),
        passed: reactor_heat > 5.0,
        detail: format!("reactor heat {:.1} from a 300 epm draw", reactor_heat),
    });

    // A dead reactor stalls the loader
    let mut engine = SpaceEngine::new(11);
    engine.add_ship("dry", XY::ZERO, Faction::Gravitas);
    if let Some(ship) = engine.ship_mut("dry") {
        ship.state.reactor.energy = 0.0;
        ship.state.reactor.design.energy_per_second = 0.0;
        ship.set_firing(true);
    }
    for _ in 0..5 {
        engine.update(0.05);
    }
    let starved_shells = engine
        .space
        .state
        .iter()
        .filter(|o| o.is_projectile())
        .count();
    let (starved_magazine, starved_loading) = engine
        .ship("dry")
        .map_or((0, 1.0), |ship| {
            (
                ship.state.magazine.count_cannon_shell,
                ship.state.chain_gun.loading,
            )
        });
    results.push(TestResult {
        name: "chain_gun_energy_gate".into(),
        passed: starved_shells == 0 && starved_magazine == 3600 && starved_loading == 0.0,
        detail: format!(
            "{} shells fired, {} rounds untouched on an empty reactor",
            starved_shells, starved_magazine
        ),
    });

    // Unloading returns the chambered round to the magazine
    let mut state = ShipState::default();
    switch_to_available_ammo(&mut state.chain_gun, &state.magazine);
    update_chain_gun(&mut state, 0.025);
    update_chain_gun(&mut state, 0.025);
    let chambered = state.chain_gun.loaded_projectile == Some(ProjectileKind::CannonShell)
        && state.magazine.count_cannon_shell == 3599;
    state.chain_gun.load_ammo = false;
    update_chain_gun(&mut state, 0.025);
    update_chain_gun(&mut state, 0.025);
    results.push(TestResult {
        name: "chain_gun_unload_returns_the_round".into(),
        passed: chambered
            && state.chain_gun.loaded_projectile.is_none()
            && state.magazine.count_cannon_shell == 3600
            && state.chain_gun.loading == 0.0,
        detail: format!(
            "round chambered then returned, magazine back to {}",
            state.magazine.count_cannon_shell
        ),
    });

    // The shell range knob stretches time to live inside the design band
    let mut state = ShipState::default();
    calc_shell_seconds_to_live(&mut state.chain_gun, XY::ZERO, None);
    let centered = state.chain_gun.shell_seconds_to_live;
    state.chain_gun.shell_range = 1.0;
    calc_shell_seconds_to_live(&mut state.chain_gun, XY::ZERO, None);
    let stretched = state.chain_gun.shell_seconds_to_live;
    results.push(TestResult {
        name: "chain_gun_range_knob".into(),
        passed: (centered - 3.0).abs() < 1e-9 && (stretched - 5.0).abs() < 1e-9,
        detail: format!("shell life {:.1}s centered, {:.1}s at full knob", centered, stretched),
    });

    // Target mode tracks the target's distance
    let mut state = ShipState::default();
    state.weapons_target_id = Some("mark".to_string());
    set_shell_range_mode(&mut state, SmartPilotMode::Target);
    calc_shell_seconds_to_live(&mut state.chain_gun, XY::ZERO, Some(XY::new(2000.0, 0.0)));
    results.push(TestResult {
        name: "chain_gun_target_mode_tracks_distance".into(),
        passed: (state.chain_gun.shell_seconds_to_live - 2.0).abs() < 1e-9,
        detail: format!(
            "shells fused for {:.1}s against a target at 2000",
            state.chain_gun.shell_seconds_to_live
        ),
    });

    results
}

// ── 6. Heat, Coolant & System Damage ────────────────────────────────────

fn validate_heat_and_damage(_verbose: bool) -> Vec<TestResult> {
    println!("--- Heat, Coolant & System Damage ---");
    let mut results = Vec::new();

    // Heat past the limit burns the system instead
    let mut state = ShipState::default();
    add_heat(&mut state.reactor, 130.0);
    results.push(TestResult {
        name: "heat_overflow_becomes_damage".into(),
        passed: state.reactor.heat == MAX_SYSTEM_HEAT
            && (state.reactor.efficiency_factor - 0.7).abs() < 1e-9,
        detail: format!(
            "heat capped at {:.0}, efficiency down to {:.2}",
            state.reactor.heat, state.reactor.efficiency_factor
        ),
    });

    reduce_heat(&mut state.reactor, 500.0);
    results.push(TestResult {
        name: "heat_reduction_floors_at_zero".into(),
        passed: state.reactor.heat == 0.0,
        detail: "heat cannot go negative".into(),
    });

    // Unprioritized coolant splits evenly
    let mut state = ShipState::default();
    state.chain_gun.heat = 30.0;
    state.magazine.heat = 30.0;
    state.reactor.heat = 30.0;
    distribute_coolant(&mut state.systems_mut(), 6.0, 1.0);
    results.push(TestResult {
        name: "coolant_even_split".into(),
        passed: state.chain_gun.heat == 28.0
            && state.magazine.heat == 28.0
            && state.reactor.heat == 28.0,
        detail: "6 coolant split 2/2/2 across three hot systems".into(),
    });

    // Prioritized coolant follows the factors
    let mut state = ShipState::default();
    state.chain_gun.heat = 30.0;
    state.chain_gun.coolant_factor = 1.0;
    state.magazine.heat = 30.0;
    state.reactor.heat = 30.0;
    state.reactor.coolant_factor = 2.0;
    distribute_coolant(&mut state.systems_mut(), 6.0, 1.0);
    results.push(TestResult {
        name: "coolant_follows_priorities".into(),
        passed: state.chain_gun.heat == 28.0
            && state.magazine.heat == 30.0
            && state.reactor.heat == 26.0,
        detail: format!(
            "heats {:.0}/{:.0}/{:.0} after a 1:0:2 split",
            state.chain_gun.heat, state.magazine.heat, state.reactor.heat
        ),
    });

    // Damage halves a system at its damage50 rating
    let mut state = ShipState::default();
    damage_system(&mut state.magazine, 20.0);
    results.push(TestResult {
        name: "damage_halves_at_rating".into(),
        passed: (state.magazine.efficiency_factor - 0.5).abs() < 1e-9,
        detail: format!(
            "magazine efficiency {:.2} after taking its damage50",
            state.magazine.efficiency_factor
        ),
    });

    results
}

// ── 7. Collisions & Armor ───────────────────────────────────────────────

fn validate_collision_scenario(verbose: bool) -> Vec<TestResult> {
    println!("--- Collisions & Armor ---");
    let mut results = Vec::new();

    // Scrape a reef: armor eats the hit, hull stays whole
    let mut engine = SpaceEngine::new(5);
    engine.add_ship("lancer", XY::ZERO, Faction::Gravitas);
    engine
        .space
        .insert(SpaceObject::asteroid("reef", XY::new(59.0, 0.0), 10.0));
    engine.update(0.05);
    engine.update(0.05);

    let fresh_armor = 60.0 * 200.0;
    let (armor_left, bow_plate, stern_plate, broadside_plate) = engine
        .ship("lancer")
        .map_or((fresh_armor, 0.0, 0.0, 0.0), |ship| {
            let plates = &ship.state.armor.plates;
            (
                plates.iter().map(|p| p.health).sum(),
                plates[0].health,
                plates[59].health,
                plates[30].health,
            )
        });
    if verbose {
        println!(
            "  lancer armor: bow {:.0}, stern {:.0}, broadside {:.0}",
            bow_plate, stern_plate, broadside_plate
        );
    }
    results.push(TestResult {
        name: "collisions_armor_absorbs_the_scrape".into(),
        passed: armor_left < fresh_armor && armor_left > fresh_armor - 500.0,
        detail: format!("armor {:.0} of {:.0} after scraping the reef", armor_left, fresh_armor),
    });
    results.push(TestResult {
        name: "collisions_damage_lands_on_facing_plates".into(),
        passed: (bow_plate < 200.0 || stern_plate < 200.0) && broadside_plate == 200.0,
        detail: format!(
            "bow {:.0}, stern {:.0}, broadside untouched at {:.0}",
            bow_plate, stern_plate, broadside_plate
        ),
    });
    let hull = engine
        .space
        .get_object("lancer")
        .map_or(0.0, |o| o.health);
    results.push(TestResult {
        name: "collisions_hull_behind_armor_is_safe".into(),
        passed: hull == 1000.0,
        detail: format!("hull still {:.0}", hull),
    });

    // Ram with no armor left: the hull collapses and the manager retires
    let mut engine = SpaceEngine::new(5);
    engine.add_ship("victim", XY::ZERO, Faction::Gravitas);
    if let Some(ship) = engine.space.state.get_mut("victim") {
        ship.health = 1.0;
    }
    if let Some(manager) = engine.ship_mut("victim") {
        for plate in &mut manager.state.armor.plates {
            plate.health = 0.0;
        }
    }
    engine
        .space
        .insert(SpaceObject::asteroid("rock", XY::new(55.0, 0.0), 10.0));
    engine.update(0.05);
    engine.update(0.05);

    let wreck_destroyed = engine
        .space
        .state
        .get("victim")
        .map_or(false, |o| o.destroyed);
    results.push(TestResult {
        name: "collisions_hull_collapse_retires_the_ship".into(),
        passed: engine.ship_count() == 0 && wreck_destroyed,
        detail: format!(
            "{} managers left, wreck destroyed={}",
            engine.ship_count(),
            wreck_destroyed
        ),
    });

    results
}

// ── 8. Homing Missiles ──────────────────────────────────────────────────

fn validate_homing_missiles(_verbose: bool) -> Vec<TestResult> {
    println!("--- Homing Missiles ---");
    let mut results = Vec::new();

    let mut space = SpaceManager::new();
    space.insert(SpaceObject::asteroid("quarry", XY::new(400.0, 250.0), 20.0));
    let mut missile = SpaceObject::projectile("m-1", XY::ZERO, ProjectileKind::Missile);
    if let ObjectKind::Projectile {
        seconds_to_live,
        target_id,
        ..
    } = &mut missile.kind
    {
        *seconds_to_live = 60.0;
        *target_id = Some("quarry".to_string());
    }
    missile.velocity = XY::new(120.0, 0.0);
    space.insert(missile);

    let initial_distance = XY::new(400.0, 250.0).length();
    let mut mid_distance = initial_distance;
    let mut detonation_time = None;
    for tick in 1..=100 {
        space.update(0.1);
        if let Some(missile) = space.get_object("m-1") {
            if tick == 5 {
                mid_distance = space
                    .get_object("quarry")
                    .map_or(f64::MAX, |quarry| {
                        (quarry.position - missile.position).length()
                    });
            }
        } else {
            detonation_time = Some(tick as f64 * 0.1);
            break;
        }
    }

    results.push(TestResult {
        name: "homing_missile_closes_on_target".into(),
        passed: mid_distance < initial_distance,
        detail: format!(
            "range {:.0} → {:.0} in the first half second",
            initial_distance, mid_distance
        ),
    });
    results.push(TestResult {
        name: "homing_missile_detonates_in_proximity".into(),
        passed: detonation_time.is_some(),
        detail: match detonation_time {
            Some(t) => format!("detonated after {:.1}s of flight", t),
            None => "still flying after 10s".into(),
        },
    });

    space.update(0.1);
    let blast = space.state.iter().any(|o| o.is_explosion());
    let quarry_alive = space.get_object("quarry").is_some();
    results.push(TestResult {
        name: "homing_detonation_leaves_a_blast".into(),
        passed: blast && quarry_alive,
        detail: format!("explosion={}, quarry survived={}", blast, quarry_alive),
    });

    results
}

// ── 9. Determinism & Persistence ────────────────────────────────────────

fn battle_fingerprint(seed: u64) -> String {
    let mut engine = SpaceEngine::new(seed);
    engine.add_ship("alpha", XY::ZERO, Faction::Gravitas);
    engine.add_ship("beta", XY::new(1800.0, 0.0), Faction::Raiders);
    engine.add_asteroid_field(15, 9000.0);
    for (id, mark) in [("alpha", "beta"), ("beta", "alpha")] {
        if let Some(ship) = engine.ship_mut(id) {
            ship.set_weapons_target(Some(mark.to_string()));
            ship.set_firing(true);
        }
    }
    for _ in 0..80 {
        engine.update(0.05);
    }
    let space = serde_json::to_string(&engine.space.snapshot()).unwrap_or_default();
    let beta = engine
        .ship("beta")
        .and_then(|ship| serde_json::to_string(&ship.state).ok())
        .unwrap_or_else(|| "gone".into());
    format!("{}|{}", space, beta)
}

fn validate_determinism(verbose: bool) -> Vec<TestResult> {
    println!("--- Determinism & Persistence ---");
    let mut results = Vec::new();

    let first = battle_fingerprint(9);
    let second = battle_fingerprint(9);
    if verbose {
        println!("  battle fingerprint: {} bytes", first.len());
    }
    results.push(TestResult {
        name: "determinism_same_seed_same_battle".into(),
        passed: first == second,
        detail: format!("two seed-9 battles agree over {} bytes", first.len()),
    });

    let other = battle_fingerprint(10);
    results.push(TestResult {
        name: "determinism_seeds_matter".into(),
        passed: first != other,
        detail: "a seed-10 battle diverges".into(),
    });

    // Save mid-battle, load into a fresh engine, compare worlds
    let mut engine = SpaceEngine::new(21);
    engine.add_ship("alpha", XY::ZERO, Faction::Gravitas);
    engine.add_asteroid_field(10, 6000.0);
    if let Some(ship) = engine.ship_mut("alpha") {
        ship.set_firing(true);
    }
    for _ in 0..20 {
        engine.update(0.05);
    }

    let mut buffer = Vec::new();
    match engine.save(&mut buffer) {
        Ok(()) => {
            let mut restored = SpaceEngine::new(0);
            let loaded = restored.load(&buffer[..]);
            let original = serde_json::to_string(&engine.space.snapshot()).unwrap_or_default();
            let reloaded = serde_json::to_string(&restored.space.snapshot()).unwrap_or_default();
            results.push(TestResult {
                name: "persistence_roundtrip_preserves_the_world".into(),
                passed: loaded.is_ok()
                    && original == reloaded
                    && restored.sim_time() == engine.sim_time()
                    && restored.ship_count() == engine.ship_count(),
                detail: format!("{} bytes round-tripped", buffer.len()),
            });
        }
        Err(e) => {
            results.push(TestResult {
                name: "persistence_roundtrip_preserves_the_world".into(),
                passed: false,
                detail: format!("save failed: {}", e),
            });
        }
    }

    results
}
