//! Save/Load functionality for persisting simulation state
//!
//! Uses bincode for compact binary serialization. Only replicated state is
//! written; collision bodies, fields of view and rigid cliques are derived
//! data and get rebuilt when a snapshot is restored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::model::ShipState;
use crate::ship::ShipManager;
use crate::space::{SpaceManager, SpaceSnapshot};

/// Version number for save file format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of the whole simulation
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    /// Simulation time in seconds
    pub sim_time: f64,
    /// The space manager's replicated state
    pub space: SpaceSnapshot,
    /// Internal ship state keyed by ship id
    pub ships: BTreeMap<String, ShipState>,
}

/// Save the complete simulation to a writer
pub fn save_simulation<W: Write>(
    writer: W,
    space: &SpaceManager,
    ships: &BTreeMap<String, ShipManager>,
    sim_time: f64,
) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        sim_time,
        space: space.snapshot(),
        ships: ships
            .iter()
            .map(|(id, manager)| (id.clone(), manager.state.clone()))
            .collect(),
    };

    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Load a simulation from a reader
pub fn load_simulation<R: Read>(reader: R) -> Result<LoadedSimulation, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    let space = SpaceManager::from_snapshot(save_data.space);
    let ships = save_data
        .ships
        .into_iter()
        .map(|(id, state)| {
            let manager = ShipManager::from_state(id.clone(), state);
            (id, manager)
        })
        .collect();

    Ok(LoadedSimulation {
        space,
        ships,
        sim_time: save_data.sim_time,
    })
}

/// Save the simulation to a file
pub fn save_to_file<P: AsRef<Path>>(
    path: P,
    space: &SpaceManager,
    ships: &BTreeMap<String, ShipManager>,
    sim_time: f64,
) -> Result<(), SaveError> {
    let file = File::create(path)?;
    save_simulation(BufWriter::new(file), space, ships, sim_time)
}

/// Load a simulation from a file
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<LoadedSimulation, SaveError> {
    let file = File::open(path)?;
    load_simulation(BufReader::new(file))
}

/// Result of loading a simulation
pub struct LoadedSimulation {
    pub space: SpaceManager,
    pub ships: BTreeMap<String, ShipManager>,
    pub sim_time: f64,
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Encoding(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Encoding(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Encoding(e) => write!(f, "Serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
        }
    }
}

impl std::error::Error for SaveError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SpaceEngine;
    use crate::model::Faction;
    use broadside_logic::xy::XY;

    #[test]
    fn test_save_load_roundtrip() {
        // Create and populate a simulation
        let mut engine = SpaceEngine::new(7);
        engine.add_ship("ship-a", XY::new(0.0, 0.0), Faction::Raiders);
        engine.add_ship("ship-b", XY::new(2000.0, 0.0), Faction::Gravitas);
        engine.add_asteroid_field(12, 8000.0);

        if let Some(ship) = engine.ship_mut("ship-a") {
            ship.set_weapons_target(Some("ship-b".to_string()));
            ship.set_firing(true);
        }

        // Run a few updates
        for _ in 0..10 {
            engine.update(1.0 / 20.0);
        }

        let original_time = engine.sim_time();
        let original_objects = engine.space.state.len();

        // Save
        let mut save_buffer = Vec::new();
        engine.save(&mut save_buffer).expect("save failed");

        println!("Save size: {} bytes", save_buffer.len());

        // Load into new engine
        let mut loaded_engine = SpaceEngine::new(7);
        loaded_engine.load(&save_buffer[..]).expect("load failed");

        // Verify
        assert!((loaded_engine.sim_time() - original_time).abs() < 0.001);
        assert_eq!(loaded_engine.space.state.len(), original_objects);
        assert_eq!(loaded_engine.ship_count(), 2);

        let restored = loaded_engine
            .ship("ship-a")
            .expect("ship-a survives the roundtrip");
        assert_eq!(restored.state.weapons_target_id.as_deref(), Some("ship-b"));
        assert!(restored.state.chain_gun.is_firing);
    }

    #[test]
    fn test_version_mismatch_is_rejected() {
        let engine = SpaceEngine::new(1);
        let mut buffer = Vec::new();
        engine.save(&mut buffer).expect("save failed");

        // Stamp a bogus version over the leading u32
        buffer[0] = 99;

        match load_simulation(&buffer[..]) {
            Err(SaveError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, SAVE_VERSION);
                assert_eq!(found, 99);
            }
            other => panic!(
                "expected a version mismatch, got {:?}",
                other.err().map(|e| e.to_string())
            ),
        }
    }
}
