//! Per-run generation state

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::registry::DEFAULT_ARRAY_LENGTH;
use crate::models::database::DatabaseMeta;

/// Random source and shared objects of one verification run.
///
/// Validators draw from the seeded generator, so a run is reproduced by
/// reusing its seed. Connections created by reference validators are kept
/// here and handed to the step's `load_xml`.
pub struct GenerationContext {
    seed: u64,
    rng: StdRng,
    array_length: usize,
    databases: Vec<DatabaseMeta>,
}

impl GenerationContext {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            array_length: DEFAULT_ARRAY_LENGTH,
            databases: Vec::new(),
        }
    }

    /// Length used by array validators that take it from the run
    pub fn with_array_length(mut self, array_length: usize) -> Self {
        self.array_length = array_length;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn array_length(&self) -> usize {
        self.array_length
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Make a connection visible to the load step
    pub fn add_database(&mut self, database: DatabaseMeta) {
        self.databases.push(database);
    }

    pub fn databases(&self) -> &[DatabaseMeta] {
        &self.databases
    }
}

impl std::fmt::Debug for GenerationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationContext")
            .field("seed", &self.seed)
            .field("array_length", &self.array_length)
            .field("databases", &self.databases.len())
            .finish()
    }
}
