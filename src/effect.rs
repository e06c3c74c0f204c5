//! Effects - side effects declared by the reducer

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// `GET {base}/{trainer_id}`
    LoadProfile { trainer_id: String, generation: u64 },
    /// `GET {base}/pokedex/{trainer_id}`, then ingest against the species data
    LoadPokedex { trainer_id: String, generation: u64 },
    /// Remember the trainer id across runs
    PersistIdentity { trainer_id: String },
    /// Forget the stored trainer id
    ClearIdentity,
}
