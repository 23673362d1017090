pub use self::genome_model::GenomeModel;

mod genome_model;
