use thiserror::Error;

use crate::gene::GeneId;

#[derive(Debug, Error)]
pub enum GenoviewError {
    #[error("{0} is not a gene cluster in the dataset")]
    UnknownCluster(String),
    #[error("gene {gene_id} of cluster {cluster} is not on track {track}")]
    AnchorGeneNotFound {
        track: String,
        cluster: String,
        gene_id: GeneId,
    },
    #[error("gene {gene_id} has an empty or inverted range {start}..{stop}")]
    InvalidGeneRange { gene_id: GeneId, start: u64, stop: u64 },
    #[error("gene {gene_id} on track {track} starts before the gene preceding it")]
    UnorderedGenes { track: String, gene_id: GeneId },
    #[error("track {0} has no genes")]
    EmptyTrack(String),
    #[error("dataset has no tracks")]
    EmptyDataset,
    #[error("gene id {0} appears more than once in the dataset")]
    DuplicateGeneId(GeneId),
    #[error("track label {0} is used more than once")]
    DuplicateTrack(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed dataset: {0}")]
    Json(#[from] serde_json::Error),
    #[error("PNG encoding failed: {0}")]
    Png(#[from] lodepng::Error),
}
