//! Per-frame particle counting over external clustering and classification
//!
//! Frame reading, cluster finding and particle classification are provided by
//! external libraries. This module defines the seams they plug into and the
//! aggregation performed on top: one [`ParticleCounts`] per frame, combined
//! with the frame's DSC metadata into a [`FrameSummary`] row.

use crate::app::models::ParsedMetadata;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Particle types distinguished by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleType {
    Alpha,
    Beta,
    Gamma,
    Proton,
    Muon,
    Other,
}

impl ParticleType {
    pub const ALL: [ParticleType; 6] = [
        ParticleType::Alpha,
        ParticleType::Beta,
        ParticleType::Gamma,
        ParticleType::Proton,
        ParticleType::Muon,
        ParticleType::Other,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ParticleType::Alpha => "alpha",
            ParticleType::Beta => "beta",
            ParticleType::Gamma => "gamma",
            ParticleType::Proton => "proton",
            ParticleType::Muon => "muon",
            ParticleType::Other => "other",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for ParticleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Loads a frame's pixel data from disk
pub trait FrameReader {
    type Frame;

    fn read_frame(&self, path: &Path) -> Result<Self::Frame>;
}

/// Groups a frame's hit pixels into clusters
pub trait ClusterFinder<F> {
    type Cluster;

    fn find_clusters(&self, frame: &F) -> Vec<Self::Cluster>;
}

/// Labels a cluster with the particle type that most likely produced it
pub trait ParticleClassifier<C> {
    fn classify(&self, cluster: &C) -> ParticleType;
}

/// Number of clusters of each particle type in one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticleCounts {
    counts: [usize; 6],
}

impl ParticleCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, particle: ParticleType) {
        self.counts[particle.index()] += 1;
    }

    pub fn get(&self, particle: ParticleType) -> usize {
        self.counts[particle.index()]
    }

    /// Total clusters counted
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Pairs of (particle type, count) in a fixed order
    pub fn iter(&self) -> impl Iterator<Item = (ParticleType, usize)> + '_ {
        ParticleType::ALL.into_iter().map(|p| (p, self.get(p)))
    }
}

/// Find the clusters in a frame and count them by particle type
pub fn analyse_frame<F, Finder, Classifier>(
    frame: &F,
    finder: &Finder,
    classifier: &Classifier,
) -> ParticleCounts
where
    Finder: ClusterFinder<F>,
    Classifier: ParticleClassifier<Finder::Cluster>,
{
    let mut counts = ParticleCounts::new();
    for cluster in finder.find_clusters(frame) {
        counts.record(classifier.classify(&cluster));
    }
    counts
}

/// Read the data file described by `metadata` and count its particles
pub fn analyse_metadata_frame<R, Finder, Classifier>(
    metadata: &ParsedMetadata,
    reader: &R,
    finder: &Finder,
    classifier: &Classifier,
) -> Result<FrameSummary>
where
    R: FrameReader,
    Finder: ClusterFinder<R::Frame>,
    Classifier: ParticleClassifier<Finder::Cluster>,
{
    let frame = reader.read_frame(metadata.derived_data_file_path())?;
    let counts = analyse_frame(&frame, finder, classifier);
    Ok(FrameSummary::new(metadata, counts))
}

/// One report row: frame identity and settings plus its particle counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSummary {
    pub frame_name: String,
    pub capture_time: Option<String>,
    pub detector_id: Option<String>,
    pub bias_voltage: Option<f64>,
    pub acquisition_time_seconds: Option<f64>,
    pub counts: ParticleCounts,
}

impl FrameSummary {
    pub fn new(metadata: &ParsedMetadata, counts: ParticleCounts) -> Self {
        Self {
            frame_name: metadata.frame_name(),
            capture_time: metadata.start_time_string().map(str::to_string),
            detector_id: metadata.chipboard_id().map(str::to_string),
            bias_voltage: metadata.bias_voltage(),
            acquisition_time_seconds: metadata.acquisition_time_seconds(),
            counts,
        }
    }
}
