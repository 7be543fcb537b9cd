//! End-of-run achievements

use std::fmt;

use serde::Serialize;

use crate::sim::RunSummary;

/// Score needed for Harmony Master (exclusive)
pub const HARMONY_MASTER_SCORE: u64 = 1000;
/// Melody length needed for Melodic Genius (exclusive)
pub const MELODIC_GENIUS_NOTES: usize = 10;
/// Level needed for Cosmic Explorer (exclusive)
pub const COSMIC_EXPLORER_LEVEL: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Achievement {
    HarmonyMaster,
    MelodicGenius,
    CosmicExplorer { level: u32 },
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Achievement::HarmonyMaster => write!(f, "Harmony Master - Score over 1000!"),
            Achievement::MelodicGenius => {
                write!(f, "Melodic Genius - Created a 10+ note melody!")
            }
            Achievement::CosmicExplorer { level } => {
                write!(f, "Cosmic Explorer - Reached level {}!", level)
            }
        }
    }
}

/// Achievements earned by a finished run
pub fn earned(summary: &RunSummary) -> Vec<Achievement> {
    let mut out = Vec::new();
    if summary.score > HARMONY_MASTER_SCORE {
        out.push(Achievement::HarmonyMaster);
    }
    if summary.longest_melody > MELODIC_GENIUS_NOTES {
        out.push(Achievement::MelodicGenius);
    }
    if summary.level > COSMIC_EXPLORER_LEVEL {
        out.push(Achievement::CosmicExplorer {
            level: summary.level,
        });
    }
    out
}
