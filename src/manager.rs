//! Per-tick driver: runs the planners against one room on their cadences.

use crate::config::{ConfigError, PlannerConfig};
use crate::planners::*;
use crate::room::RoomOracle;
use log::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// What one tick did to the room.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub level: u8,
    pub extensions_placed: u32,
    /// Present on ticks the road synthesizer ran.
    pub roads: Option<Vec<RoadRequest>>,
    /// Present on ticks the blocking-site audit ran.
    pub audit: Option<AuditSummary>,
}

pub struct ConstructionManager {
    config: PlannerConfig,
    extensions: ExtensionPlanner,
    roads: RoadSynthesizer,
    auditor: BlockingSiteAuditor,
}

impl ConstructionManager {
    /// Fails when `config` does not pass `PlannerConfig::validate`.
    pub fn new(config: PlannerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(ConstructionManager {
            extensions: ExtensionPlanner::new(config.extension),
            roads: RoadSynthesizer::new(config.road),
            auditor: BlockingSiteAuditor::new(config.audit),
            config,
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// The candidate shuffle for `game_time`. The same seed and tick always
    /// produce the same layout.
    pub fn rng_for(&self, game_time: u32) -> SmallRng {
        SmallRng::seed_from_u64(self.config.seed ^ game_time as u64)
    }

    pub fn tick<R: RoomOracle + ?Sized>(&mut self, room: &mut R, game_time: u32) -> TickReport {
        let level = room.controller_level();
        let mut rng = self.rng_for(game_time);

        let mut report = TickReport {
            level,
            ..Default::default()
        };

        report.extensions_placed = self.extensions.plan(room, level, &mut rng);

        if game_time % self.config.schedule.road_interval == 0 {
            report.roads = Some(self.roads.synthesize(room));
        }

        if game_time % self.config.schedule.audit_interval == 0 {
            report.audit = Some(self.auditor.audit(room));
        }

        debug!(
            "ConstructionManager: tick {} level {}: {} extensions, roads {}, audit {}",
            game_time,
            level,
            report.extensions_placed,
            report.roads.is_some(),
            report.audit.is_some()
        );

        report
    }
}
