//! Two-stage transport linking: pick a source cell, then a destination cell.

use tracing::debug;
use zonecraft_shared::{Transport, World, WorldError, ZoneCell};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LinkStage {
    #[default]
    AwaitingSource,
    /// `destination` is pre-populated when the source already had an edge
    AwaitingDestination {
        source: ZoneCell,
        destination: Option<ZoneCell>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    SourceSelected { existing: Option<Transport> },
    Linked(Transport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    SameCell,
    NoDestination,
    World(WorldError),
}

impl std::fmt::Display for LinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkError::SameCell => write!(f, "Destination must differ from the source cell"),
            LinkError::NoDestination => write!(f, "Pick a destination cell first"),
            LinkError::World(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LinkError {}

impl From<WorldError> for LinkError {
    fn from(error: WorldError) -> Self {
        LinkError::World(error)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransportLinkManager {
    stage: LinkStage,
    two_way: bool,
}

impl TransportLinkManager {
    pub fn stage(&self) -> &LinkStage {
        &self.stage
    }

    pub fn two_way(&self) -> bool {
        self.two_way
    }

    pub fn set_two_way(&mut self, two_way: bool) {
        self.two_way = two_way;
    }

    pub fn source(&self) -> Option<&ZoneCell> {
        match &self.stage {
            LinkStage::AwaitingSource => None,
            LinkStage::AwaitingDestination { source, .. } => Some(source),
        }
    }

    pub fn destination(&self) -> Option<&ZoneCell> {
        match &self.stage {
            LinkStage::AwaitingSource => None,
            LinkStage::AwaitingDestination { destination, .. } => destination.as_ref(),
        }
    }

    /// Feed a clicked cell into the state machine
    pub fn select_cell(&mut self, world: &mut World, cell: ZoneCell) -> Result<LinkOutcome, LinkError> {
        if let Some(source) = self.source().cloned() {
            if source == cell {
                return Err(LinkError::SameCell);
            }
            return self.finalize(world, source, cell).map(LinkOutcome::Linked);
        }

        let zone = world
            .zone(&cell.zone_id)
            .ok_or_else(|| WorldError::UnknownZone(cell.zone_id.clone()))?;
        if !zone.in_bounds(cell.x, cell.y) {
            return Err(LinkError::World(WorldError::CellOutOfBounds {
                zone_id: cell.zone_id,
                x: cell.x,
                y: cell.y,
            }));
        }

        let existing = world.transport_at(&cell.zone_id, cell.x, cell.y).cloned();
        let destination = match &existing {
            Some(edge) => {
                self.two_way = world.has_mirror(&cell.zone_id, edge);
                Some(ZoneCell::new(edge.to_zone_id.clone(), edge.to.x, edge.to.y))
            }
            None => None,
        };
        self.stage = LinkStage::AwaitingDestination {
            source: cell,
            destination,
        };
        Ok(LinkOutcome::SourceSelected { existing })
    }

    /// Re-save using the pre-populated destination
    pub fn save(&mut self, world: &mut World) -> Result<Transport, LinkError> {
        let (Some(source), Some(destination)) =
            (self.source().cloned(), self.destination().cloned())
        else {
            return Err(LinkError::NoDestination);
        };
        self.finalize(world, source, destination)
    }

    pub fn cancel(&mut self) {
        self.stage = LinkStage::AwaitingSource;
    }

    fn finalize(
        &mut self,
        world: &mut World,
        source: ZoneCell,
        destination: ZoneCell,
    ) -> Result<Transport, LinkError> {
        let edge = world.link_transport(&source, &destination, self.two_way)?;
        self.stage = LinkStage::AwaitingSource;
        Ok(edge)
    }

    /// Reset when a zone under an in-progress selection is deleted
    pub fn on_zone_deleted(&mut self, zone_id: &str) -> bool {
        let touches = self.source().is_some_and(|c| c.zone_id == zone_id)
            || self.destination().is_some_and(|c| c.zone_id == zone_id);
        if touches {
            debug!("Transport selection reset: zone {} deleted", zone_id);
            self.cancel();
        }
        touches
    }

    /// Reset when the edge at the selected source or destination cell is deleted
    pub fn on_transport_deleted(&mut self, cell: &ZoneCell) -> bool {
        let touches = self.source() == Some(cell) || self.destination() == Some(cell);
        if touches {
            self.cancel();
        }
        touches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonecraft_shared::{GridPoint, Palette};

    fn two_zones() -> World {
        let mut world = World::new(Palette::new(2, 2));
        world.create_zone("Zone A", 4, 4).unwrap();
        world.create_zone("Zone B", 4, 4).unwrap();
        world
    }

    fn edge(from: (u32, u32), to_zone: &str, to: (u32, u32)) -> Transport {
        Transport {
            from: GridPoint::new(from.0, from.1),
            to_zone_id: to_zone.to_string(),
            to: GridPoint::new(to.0, to.1),
        }
    }

    #[test]
    fn test_two_way_link_then_toggle_off() {
        let mut world = two_zones();
        world
            .link_transport(&ZoneCell::new("zone-b", 0, 3), &ZoneCell::new("zone-a", 3, 3), false)
            .unwrap();
        let mut links = TransportLinkManager::default();
        links.set_two_way(true);

        links.select_cell(&mut world, ZoneCell::new("zone-a", 1, 1)).unwrap();
        let outcome = links.select_cell(&mut world, ZoneCell::new("zone-b", 2, 2)).unwrap();
        assert_eq!(outcome, LinkOutcome::Linked(edge((1, 1), "zone-b", (2, 2))));
        assert_eq!(
            world.transport_at("zone-b", 2, 2),
            Some(&edge((2, 2), "zone-a", (1, 1)))
        );
        assert_eq!(*links.stage(), LinkStage::AwaitingSource);
        assert!(links.two_way());

        // Re-open the edge: destination and mirror presence are pre-populated
        let outcome = links.select_cell(&mut world, ZoneCell::new("zone-a", 1, 1)).unwrap();
        assert_eq!(
            outcome,
            LinkOutcome::SourceSelected {
                existing: Some(edge((1, 1), "zone-b", (2, 2)))
            }
        );
        assert_eq!(links.destination(), Some(&ZoneCell::new("zone-b", 2, 2)));
        assert!(links.two_way());

        links.set_two_way(false);
        links.save(&mut world).unwrap();

        let zone_b = world.zone("zone-b").unwrap();
        assert!(world.transport_at("zone-b", 2, 2).is_none());
        assert_eq!(zone_b.transports(), &[edge((0, 3), "zone-a", (3, 3))]);
        assert!(world.transport_at("zone-a", 1, 1).is_some());
    }

    #[test]
    fn test_same_cell_is_rejected_without_state_change() {
        let mut world = two_zones();
        let mut links = TransportLinkManager::default();
        links.select_cell(&mut world, ZoneCell::new("zone-a", 1, 1)).unwrap();
        let stage = links.stage().clone();

        let result = links.select_cell(&mut world, ZoneCell::new("zone-a", 1, 1));
        assert_eq!(result, Err(LinkError::SameCell));
        assert_eq!(*links.stage(), stage);
    }

    #[test]
    fn test_save_without_destination() {
        let mut world = two_zones();
        let mut links = TransportLinkManager::default();
        assert_eq!(links.save(&mut world), Err(LinkError::NoDestination));

        links.select_cell(&mut world, ZoneCell::new("zone-a", 0, 0)).unwrap();
        assert_eq!(links.save(&mut world), Err(LinkError::NoDestination));
    }

    #[test]
    fn test_bad_destination_keeps_stage() {
        let mut world = two_zones();
        let mut links = TransportLinkManager::default();
        links.select_cell(&mut world, ZoneCell::new("zone-a", 0, 0)).unwrap();

        let result = links.select_cell(&mut world, ZoneCell::new("zone-b", 9, 9));
        assert!(matches!(result, Err(LinkError::World(WorldError::CellOutOfBounds { .. }))));
        assert_eq!(links.source(), Some(&ZoneCell::new("zone-a", 0, 0)));
        assert!(world.transport_at("zone-a", 0, 0).is_none());
    }

    #[test]
    fn test_source_must_exist() {
        let mut world = two_zones();
        let mut links = TransportLinkManager::default();
        let result = links.select_cell(&mut world, ZoneCell::new("missing", 0, 0));
        assert_eq!(
            result,
            Err(LinkError::World(WorldError::UnknownZone("missing".to_string())))
        );
        assert_eq!(*links.stage(), LinkStage::AwaitingSource);
    }

    #[test]
    fn test_zone_and_edge_deletion_reset_selection() {
        let mut world = two_zones();
        world
            .link_transport(&ZoneCell::new("zone-a", 0, 0), &ZoneCell::new("zone-b", 1, 1), false)
            .unwrap();
        let mut links = TransportLinkManager::default();

        links.select_cell(&mut world, ZoneCell::new("zone-a", 0, 0)).unwrap();
        assert!(!links.on_zone_deleted("zone-c"));
        assert!(links.on_zone_deleted("zone-b"));
        assert_eq!(*links.stage(), LinkStage::AwaitingSource);

        links.select_cell(&mut world, ZoneCell::new("zone-a", 0, 0)).unwrap();
        assert!(links.on_transport_deleted(&ZoneCell::new("zone-a", 0, 0)));
        assert_eq!(*links.stage(), LinkStage::AwaitingSource);
    }
}
