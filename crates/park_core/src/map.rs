//! Park map: named areas and the fixed travel-time matrix between them.
//!
//! Travel between areas is a flat minute cost; the diagonal entry is the
//! intra-area walk. Areas are interned to [`AreaId`] indexes at scenario
//! build time and the matrix is validated there, so lookups here are
//! total.

use bevy_ecs::prelude::Resource;

use crate::ecs::AreaId;

#[derive(Debug, Clone, Resource)]
pub struct ParkMap {
    areas: Vec<String>,
    /// `travel[from][to]` in minutes.
    travel: Vec<Vec<u32>>,
    entrance: AreaId,
}

impl ParkMap {
    pub fn new(areas: Vec<String>, travel: Vec<Vec<u32>>, entrance: AreaId) -> Self {
        debug_assert_eq!(areas.len(), travel.len());
        debug_assert!(travel.iter().all(|row| row.len() == areas.len()));
        Self { areas, travel, entrance }
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    pub fn area_id(&self, name: &str) -> Option<AreaId> {
        self.areas.iter().position(|area| area == name)
    }

    pub fn area_name(&self, id: AreaId) -> &str {
        &self.areas[id]
    }

    /// Entrance area where arriving agents appear.
    pub fn entrance(&self) -> AreaId {
        self.entrance
    }

    /// Minutes to walk from one area to another.
    pub fn travel_time(&self, from: AreaId, to: AreaId) -> u32 {
        self.travel[from][to]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_area_map() -> ParkMap {
        ParkMap::new(
            vec!["North".into(), "South".into()],
            vec![vec![1, 6], vec![6, 2]],
            0,
        )
    }

    #[test]
    fn lookups_resolve_names_and_times() {
        let map = two_area_map();
        assert_eq!(map.area_id("South"), Some(1));
        assert_eq!(map.area_id("West"), None);
        assert_eq!(map.travel_time(0, 1), 6);
        assert_eq!(map.travel_time(1, 1), 2);
        assert_eq!(map.area_name(map.entrance()), "North");
    }
}
