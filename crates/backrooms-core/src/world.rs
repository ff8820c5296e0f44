//! World state — generated room cache and the visited set.

use std::collections::{HashMap, HashSet};

use backrooms_logic::config::PanelConfig;
use backrooms_logic::generation::{generate_room, Room};
use backrooms_logic::geometry::RoomCoordinate;

/// Rooms generated so far, keyed by coordinate.
///
/// Lookups are the only thing that adds rooms. Nothing is evicted unless
/// the caller asks for it with [`WorldCache::evict_beyond`]; an evicted room
/// regenerates identically on its next lookup.
#[derive(Debug, Clone)]
pub struct WorldCache {
    panel: PanelConfig,
    rooms: HashMap<RoomCoordinate, Room>,
}

impl WorldCache {
    pub fn new(panel: PanelConfig) -> Self {
        Self {
            panel,
            rooms: HashMap::new(),
        }
    }

    /// Return the room at `coord`, generating and storing it on first use.
    pub fn get_or_create(&mut self, coord: RoomCoordinate) -> &Room {
        let panel = self.panel;
        self.rooms.entry(coord).or_insert_with(|| {
            log::debug!("Generating room {}", coord);
            generate_room(coord, coord.is_origin(), &panel)
        })
    }

    pub fn get(&self, coord: RoomCoordinate) -> Option<&Room> {
        self.rooms.get(&coord)
    }

    pub fn contains(&self, coord: RoomCoordinate) -> bool {
        self.rooms.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Drop rooms more than `radius` panels (chessboard distance) from
    /// `center`. Returns how many were dropped.
    pub fn evict_beyond(&mut self, center: RoomCoordinate, radius: u32) -> usize {
        let before = self.rooms.len();
        self.rooms.retain(|coord, _| coord.chebyshev_distance(&center) <= radius);
        before - self.rooms.len()
    }
}

/// Every room the player has entered. Only grows during a session; a load
/// replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitedSet {
    rooms: HashSet<RoomCoordinate>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `coord` was not visited before.
    pub fn insert(&mut self, coord: RoomCoordinate) -> bool {
        self.rooms.insert(coord)
    }

    pub fn contains(&self, coord: RoomCoordinate) -> bool {
        self.rooms.contains(&coord)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoomCoordinate> {
        self.rooms.iter()
    }

    /// Coordinates in ascending `(x, y)` order.
    pub fn sorted(&self) -> Vec<RoomCoordinate> {
        let mut coords: Vec<_> = self.rooms.iter().copied().collect();
        coords.sort();
        coords
    }
}

impl FromIterator<RoomCoordinate> for VisitedSet {
    fn from_iter<I: IntoIterator<Item = RoomCoordinate>>(iter: I) -> Self {
        Self {
            rooms: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_populates_once() {
        let mut cache = WorldCache::new(PanelConfig::default());
        let coord = RoomCoordinate::new(2, 3);
        assert!(!cache.contains(coord));
        let walls = cache.get_or_create(coord).walls.clone();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_or_create(coord).walls, walls);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_origin_is_start_room() {
        let mut cache = WorldCache::new(PanelConfig::default());
        let room = cache.get_or_create(RoomCoordinate::ORIGIN);
        assert!(room.is_start);
        assert!(room.interior_walls().is_empty());
        assert!(!cache.get_or_create(RoomCoordinate::new(0, 1)).is_start);
    }

    #[test]
    fn test_evict_beyond_keeps_neighborhood() {
        let mut cache = WorldCache::new(PanelConfig::default());
        for x in -5..=5 {
            cache.get_or_create(RoomCoordinate::new(x, 0));
        }
        let center = RoomCoordinate::new(1, 0);
        let before = cache.get(RoomCoordinate::new(3, 0)).cloned();
        let evicted = cache.evict_beyond(center, 2);
        assert_eq!(evicted, 6);
        assert_eq!(cache.len(), 5);
        assert!(cache.contains(center));
        assert!(!cache.contains(RoomCoordinate::new(-5, 0)));
        assert_eq!(cache.get(RoomCoordinate::new(3, 0)).cloned(), before);
    }

    #[test]
    fn test_evicted_room_regenerates_identically() {
        let mut cache = WorldCache::new(PanelConfig::default());
        let far = RoomCoordinate::new(40, -9);
        let original = cache.get_or_create(far).clone();
        cache.evict_beyond(RoomCoordinate::ORIGIN, 1);
        assert!(!cache.contains(far));
        assert_eq!(cache.get_or_create(far), &original);
    }

    #[test]
    fn test_visited_insert_reports_new() {
        let mut visited = VisitedSet::new();
        assert!(visited.insert(RoomCoordinate::new(1, 1)));
        assert!(!visited.insert(RoomCoordinate::new(1, 1)));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_visited_sorted() {
        let visited: VisitedSet = [(2, 0), (-1, 5), (-1, -2)]
            .into_iter()
            .map(RoomCoordinate::from)
            .collect();
        assert_eq!(
            visited.sorted(),
            vec![
                RoomCoordinate::new(-1, -2),
                RoomCoordinate::new(-1, 5),
                RoomCoordinate::new(2, 0)
            ]
        );
    }
}
