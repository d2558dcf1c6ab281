// ── Campus structure ──
//
// Buildings contain floors, floors contain rooms, rooms contain access
// points. The API already nests them, so the wire types are used as-is.

use strum::{Display, EnumString};

pub use unigate_api::types::{
    AccessPointDto as AccessPoint, BuildingDto as Building, FloorDto as Floor, RoomDto as Room,
};

/// Level of a node in the campus tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum CampusNodeKind {
    Building,
    Floor,
    Room,
    AccessPoint,
}

/// A borrowed node located in a [`CampusTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampusNode<'a> {
    Building(&'a Building),
    Floor(&'a Floor),
    Room(&'a Room),
    AccessPoint(&'a AccessPoint),
}

impl CampusNode<'_> {
    pub fn kind(&self) -> CampusNodeKind {
        match self {
            Self::Building(_) => CampusNodeKind::Building,
            Self::Floor(_) => CampusNodeKind::Floor,
            Self::Room(_) => CampusNodeKind::Room,
            Self::AccessPoint(_) => CampusNodeKind::AccessPoint,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Self::Building(b) => b.id,
            Self::Floor(f) => f.id,
            Self::Room(r) => r.id,
            Self::AccessPoint(ap) => ap.id,
        }
    }

    /// Display label: name, `Floor N`, or the access point identifier.
    pub fn label(&self) -> String {
        match self {
            Self::Building(b) => b.name.clone(),
            Self::Floor(f) => format!("Floor {}", f.number),
            Self::Room(r) => r.name.clone(),
            Self::AccessPoint(ap) => format!("{} ({})", ap.identifier, ap.kind),
        }
    }
}

/// The full nested campus as returned by `GET building`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampusTree {
    pub buildings: Vec<Building>,
}

impl CampusTree {
    pub fn new(buildings: Vec<Building>) -> Self {
        Self { buildings }
    }

    fn floors(&self) -> impl Iterator<Item = &Floor> {
        self.buildings.iter().flat_map(|b| b.floors.iter())
    }

    fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.floors().flat_map(|f| f.rooms.iter())
    }

    fn access_points(&self) -> impl Iterator<Item = &AccessPoint> {
        self.rooms().flat_map(|r| r.access_points.iter())
    }

    /// Look a node up by kind and id anywhere in the tree.
    pub fn find(&self, kind: CampusNodeKind, id: i64) -> Option<CampusNode<'_>> {
        match kind {
            CampusNodeKind::Building => self
                .buildings
                .iter()
                .find(|b| b.id == id)
                .map(CampusNode::Building),
            CampusNodeKind::Floor => self.floors().find(|f| f.id == id).map(CampusNode::Floor),
            CampusNodeKind::Room => self.rooms().find(|r| r.id == id).map(CampusNode::Room),
            CampusNodeKind::AccessPoint => self
                .access_points()
                .find(|ap| ap.id == id)
                .map(CampusNode::AccessPoint),
        }
    }

    /// Number of nodes of each kind: (buildings, floors, rooms, access points).
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        (
            self.buildings.len(),
            self.floors().count(),
            self.rooms().count(),
            self.access_points().count(),
        )
    }
}
