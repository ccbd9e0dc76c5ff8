//! Quadcam Layout Registry
//!
//! Static definitions of the named composite layouts. Each layout is pure
//! data: an ordered list of camera roles (the encoder input binding order),
//! a canvas size, and one placement tile per role. The encoder's textual
//! filter graph is compiled from that description at dispatch time, so the
//! five layouts live here as geometry rather than as duplicated filter
//! string literals.

pub mod registry;

pub use registry::*;

use quadcam_common::{QuadcamError, QuadcamResult};

/// One of the four dashcam camera positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CameraRole {
    Front,
    Back,
    Left,
    Right,
}

impl CameraRole {
    /// All roles, in canonical order. This is also the input binding order
    /// every layout declares.
    pub const ALL: [CameraRole; 4] = [
        CameraRole::Front,
        CameraRole::Back,
        CameraRole::Left,
        CameraRole::Right,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CameraRole::Front => "front",
            CameraRole::Back => "back",
            CameraRole::Left => "left",
            CameraRole::Right => "right",
        }
    }

    /// Infer the camera role from a clip file name by substring match.
    pub fn infer(name: &str) -> Option<CameraRole> {
        CameraRole::ALL
            .into_iter()
            .find(|role| name.contains(role.as_str()))
    }
}

impl std::fmt::Display for CameraRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier for one of the fixed composite layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayoutId {
    /// All four cameras at uniform scale in a 2x2 grid.
    TwoByTwo,
    /// Front camera enlarged, the rest in a strip.
    FrontBig,
    /// Back camera enlarged, the rest in a strip.
    BackBig,
    /// Left camera enlarged, the rest in a strip.
    LeftBig,
    /// Right camera enlarged, the rest in a strip.
    RightBig,
}

impl LayoutId {
    pub const ALL: [LayoutId; 5] = [
        LayoutId::TwoByTwo,
        LayoutId::FrontBig,
        LayoutId::BackBig,
        LayoutId::LeftBig,
        LayoutId::RightBig,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutId::TwoByTwo => "2x2",
            LayoutId::FrontBig => "frontbig",
            LayoutId::BackBig => "backbig",
            LayoutId::LeftBig => "leftbig",
            LayoutId::RightBig => "rightbig",
        }
    }
}

impl std::fmt::Display for LayoutId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LayoutId {
    type Err = QuadcamError;

    fn from_str(s: &str) -> QuadcamResult<Self> {
        LayoutId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| QuadcamError::unknown_layout(s))
    }
}

/// Placement of one camera on the output canvas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub role: CameraRole,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// A named composite arrangement of up to four camera feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub id: LayoutId,
    /// Camera roles this layout consumes, in encoder input order.
    pub roles: Vec<CameraRole>,
    pub canvas_w: u32,
    pub canvas_h: u32,
    /// Exactly one tile per consumed role.
    pub tiles: Vec<Tile>,
}

impl Layout {
    /// Encoder input index for a role, per the declared binding order.
    pub fn input_index(&self, role: CameraRole) -> Option<usize> {
        self.roles.iter().position(|r| *r == role)
    }

    /// Compile the structured description into the encoder's filter-graph
    /// form: per-input scale pads feeding one `xstack` placement.
    pub fn filter_graph(&self) -> String {
        let mut stages: Vec<String> = Vec::with_capacity(self.tiles.len() + 1);
        for tile in &self.tiles {
            // Registry construction guarantees every tile role is declared.
            let idx = self.input_index(tile.role).unwrap_or_default();
            stages.push(format!("[{idx}:v]scale={}:{}[v{idx}]", tile.w, tile.h));
        }

        if self.tiles.len() == 1 {
            return stages.pop().unwrap_or_default();
        }

        let pads: String = self
            .tiles
            .iter()
            .map(|tile| {
                let idx = self.input_index(tile.role).unwrap_or_default();
                format!("[v{idx}]")
            })
            .collect();
        let placements: Vec<String> = self
            .tiles
            .iter()
            .map(|tile| format!("{}_{}", tile.x, tile.y))
            .collect();
        stages.push(format!(
            "{pads}xstack=inputs={}:layout={}",
            self.tiles.len(),
            placements.join("|")
        ));

        stages.join(";")
    }
}
