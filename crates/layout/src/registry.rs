//! The fixed set of composite layouts.
//!
//! Geometry: the grid places four 640x480 tiles on a 1280x960 canvas; each
//! enlarged variant gives its camera the full 1280x960 top pane and shrinks
//! the remaining three into a 426x320 strip along the bottom.

use crate::{CameraRole, Layout, LayoutId, Tile};
use quadcam_common::QuadcamResult;

const GRID_CANVAS: (u32, u32) = (1280, 960);
const BIG_CANVAS: (u32, u32) = (1280, 1280);
const BIG_PANE: (u32, u32) = (1280, 960);
const STRIP_TILE: (u32, u32) = (426, 320);
const STRIP_Y: u32 = 960;

/// Look up a layout by its textual identifier.
///
/// Fails with `UnknownLayout` for anything outside the fixed set.
pub fn resolve(id: &str) -> QuadcamResult<Layout> {
    Ok(layout_for(id.parse::<LayoutId>()?))
}

/// Build the layout definition for an identifier.
pub fn layout_for(id: LayoutId) -> Layout {
    match id {
        LayoutId::TwoByTwo => grid_layout(),
        LayoutId::FrontBig => enlarged_layout(id, CameraRole::Front),
        LayoutId::BackBig => enlarged_layout(id, CameraRole::Back),
        LayoutId::LeftBig => enlarged_layout(id, CameraRole::Left),
        LayoutId::RightBig => enlarged_layout(id, CameraRole::Right),
    }
}

fn grid_layout() -> Layout {
    let (canvas_w, canvas_h) = GRID_CANVAS;
    let (w, h) = (canvas_w / 2, canvas_h / 2);
    let tiles = CameraRole::ALL
        .into_iter()
        .enumerate()
        .map(|(i, role)| Tile {
            role,
            x: (i as u32 % 2) * w,
            y: (i as u32 / 2) * h,
            w,
            h,
        })
        .collect();

    Layout {
        id: LayoutId::TwoByTwo,
        roles: CameraRole::ALL.to_vec(),
        canvas_w,
        canvas_h,
        tiles,
    }
}

fn enlarged_layout(id: LayoutId, big: CameraRole) -> Layout {
    let (canvas_w, canvas_h) = BIG_CANVAS;
    let mut tiles = vec![Tile {
        role: big,
        x: 0,
        y: 0,
        w: BIG_PANE.0,
        h: BIG_PANE.1,
    }];
    for (slot, role) in CameraRole::ALL.into_iter().filter(|r| *r != big).enumerate() {
        tiles.push(Tile {
            role,
            x: slot as u32 * STRIP_TILE.0,
            y: STRIP_Y,
            w: STRIP_TILE.0,
            h: STRIP_TILE.1,
        });
    }

    Layout {
        id,
        roles: CameraRole::ALL.to_vec(),
        canvas_w,
        canvas_h,
        tiles,
    }
}
