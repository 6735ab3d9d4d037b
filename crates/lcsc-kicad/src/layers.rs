//! EasyEDA layer ids to KiCad layer names.

pub const TOP_COPPER: u32 = 1;
pub const BOTTOM_COPPER: u32 = 2;
pub const TOP_SILK: u32 = 3;
pub const MULTI_LAYER: u32 = 11;
pub const FAB: u32 = 12;

/// KiCad name for a graphic layer. Unknown ids land on the front silkscreen.
pub fn graphic_layer(id: u32) -> &'static str {
    match id {
        1 => "F.Cu",
        2 => "B.Cu",
        3 => "F.SilkS",
        4 => "B.SilkS",
        5 => "F.Paste",
        6 => "B.Paste",
        7 => "F.Mask",
        8 => "B.Mask",
        10 => "Edge.Cuts",
        12 | 13 => "F.Fab",
        14 => "B.Fab",
        15 => "Dwgs.User",
        99 | 100 => "F.CrtYd",
        101 => "F.Fab",
        other => {
            log::debug!("Unmapped EasyEDA layer {other}, using F.SilkS");
            "F.SilkS"
        }
    }
}

/// Layer set for an SMD pad.
pub fn smd_pad_layers(id: u32) -> [&'static str; 3] {
    if id == BOTTOM_COPPER {
        ["B.Cu", "B.Paste", "B.Mask"]
    } else {
        ["F.Cu", "F.Paste", "F.Mask"]
    }
}

/// Layer set for plated and non-plated holes.
pub const THROUGH_HOLE_LAYERS: [&str; 2] = ["*.Cu", "*.Mask"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_layers() {
        assert_eq!(graphic_layer(TOP_SILK), "F.SilkS");
        assert_eq!(graphic_layer(FAB), "F.Fab");
        assert_eq!(graphic_layer(10), "Edge.Cuts");
        assert_eq!(graphic_layer(42), "F.SilkS");
    }

    #[test]
    fn pad_layers_follow_copper_side() {
        assert_eq!(smd_pad_layers(TOP_COPPER)[0], "F.Cu");
        assert_eq!(smd_pad_layers(BOTTOM_COPPER)[0], "B.Cu");
        assert_eq!(smd_pad_layers(MULTI_LAYER)[0], "F.Cu");
    }
}
