//! Static schema of the decompressed timing image.
//!
//! The image is a fixed sequence of sections with no framing. Because every
//! section's dimensions and element size are known up front, the byte
//! offset of each section can be computed without reading the data.

use crate::record::{
    ARC_BYTES, PIN_PAIR_BYTES, RAM_ENTRY_BYTES, RECORD_BYTES, TRI_RECORD_BYTES,
};
use crate::table::element_count;

/// Switchbox-tile delays: `[type][x][row/2][plane][dim][sub]`.
pub const SB_TILE_DIMS: [usize; 6] = [4, 8, 4, 12, 5, 8];
/// Input-mux-tile delays: `[type][x][y][plane][sub]`.
pub const IM_TILE_DIMS: [usize; 5] = [2, 8, 8, 12, 8];
/// Output-mux-tile delays: `[x][y][plane - 9][sub]`.
pub const OM_TILE_DIMS: [usize; 4] = [8, 8, 4, 4];
/// CPE-tile delays: `[config][input pin][output pin]`.
pub const CPE_TILE_DIMS: [usize; 3] = [10, 19, 10];
/// Rim switchbox delays: `[position][side][plane][dim][sub]`.
pub const SB_RIM_DIMS: [usize; 5] = [165, 4, 12, 5, 8];
/// Edge delays: `[position][side][input][output]`.
pub const EDGE_DIMS: [usize; 4] = [165, 4, 24, 8];
/// IO-select delays: `[path][drive]`.
pub const IO_SEL_DIMS: [usize; 2] = [11, 4];
/// Clock-input delays: `[source][CLK_REF]`.
pub const CLK_IN_DIMS: [usize; 2] = [7, 4];
/// Global-output delays: `[input][output]`.
pub const GLB_OUT_DIMS: [usize; 2] = [28, 8];
/// PLL delays: `[input][output]`.
pub const PLL_DIMS: [usize; 2] = [7, 6];
/// IO-select coefficients: `[drive][coefficient]`.
pub const IO_COEF_DIMS: [usize; 2] = [4, 27];

/// Entries in a RAM delay section.
pub const RAM_ENTRIES: usize = 3001;
/// Entries in a RAM pin-pair section.
pub const RAM_PIN_PAIRS: usize = 8001;
/// Entries in a RAM bus-width section.
pub const RAM_BUS_WIDTHS: usize = 51;
/// Alignment bytes before the RAM clock-group section.
pub const RAM_ALIGN_PAD: usize = 2;
/// Entries in a RAM clock-group section.
pub const RAM_CLOCK_GROUPS: usize = 101;
/// Entries in the trailing named-record array.
pub const NAMED_RECORDS: usize = 42;

/// Element encoding of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// [`TimingArc`](crate::TimingArc), 24 bytes.
    Arc,
    /// [`RawDelayRecord`](crate::RawDelayRecord), 80 bytes.
    Record,
    /// [`RamDelayEntry`](crate::RamDelayEntry), 28 bytes.
    RamEntry,
    /// [`RamPinPair`](crate::RamPinPair), 4 bytes.
    PinPair,
    /// Little-endian `i16`.
    I16,
    /// Little-endian `i32`.
    I32,
    /// Little-endian `f64`.
    F64,
    /// Unexamined padding byte.
    Pad,
    /// The trailing singleton fields; see [`TRAILING_FIELDS`].
    Trailing,
}

impl ElementKind {
    /// Encoded size of one element.
    pub fn size(self) -> usize {
        match self {
            Self::Arc => ARC_BYTES,
            Self::Record => RECORD_BYTES,
            Self::RamEntry => RAM_ENTRY_BYTES,
            Self::PinPair => PIN_PAIR_BYTES,
            Self::I16 => 2,
            Self::I32 => 4,
            Self::F64 => 8,
            Self::Pad => 1,
            Self::Trailing => trailing_bytes(),
        }
    }
}

/// One section of the image.
#[derive(Debug, Clone, Copy)]
pub struct Section {
    /// Human-readable section name, used in error messages.
    pub name: &'static str,
    /// Dimensions of the section.
    pub dims: &'static [usize],
    /// Element encoding.
    pub element: ElementKind,
}

impl Section {
    /// Encoded size of the whole section.
    pub fn byte_len(&self) -> usize {
        element_count(self.dims) * self.element.size()
    }
}

/// The three RAM delay tables, in image order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RamFlavor {
    /// Plain block RAM.
    NoEcc,
    /// Block RAM with error correction.
    Ecc,
    /// Block RAM with output registers.
    Registered,
}

impl RamFlavor {
    /// All flavors in image order.
    pub const ALL: [Self; 3] = [Self::NoEcc, Self::Ecc, Self::Registered];

    /// Short lowercase tag used in resolved names.
    pub fn tag(self) -> &'static str {
        match self {
            Self::NoEcc => "noecc",
            Self::Ecc => "ecc",
            Self::Registered => "reg",
        }
    }

    /// Index subtracted from SETUPHOLD entry positions.
    pub fn setuphold_offset(self) -> i64 {
        match self {
            Self::NoEcc => 1000,
            Self::Ecc => 1500,
            Self::Registered => 2000,
        }
    }

    /// Section names of this flavor's sub-tables, in image order.
    pub const fn section_names(self) -> [&'static str; 5] {
        match self {
            Self::NoEcc => [
                "no-ECC RAM delays",
                "no-ECC RAM pin pairs",
                "no-ECC RAM bus widths",
                "no-ECC RAM alignment",
                "no-ECC RAM clock groups",
            ],
            Self::Ecc => [
                "ECC RAM delays",
                "ECC RAM pin pairs",
                "ECC RAM bus widths",
                "ECC RAM alignment",
                "ECC RAM clock groups",
            ],
            Self::Registered => [
                "registered RAM delays",
                "registered RAM pin pairs",
                "registered RAM bus widths",
                "registered RAM alignment",
                "registered RAM clock groups",
            ],
        }
    }
}

/// Encoding of a trailing singleton field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A full [`RawDelayRecord`](crate::RawDelayRecord).
    Full,
    /// A [`RawDelayRecordTri`](crate::RawDelayRecordTri).
    Tri,
}

impl FieldKind {
    /// Encoded size of the field.
    pub fn size(self) -> usize {
        match self {
            Self::Full => RECORD_BYTES,
            Self::Tri => TRI_RECORD_BYTES,
        }
    }
}

/// Trailing singleton fields, in image order.
pub const TRAILING_FIELDS: [(&str, FieldKind); 55] = [
    ("del_cpe_cout_x", FieldKind::Full),
    ("del_cpe_cout_y", FieldKind::Full),
    ("del_cpe_pout_x", FieldKind::Full),
    ("del_cpe_pout_y", FieldKind::Full),
    ("del_d2d_up", FieldKind::Full),
    ("del_d2d_down", FieldKind::Full),
    ("del_cpe_clk_q", FieldKind::Full),
    ("del_cpe_en", FieldKind::Full),
    ("del_cpe_sr", FieldKind::Full),
    ("del_cpe_setup", FieldKind::Tri),
    ("del_cpe_hold", FieldKind::Tri),
    ("del_cpe_width", FieldKind::Tri),
    ("del_glb_clk0", FieldKind::Full),
    ("del_glb_clk1", FieldKind::Full),
    ("del_glb_clk2", FieldKind::Full),
    ("del_glb_clk3", FieldKind::Full),
    ("del_glb_fb0", FieldKind::Full),
    ("del_glb_fb1", FieldKind::Full),
    ("del_glb_fb2", FieldKind::Full),
    ("del_glb_fb3", FieldKind::Full),
    ("del_sb_drive_p01", FieldKind::Full),
    ("del_sb_drive_p02", FieldKind::Full),
    ("del_sb_drive_p03", FieldKind::Full),
    ("del_sb_drive_p04", FieldKind::Full),
    ("del_sb_drive_p05", FieldKind::Full),
    ("del_sb_drive_p06", FieldKind::Full),
    ("del_sb_drive_p07", FieldKind::Full),
    ("del_sb_drive_p08", FieldKind::Full),
    ("del_sb_drive_p09", FieldKind::Full),
    ("del_sb_drive_p10", FieldKind::Full),
    ("del_sb_drive_p11", FieldKind::Full),
    ("del_sb_drive_p12", FieldKind::Full),
    ("del_iosel_in_ff", FieldKind::Full),
    ("del_iosel_out_ff", FieldKind::Full),
    ("del_iosel_oe_ff", FieldKind::Full),
    ("del_iosel_clk", FieldKind::Full),
    ("del_ser_clk", FieldKind::Full),
    ("del_spi_clk", FieldKind::Full),
    ("del_jtag_tck", FieldKind::Full),
    ("del_pll_lock", FieldKind::Tri),
    ("del_ram_clk_a", FieldKind::Full),
    ("del_ram_clk_b", FieldKind::Full),
    ("del_ram_cascade_a", FieldKind::Full),
    ("del_ram_cascade_b", FieldKind::Full),
    ("del_ram_ecc", FieldKind::Full),
    ("del_ram_fifo", FieldKind::Full),
    ("del_cfg_rst", FieldKind::Tri),
    ("del_cfg_done", FieldKind::Tri),
    ("del_usr_rstn", FieldKind::Tri),
    ("del_por", FieldKind::Tri),
    ("del_bank_vref", FieldKind::Tri),
    ("del_lvds_in", FieldKind::Full),
    ("del_lvds_out", FieldKind::Full),
    ("del_schmitt", FieldKind::Tri),
    ("del_pull", FieldKind::Tri),
];

/// Encoded size of all trailing singleton fields together.
pub fn trailing_bytes() -> usize {
    TRAILING_FIELDS.iter().map(|(_, k)| k.size()).sum()
}

const RAM_ENTRY_DIMS: &[usize] = &[RAM_ENTRIES];
const RAM_PIN_PAIR_DIMS: &[usize] = &[RAM_PIN_PAIRS];
const RAM_BUS_WIDTH_DIMS: &[usize] = &[RAM_BUS_WIDTHS];
const RAM_ALIGN_DIMS: &[usize] = &[RAM_ALIGN_PAD];
const RAM_CLOCK_GROUP_DIMS: &[usize] = &[RAM_CLOCK_GROUPS];

const fn ram_sections(flavor: RamFlavor) -> [Section; 5] {
    let names = flavor.section_names();
    [
        Section {
            name: names[0],
            dims: RAM_ENTRY_DIMS,
            element: ElementKind::RamEntry,
        },
        Section {
            name: names[1],
            dims: RAM_PIN_PAIR_DIMS,
            element: ElementKind::PinPair,
        },
        Section {
            name: names[2],
            dims: RAM_BUS_WIDTH_DIMS,
            element: ElementKind::I16,
        },
        Section {
            name: names[3],
            dims: RAM_ALIGN_DIMS,
            element: ElementKind::Pad,
        },
        Section {
            name: names[4],
            dims: RAM_CLOCK_GROUP_DIMS,
            element: ElementKind::I32,
        },
    ]
}

/// Section name of the switchbox-tile table.
pub const SB_TILE: &str = "switchbox-tile delays";
/// Section name of the input-mux table.
pub const IM_TILE: &str = "input-mux-tile delays";
/// Section name of the output-mux table.
pub const OM_TILE: &str = "output-mux-tile delays";
/// Section name of the CPE table.
pub const CPE_TILE: &str = "CPE-tile delays";
/// Section name of the rim switchbox table.
pub const SB_RIM: &str = "rim switchbox delays";
/// Section name of the edge table.
pub const EDGE: &str = "edge delays";
/// Section name of the IO-select table.
pub const IO_SEL: &str = "IO-select delays";
/// Section name of the clock-input table.
pub const CLK_IN: &str = "clock-input delays";
/// Section name of the global-output table.
pub const GLB_OUT: &str = "global-output delays";
/// Section name of the PLL table.
pub const PLL: &str = "PLL delays";
/// Section name of the IO-select coefficients.
pub const IO_COEF: &str = "IO-select coefficients";
/// Section name of the trailing singleton fields.
pub const TRAILING: &str = "trailing constants";
/// Section name of the trailing named-record array.
pub const NAMED: &str = "named delay records";

const NOECC: [Section; 5] = ram_sections(RamFlavor::NoEcc);
const ECC: [Section; 5] = ram_sections(RamFlavor::Ecc);
const REG: [Section; 5] = ram_sections(RamFlavor::Registered);

/// The complete image schema, in order.
pub static SECTIONS: [Section; 28] = [
    Section {
        name: SB_TILE,
        dims: &SB_TILE_DIMS,
        element: ElementKind::Arc,
    },
    Section {
        name: IM_TILE,
        dims: &IM_TILE_DIMS,
        element: ElementKind::Arc,
    },
    Section {
        name: OM_TILE,
        dims: &OM_TILE_DIMS,
        element: ElementKind::Arc,
    },
    Section {
        name: CPE_TILE,
        dims: &CPE_TILE_DIMS,
        element: ElementKind::Record,
    },
    Section {
        name: SB_RIM,
        dims: &SB_RIM_DIMS,
        element: ElementKind::Arc,
    },
    Section {
        name: EDGE,
        dims: &EDGE_DIMS,
        element: ElementKind::Arc,
    },
    Section {
        name: IO_SEL,
        dims: &IO_SEL_DIMS,
        element: ElementKind::Arc,
    },
    Section {
        name: CLK_IN,
        dims: &CLK_IN_DIMS,
        element: ElementKind::Arc,
    },
    Section {
        name: GLB_OUT,
        dims: &GLB_OUT_DIMS,
        element: ElementKind::Arc,
    },
    Section {
        name: PLL,
        dims: &PLL_DIMS,
        element: ElementKind::Arc,
    },
    NOECC[0],
    NOECC[1],
    NOECC[2],
    NOECC[3],
    NOECC[4],
    ECC[0],
    ECC[1],
    ECC[2],
    ECC[3],
    ECC[4],
    REG[0],
    REG[1],
    REG[2],
    REG[3],
    REG[4],
    Section {
        name: IO_COEF,
        dims: &IO_COEF_DIMS,
        element: ElementKind::F64,
    },
    Section {
        name: TRAILING,
        dims: &[1],
        element: ElementKind::Trailing,
    },
    Section {
        name: NAMED,
        dims: &[NAMED_RECORDS],
        element: ElementKind::Record,
    },
];

/// Returns `(section name, start offset)` for every section, in order.
pub fn section_offsets() -> Vec<(&'static str, usize)> {
    let mut offset = 0;
    SECTIONS
        .iter()
        .map(|s| {
            let start = offset;
            offset += s.byte_len();
            (s.name, start)
        })
        .collect()
}

/// Returns the start offset of the named section.
pub fn section_offset(name: &str) -> Option<usize> {
    section_offsets()
        .into_iter()
        .find(|(n, _)| *n == name)
        .map(|(_, o)| o)
}

/// Total length of a decompressed image.
pub fn image_len() -> usize {
    SECTIONS.iter().map(Section::byte_len).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_section_sizes() {
        assert_eq!(SECTIONS[0].byte_len(), 61_440 * 24);
        assert_eq!(SECTIONS[3].byte_len(), 1_900 * 80);
        assert_eq!(SECTIONS[5].byte_len(), 126_720 * 24);
    }

    #[test]
    fn offsets_are_cumulative() {
        let offsets = section_offsets();
        assert_eq!(offsets.len(), SECTIONS.len());
        assert_eq!(offsets[0], (SB_TILE, 0));
        for (i, window) in offsets.windows(2).enumerate() {
            assert_eq!(window[1].1 - window[0].1, SECTIONS[i].byte_len());
        }
        let (_, last) = offsets[offsets.len() - 1];
        assert_eq!(last + SECTIONS[SECTIONS.len() - 1].byte_len(), image_len());
    }

    #[test]
    fn ram_clock_groups_are_word_aligned() {
        let offsets = section_offsets();
        for flavor in RamFlavor::ALL {
            let name = flavor.section_names()[4];
            let (_, offset) = offsets.iter().find(|(n, _)| *n == name).unwrap();
            let ram_start = section_offset(flavor.section_names()[0]).unwrap();
            assert_eq!((offset - ram_start) % 4, 0, "{name}");
        }
    }

    #[test]
    fn section_names_are_unique() {
        let mut names: Vec<_> = SECTIONS.iter().map(|s| s.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), SECTIONS.len());
    }

    #[test]
    fn trailing_schema() {
        assert_eq!(TRAILING_FIELDS.len(), 55);
        let tri = TRAILING_FIELDS
            .iter()
            .filter(|(_, k)| *k == FieldKind::Tri)
            .count();
        assert_eq!(
            trailing_bytes(),
            tri * TRI_RECORD_BYTES + (55 - tri) * RECORD_BYTES
        );
    }

    #[test]
    fn setuphold_offsets_are_distinct() {
        let offsets: Vec<_> = RamFlavor::ALL.iter().map(|f| f.setuphold_offset()).collect();
        assert_ne!(offsets[0], offsets[1]);
        assert_ne!(offsets[1], offsets[2]);
        assert_ne!(offsets[0], offsets[2]);
    }
}
