//! Name tables for projecting raw table positions onto physical names.

use gatemate_arch::{CPE_INPUTS, CPE_OUTPUTS};

/// Edge sides in table order.
pub const SIDES: [char; 4] = ['L', 'B', 'R', 'T'];

/// Switchbox output direction facing each side: west, south, east, north.
pub const SIDE_FACING_DIR: [u8; 4] = [3, 4, 1, 2];

/// IO-select paths in table order.
pub const IO_SEL_PATHS: [&str; 11] = [
    "IN_Y", "IN_FF", "IN_DDR", "OUT_A", "OUT_FF", "OUT_DDR", "OE_A", "OE_FF", "CLK1",
    "CLK2", "DLY",
];

/// Clock-input sources in table order.
pub const CLK_IN_SOURCES: [&str; 7] =
    ["CLK0", "CLK1", "CLK2", "CLK3", "SER_CLK", "SPI_CLK", "JTAG_TCK"];

/// Global-output input kinds, repeated for each of the four PLLs.
pub const GLB_OUT_INPUT_KINDS: [&str; 7] = [
    "CLK0", "CLK90", "CLK180", "CLK270", "CLK_REF_OUT", "USR_GLB", "USR_FB",
];

/// Global-output outputs in table order.
pub const GLB_OUT_OUTPUTS: [&str; 8] = [
    "GLB0", "GLB1", "GLB2", "GLB3", "CLK_FB0", "CLK_FB1", "CLK_FB2", "CLK_FB3",
];

/// PLL inputs in table order.
pub const PLL_INPUTS: [&str; 7] = [
    "CLK_REF",
    "USR_CLK_REF",
    "CLK_FEEDBACK",
    "USR_CLK_FB",
    "USR_SEL_A_B",
    "USR_PLL_RST",
    "USR_LOCKED_STDY_RST",
];

/// PLL outputs in table order.
pub const PLL_OUTPUTS: [&str; 6] = [
    "CLK0",
    "CLK90",
    "CLK180",
    "CLK270",
    "CLK_REF_OUT",
    "USR_PLL_LOCKED",
];

/// Name of the derived feedback delay.
pub const FEEDBACK_DELAY: &str = "glbout_FEEDBACK_delay";
/// Minuend of the derived feedback delay.
pub const FEEDBACK_MINUEND: &str = "glbout_CLK0_0_CLK_FB0";
/// Subtrahend of the derived feedback delay.
pub const FEEDBACK_SUBTRAHEND: &str = "glbout_CLK0_0_GLB0";

/// Switchbox-tile arc name. `j` is the half-row index stored in the table.
pub fn sb_tile(t: usize, x: usize, j: usize, p: usize, d: usize, s: usize) -> String {
    let y = 2 * j + x % 2;
    format!("sb_del_t{t}_x{x}_y{y}_p{}_d{d}_s{s}", p + 1)
}

/// Input-mux arc name.
pub fn im_tile(t: usize, x: usize, y: usize, p: usize, s: usize) -> String {
    format!("im_del_t{t}_x{x}_y{y}_p{}_s{s}", p + 1)
}

/// Output-mux arc name. The table starts at plane 9.
pub fn om_tile(x: usize, y: usize, p: usize, s: usize) -> String {
    format!("om_del_x{x}_y{y}_p{}_s{s}", p + 9)
}

/// CPE arc name, or `None` for a pin index outside the pin tables.
pub fn cpe(record: &str, input: usize, output: usize) -> Option<String> {
    let i = CPE_INPUTS.get(input)?;
    let o = CPE_OUTPUTS.get(output)?;
    Some(format!("{record}_{i}_{o}"))
}

/// Rim switchbox arc name.
pub fn sb_rim(i: usize, side: usize, p: usize, d: usize, s: usize) -> String {
    format!("sb_rim_{}{i}_p{}_d{d}_s{s}", SIDES[side], p + 1)
}

/// Input name of an edge arc: the facing switchbox output, then the diagonal.
pub fn edge_input(side: usize, input: usize) -> String {
    if input < 12 {
        format!("P{:02}_Y{}", input + 1, SIDE_FACING_DIR[side])
    } else {
        format!("P{:02}_YDIAG", input - 11)
    }
}

/// Output name of an edge arc. Bottom and top edges drive IO outputs and
/// enables; left and right edges drive IO inputs and clocks.
pub fn edge_output(side: usize, output: usize) -> String {
    let horizontal = SIDES[side] == 'B' || SIDES[side] == 'T';
    match (horizontal, output < 4) {
        (true, true) => format!("IO_OUT{}", output + 1),
        (true, false) => format!("IO_OE{}", output - 3),
        (false, true) => format!("IO_IN{}", output + 1),
        (false, false) => format!("IO_CLK{}", output - 3),
    }
}

/// Edge arc name.
pub fn edge(i: usize, side: usize, input: usize, output: usize) -> String {
    format!(
        "edge_{}{i}_{}_{}",
        SIDES[side],
        edge_input(side, input),
        edge_output(side, output)
    )
}

/// IO-select arc name.
pub fn io_sel(path: usize, drive: usize) -> String {
    format!("iosel_{}_d{drive}", IO_SEL_PATHS[path])
}

/// Clock-input arc name.
pub fn clk_in(source: usize, clk_ref: usize) -> String {
    format!("clkin_{}_CLK_REF{clk_ref}", CLK_IN_SOURCES[source])
}

/// Global-output input name for table row `index`.
pub fn glb_out_input(index: usize) -> String {
    let pll = index / GLB_OUT_INPUT_KINDS.len();
    let kind = GLB_OUT_INPUT_KINDS[index % GLB_OUT_INPUT_KINDS.len()];
    format!("{kind}_{pll}")
}

/// Global-output arc name.
pub fn glb_out(input: usize, output: usize) -> String {
    format!("glbout_{}_{}", glb_out_input(input), GLB_OUT_OUTPUTS[output])
}

/// PLL arc name.
pub fn pll(input: usize, output: usize) -> String {
    format!("pll_{}_{}", PLL_INPUTS[input], PLL_OUTPUTS[output])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{EDGE_DIMS, GLB_OUT_DIMS, SB_TILE_DIMS};
    use std::collections::HashSet;

    #[test]
    fn sb_tile_row_interleaves_column_parity() {
        assert_eq!(sb_tile(0, 0, 0, 0, 0, 0), "sb_del_t0_x0_y0_p1_d0_s0");
        assert_eq!(sb_tile(1, 3, 2, 11, 4, 7), "sb_del_t1_x3_y5_p12_d4_s7");
    }

    #[test]
    fn sb_tile_names_are_unique() {
        let [t, x, j, p, d, s] = SB_TILE_DIMS;
        let mut seen = HashSet::new();
        for a in 0..t {
            for b in 0..x {
                for c in 0..j {
                    for e in 0..p {
                        for f in 0..d {
                            for g in 0..s {
                                assert!(seen.insert(sb_tile(a, b, c, e, f, g)));
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn mux_names() {
        assert_eq!(im_tile(1, 2, 3, 0, 7), "im_del_t1_x2_y3_p1_s7");
        assert_eq!(om_tile(0, 1, 3, 2), "om_del_x0_y1_p12_s2");
    }

    #[test]
    fn cpe_names_use_pin_tables() {
        assert_eq!(cpe("cpe_comb", 0, 0).as_deref(), Some("cpe_comb_IN1_OUT1"));
        assert_eq!(cpe("x", 18, 9).as_deref(), Some("x_RAM_I2_RAM_O2"));
        assert_eq!(cpe("x", 19, 0), None);
    }

    #[test]
    fn edge_inputs_face_the_edge() {
        assert_eq!(edge_input(0, 0), "P01_Y3");
        assert_eq!(edge_input(1, 11), "P12_Y4");
        assert_eq!(edge_input(2, 4), "P05_Y1");
        assert_eq!(edge_input(3, 12), "P01_YDIAG");
        assert_eq!(edge_input(3, 23), "P12_YDIAG");
    }

    #[test]
    fn edge_outputs_follow_orientation() {
        assert_eq!(edge(7, 1, 0, 0), "edge_B7_P01_Y4_IO_OUT1");
        assert_eq!(edge(0, 3, 0, 7), "edge_T0_P01_Y2_IO_OE4");
        assert_eq!(edge(2, 0, 12, 3), "edge_L2_P01_YDIAG_IO_IN4");
        assert_eq!(edge(2, 2, 0, 4), "edge_R2_P01_Y1_IO_CLK1");
    }

    #[test]
    fn edge_names_are_unique() {
        let [n, sides, inputs, outputs] = EDGE_DIMS;
        let mut seen = HashSet::new();
        for i in 0..n {
            for side in 0..sides {
                for a in 0..inputs {
                    for b in 0..outputs {
                        assert!(seen.insert(edge(i, side, a, b)));
                    }
                }
            }
        }
    }

    #[test]
    fn glb_out_inputs_cycle_per_pll() {
        assert_eq!(glb_out_input(0), "CLK0_0");
        assert_eq!(glb_out_input(4), "CLK_REF_OUT_0");
        assert_eq!(glb_out_input(7), "CLK0_1");
        assert_eq!(glb_out_input(GLB_OUT_DIMS[0] - 1), "USR_FB_3");
        assert_eq!(glb_out(0, 4), FEEDBACK_MINUEND);
        assert_eq!(glb_out(0, 0), FEEDBACK_SUBTRAHEND);
    }

    #[test]
    fn small_tables() {
        assert_eq!(io_sel(0, 3), "iosel_IN_Y_d3");
        assert_eq!(clk_in(4, 1), "clkin_SER_CLK_CLK_REF1");
        assert_eq!(pll(0, 5), "pll_CLK_REF_USR_PLL_LOCKED");
        assert_eq!(sb_rim(164, 3, 0, 2, 1), "sb_rim_T164_p1_d2_s1");
    }
}
