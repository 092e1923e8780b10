//! Per-tile-type wiring templates.
//!
//! A template lists the groups, primitives, wires and muxes every tile of a
//! type carries. Templates and the wire names they use are built once and
//! live for the whole process, so connections can refer to wires by
//! `&'static str`.

use crate::tile_type::{SbSize, TileType};
use serde::Serialize;
use std::sync::LazyLock;

/// CPE input pins, in timing-table order.
pub const CPE_INPUTS: [&str; 19] = [
    "IN1", "IN2", "IN3", "IN4", "IN5", "IN6", "IN7", "IN8", "CLK", "EN", "SR", "CINX", "CINY1",
    "CINY2", "PINX", "PINY1", "PINY2", "RAM_I1", "RAM_I2",
];

/// CPE output pins, in timing-table order.
pub const CPE_OUTPUTS: [&str; 10] = [
    "OUT1", "OUT2", "COUTX", "COUTY1", "COUTY2", "POUTX", "POUTY1", "POUTY2", "RAM_O1", "RAM_O2",
];

/// GPIO pins driven from the fabric.
pub const GPIO_INPUTS: [&str; 5] = ["OUT1", "OUT2", "OE1", "OE2", "CLK"];
/// GPIO pins driving the fabric.
pub const GPIO_OUTPUTS: [&str; 2] = ["IN1", "IN2"];
/// The GPIO package pad.
pub const GPIO_PAD: &str = "PAD";

/// Signal planes.
pub const PLANES: u8 = 12;
/// First plane with an output mux.
pub const FIRST_OUTMUX_PLANE: u8 = 9;
/// Inputs of each input mux.
pub const INMUX_INPUTS: usize = 8;
/// Inputs of each output mux.
pub const OUTMUX_INPUTS: usize = 4;

/// Wire class, used by routers to pick cost models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WireClass {
    /// CPE pin on the left side.
    CpeWireL,
    /// CPE pin on the bottom side.
    CpeWireB,
    /// CPE pin on the right side.
    CpeWireR,
    /// CPE pin on the top side.
    CpeWireT,
    /// Input-mux wire.
    InmuxWire,
    /// Output-mux wire.
    OutmuxWire,
    /// Big-switchbox wire.
    SbBigWire,
    /// Small-switchbox wire.
    SbSmlWire,
    /// GPIO primitive pin.
    GpioWire,
}

/// A switchbox-local wire of one plane.
///
/// Directions are numbered 1 = east, 2 = north, 3 = west, 4 = south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum SbWire {
    /// Plane input from the tile.
    D0,
    /// Span-2 input from direction `d`.
    D2(u8),
    /// Span-3 input from direction `d`.
    D3(u8),
    /// Span-4 input from direction `d` (big switchboxes only).
    D4(u8),
    /// Span-5 input from direction `d` (big switchboxes only).
    D5(u8),
    /// Output towards direction `d`.
    Y(u8),
    /// Diagonal output.
    YDiag,
}

const SB_LOCAL_WIRES: usize = 22;

impl SbWire {
    fn slot(self) -> usize {
        let dir = |d: u8| usize::from(d.clamp(1, 4));
        match self {
            Self::D0 => 0,
            Self::D2(d) => dir(d),
            Self::D3(d) => 4 + dir(d),
            Self::D4(d) => 8 + dir(d),
            Self::D5(d) => 12 + dir(d),
            Self::Y(d) => 16 + dir(d),
            Self::YDiag => 21,
        }
    }

    fn suffix(self) -> String {
        match self {
            Self::D0 => "D0".to_string(),
            Self::D2(d) => format!("D2_{d}"),
            Self::D3(d) => format!("D3_{d}"),
            Self::D4(d) => format!("D4_{d}"),
            Self::D5(d) => format!("D5_{d}"),
            Self::Y(d) => format!("Y{d}"),
            Self::YDiag => "YDIAG".to_string(),
        }
    }

    fn all() -> impl Iterator<Item = Self> {
        std::iter::once(Self::D0)
            .chain((1..=4).map(Self::D2))
            .chain((1..=4).map(Self::D3))
            .chain((1..=4).map(Self::D4))
            .chain((1..=4).map(Self::D5))
            .chain((1..=4).map(Self::Y))
            .chain(std::iter::once(Self::YDiag))
    }

    fn exists_in(self, size: SbSize) -> bool {
        size == SbSize::Big || !matches!(self, Self::D4(_) | Self::D5(_))
    }
}

struct WireNames {
    cpe_in: Vec<String>,
    cpe_out: Vec<String>,
    gpio: Vec<String>,
    im: Vec<String>,
    om: Vec<String>,
    sb: Vec<String>,
}

static WIRE_NAMES: LazyLock<WireNames> = LazyLock::new(|| {
    let im = (1..=PLANES)
        .flat_map(|p| {
            (0..INMUX_INPUTS)
                .map(move |k| format!("IM.P{p:02}.D{k}"))
                .chain(std::iter::once(format!("IM.P{p:02}.Y")))
        })
        .collect();
    let om = (FIRST_OUTMUX_PLANE..=PLANES)
        .flat_map(|p| {
            (0..OUTMUX_INPUTS)
                .map(move |k| format!("OM.P{p:02}.D{k}"))
                .chain(std::iter::once(format!("OM.P{p:02}.Y")))
        })
        .collect();
    let mut sb = Vec::with_capacity(2 * usize::from(PLANES) * SB_LOCAL_WIRES);
    for size in [SbSize::Big, SbSize::Small] {
        for p in 1..=PLANES {
            sb.extend(
                SbWire::all().map(|w| format!("{}.P{p:02}.{}", size.prefix(), w.suffix())),
            );
        }
    }
    WireNames {
        cpe_in: CPE_INPUTS.iter().map(|p| format!("CPE.{p}")).collect(),
        cpe_out: CPE_OUTPUTS.iter().map(|p| format!("CPE.{p}")).collect(),
        gpio: GPIO_INPUTS
            .iter()
            .chain(&GPIO_OUTPUTS)
            .chain(&[GPIO_PAD])
            .map(|p| format!("GPIO.{p}"))
            .collect(),
        im,
        om,
        sb,
    }
});

/// Wire of CPE input pin `i` (index into [`CPE_INPUTS`]).
pub(crate) fn cpe_input_wire(i: usize) -> &'static str {
    &WIRE_NAMES.cpe_in[i]
}

/// Wire of CPE output pin `i` (index into [`CPE_OUTPUTS`]).
pub(crate) fn cpe_output_wire(i: usize) -> &'static str {
    &WIRE_NAMES.cpe_out[i]
}

/// Wire of a CPE pin by name.
pub fn cpe_wire(pin: &str) -> Option<&'static str> {
    CPE_INPUTS
        .iter()
        .position(|p| *p == pin)
        .map(cpe_input_wire)
        .or_else(|| CPE_OUTPUTS.iter().position(|p| *p == pin).map(cpe_output_wire))
}

/// Input `k` of the input mux on `plane` (1-based).
pub(crate) fn im_input(plane: u8, k: usize) -> &'static str {
    &WIRE_NAMES.im[usize::from(plane - 1) * (INMUX_INPUTS + 1) + k]
}

/// Output of the input mux on `plane` (1-based).
pub(crate) fn im_output(plane: u8) -> &'static str {
    im_input(plane, INMUX_INPUTS)
}

/// Input `k` of the output mux on `plane` (9..=12).
pub(crate) fn om_input(plane: u8, k: usize) -> &'static str {
    &WIRE_NAMES.om[usize::from(plane - FIRST_OUTMUX_PLANE) * (OUTMUX_INPUTS + 1) + k]
}

/// Output of the output mux on `plane` (9..=12).
pub(crate) fn om_output(plane: u8) -> &'static str {
    om_input(plane, OUTMUX_INPUTS)
}

/// A switchbox wire on `plane` (1-based).
pub(crate) fn sb_wire(size: SbSize, plane: u8, wire: SbWire) -> &'static str {
    let size_slot = match size {
        SbSize::Big => 0,
        SbSize::Small => 1,
    };
    let plane_slot = usize::from(plane - 1);
    &WIRE_NAMES.sb[(size_slot * usize::from(PLANES) + plane_slot) * SB_LOCAL_WIRES + wire.slot()]
}

fn gpio_wire(pin: usize) -> &'static str {
    &WIRE_NAMES.gpio[pin]
}

/// Direction of a primitive pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PinDir {
    /// Driven by the fabric.
    Input,
    /// Drives the fabric.
    Output,
    /// Package pad.
    Inout,
}

/// A pin of a primitive and the tile wire it is attached to.
#[derive(Debug, Clone, Serialize)]
pub struct Pin {
    /// Pin name.
    pub name: &'static str,
    /// Direction.
    pub dir: PinDir,
    /// Attached tile wire.
    pub wire: &'static str,
}

/// A placeable primitive.
#[derive(Debug, Clone, Serialize)]
pub struct Primitive {
    /// Primitive name.
    pub name: &'static str,
    /// Pins.
    pub pins: Vec<Pin>,
}

/// A tile-local wire.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Wire {
    /// Wire name.
    pub name: &'static str,
    /// Wire class.
    pub class: WireClass,
}

/// A configurable connection between two wires of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Mux {
    /// Source wire.
    pub src: &'static str,
    /// Destination wire.
    pub dst: &'static str,
    /// Selector width; zero for fixed connections.
    pub bits: u8,
    /// Selector value that enables this source.
    pub value: u8,
}

/// Everything a tile of one type carries.
#[derive(Debug, Clone, Serialize)]
pub struct TileTemplate {
    /// The tile type.
    pub tile_type: TileType,
    /// Configuration group names.
    pub groups: Vec<String>,
    /// Primitives.
    pub primitives: Vec<Primitive>,
    /// Wires.
    pub wires: Vec<Wire>,
    /// Muxes.
    pub muxes: Vec<Mux>,
}

impl TileTemplate {
    /// Looks up a wire by name.
    pub fn wire(&self, name: &str) -> Option<&Wire> {
        self.wires.iter().find(|w| w.name == name)
    }

    /// Returns `true` if the tile has a wire with this name.
    pub fn has_wire(&self, name: &str) -> bool {
        self.wire(name).is_some()
    }

    /// Returns the muxes driving `dst`, in selector order.
    pub fn drivers_of<'a>(&'a self, dst: &'a str) -> impl Iterator<Item = &'a Mux> + 'a {
        self.muxes.iter().filter(move |m| m.dst == dst)
    }

    /// Looks up a primitive by name.
    pub fn primitive(&self, name: &str) -> Option<&Primitive> {
        self.primitives.iter().find(|p| p.name == name)
    }
}

static TEMPLATES: LazyLock<Vec<TileTemplate>> =
    LazyLock::new(|| TileType::ALL.iter().map(|t| build_template(*t)).collect());

/// Returns the template of a tile type.
pub fn tile_template(tile_type: TileType) -> &'static TileTemplate {
    &TEMPLATES[tile_type.index()]
}

fn cpe_pin_class(pin: &str) -> WireClass {
    match pin {
        "CINY1" | "CINY2" | "PINY1" | "PINY2" => WireClass::CpeWireB,
        "COUTY1" | "COUTY2" | "POUTY1" | "POUTY2" => WireClass::CpeWireT,
        "OUT1" | "OUT2" | "COUTX" | "POUTX" | "RAM_O1" | "RAM_O2" => WireClass::CpeWireR,
        _ => WireClass::CpeWireL,
    }
}

fn build_template(tile_type: TileType) -> TileTemplate {
    let mut t = TileTemplate {
        tile_type,
        groups: Vec::new(),
        primitives: Vec::new(),
        wires: Vec::new(),
        muxes: Vec::new(),
    };
    if tile_type.is_cpe() {
        add_cpe(&mut t);
        add_inmux(&mut t);
    }
    if let Some(size) = tile_type.sb_size() {
        if tile_type.is_cpe() {
            add_outmux(&mut t);
        }
        add_switchbox(&mut t, size);
    }
    if tile_type.is_gpio() {
        t.groups.extend(["GPIO".to_string(), "IOSEL".to_string()]);
        add_gpio(&mut t);
    } else if tile_type.is_edge_io() {
        t.groups.push("IOSEL".to_string());
    }
    t
}

fn add_cpe(t: &mut TileTemplate) {
    t.groups.push("CPE".to_string());
    let inputs = CPE_INPUTS.into_iter().enumerate().map(|(i, name)| Pin {
        name,
        dir: PinDir::Input,
        wire: cpe_input_wire(i),
    });
    let outputs = CPE_OUTPUTS.into_iter().enumerate().map(|(i, name)| Pin {
        name,
        dir: PinDir::Output,
        wire: cpe_output_wire(i),
    });
    let pins: Vec<Pin> = inputs.chain(outputs).collect();
    t.wires.extend(pins.iter().map(|p| Wire {
        name: p.wire,
        class: cpe_pin_class(p.name),
    }));
    t.primitives.push(Primitive { name: "CPE", pins });
}

fn add_inmux(t: &mut TileTemplate) {
    for p in 1..=PLANES {
        t.groups.push(format!("INMUX_P{p:02}"));
        for k in 0..=INMUX_INPUTS {
            t.wires.push(Wire {
                name: im_input(p, k),
                class: WireClass::InmuxWire,
            });
        }
        for k in 0..INMUX_INPUTS {
            t.muxes.push(Mux {
                src: im_input(p, k),
                dst: im_output(p),
                bits: 3,
                value: k as u8,
            });
        }
    }
}

fn add_outmux(t: &mut TileTemplate) {
    for p in FIRST_OUTMUX_PLANE..=PLANES {
        t.groups.push(format!("OUTMUX_P{p:02}"));
        for k in 0..=OUTMUX_INPUTS {
            t.wires.push(Wire {
                name: om_input(p, k),
                class: WireClass::OutmuxWire,
            });
        }
        // OUT1 and OUT2 feed the first two inputs directly
        for k in 0..2 {
            t.muxes.push(Mux {
                src: cpe_output_wire(k),
                dst: om_input(p, k),
                bits: 0,
                value: 0,
            });
        }
        for k in 0..OUTMUX_INPUTS {
            t.muxes.push(Mux {
                src: om_input(p, k),
                dst: om_output(p),
                bits: 2,
                value: k as u8,
            });
        }
    }
}

/// Direction after a left turn from `d`.
fn turn_left(d: u8) -> u8 {
    d % 4 + 1
}

/// Direction after a right turn from `d`.
fn turn_right(d: u8) -> u8 {
    (d + 2) % 4 + 1
}

fn add_switchbox(t: &mut TileTemplate, size: SbSize) {
    let class = match size {
        SbSize::Big => WireClass::SbBigWire,
        SbSize::Small => WireClass::SbSmlWire,
    };
    for p in 1..=PLANES {
        t.groups.push(format!("{}_P{p:02}", size.prefix()));
        t.wires.extend(
            SbWire::all()
                .filter(|w| w.exists_in(size))
                .map(|w| Wire {
                    name: sb_wire(size, p, w),
                    class,
                }),
        );
        for d in 1..=4u8 {
            let sources: Vec<SbWire> = match size {
                SbSize::Big => vec![
                    SbWire::D0,
                    SbWire::D2(d),
                    SbWire::D3(d),
                    SbWire::D4(d),
                    SbWire::D5(d),
                    SbWire::YDiag,
                    SbWire::D2(turn_left(d)),
                    SbWire::D2(turn_right(d)),
                ],
                SbSize::Small => vec![SbWire::D0, SbWire::D2(d), SbWire::D3(d), SbWire::YDiag],
            };
            push_mux(t, size, p, &sources, SbWire::Y(d));
        }
        let diag_sources: Vec<SbWire> = match size {
            SbSize::Big => (1..=4)
                .map(SbWire::D2)
                .chain((1..=4).map(SbWire::D3))
                .collect(),
            SbSize::Small => (1..=4).map(SbWire::D2).collect(),
        };
        push_mux(t, size, p, &diag_sources, SbWire::YDiag);
    }
}

fn push_mux(t: &mut TileTemplate, size: SbSize, plane: u8, sources: &[SbWire], dst: SbWire) {
    let bits = sources.len().next_power_of_two().trailing_zeros() as u8;
    for (value, src) in sources.iter().enumerate() {
        t.muxes.push(Mux {
            src: sb_wire(size, plane, *src),
            dst: sb_wire(size, plane, dst),
            bits,
            value: value as u8,
        });
    }
}

fn add_gpio(t: &mut TileTemplate) {
    let mut pins = Vec::new();
    let dirs = GPIO_INPUTS
        .iter()
        .map(|n| (*n, PinDir::Input))
        .chain(GPIO_OUTPUTS.iter().map(|n| (*n, PinDir::Output)))
        .chain(std::iter::once((GPIO_PAD, PinDir::Inout)));
    for (i, (name, dir)) in dirs.enumerate() {
        let wire = gpio_wire(i);
        pins.push(Pin { name, dir, wire });
        t.wires.push(Wire {
            name: wire,
            class: WireClass::GpioWire,
        });
    }
    t.primitives.push(Primitive { name: "GPIO", pins });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn cpe_template() {
        let t = tile_template(TileType::Cpe);
        assert_eq!(t.tile_type, TileType::Cpe);
        assert_eq!(t.groups.len(), 13);
        assert_eq!(t.groups[0], "CPE");
        assert_eq!(t.groups[12], "INMUX_P12");
        let cpe = t.primitive("CPE").unwrap();
        assert_eq!(cpe.pins.len(), 29);
        assert_eq!(cpe.pins.iter().filter(|p| p.dir == PinDir::Input).count(), 19);
        assert!(t.has_wire("IM.P12.Y"));
        assert!(!t.has_wire("OM.P09.Y"));
        assert_eq!(t.drivers_of("IM.P03.Y").count(), 8);
    }

    #[test]
    fn cpe_big_template() {
        let t = tile_template(TileType::CpeBig);
        assert!(t.groups.iter().any(|g| g == "OUTMUX_P09"));
        assert!(t.groups.iter().any(|g| g == "SB_BIG_P12"));
        assert!(t.has_wire("OM.P12.D3"));
        assert!(t.has_wire("SB_BIG.P01.D5_4"));
        // the fixed CPE feeds land on D0 and D1, not on Y
        let om: Vec<_> = t.drivers_of("OM.P09.Y").collect();
        assert_eq!(om.len(), 4);
        assert!(om.iter().all(|m| m.bits == 2));
        assert_eq!(t.drivers_of("OM.P09.D0").next().unwrap().src, "CPE.OUT1");
    }

    #[test]
    fn big_switchbox_muxes() {
        let t = tile_template(TileType::SbBig);
        let y1: Vec<_> = t.drivers_of("SB_BIG.P04.Y1").collect();
        assert_eq!(y1.len(), 8);
        assert!(y1.iter().all(|m| m.bits == 3));
        let srcs: Vec<_> = y1.iter().map(|m| m.src).collect();
        assert_eq!(
            srcs,
            [
                "SB_BIG.P04.D0",
                "SB_BIG.P04.D2_1",
                "SB_BIG.P04.D3_1",
                "SB_BIG.P04.D4_1",
                "SB_BIG.P04.D5_1",
                "SB_BIG.P04.YDIAG",
                "SB_BIG.P04.D2_2",
                "SB_BIG.P04.D2_4",
            ]
        );
        assert_eq!(t.drivers_of("SB_BIG.P04.YDIAG").count(), 8);
        assert!(t.primitives.is_empty());
    }

    #[test]
    fn small_switchbox_muxes() {
        let t = tile_template(TileType::SbSml);
        assert!(!t.has_wire("SB_SML.P01.D4_1"));
        let y3: Vec<_> = t.drivers_of("SB_SML.P01.Y3").collect();
        assert_eq!(y3.len(), 4);
        assert!(y3.iter().all(|m| m.bits == 2));
        assert_eq!(t.drivers_of("SB_SML.P01.YDIAG").count(), 4);
        // D0, D2_1..4, D3_1..4, Y1..4, YDIAG on each plane
        assert_eq!(t.wires.len(), 12 * 14);
    }

    #[test]
    fn io_templates() {
        let gpio = tile_template(TileType::GpioL);
        assert_eq!(gpio.groups, ["GPIO", "IOSEL"]);
        assert!(gpio.primitive("GPIO").is_some());
        assert!(gpio.wires.iter().all(|w| w.class == WireClass::GpioWire));
        assert_eq!(tile_template(TileType::EdgeIoT).groups, ["IOSEL"]);
        let edge = tile_template(TileType::EdgeB);
        assert!(edge.groups.is_empty() && edge.wires.is_empty());
        assert!(tile_template(TileType::None).muxes.is_empty());
    }

    #[test]
    fn wire_names_are_unique_per_template() {
        for tt in TileType::ALL {
            let t = tile_template(tt);
            let names: HashSet<_> = t.wires.iter().map(|w| w.name).collect();
            assert_eq!(names.len(), t.wires.len(), "{tt}");
            for m in &t.muxes {
                assert!(t.has_wire(m.src), "{tt}: {}", m.src);
                assert!(t.has_wire(m.dst), "{tt}: {}", m.dst);
            }
        }
    }

    #[test]
    fn cpe_pin_sides() {
        let t = tile_template(TileType::CpeSml);
        assert_eq!(t.wire("CPE.CINX").unwrap().class, WireClass::CpeWireL);
        assert_eq!(t.wire("CPE.PINY2").unwrap().class, WireClass::CpeWireB);
        assert_eq!(t.wire("CPE.POUTX").unwrap().class, WireClass::CpeWireR);
        assert_eq!(t.wire("CPE.COUTY1").unwrap().class, WireClass::CpeWireT);
    }

    #[test]
    fn wire_lookups() {
        assert_eq!(im_input(1, 0), "IM.P01.D0");
        assert_eq!(im_output(12), "IM.P12.Y");
        assert_eq!(om_input(9, 3), "OM.P09.D3");
        assert_eq!(om_output(12), "OM.P12.Y");
        assert_eq!(sb_wire(SbSize::Small, 7, SbWire::Y(2)), "SB_SML.P07.Y2");
        assert_eq!(sb_wire(SbSize::Big, 12, SbWire::D2(4)), "SB_BIG.P12.D2_4");
        assert_eq!(cpe_wire("RAM_I1"), Some("CPE.RAM_I1"));
        assert_eq!(cpe_wire("COUTY2"), Some("CPE.COUTY2"));
        assert_eq!(cpe_wire("NOPE"), None);
    }

    #[test]
    fn every_plane_resolves_its_wires() {
        for p in 1..=PLANES {
            assert_eq!(im_output(p), format!("IM.P{p:02}.Y"));
            for size in [SbSize::Big, SbSize::Small] {
                for w in SbWire::all() {
                    assert!(sb_wire(size, p, w).ends_with(&w.suffix()));
                }
            }
        }
        for p in FIRST_OUTMUX_PLANE..=PLANES {
            assert_eq!(om_output(p), format!("OM.P{p:02}.Y"));
        }
        for (i, pin) in CPE_INPUTS.into_iter().enumerate() {
            assert_eq!(cpe_wire(pin), Some(cpe_input_wire(i)));
        }
        for (i, pin) in CPE_OUTPUTS.into_iter().enumerate() {
            assert_eq!(cpe_wire(pin), Some(cpe_output_wire(i)));
        }
    }

    #[test]
    fn unknown_pin_names_are_none() {
        for pin in ["", "IN0", "IN9", "in1", "CPE.IN1", "RAM_O3"] {
            assert_eq!(cpe_wire(pin), None, "{pin}");
        }
    }

    #[test]
    fn turns_are_perpendicular() {
        for d in 1..=4u8 {
            let (l, r) = (turn_left(d), turn_right(d));
            assert_ne!(l, d);
            assert_ne!(r, d);
            assert_ne!(l, r);
            assert_eq!((l + r) % 2, 0);
        }
    }
}
