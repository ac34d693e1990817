//! Text rendering of the map for a viewing civilization.
//!
//! One character per tile, one line per row. Plain output uses glyphs only;
//! ANSI output adds civilization colors, fog and highlights through
//! crossterm's styling.

// Allow format! with push_str for readability - the allocation overhead is negligible for text rendering
#![allow(clippy::format_push_string)]

use std::fmt::Write as _;

use crossterm::style::{Color, Stylize};

use crate::game::{CivId, CivStyle, Coord, Feature, GameState, Reachable, Rgb, UnitId};

/// Glyph of a tile the viewer has never seen.
pub const FOG_GLYPH: char = '?';

/// Plain-text glyph of a reachable empty tile.
pub const REACHABLE_GLYPH: char = '*';

const NORMAL: CivStyle = CivStyle {
    foreground: Rgb(0xdf, 0xdf, 0xdf),
    background: Rgb(0x00, 0x00, 0x00),
};
const CURSOR: CivStyle = CivStyle {
    foreground: Rgb(0x00, 0x00, 0x00),
    background: Rgb(0xdf, 0xdf, 0xdf),
};
const FOG: CivStyle = CivStyle {
    foreground: Rgb(0x00, 0x00, 0x00),
    background: Rgb(0x9f, 0x9f, 0x9f),
};
const HIGHLIGHT: Rgb = Rgb(0xdf, 0xdf, 0x00);

/// Output flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderFormat {
    /// Glyphs only.
    #[default]
    Plain,
    /// Glyphs with ANSI 24-bit colors.
    Ansi,
}

/// What to draw and for whom.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    /// Civilization whose fog of war applies.
    pub viewer: CivId,
    /// Ignore fog of war entirely.
    pub reveal_all: bool,
    /// Reachable set to highlight.
    pub reachable: Option<&'a Reachable>,
    /// Selected unit, drawn highlighted.
    pub selected: Option<UnitId>,
    /// Cursor tile.
    pub cursor: Option<Coord>,
    /// Output flavor.
    pub format: RenderFormat,
}

impl View<'_> {
    /// A plain view for `viewer` with no overlays.
    #[must_use]
    pub const fn new(viewer: CivId) -> Self {
        Self {
            viewer,
            reveal_all: false,
            reachable: None,
            selected: None,
            cursor: None,
            format: RenderFormat::Plain,
        }
    }
}

const fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

/// Glyph and style for one tile.
fn tile_cell(state: &GameState, coord: Coord, view: &View<'_>) -> (char, CivStyle) {
    let is_cursor = view.cursor == Some(coord);
    let Some(tile) = state.map.get(coord) else {
        return (FOG_GLYPH, FOG);
    };

    if !view.reveal_all && !tile.is_discovered_by(view.viewer) {
        return (FOG_GLYPH, if is_cursor { CURSOR } else { FOG });
    }

    let owner_style = |civ: CivId| state.civ(civ).map_or(NORMAL, |c| c.style);
    let mut style = if is_cursor {
        CURSOR
    } else {
        state
            .city_at(coord)
            .map_or(NORMAL, |(_, city)| owner_style(city.owner))
    };

    let reachable = view
        .reachable
        .is_some_and(|r| r.contains(coord) && r.origin() != coord);

    let glyph = if let Some(unit) = state.unit_at(coord) {
        if !is_cursor {
            style = owner_style(unit.owner);
            if view.selected == Some(unit.id) {
                style.foreground = HIGHLIGHT;
            }
        }
        unit.kind.glyph()
    } else if reachable && view.format == RenderFormat::Plain {
        REACHABLE_GLYPH
    } else if tile.feature == Feature::None {
        tile.terrain.glyph()
    } else {
        tile.feature.glyph()
    };

    if reachable && !is_cursor {
        style.foreground = HIGHLIGHT;
    }
    (glyph, style)
}

/// Render the map, one line per row, without a trailing newline.
#[must_use]
pub fn render_map(state: &GameState, view: &View<'_>) -> String {
    let mut output = String::new();
    for y in 0..state.map.height() {
        if y > 0 {
            output.push('\n');
        }
        for x in 0..state.map.width() {
            let (glyph, style) = tile_cell(state, Coord::new(x, y), view);
            match view.format {
                RenderFormat::Plain => output.push(glyph),
                RenderFormat::Ansi => {
                    let styled = glyph
                        .with(color(style.foreground))
                        .on(color(style.background));
                    let _ = write!(output, "{styled}");
                }
            }
        }
    }
    output
}

/// List the units and cities the viewer can see, one per line.
#[must_use]
pub fn render_summary(state: &GameState, view: &View<'_>) -> String {
    let visible = |coord: Coord| {
        view.reveal_all
            || state
                .map
                .get(coord)
                .is_some_and(|tile| tile.is_discovered_by(view.viewer))
    };
    let civ_name = |civ: CivId| state.civ(civ).map_or("?", |c| c.name.as_str());

    let mut output = String::new();
    for unit in state.units().filter(|u| visible(u.position)) {
        output.push_str(&format!(
            "unit {} {} ({}) at {} {}/{} HP, {} kills\n",
            unit.id.0,
            unit.name,
            civ_name(unit.owner),
            unit.position,
            unit.hp,
            unit.max_hp,
            unit.kills
        ));
    }
    for (id, city) in state.cities().filter(|(_, c)| visible(c.position)) {
        output.push_str(&format!(
            "city {} {} ({}) at {}, {} tiles\n",
            id.0,
            city.name,
            civ_name(city.owner),
            city.position,
            state.map.tiles_of_city(id).count()
        ));
    }
    output
}
