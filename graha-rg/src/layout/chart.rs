//! Fixed-geometry chart diagram (North-Indian style)
//!
//! **[RG-LAY-060]** A constant diamond/quadrant template partitioning a
//! square into exactly 12 fixed-position cells. Content never alters the
//! geometry: each house's tokens are drawn inside its cell (clipped to the
//! cell's line budget), and the whole diagram occupies a constant vertical
//! footprint so it participates in overflow decisions as a fixed-height
//! block.

use crate::extract::Extract;
use crate::layout::engine::LayoutEngine;
use crate::layout::fonts::{self, Font};
use crate::layout::page::Primitive;
use crate::services::aggregator::FactBag;

/// Side of the chart square, points
pub const CHART_SIDE: f64 = 200.0;
/// Constant vertical footprint: square plus caption line
pub const CHART_BLOCK_HEIGHT: f64 = CHART_SIDE + 22.0;

const TOKEN_SIZE: f64 = 7.0;
/// Max token lines drawn per cell before clipping
const CELL_LINE_BUDGET: usize = 3;

/// Label anchor per house (fractions of the square side), houses 1..=12
/// counterclockwise from the top-center diamond
const HOUSE_ANCHORS: [(f64, f64); 12] = [
    (0.50, 0.26), // 1: top diamond
    (0.25, 0.11), // 2: upper-left triangle
    (0.11, 0.25), // 3: left-upper triangle
    (0.26, 0.50), // 4: left diamond
    (0.11, 0.75), // 5: left-lower triangle
    (0.25, 0.89), // 6: lower-left triangle
    (0.50, 0.74), // 7: bottom diamond
    (0.75, 0.89), // 8: lower-right triangle
    (0.89, 0.75), // 9: right-lower triangle
    (0.74, 0.50), // 10: right diamond
    (0.89, 0.25), // 11: right-upper triangle
    (0.75, 0.11), // 12: upper-right triangle
];

/// Short display token for a celestial body name
fn abbreviate(name: &str) -> String {
    let lowered = name.trim().to_ascii_lowercase();
    let known = match lowered.as_str() {
        "sun" => "Su",
        "moon" => "Mo",
        "mars" => "Ma",
        "mercury" => "Me",
        "jupiter" => "Ju",
        "venus" => "Ve",
        "saturn" => "Sa",
        "rahu" => "Ra",
        "ketu" => "Ke",
        "ascendant" | "lagna" => "Asc",
        "uranus" => "Ur",
        "neptune" => "Ne",
        "pluto" => "Pl",
        _ => "",
    };
    if !known.is_empty() {
        return known.to_string();
    }
    let mut chars = name.trim().chars();
    match chars.next() {
        Some(first) => {
            let mut token: String = first.to_uppercase().collect();
            if let Some(second) = chars.next() {
                token.push(second);
            }
            token
        }
        None => String::new(),
    }
}

/// Mapping from house index (1..=12) to that cell's display tokens
///
/// Built once per diagram from a chart-placement fact, consumed by one
/// `draw_chart` call, then discarded.
#[derive(Debug, Clone, Default)]
pub struct DiagramSlotMap {
    slots: [Vec<String>; 12],
}

impl DiagramSlotMap {
    /// Tokens for one house (1..=12); out-of-range houses read as empty
    pub fn tokens(&self, house: usize) -> &[String] {
        if (1..=12).contains(&house) {
            &self.slots[house - 1]
        } else {
            &[]
        }
    }

    fn push(&mut self, house: i64, token: String) {
        if (1..=12).contains(&house) && !token.is_empty() {
            self.slots[(house - 1) as usize].push(token);
        } else if !(1..=12).contains(&house) {
            tracing::warn!(house, token = %token, "Chart placement outside houses 1..12");
        }
    }

    /// Build from a chart-placement fact
    ///
    /// Accepts the two payload shapes seen upstream: a flat array of planet
    /// objects (`[{name, house}]`) or an array of house objects
    /// (`[{house?, sign, planets: [...]}]`, house defaulting to the element
    /// index + 1). A missing or malformed fact yields an empty map; the
    /// template is still drawn.
    pub fn from_chart_fact(bag: &FactBag, fact: &str) -> Self {
        let mut map = Self::default();
        let x = Extract::new(bag);

        let items = x.list(fact, &["", "houses", "planets", "chart"]);
        for (i, item) in items.iter().enumerate() {
            if let Some(planets) = item.get("planets").and_then(|v| v.as_array()) {
                // House-object shape
                let house = item
                    .get("house")
                    .and_then(|v| v.as_i64())
                    .unwrap_or(i as i64 + 1);
                if let Some(sign) = item.get("sign").and_then(|v| v.as_i64()) {
                    map.push(house, sign.to_string());
                }
                for planet in planets {
                    if let Some(name) = planet.as_str() {
                        map.push(house, abbreviate(name));
                    } else if let Some(name) = planet.get("name").and_then(|v| v.as_str()) {
                        map.push(house, abbreviate(name));
                    }
                }
            } else {
                // Planet-object shape
                let name = item
                    .get("name")
                    .or_else(|| item.get("planet"))
                    .and_then(|v| v.as_str());
                let house = item
                    .get("house")
                    .or_else(|| item.get("house_number"))
                    .and_then(|v| v.as_i64());
                if let (Some(name), Some(house)) = (name, house) {
                    map.push(house, abbreviate(name));
                }
            }
        }
        map
    }
}

/// Draw the chart template and its tokens at the cursor
///
/// The block height is constant regardless of content; the ascendant house
/// (house 1, the template's anchor cell) receives a distinguishing marker.
pub fn draw_chart(engine: &mut LayoutEngine, slots: &DiagramSlotMap, caption: &str) {
    let (_, top) = engine.reserve(CHART_BLOCK_HEIGHT);
    let page_width = engine.geometry().width;
    let x0 = (page_width - CHART_SIDE) / 2.0;
    let y0 = top;
    let s = CHART_SIDE;

    // Template: outer square, both diagonals, midpoint diamond
    engine.draw(Primitive::Rect {
        x: x0,
        y: y0,
        w: s,
        h: s,
        fill_gray: None,
    });
    let lines = [
        (x0, y0, x0 + s, y0 + s),
        (x0 + s, y0, x0, y0 + s),
        (x0 + s / 2.0, y0, x0 + s, y0 + s / 2.0),
        (x0 + s, y0 + s / 2.0, x0 + s / 2.0, y0 + s),
        (x0 + s / 2.0, y0 + s, x0, y0 + s / 2.0),
        (x0, y0 + s / 2.0, x0 + s / 2.0, y0),
    ];
    for (x1, y1, x2, y2) in lines {
        engine.draw(Primitive::Line {
            x1,
            y1,
            x2,
            y2,
            width: 0.75,
        });
    }

    // Ascendant marker in the anchor cell
    let (ax, ay) = HOUSE_ANCHORS[0];
    let marker = "Asc";
    let marker_w = fonts::text_width(marker, Font::HelveticaOblique, TOKEN_SIZE);
    engine.draw(Primitive::Text {
        x: x0 + ax * s - marker_w / 2.0,
        y: y0 + (ay - 0.09) * s,
        size: TOKEN_SIZE,
        font: Font::HelveticaOblique,
        text: marker.to_string(),
    });

    // Tokens, centered on each house anchor, clipped to the cell budget
    for house in 1..=12usize {
        let tokens = slots.tokens(house);
        if tokens.is_empty() {
            continue;
        }
        let joined = tokens.join(" ");
        let cell_width = 0.24 * s;
        let wrapped = fonts::wrap_text(&joined, Font::Helvetica, TOKEN_SIZE, cell_width);
        let (fx, fy) = HOUSE_ANCHORS[house - 1];
        let line_h = fonts::line_height(TOKEN_SIZE);
        for (i, line) in wrapped.iter().take(CELL_LINE_BUDGET).enumerate() {
            let w = fonts::text_width(line, Font::Helvetica, TOKEN_SIZE);
            engine.draw(Primitive::Text {
                x: x0 + fx * s - w / 2.0,
                y: y0 + fy * s + i as f64 * line_h,
                size: TOKEN_SIZE,
                font: Font::Helvetica,
                text: line.clone(),
            });
        }
        if wrapped.len() > CELL_LINE_BUDGET {
            tracing::debug!(house, "Chart cell tokens clipped to line budget");
        }
    }

    // Caption under the square
    let caption_w = fonts::text_width(caption, Font::HelveticaBold, 10.0);
    engine.draw(Primitive::Text {
        x: (page_width - caption_w) / 2.0,
        y: y0 + s + 16.0,
        size: 10.0,
        font: Font::HelveticaBold,
        text: caption.to_string(),
    });
}
