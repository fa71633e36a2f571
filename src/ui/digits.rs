//! Block-letter rendering for the countdown clock.

const GLYPH_HEIGHT: usize = 5;
const PIXEL_ON: &str = "██";
const PIXEL_OFF: &str = "  ";

fn glyph(c: char) -> Option<[&'static str; GLYPH_HEIGHT]> {
    let rows = match c {
        '0' => ["###", "# #", "# #", "# #", "###"],
        '1' => ["  #", "  #", "  #", "  #", "  #"],
        '2' => ["###", "  #", "###", "#  ", "###"],
        '3' => ["###", "  #", "###", "  #", "###"],
        '4' => ["# #", "# #", "###", "  #", "  #"],
        '5' => ["###", "#  ", "###", "  #", "###"],
        '6' => ["###", "#  ", "###", "# #", "###"],
        '7' => ["###", "  #", "  #", "  #", "  #"],
        '8' => ["###", "# #", "###", "# #", "###"],
        '9' => ["###", "# #", "###", "  #", "###"],
        ':' => [" ", "#", " ", "#", " "],
        _ => return None,
    };
    Some(rows)
}

pub fn height() -> u16 {
    GLYPH_HEIGHT as u16
}

/// Rows of block text for `text`, or None if it holds a character without a glyph
pub fn render_big(text: &str) -> Option<Vec<String>> {
    let glyphs = text.chars().map(glyph).collect::<Option<Vec<_>>>()?;

    let lines = (0..GLYPH_HEIGHT)
        .map(|row| {
            glyphs
                .iter()
                .map(|g| {
                    g[row]
                        .chars()
                        .map(|p| if p == '#' { PIXEL_ON } else { PIXEL_OFF })
                        .collect::<String>()
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    Some(lines)
}

/// Display columns needed by `render_big(text)`
pub fn width(text: &str) -> u16 {
    let pixels: usize = text
        .chars()
        .filter_map(glyph)
        .map(|g| g[0].chars().count() * 2)
        .sum();
    let gaps = text.chars().count().saturating_sub(1);
    (pixels + gaps) as u16
}
