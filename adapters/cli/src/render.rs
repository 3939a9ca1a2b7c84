use delve_core::{TileKind, TileKindGrid};

/// Character used to draw a tile kind in terminal output.
#[must_use]
pub(crate) const fn glyph(kind: TileKind) -> char {
    match kind {
        TileKind::Floor => '.',
        TileKind::Ceiling => '#',
        TileKind::EdgeLeft | TileKind::EdgeRight => '|',
        TileKind::EdgeTop | TileKind::EdgeBottom => '-',
        TileKind::CornerTopLeft
        | TileKind::CornerTopRight
        | TileKind::CornerBottomLeft
        | TileKind::CornerBottomRight => '+',
        TileKind::StubTopLeft
        | TileKind::StubTopRight
        | TileKind::StubBottomLeft
        | TileKind::StubBottomRight => '\'',
    }
}

/// Renders the tile grid as text, marking the spawn cell with `@`.
#[must_use]
pub(crate) fn ascii(tiles: &TileKindGrid, spawn: (i32, i32)) -> String {
    let mut out = String::with_capacity((tiles.columns() as usize + 1) * tiles.rows() as usize);
    for (row, kinds) in tiles.rows_iter().enumerate() {
        for (column, kind) in kinds.iter().enumerate() {
            if (column as i32, row as i32) == spawn {
                out.push('@');
            } else {
                out.push(glyph(*kind));
            }
        }
        out.push('\n');
    }
    out
}
