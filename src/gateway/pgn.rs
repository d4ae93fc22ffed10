//! Minimal PGN movetext extraction.
//!
//! Pulls the SAN token sequence out of a single-game PGN export. Tag
//! pairs, comments, NAGs, move numbers and game terminators are dropped;
//! SAN validity itself is checked later, during board reconstruction.

/// Ordered SAN tokens of the game's mainline.
pub fn san_moves(pgn: &str) -> Vec<String> {
    let mut movetext = String::new();
    for line in pgn.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('[') {
            continue;
        }
        movetext.push(' ');
        // ';' comments run to end of line
        match line.split_once(';') {
            Some((before, _)) => movetext.push_str(before),
            None => movetext.push_str(line),
        }
    }

    let mut moves = Vec::new();
    let mut in_comment = false;
    for raw in movetext.split_whitespace() {
        // `{ ... }` comments may span tokens; they do not nest
        if in_comment {
            if raw.ends_with('}') {
                in_comment = false;
            }
            continue;
        }
        if raw.starts_with('{') {
            in_comment = !raw.ends_with('}');
            continue;
        }
        if matches!(raw, "1-0" | "0-1" | "1/2-1/2" | "*") || raw.starts_with('$') {
            continue;
        }
        // "12." / "12..." either stand alone or glue onto the move
        let token = raw.trim_start_matches(|c: char| c.is_ascii_digit() || c == '.');
        if token.is_empty() {
            continue;
        }
        moves.push(token.to_string());
    }
    moves
}
