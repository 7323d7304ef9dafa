// Demo command line: every recognized scratch-card constant is overridable
// so the widget can be exercised without recompiling.
//
//   scratchcard-demo
//   scratchcard-demo --image prize.png --stroke-width 24
//   scratchcard-demo --threshold 60 --fill "#c0c0c0"

use clap::Parser;

/// Scratch-card widget demo.
#[derive(Parser, Debug)]
#[command(name = "scratchcard-demo", about = "Interactive scratch card demo")]
pub struct CliArgs {
    /// Image revealed beneath the overlay (PNG/JPEG). A procedural prize
    /// graphic is generated when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub image: Option<std::path::PathBuf>,

    /// Erase stroke width in logical points.
    #[arg(long, default_value_t = 40.0)]
    pub stroke_width: f32,

    /// Coverage percentage at which the card completes.
    #[arg(long, default_value_t = 40.0)]
    pub threshold: f32,

    /// Overlay fill color as #rrggbb hex.
    #[arg(long, default_value = "#aaaaaa", value_parser = parse_hex_color)]
    pub fill: egui::Color32,

    /// Window inner size in logical points.
    #[arg(long, default_value_t = 480.0)]
    pub window: f32,
}

/// Parse "#rrggbb" (leading '#' optional) into an opaque color.
fn parse_hex_color(s: &str) -> Result<egui::Color32, String> {
    let hex = s.trim_start_matches('#');
    if hex.len() != 6 {
        return Err(format!("expected #rrggbb, got {:?}", s));
    }
    let byte = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| format!("bad hex digit in {:?}", s))
    };
    Ok(egui::Color32::from_rgb(byte(0)?, byte(2)?, byte(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse_with_and_without_hash() {
        assert_eq!(
            parse_hex_color("#aabbcc").unwrap(),
            egui::Color32::from_rgb(0xaa, 0xbb, 0xcc)
        );
        assert_eq!(
            parse_hex_color("ffffff").unwrap(),
            egui::Color32::from_rgb(255, 255, 255)
        );
        assert!(parse_hex_color("#abc").is_err());
        assert!(parse_hex_color("#zzzzzz").is_err());
    }
}
