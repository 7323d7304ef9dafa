mod cli;

use clap::Parser;
use eframe::egui;
use egui::{Color32, ColorImage, RichText};
use image::{Rgba, RgbaImage};
use scratchcard::{log_err, log_info, ScratchCard, ScratchConfig};

fn main() -> Result<(), eframe::Error> {
    let args = cli::CliArgs::parse();

    // Session log (overwrites the previous session's file)
    scratchcard::logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([args.window, args.window])
            .with_title("Scratch Card"),
        ..Default::default()
    };

    eframe::run_native(
        "Scratch Card",
        options,
        Box::new(move |_cc| Box::new(DemoApp::new(args))),
    )
}

struct DemoApp {
    card: ScratchCard,
    card_width: f32,
    show_next: bool,
}

impl DemoApp {
    fn new(args: cli::CliArgs) -> Self {
        // Same layout rule as the classic screen: a square card at half the
        // window width, centered horizontally.
        let card_width = args.window * 0.5;

        let revealed = match &args.image {
            Some(path) => match image::open(path) {
                Ok(img) => rgba_to_color_image(&img.into_rgba8()),
                Err(e) => {
                    log_err!("cannot load {:?}: {} — using generated prize", path, e);
                    prize_image(card_width as u32 * 2)
                }
            },
            None => prize_image(card_width as u32 * 2),
        };

        let config = ScratchConfig {
            stroke_width: args.stroke_width,
            completion_threshold: args.threshold,
            fill_color: args.fill,
            ..Default::default()
        };
        let card = ScratchCard::new(egui::vec2(card_width, card_width), revealed)
            .with_config(config)
            .on_complete(|| log_info!("completion signal delivered"));

        log_info!(
            "demo up: card {}pt, stroke {}pt, threshold {}%",
            card_width,
            args.stroke_width,
            args.threshold
        );

        Self {
            card,
            card_width,
            show_next: false,
        }
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(80.0);
            ui.vertical_centered(|ui| {
                let response = self.card.show(ui);
                if response.just_completed {
                    self.show_next = true;
                }

                // Revealed enough — offer the next step below the card.
                if self.show_next {
                    ui.add_space(10.0);
                    let next = egui::Button::new(
                        RichText::new("Next").size(24.0).strong().color(Color32::WHITE),
                    )
                    .fill(Color32::from_rgb(0, 140, 60))
                    .rounding(25.0);
                    if ui.add_sized([self.card_width, 50.0], next).clicked() {
                        log_info!("next tapped");
                        println!("Next");
                    }
                }
            });
        });
    }
}

/// Convert straight-alpha RGBA to a premultiplied `ColorImage`. Fully
/// opaque images (the common case, and everything `prize_image` generates)
/// cast zero-copy; anything with real transparency goes through
/// `from_rgba_unmultiplied` so blending comes out right.
fn rgba_to_color_image(img: &RgbaImage) -> ColorImage {
    let size = [img.width() as usize, img.height() as usize];
    let pixels = if img.pixels().all(|p| p.0[3] == 255) {
        bytemuck::cast_slice(img.as_raw()).to_vec()
    } else {
        img.pixels()
            .map(|p| Color32::from_rgba_unmultiplied(p.0[0], p.0[1], p.0[2], p.0[3]))
            .collect()
    };
    ColorImage { size, pixels }
}

/// Fallback prize graphic: a gold star on a radial gold-to-crimson gradient.
fn prize_image(size: u32) -> ColorImage {
    let size = size.max(2);
    let mut img = RgbaImage::new(size, size);
    let center = size as f32 / 2.0;
    let star_outer = center * 0.60;
    let star_inner = star_outer * 0.45;

    for (x, y, px) in img.enumerate_pixels_mut() {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        let dist = (dx * dx + dy * dy).sqrt();
        let t = (dist / center).clamp(0.0, 1.0);

        let mut r = lerp(250.0, 150.0, t);
        let mut g = lerp(190.0, 25.0, t);
        let mut b = lerp(70.0, 45.0, t);

        if in_star(dx, dy, star_outer, star_inner) {
            r = 255.0;
            g = 235.0;
            b = 160.0;
        }
        *px = Rgba([r as u8, g as u8, b as u8, 255]);
    }
    rgba_to_color_image(&img)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Stylized five-pointed star: boundary radius interpolates from `outer` at
/// the spike tips to `inner` midway between them.
fn in_star(dx: f32, dy: f32, outer: f32, inner: f32) -> bool {
    use std::f32::consts::PI;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist > outer {
        return false;
    }
    // Angle measured so one spike points straight up.
    let angle = dy.atan2(dx) + PI / 2.0;
    let sector = PI * 2.0 / 5.0;
    let from_tip = (angle.rem_euclid(sector) - sector / 2.0).abs();
    let frac = 1.0 - from_tip / (sector / 2.0);
    dist <= lerp(outer, inner, frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_images_convert_byte_for_byte() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([10, 20, 30, 255]));
        let out = rgba_to_color_image(&img);
        assert_eq!(out.pixels[0], Color32::from_rgb(255, 0, 0));
        assert_eq!(out.pixels[1], Color32::from_rgb(10, 20, 30));
    }

    #[test]
    fn translucent_pixels_are_premultiplied() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([255, 255, 255, 128]));
        let out = rgba_to_color_image(&img);
        assert_eq!(out.pixels[0], Color32::from_rgb(255, 0, 0));
        assert_eq!(
            out.pixels[1],
            Color32::from_rgba_unmultiplied(255, 255, 255, 128)
        );
        // Premultiplied: the stored channel can't exceed the alpha's share.
        assert!(out.pixels[1].a() == 128);
        assert!(out.pixels[1].r() < 255);
    }

    #[test]
    fn prize_image_is_fully_opaque() {
        let img = prize_image(32);
        assert!(img.pixels.iter().all(|p| p.a() == 255));
    }
}
