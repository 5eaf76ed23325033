use crate::device::models::AlertEntry;
use crate::domain::{Band, DirectionLabel};
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine};
use ratatui::Frame;
use std::f64::consts::{FRAC_PI_2, PI};

/// Strongest signal the detector reports.
const MAX_STRENGTH: f64 = 8.0;

pub const fn band_color(band: Band) -> Color {
    match band {
        Band::X => Color::Green,
        Band::K => Color::Yellow,
        Band::Ka => Color::Red,
        Band::Laser => Color::Magenta,
        Band::Unknown => Color::Gray,
    }
}

/// One active alert placed on the radar scope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarContact {
    /// Radians, counter-clockwise from the right; front is straight up.
    pub angle: f64,
    /// Fraction of the scope radius; stronger signals sit closer in.
    pub distance: f64,
    pub color: Color,
}

/// Active alerts with a known direction, spread a little so that alerts
/// from the same direction do not overlap.
pub fn radar_contacts<'a, I>(entries: I) -> Vec<RadarContact>
where
    I: IntoIterator<Item = &'a AlertEntry>,
{
    let mut per_direction = [0_u32; 3];
    entries
        .into_iter()
        .filter(|entry| entry.active == Some(true))
        .filter_map(|entry| {
            let (slot, base) = match entry.direction_label()? {
                DirectionLabel::Front => (0, FRAC_PI_2),
                DirectionLabel::Side => (1, 0.0),
                DirectionLabel::Rear => (2, PI + FRAC_PI_2),
                DirectionLabel::Unrecognized(_) => return None,
            };
            let nth = per_direction[slot];
            per_direction[slot] += 1;
            let spread = f64::from(nth % 5) - 2.0;

            let strength = entry.strength.unwrap_or(MAX_STRENGTH / 2.0);
            let distance = (strength.clamp(0.0, MAX_STRENGTH) / MAX_STRENGTH).mul_add(-0.7, 0.9);

            Some(RadarContact {
                angle: spread.mul_add(0.15, base),
                distance,
                color: band_color(entry.band()),
            })
        })
        .collect()
}

pub fn render_mini_radar(
    f: &mut Frame<'_>,
    area: Rect,
    animation: f64,
    contacts: &[RadarContact],
) {
    if area.width < 4 || area.height < 4 {
        return;
    }

    let size = area.width.min(area.height * 2);
    let square = Rect {
        x: area.x + (area.width - size) / 2,
        y: area.y,
        width: size,
        height: area.height,
    };

    f.render_widget(
        Canvas::default()
            .paint(|ctx| {
                let radius = 0.9;

                for i in 1..=3 {
                    ctx.draw(&Circle {
                        x: 0.0,
                        y: 0.0,
                        radius: radius * (f64::from(i) / 3.0),
                        color: Color::DarkGray,
                    });
                }

                ctx.draw(&CanvasLine {
                    x1: 0.0,
                    y1: -radius,
                    x2: 0.0,
                    y2: radius,
                    color: Color::DarkGray,
                });
                ctx.draw(&CanvasLine {
                    x1: -radius,
                    y1: 0.0,
                    x2: radius,
                    y2: 0.0,
                    color: Color::DarkGray,
                });

                // Clockwise sweep starting at the front.
                let angle = FRAC_PI_2 - animation;
                let ghost_angle = angle + PI / 18.0;
                ctx.draw(&CanvasLine {
                    x1: 0.0,
                    y1: 0.0,
                    x2: ghost_angle.cos() * radius * 0.92,
                    y2: ghost_angle.sin() * radius * 0.92,
                    color: Color::LightCyan,
                });
                ctx.draw(&CanvasLine {
                    x1: 0.0,
                    y1: 0.0,
                    x2: angle.cos() * radius,
                    y2: angle.sin() * radius,
                    color: Color::Cyan,
                });

                ctx.layer();
                for contact in contacts {
                    ctx.draw(&Circle {
                        x: contact.angle.cos() * contact.distance * radius,
                        y: contact.angle.sin() * contact.distance * radius,
                        radius: 0.05,
                        color: contact.color,
                    });
                }
            })
            .x_bounds([-1.0, 1.0])
            .y_bounds([-1.0, 1.0]),
        square,
    );
}
