//! sRGB colour math: WCAG luminance and contrast, HSL conversions, mixing.

use tessera_model::Rgb;

/// WCAG 2.x relative luminance in `[0, 1]`.
#[must_use]
pub fn relative_luminance(rgb: Rgb) -> f64 {
    let linear = |channel: u8| {
        let c = f64::from(channel) / 255.0;
        if c <= 0.039_28 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
    };
    0.0722f64.mul_add(linear(rgb.b), 0.2126f64.mul_add(linear(rgb.r), 0.7152 * linear(rgb.g)))
}

/// WCAG contrast ratio in `[1, 21]`; symmetric in its arguments.
#[must_use]
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let (la, lb) = (relative_luminance(a), relative_luminance(b));
    let (light, dark) = if la >= lb { (la, lb) } else { (lb, la) };
    (light + 0.05) / (dark + 0.05)
}

/// Black or white, whichever contrasts more with `background`.
#[must_use]
pub fn best_text_color(background: Rgb) -> Rgb {
    if contrast_ratio(background, Rgb::BLACK) >= contrast_ratio(background, Rgb::WHITE) {
        Rgb::BLACK
    } else {
        Rgb::WHITE
    }
}

/// Linear blend from `from` (`t = 0`) to `to` (`t = 1`).
#[must_use]
pub fn mix(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let blend = |a: u8, b: u8| (f64::from(b) - f64::from(a)).mul_add(t, f64::from(a)).round() as u8;
    Rgb::new(blend(from.r, to.r), blend(from.g, to.g), blend(from.b, to.b))
}

/// Hue in degrees `[0, 360)`, saturation and lightness in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    #[must_use]
    pub fn from_rgb(rgb: Rgb) -> Self {
        let r = f64::from(rgb.r) / 255.0;
        let g = f64::from(rgb.g) / 255.0;
        let b = f64::from(rgb.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = f64::midpoint(max, min);
        let delta = max - min;

        if delta == 0.0 {
            return Self { h: 0.0, s: 0.0, l };
        }

        let s = delta / (1.0 - 2.0f64.mul_add(l, -1.0).abs());
        let h = if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        Self { h: h.rem_euclid(360.0), s: s.clamp(0.0, 1.0), l }
    }

    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        let s = self.s.clamp(0.0, 1.0);
        let l = self.l.clamp(0.0, 1.0);
        let h = self.h.rem_euclid(360.0);

        let chroma = (1.0 - 2.0f64.mul_add(l, -1.0).abs()) * s;
        let x = chroma * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
        let m = l - chroma / 2.0;
        let (r, g, b) = match h {
            h if h < 60.0 => (chroma, x, 0.0),
            h if h < 120.0 => (x, chroma, 0.0),
            h if h < 180.0 => (0.0, chroma, x),
            h if h < 240.0 => (0.0, x, chroma),
            h if h < 300.0 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb::new(channel(r), channel(g), channel(b))
    }

    /// No hue to speak of (greys, black, white).
    #[must_use]
    pub fn is_achromatic(self) -> bool {
        self.s < 1e-3 || self.l <= 0.0 || self.l >= 1.0
    }
}

/// Lightness raised by `amount` (`0.1` = ten percentage points).
#[must_use]
pub fn lighten(rgb: Rgb, amount: f64) -> Rgb {
    let hsl = Hsl::from_rgb(rgb);
    Hsl { l: (hsl.l + amount).clamp(0.0, 1.0), ..hsl }.to_rgb()
}

#[must_use]
pub fn darken(rgb: Rgb, amount: f64) -> Rgb {
    lighten(rgb, -amount)
}

#[must_use]
pub fn rotate_hue(rgb: Rgb, degrees: f64) -> Rgb {
    let hsl = Hsl::from_rgb(rgb);
    Hsl { h: (hsl.h + degrees).rem_euclid(360.0), ..hsl }.to_rgb()
}

/// Clockwise hue distance from `from` to `to`, in `[0, 360)`.
#[must_use]
pub fn hue_offset(from: Rgb, to: Rgb) -> f64 {
    (Hsl::from_rgb(to).h - Hsl::from_rgb(from).h).rem_euclid(360.0)
}
