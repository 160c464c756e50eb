#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb01 {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb01 {
    pub const WHITE: Rgb01 = Rgb01 {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };
    pub const BLACK: Rgb01 = Rgb01 {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Accepts `#rgb`, `#rrggbb`, `white` and `black`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "white" => return Some(Self::WHITE),
            "black" => return Some(Self::BLACK),
            _ => {}
        }
        let hex = s.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let (r, g, b) = match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
                (r, g, b)
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                (r, g, b)
            }
            _ => return None,
        };
        Some(Self {
            r: (r as f64) / 255.0,
            g: (g as f64) / 255.0,
            b: (b as f64) / 255.0,
        })
    }

    pub fn to_hex(self) -> String {
        let r = (self.r.clamp(0.0, 1.0) * 255.0).round() as i64;
        let g = (self.g.clamp(0.0, 1.0) * 255.0).round() as i64;
        let b = (self.b.clamp(0.0, 1.0) * 255.0).round() as i64;
        format!(
            "#{:02x}{:02x}{:02x}",
            r.clamp(0, 255),
            g.clamp(0, 255),
            b.clamp(0, 255)
        )
    }

    pub fn lerp(self, other: Rgb01, t: f64) -> Rgb01 {
        Rgb01 {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }
}

/// Linear RGB interpolation over the domain `[0, 1]`, clamped at both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearColorScale {
    from: Rgb01,
    to: Rgb01,
}

impl LinearColorScale {
    pub fn new(from: Rgb01, to: Rgb01) -> Self {
        Self { from, to }
    }

    /// `white -> color`; an unparseable `color` falls back to `fallback`.
    pub fn from_white(color: &str, fallback: &str) -> Self {
        let to = Rgb01::parse(color)
            .or_else(|| {
                tracing::warn!(color, fallback, "unrecognized color, using fallback");
                Rgb01::parse(fallback)
            })
            .unwrap_or(Rgb01::BLACK);
        Self::new(Rgb01::WHITE, to)
    }

    pub fn at(&self, t: f64) -> String {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        self.from.lerp(self.to, t).to_hex()
    }
}
