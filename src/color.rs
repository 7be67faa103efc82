use std::fmt::Display;
use std::str::FromStr;

use crate::error::Error;

const LUMA_RED_WEIGHT: f64 = 0.2126;
const LUMA_GREEN_WEIGHT: f64 = 0.7152;
const LUMA_BLUE_WEIGHT: f64 = 0.0722;
// weighted sums such as the luma of white land a few ulps below the integer
const TRUNCATION_TOLERANCE: f64 = 1e-9;

/// A single RGB dot. The grey metrics are always derived from the three
/// channels and never stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    red: u16,
    green: u16,
    blue: u16,
}

impl Pixel {
    pub const fn new(red: u16, green: u16, blue: u16) -> Self {
        Self { red, green, blue }
    }

    pub const fn grey(level: u16) -> Self {
        Self::new(level, level, level)
    }

    pub fn red(&self) -> u16 {
        self.red
    }

    pub fn green(&self) -> u16 {
        self.green
    }

    pub fn blue(&self) -> u16 {
        self.blue
    }

    pub fn channels(&self) -> [u16; 3] {
        [self.red, self.green, self.blue]
    }

    pub fn value(&self) -> u16 {
        self.red.max(self.green).max(self.blue)
    }

    pub fn intensity(&self) -> f64 {
        (f64::from(self.red) + f64::from(self.green) + f64::from(self.blue)) / 3.0
    }

    pub fn luma(&self) -> f64 {
        let weighted_red = f64::from(self.red) * LUMA_RED_WEIGHT;
        let weighted_green = f64::from(self.green) * LUMA_GREEN_WEIGHT;
        let weighted_blue = f64::from(self.blue) * LUMA_BLUE_WEIGHT;
        weighted_red + weighted_green + weighted_blue
    }

    pub fn is_greyscale(&self) -> bool {
        self.red == self.green && self.green == self.blue
    }

    pub(crate) fn fits_into(&self, max_value: u16) -> bool {
        self.value() <= max_value
    }
}

/// Saturate a real channel value to `0..=max_value` and drop the fraction.
pub(crate) fn clamp_channel(value: f64, max_value: u16) -> u16 {
    (value + TRUNCATION_TOLERANCE).clamp(0.0, f64::from(max_value)) as u16
}

pub(crate) fn check_channel_range(value: i64, max_value: u16) -> crate::Result<u16> {
    if value < 0 || value > i64::from(max_value) {
        return Err(Error::ChannelValueOutOfRange(value, max_value));
    }
    Ok(value as u16)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GreyscaleComponent {
    Red,
    Green,
    Blue,
    Value,
    Intensity,
    Luma,
}

impl GreyscaleComponent {
    pub fn extract(&self, pixel: &Pixel, max_value: u16) -> u16 {
        match self {
            Self::Red => pixel.red(),
            Self::Green => pixel.green(),
            Self::Blue => pixel.blue(),
            Self::Value => pixel.value(),
            Self::Intensity => clamp_channel(pixel.intensity(), max_value),
            Self::Luma => clamp_channel(pixel.luma(), max_value),
        }
    }
}

impl FromStr for GreyscaleComponent {
    type Err = Error;

    /// Accepts `luma` as well as the `luma-component` spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_suffix("-component").unwrap_or(s);
        match name {
            "red" => Ok(Self::Red),
            "green" => Ok(Self::Green),
            "blue" => Ok(Self::Blue),
            "value" => Ok(Self::Value),
            "intensity" => Ok(Self::Intensity),
            "luma" => Ok(Self::Luma),
            _ => Err(Error::UnknownGreyscaleComponent(s.to_owned())),
        }
    }
}

impl Display for GreyscaleComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::Green => write!(f, "green"),
            Self::Blue => write!(f, "blue"),
            Self::Value => write!(f, "value"),
            Self::Intensity => write!(f, "intensity"),
            Self::Luma => write!(f, "luma"),
        }
    }
}

/// Linear map from `(red, green, blue)` to a new triple, one row per output
/// channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorMatrix {
    rows: [[f64; 3]; 3],
}

impl ColorMatrix {
    pub const fn new(rows: [[f64; 3]; 3]) -> Self {
        Self { rows }
    }

    pub fn apply(&self, pixel: &Pixel, max_value: u16) -> Pixel {
        let [red, green, blue] = self.rows.map(|row| {
            let weighted_red = row[0] * f64::from(pixel.red());
            let weighted_green = row[1] * f64::from(pixel.green());
            let weighted_blue = row[2] * f64::from(pixel.blue());
            clamp_channel(weighted_red + weighted_green + weighted_blue, max_value)
        });
        Pixel::new(red, green, blue)
    }
}

const LUMA_ROW: [f64; 3] = [LUMA_RED_WEIGHT, LUMA_GREEN_WEIGHT, LUMA_BLUE_WEIGHT];

pub const GREYSCALE_LUMA: ColorMatrix = ColorMatrix::new([LUMA_ROW, LUMA_ROW, LUMA_ROW]);

#[rustfmt::skip]
pub const SEPIA: ColorMatrix = ColorMatrix::new([
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
]);
