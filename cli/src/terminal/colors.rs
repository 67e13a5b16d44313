use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 120, g: 200, b: 255 };
pub const ACCENT: Color = Color::TrueColor { r: 255, g: 165, b: 0 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const SUCCESS: Color = Color::Green;
pub const FAILURE: Color = Color::Red;
pub const PAYLOAD: Color = Color::TrueColor { r: 200, g: 200, b: 200 };
pub const CREDENTIAL: Color = Color::Yellow;
