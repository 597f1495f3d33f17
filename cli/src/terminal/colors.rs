use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 0x5f, g: 0xd7, b: 0xff };
pub const ACCENT: Color = Color::TrueColor { r: 0xff, g: 0xaf, b: 0x00 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const IP_ADDR: Color = Color::TrueColor { r: 0x87, g: 0xd7, b: 0x87 };

pub const OPEN: Color = Color::Green;
pub const CLOSED: Color = Color::Red;
pub const FILTERED: Color = Color::Yellow;
